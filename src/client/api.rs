use std::time::Duration;

use http::header::{ACCEPT, CONTENT_TYPE};
use http::Method;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;

use crate::auth::credentials::{AuthHeader, Credentials};
use crate::auth::endpoint::{AuthEndpoint, HttpAuthEndpoint};
use crate::auth::manager::CredentialManager;
use crate::cache::store::{TokenStore, TokenStoreKind};
use crate::config::settings::ClientConfig;
use crate::encoding::encode;
use crate::errors::{ApiError, ConfigError};
use crate::observability::metrics::get_metrics;
use crate::utils::constants::{DEFAULT_HTTP_TIMEOUT_MS, FORM_CONTENT_TYPE, JSON_CONTENT_TYPE};

/// Request payload. Form bodies use the bracketed parameter encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Form(Value),
}

/// Authenticated access to the REST API.
#[derive(Debug, Clone)]
pub struct LeasewebClient<S = TokenStoreKind, E = HttpAuthEndpoint> {
    http: Client,
    base_url: String,
    credentials: Credentials,
    manager: CredentialManager<S, E>,
}

impl LeasewebClient<TokenStoreKind, HttpAuthEndpoint> {
    /// Fails before any network activity when the credentials are missing or incomplete.
    pub fn from_config(cfg: &ClientConfig) -> Result<Self, ConfigError> {
        let credentials = cfg.auth.credentials()?;
        let http = Client::builder()
            .timeout(Duration::from_millis(
                cfg.api.timeout_ms.unwrap_or(DEFAULT_HTTP_TIMEOUT_MS),
            ))
            .build()
            .map_err(ConfigError::HttpClient)?;
        let store = cfg.token_cache.build_store()?;
        let endpoint = HttpAuthEndpoint::new(http.clone(), cfg.auth.token_url.to_owned());

        Ok(Self::new(
            http,
            cfg.api.base_url.to_owned(),
            credentials,
            CredentialManager::new(store, endpoint),
        ))
    }
}

impl<S, E> LeasewebClient<S, E>
where
    S: TokenStore,
    E: AuthEndpoint,
{
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        credentials: Credentials,
        manager: CredentialManager<S, E>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            credentials,
            manager,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn manager(&self) -> &CredentialManager<S, E> {
        &self.manager
    }

    pub async fn auth_header(&self) -> Result<AuthHeader, ApiError> {
        Ok(self.manager.authorize(&self.credentials).await?)
    }

    /// Absolute URL for `path` with `query` appended in bracketed form.
    pub fn url(&self, path: &str, query: Option<&Value>) -> String {
        let mut url = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_owned()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        };

        if let Some(query) = query {
            let encoded = encode(query);
            if !encoded.is_empty() {
                url.push(if url.contains('?') { '&' } else { '?' });
                url.push_str(&encoded);
            }
        }
        url
    }

    pub async fn get(&self, path: &str, query: Option<&Value>) -> Result<Value, ApiError> {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post(&self, path: &str, body: Option<RequestBody>) -> Result<Value, ApiError> {
        self.request(Method::POST, path, None, body).await
    }

    pub async fn put(&self, path: &str, body: Option<RequestBody>) -> Result<Value, ApiError> {
        self.request(Method::PUT, path, None, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::DELETE, path, None, None).await
    }

    /// Send a request and parse the JSON response. An empty body parses as `null`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<&Value>,
        body: Option<RequestBody>,
    ) -> Result<Value, ApiError> {
        let response = self
            .send(method.clone(), path, query, body, JSON_CONTENT_TYPE)
            .await?;
        let url = response.url().to_string();
        let text = response
            .text()
            .await
            .map_err(|source| ApiError::Transport {
                method,
                url: url.to_owned(),
                source,
            })?;
        parse_json_response(&url, &text)
    }

    /// Authenticated request; non-2xx responses become `ApiError::Status`.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: Option<&Value>,
        body: Option<RequestBody>,
        accept: &str,
    ) -> Result<Response, ApiError> {
        let url = self.url(path, query);
        let auth = self.auth_header().await?;

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(auth.name(), auth.value())
            .header(ACCEPT, accept);

        match body {
            Some(RequestBody::Json(value)) => {
                request = request
                    .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                    .body(value.to_string());
            }
            Some(RequestBody::Form(value)) => {
                request = request
                    .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                    .body(encode(&value));
            }
            None => {}
        }

        debug!(%method, %url, "api request");
        let response = request.send().await.map_err(|source| ApiError::Transport {
            method: method.clone(),
            url: url.to_owned(),
            source,
        })?;

        let status = response.status();
        get_metrics()
            .await
            .api_requests
            .with_label_values(&[method.as_str(), status.as_str()])
            .inc();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                method,
                url,
                status,
                body,
            });
        }
        Ok(response)
    }
}

/// Parse a 2xx body. A JSON object carrying `errorMessage` is a vendor-level error.
pub fn parse_json_response(url: &str, text: &str) -> Result<Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    let json: Value = serde_json::from_str(text).map_err(|source| ApiError::Decode {
        url: url.to_owned(),
        source,
    })?;

    if let Some(message) = json.get("errorMessage").and_then(Value::as_str) {
        let code = match json.get("errorCode") {
            Some(Value::String(code)) => code.to_owned(),
            Some(Value::Null) | None => "unknown".to_owned(),
            Some(other) => other.to_string(),
        };
        return Err(ApiError::Vendor {
            code,
            message: message.to_owned(),
        });
    }
    Ok(json)
}
