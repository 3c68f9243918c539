use std::future::Future;

use http::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::auth::credentials::Grant;
use crate::encoding::encode;
use crate::errors::AuthExchangeError;
use crate::utils::constants::FORM_CONTENT_TYPE;

/// Token as handed out by the token endpoint, before it gets an absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    /// seconds
    pub expires_in: i64,
}

/// OAuth2 token-issuing endpoint.
pub trait AuthEndpoint: Send + Sync {
    fn request_token(
        &self,
        client_id: &str,
        client_secret: &str,
        grant: &Grant,
    ) -> impl Future<Output = Result<IssuedToken, AuthExchangeError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpAuthEndpoint {
    pub token_url: String,
    pub client: Client,
}

impl HttpAuthEndpoint {
    pub fn new(client: Client, token_url: impl Into<String>) -> Self {
        Self {
            token_url: token_url.into(),
            client,
        }
    }
}

impl AuthEndpoint for HttpAuthEndpoint {
    async fn request_token(
        &self,
        client_id: &str,
        client_secret: &str,
        grant: &Grant,
    ) -> Result<IssuedToken, AuthExchangeError> {
        let transport = |source| AuthExchangeError::Transport {
            url: self.token_url.to_owned(),
            source,
        };

        debug!(url = %self.token_url, grant = grant.grant_type(), "requesting token");
        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(client_id, Some(client_secret))
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(encode(&grant.form()))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        if !status.is_success() {
            return Err(AuthExchangeError::Status {
                url: self.token_url.to_owned(),
                status,
                body,
            });
        }
        parse_token_response(&body)
    }
}

/// Extract `access_token` and `expires_in` from a token endpoint response body.
///
/// `expires_in` is accepted as a JSON integer or a numeric string.
pub fn parse_token_response(body: &str) -> Result<IssuedToken, AuthExchangeError> {
    let json: Value = serde_json::from_str(body)?;

    let access_token = json
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .ok_or(AuthExchangeError::MissingField("access_token"))?
        .to_owned();

    let expires_in = json
        .get("expires_in")
        .and_then(|v| {
            v.as_i64()
                .or_else(|| v.as_str().and_then(|s| s.trim().parse::<i64>().ok()))
        })
        .ok_or(AuthExchangeError::MissingField("expires_in"))?;

    Ok(IssuedToken {
        access_token,
        expires_in,
    })
}
