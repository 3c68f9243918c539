use http::{Method, StatusCode};
use thiserror::Error;

/// Input handed to the parameter encoder that cannot be represented as a structured value.
#[derive(Debug, Error)]
#[error("value cannot be form-encoded: {0}")]
pub struct EncodingError(#[from] pub serde_json::Error);

/// Failure persisting or removing a cached token record.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("token store io error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("token record cannot be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The only error class a caller of the credential manager observes.
#[derive(Debug, Error)]
pub enum AuthExchangeError {
    #[error("token request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("token endpoint '{url}' responded with {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("token endpoint response is not valid json: {0}")]
    InvalidResponse(#[from] serde_json::Error),
    #[error("token endpoint response is missing field '{0}'")]
    MissingField(&'static str),
}

impl AuthExchangeError {
    /// Short label used for the failure metric.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthExchangeError::Transport { .. } => "transport",
            AuthExchangeError::Status { .. } => "status",
            AuthExchangeError::InvalidResponse(_) => "invalid_response",
            AuthExchangeError::MissingField(_) => "missing_field",
        }
    }
}

/// Raised while turning configuration into a usable client, before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no credentials configured: supply either 'api_key' or 'client_id' + 'client_secret'")]
    MissingCredentials,
    #[error("both 'api_key' and oauth client credentials are configured; choose one")]
    AmbiguousCredentials,
    #[error("config is not valid: {}", .0.join("; "))]
    Invalid(Vec<String>),
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthExchangeError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error("{method} '{url}' failed: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} '{url}' responded with {status}: {body}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("response from '{url}' is not valid json: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("api error {code}: {message}")]
    Vendor { code: String, message: String },
    #[error("paginated response from '{url}' is malformed: {reason}")]
    Pagination { url: String, reason: String },
}
