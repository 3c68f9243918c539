use std::fmt;

use serde_json::{json, Value};

use crate::utils::constants::{API_KEY_HEADER, AUTHORIZATION_HEADER};

/// OAuth2 exchange mode.
#[derive(Clone, PartialEq, Eq)]
pub enum Grant {
    ClientCredentials,
    Password { username: String, password: String },
}

impl Grant {
    pub fn grant_type(&self) -> &'static str {
        match self {
            Grant::ClientCredentials => "client_credentials",
            Grant::Password { .. } => "password",
        }
    }

    /// Form body sent to the token endpoint.
    pub fn form(&self) -> Value {
        match self {
            Grant::ClientCredentials => json!({ "grant_type": self.grant_type() }),
            Grant::Password { username, password } => json!({
                "grant_type": self.grant_type(),
                "username": username,
                "password": password,
            }),
        }
    }
}

impl fmt::Debug for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grant::ClientCredentials => f.write_str("ClientCredentials"),
            Grant::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

/// How outbound requests are authenticated.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Long-lived key sent as-is; never cached, never refreshed.
    ApiKey(String),
    OAuth {
        client_id: String,
        client_secret: String,
        grant: Grant,
    },
}

impl Credentials {
    pub fn api_key(key: impl Into<String>) -> Self {
        Credentials::ApiKey(key.into())
    }

    pub fn client_credentials(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Credentials::OAuth {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            grant: Grant::ClientCredentials,
        }
    }

    pub fn password(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Credentials::OAuth {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            grant: Grant::Password {
                username: username.into(),
                password: password.into(),
            },
        }
    }

    /// Cache key of the credentials; `None` for API keys.
    pub fn client_identity(&self) -> Option<&str> {
        match self {
            Credentials::ApiKey(_) => None,
            Credentials::OAuth { client_id, .. } => Some(client_id),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ApiKey(_) => f.debug_tuple("ApiKey").field(&"***").finish(),
            Credentials::OAuth { client_id, grant, .. } => f
                .debug_struct("OAuth")
                .field("client_id", client_id)
                .field("client_secret", &"***")
                .field("grant", grant)
                .finish(),
        }
    }
}

/// Header merged into every outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthHeader {
    ApiKey(String),
    Bearer(String),
}

impl AuthHeader {
    pub fn name(&self) -> &'static str {
        match self {
            AuthHeader::ApiKey(_) => API_KEY_HEADER,
            AuthHeader::Bearer(_) => AUTHORIZATION_HEADER,
        }
    }

    pub fn value(&self) -> String {
        match self {
            AuthHeader::ApiKey(key) => key.to_owned(),
            AuthHeader::Bearer(token) => format!("Bearer {}", token),
        }
    }
}

impl fmt::Display for AuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.value())
    }
}
