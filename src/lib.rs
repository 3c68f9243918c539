//! # Leaseweb REST API client
//!
//! Authenticates requests with an API key or an OAuth2 bearer token that is
//! cached on disk per client id, and encodes nested request parameters in the
//! bracketed `key[sub][0]=value` form the API expects.
//!
//! Modules:
//! - `encoding`: nested value to form string encoder
//! - `cache`: cached token type and token stores (file, memory)
//! - `auth`: credentials, token endpoint, credential manager
//! - `client`: authenticated requests, pagination, server metrics
//! - `config`: YAML configuration, env expansion and validation

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod encoding;
pub mod errors;
pub mod helpers;
pub mod observability;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::auth::{AuthHeader, CredentialManager, Credentials, Grant};
pub use crate::cache::{CachedToken, FileTokenStore, MemoryTokenStore, TokenStore};
pub use crate::client::{LeasewebClient, RequestBody};
pub use crate::encoding::{encode, encode_params};
pub use crate::errors::{ApiError, AuthExchangeError, ConfigError, EncodingError, StoreError};
