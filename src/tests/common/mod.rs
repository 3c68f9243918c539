// tests/common/mod.rs
pub use serde_json::json;

use chrono::{Duration, Utc};
use httpmock::Method::POST;
use httpmock::{Mock, MockServer};
use reqwest::Client;

use crate::auth::endpoint::HttpAuthEndpoint;
use crate::cache::token::CachedToken;

pub const CLIENT_ID: &str = "lsw-client";
pub const CLIENT_SECRET: &str = "s3cr3t";
/// base64("lsw-client:s3cr3t")
pub const BASIC_AUTH: &str = "Basic bHN3LWNsaWVudDpzM2NyM3Q=";
pub const TOKEN_PATH: &str = "/token";

/// Token endpoint answering `form_body` with the given token.
pub async fn mock_token_endpoint<'a>(
    server: &'a MockServer,
    form_body: &str,
    access_token: &str,
    expires_in: i64,
) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(TOKEN_PATH)
                .header("authorization", BASIC_AUTH)
                .header("content-type", "application/x-www-form-urlencoded")
                .body(form_body);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({
                    "access_token": access_token,
                    "expires_in": expires_in,
                    "token_type": "Bearer"
                }));
        })
        .await
}

pub fn http_endpoint(server: &MockServer) -> HttpAuthEndpoint {
    HttpAuthEndpoint::new(build_reqwest_client(), server.url(TOKEN_PATH))
}

/// Cached token expiring `seconds` from now (negative for already expired).
pub fn token_expiring_in(client_id: &str, value: &str, seconds: i64) -> CachedToken {
    CachedToken::new(
        client_id.to_owned(),
        value.to_owned(),
        Utc::now() + Duration::seconds(seconds),
    )
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}
