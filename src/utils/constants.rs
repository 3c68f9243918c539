//! Shared constants and invariants

pub const DEFAULT_API_BASE_URL: &str = "https://api.leaseweb.com";
pub const DEFAULT_TOKEN_URL: &str = "https://auth.leaseweb.com/token";
pub const DEFAULT_TOKEN_CACHE_DIR: &str = "/tmp/lsw-rest-api";
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_PAGE_LIMIT: u64 = 50;

// Auth headers
pub const API_KEY_HEADER: &str = "X-Lsw-Auth";
pub const AUTHORIZATION_HEADER: &str = "Authorization";

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const JSON_CONTENT_TYPE: &str = "application/json";
