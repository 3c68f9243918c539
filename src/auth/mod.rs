pub mod credentials;
pub mod endpoint;
pub mod manager;

pub use credentials::{AuthHeader, Credentials, Grant};
pub use endpoint::{AuthEndpoint, HttpAuthEndpoint, IssuedToken};
pub use manager::CredentialManager;
