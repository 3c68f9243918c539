pub mod loader;
pub mod settings;
pub mod validator;

pub use loader::{expand_env_vars, file_to_config, parse_config};
pub use settings::ClientConfig;
