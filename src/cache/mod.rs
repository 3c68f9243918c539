pub mod file_store;
pub mod store;
pub mod token;

pub use file_store::FileTokenStore;
pub use store::{CacheLookup, MemoryTokenStore, TokenStore, TokenStoreKind};
pub use token::{CachedToken, TokenRecord};
