use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::file_store::FileTokenStore;
use crate::cache::token::CachedToken;
use crate::errors::StoreError;

/// Outcome of looking a record up. Keeps "nothing stored" apart from "stored but unreadable".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    Found(CachedToken),
    Missing,
    Malformed(String),
}

impl CacheLookup {
    pub fn into_token(self) -> Option<CachedToken> {
        match self {
            CacheLookup::Found(token) => Some(token),
            CacheLookup::Missing | CacheLookup::Malformed(_) => None,
        }
    }
}

/// Durable one-record-per-identity storage for bearer tokens.
///
/// Each operation is atomic on its own; a lookup never observes a half-written record.
pub trait TokenStore: Send + Sync {
    fn lookup(&self, client_identity: &str) -> impl Future<Output = CacheLookup> + Send;

    /// Overwrites any record stored for `token.client_identity`.
    fn write(&self, token: &CachedToken) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// No-op when nothing is stored.
    fn delete(&self, client_identity: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Fail-soft read: missing and malformed records both come back as `None`.
    fn read(&self, client_identity: &str) -> impl Future<Output = Option<CachedToken>> + Send {
        async move { self.lookup(client_identity).await.into_token() }
    }
}

/// Process-local store: client_identity -> token
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    inner: Arc<RwLock<HashMap<String, CachedToken>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

impl TokenStore for MemoryTokenStore {
    async fn lookup(&self, client_identity: &str) -> CacheLookup {
        let map = self.inner.read().await;
        map.get(client_identity)
            .cloned()
            .map(CacheLookup::Found)
            .unwrap_or(CacheLookup::Missing)
    }

    async fn write(&self, token: &CachedToken) -> Result<(), StoreError> {
        let mut map = self.inner.write().await;
        map.insert(token.client_identity.to_owned(), token.clone());
        Ok(())
    }

    async fn delete(&self, client_identity: &str) -> Result<(), StoreError> {
        self.inner.write().await.remove(client_identity);
        Ok(())
    }
}

/// Backend chosen from configuration.
#[derive(Debug, Clone)]
pub enum TokenStoreKind {
    File(FileTokenStore),
    Memory(MemoryTokenStore),
}

impl TokenStore for TokenStoreKind {
    async fn lookup(&self, client_identity: &str) -> CacheLookup {
        match self {
            TokenStoreKind::File(s) => s.lookup(client_identity).await,
            TokenStoreKind::Memory(s) => s.lookup(client_identity).await,
        }
    }

    async fn write(&self, token: &CachedToken) -> Result<(), StoreError> {
        match self {
            TokenStoreKind::File(s) => s.write(token).await,
            TokenStoreKind::Memory(s) => s.write(token).await,
        }
    }

    async fn delete(&self, client_identity: &str) -> Result<(), StoreError> {
        match self {
            TokenStoreKind::File(s) => s.delete(client_identity).await,
            TokenStoreKind::Memory(s) => s.delete(client_identity).await,
        }
    }
}
