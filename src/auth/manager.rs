//! Bearer token acquisition backed by a persistent cache.
//!
//! Per client identity the cache is in one of four states:
//!
//! - `NoToken`: nothing stored, or the stored record cannot be read
//! - `CachedValid`: `expires_at > now`, served without a network call
//! - `CachedExpired`: the record is deleted before refreshing
//! - `Refreshing`: exchange with the token endpoint, then write back
//!
//! The read/refresh/write sequence is not atomic across callers sharing a
//! store. Two callers racing on an expired record both refresh and the last
//! write wins; both tokens are valid.

use tracing::{debug, error, info, warn};

use crate::auth::credentials::{AuthHeader, Credentials, Grant};
use crate::auth::endpoint::AuthEndpoint;
use crate::cache::store::{CacheLookup, TokenStore};
use crate::cache::token::CachedToken;
use crate::errors::AuthExchangeError;
use crate::helpers::time::{expires_at_from, now_utc};
use crate::observability::metrics::get_metrics;

#[derive(Debug, Clone)]
pub struct CredentialManager<S, E> {
    store: S,
    endpoint: E,
}

impl<S, E> CredentialManager<S, E>
where
    S: TokenStore,
    E: AuthEndpoint,
{
    pub fn new(store: S, endpoint: E) -> Self {
        Self { store, endpoint }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Header value for `credentials`. API keys pass straight through.
    pub async fn authorize(&self, credentials: &Credentials) -> Result<AuthHeader, AuthExchangeError> {
        match credentials {
            Credentials::ApiKey(key) => Ok(AuthHeader::ApiKey(key.to_owned())),
            Credentials::OAuth {
                client_id,
                client_secret,
                grant,
            } => self
                .acquire_token(client_id, client_secret, grant)
                .await
                .map(AuthHeader::Bearer),
        }
    }

    /// Cached access token for `client_id`, exchanging credentials only when
    /// no unexpired token is stored.
    pub async fn acquire_token(
        &self,
        client_id: &str,
        client_secret: &str,
        grant: &Grant,
    ) -> Result<String, AuthExchangeError> {
        let metrics = get_metrics().await;

        match self.store.lookup(client_id).await {
            CacheLookup::Found(token) if token.is_valid_at(now_utc()) => {
                debug!(client_id, expires_at = %token.expires_at, "token cache hit");
                metrics.token_cache_hits.inc();
                return Ok(token.access_token);
            }
            CacheLookup::Found(token) => {
                info!(client_id, expired_at = %token.expires_at, "cached token expired, evicting");
                metrics.token_cache_evictions.inc();
                if let Err(e) = self.store.delete(client_id).await {
                    warn!(client_id, error = %e, "failed to evict expired token");
                    metrics.token_cache_write_failures.inc();
                }
            }
            CacheLookup::Missing => {
                debug!(client_id, "no cached token");
            }
            CacheLookup::Malformed(reason) => {
                warn!(client_id, %reason, "ignoring unreadable cached token");
            }
        }

        metrics.token_cache_misses.inc();
        self.refresh(client_id, client_secret, grant).await
    }

    /// Drop whatever is cached for `client_id`.
    pub async fn forget(&self, client_id: &str) {
        if let Err(e) = self.store.delete(client_id).await {
            warn!(client_id, error = %e, "failed to remove cached token");
            get_metrics().await.token_cache_write_failures.inc();
        }
    }

    async fn refresh(
        &self,
        client_id: &str,
        client_secret: &str,
        grant: &Grant,
    ) -> Result<String, AuthExchangeError> {
        let metrics = get_metrics().await;
        metrics
            .auth_exchanges
            .with_label_values(&[grant.grant_type()])
            .inc();

        let issued = self
            .endpoint
            .request_token(client_id, client_secret, grant)
            .await
            .inspect_err(|e| {
                error!(client_id, error = %e, "token exchange failed");
                metrics
                    .auth_exchange_failures
                    .with_label_values(&[e.reason()])
                    .inc();
            })?;

        let token = CachedToken::new(
            client_id.to_owned(),
            issued.access_token,
            expires_at_from(now_utc(), issued.expires_in),
        );
        info!(client_id, expires_at = %token.expires_at, "token issued");

        // the token is still usable even if it could not be cached
        if let Err(e) = self.store.write(&token).await {
            warn!(client_id, error = %e, "failed to cache token");
            metrics.token_cache_write_failures.inc();
        }
        Ok(token.access_token)
    }
}
