use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::auth::endpoint::AuthEndpoint;
use crate::cache::store::TokenStore;
use crate::client::api::LeasewebClient;
use crate::errors::ApiError;

/// One page of a list endpoint, with the item list taken out of the document.
#[derive(Debug, Clone)]
struct Page {
    document: Value,
    items: Vec<Value>,
    total: u64,
}

impl<S, E> LeasewebClient<S, E>
where
    S: TokenStore,
    E: AuthEndpoint,
{
    /// Collect every item of a paginated list endpoint.
    ///
    /// Each request starts at the number of items received so far. The first
    /// page's document is returned with `key` holding all items and
    /// `_metadata.offset`/`_metadata.limit` describing the merged result.
    pub async fn get_all_pages(&self, path: &str, key: &str, limit: u64) -> Result<Value, ApiError> {
        let limit = limit.max(1);
        let first = self.fetch_page(path, key, 0, limit).await?;
        let total = first.total;
        let mut items = first.items;

        while (items.len() as u64) < total {
            let offset = items.len() as u64;
            let page = self.fetch_page(path, key, offset, limit).await?;
            if page.items.is_empty() {
                warn!(path, offset, total, "empty page before totalCount was reached");
                break;
            }
            items.extend(page.items);
        }

        let collected = items.len();
        debug!(path, collected, total, "pagination done");

        let mut document = first.document;
        if let Some(obj) = document.as_object_mut() {
            obj.insert(key.to_owned(), Value::Array(items));
            if let Some(metadata) = obj.get_mut("_metadata").and_then(Value::as_object_mut) {
                metadata.insert("offset".to_owned(), json!(0));
                metadata.insert("limit".to_owned(), json!(collected));
            }
        }
        Ok(document)
    }

    async fn fetch_page(&self, path: &str, key: &str, offset: u64, limit: u64) -> Result<Page, ApiError> {
        let query = json!({ "offset": offset, "limit": limit });
        let mut document = self.get(path, Some(&query)).await?;

        let malformed = |reason: String| ApiError::Pagination {
            url: path.to_owned(),
            reason,
        };

        let total = document
            .get("_metadata")
            .and_then(|m| m.get("totalCount"))
            .and_then(Value::as_u64)
            .ok_or_else(|| malformed("missing '_metadata.totalCount'".to_owned()))?;

        let items = match document.get_mut(key).map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => return Err(malformed(format!("missing '{}' list", key))),
        };

        Ok(Page {
            document,
            items,
            total,
        })
    }
}
