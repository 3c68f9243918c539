use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::cache::store::{CacheLookup, TokenStore};
use crate::cache::token::{CachedToken, TokenRecord};
use crate::errors::StoreError;

static TMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// One JSON file per client identity, surviving process restarts.
///
/// Records are written to a temporary sibling first and renamed into place, so
/// a concurrent reader sees either the previous record or the new one.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    /// Creates `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| io_error(&dir, source))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Identities are percent-encoded so they can never escape the cache directory.
    pub fn record_path(&self, client_identity: &str) -> PathBuf {
        self.dir
            .join(format!("{}.json", urlencoding::encode(client_identity)))
    }

    fn tmp_path(&self, record_path: &Path) -> PathBuf {
        let seq = TMP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let name = record_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.dir
            .join(format!(".{}.{}.{}.tmp", name, std::process::id(), seq))
    }
}

impl TokenStore for FileTokenStore {
    async fn lookup(&self, client_identity: &str) -> CacheLookup {
        let path = self.record_path(client_identity);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return CacheLookup::Missing,
            Err(e) => {
                return CacheLookup::Malformed(format!(
                    "token record '{}' is unreadable: {}",
                    path.display(),
                    e
                ))
            }
        };

        match serde_json::from_str::<TokenRecord>(&content) {
            Ok(record) => CacheLookup::Found(record.into_token(client_identity)),
            Err(e) => CacheLookup::Malformed(format!(
                "token record '{}' cannot be parsed: {}",
                path.display(),
                e
            )),
        }
    }

    async fn write(&self, token: &CachedToken) -> Result<(), StoreError> {
        let path = self.record_path(&token.client_identity);
        let tmp = self.tmp_path(&path);
        let content = serde_json::to_vec(&token.to_record())?;

        let written = async {
            let mut file = create_private(&tmp).await?;
            file.write_all(&content).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&tmp, &path).await
        }
        .await;

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp).await;
            return Err(io_error(&path, e));
        }
        debug!(path = %path.display(), "token record written");
        Ok(())
    }

    async fn delete(&self, client_identity: &str) -> Result<(), StoreError> {
        let path = self.record_path(client_identity);
        match fs::remove_file(&path).await {
            Ok(_) => {
                debug!(path = %path.display(), "token record deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

/// Opens a fresh file that only the owner can read, before any byte is written.
async fn create_private(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);
    options.open(path).await
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}
