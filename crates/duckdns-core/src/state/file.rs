// # File State Store
//
// File-based implementation of StateStore.
//
// ## Purpose
//
// Remembers the address of the most recent successful update across runs so
// that an unchanged public IP does not cause a provider call.
//
// ## File Format
//
// Exactly one dotted-quad IPv4 address, no trailing newline:
//
// ```text
// 203.0.113.5
// ```
//
// Surrounding whitespace is tolerated on read so a hand-edited file still
// parses.
//
// ## Writes
//
// The content is written to a sibling `.tmp` file and renamed over the cache,
// so the whole value is replaced in one step. No backup is kept.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::state_store::StateStore;

/// Default cache file name, relative to the working directory
pub const DEFAULT_CACHE_PATH: &str = "last.ip";

/// Single-value cache file
///
/// # Example
///
/// ```rust,no_run
/// use duckdns_core::state::FileStateStore;
/// use duckdns_core::traits::StateStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileStateStore::new("/var/lib/duckdns/last.ip");
///
///     // First run: nothing cached yet
///     assert_eq!(store.load().await?, None);
///
///     store.store("203.0.113.5".parse()?).await?;
///     assert_eq!(store.load().await?, Some("203.0.113.5".parse()?));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Create a store backed by `path`
    ///
    /// Nothing is touched on disk until the first `load` or `store`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the cache file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get path to temporary file for whole-file replacement
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        PathBuf::from(temp)
    }
}

impl Default for FileStateStore {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_PATH)
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self) -> Result<Option<Ipv4Addr>, Error> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Cache file does not exist: {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let text = content.trim();
        let ip = text.parse::<Ipv4Addr>().map_err(|e| {
            Error::state_store(format!(
                "Cache file {} does not hold an IPv4 address ({:?}): {}",
                self.path.display(),
                text,
                e
            ))
        })?;

        tracing::trace!("Loaded cached IP {} from {}", ip, self.path.display());
        Ok(Some(ip))
    }

    async fn store(&self, ip: Ipv4Addr) -> Result<(), Error> {
        tracing::info!("Updating store with new IP {}", ip);

        // Succeeds when the directory already exists
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(ip.to_string().as_bytes()).await?;
            file.flush().await?;
        }

        fs::rename(&temp_path, &self.path).await?;

        tracing::trace!("Cache written: {}", self.path.display());
        Ok(())
    }
}
