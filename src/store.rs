//! Durable storage for the session token.
//!
//! The token lives in a single file whose entire content is the raw token.
//! Writes go through a temp-file-plus-rename path so a reader never observes
//! a half-written secret, and the file is created owner-read/write only from
//! the first instant it exists.

use std::fs;
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::{debug, warn};

/// Permission bits that must be clear on the token file: any group/other access.
#[cfg(unix)]
const GROUP_OTHER_MASK: u32 = 0o077;

/// Failures from token persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid store path: {0}")]
    InvalidPath(String),
}

/// Storage abstraction for the persisted session token.
///
/// A missing or empty token file is `Ok(None)` from [`load`](Self::load),
/// distinct from an I/O failure.
pub trait SecretStore: Send + Sync {
    /// Read the stored token, trimmed of surrounding whitespace.
    fn load(&self) -> Result<Option<String>, StoreError>;
    /// Persist `token`, replacing any previous one.
    fn save(&self, token: &str) -> Result<(), StoreError>;
    /// Delete the stored token. Clearing an absent token is success.
    fn clear(&self) -> Result<(), StoreError>;

    /// True iff a non-empty token is currently stored.
    fn is_authenticated(&self) -> bool {
        matches!(self.load(), Ok(Some(_)))
    }
}

/// Configuration for file-backed token storage.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl StoreConfig {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default token path (`~/.sesame/session`).
    pub fn default_path() -> PathBuf {
        directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(".sesame"))
            .unwrap_or_else(|| PathBuf::from(".sesame"))
            .join("session")
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

/// File-backed secret store.
///
/// # Example
/// ```no_run
/// use sesame::store::{FileSecretStore, SecretStore, StoreConfig};
///
/// let store = FileSecretStore::new(StoreConfig::default());
/// store.save("token-value")?;
/// assert!(store.is_authenticated());
/// # Ok::<(), sesame::store::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { path: config.path }
    }

    pub fn new_default() -> Self {
        Self::new(StoreConfig::default())
    }

    /// Path of the token file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Warn (non-fatally) when the token file is accessible to group/other.
    #[cfg(unix)]
    fn audit_permissions(&self) {
        if let Ok(meta) = fs::metadata(&self.path) {
            let mode = meta.permissions().mode() & 0o777;
            if mode & GROUP_OTHER_MASK != 0 {
                warn!(
                    path = %self.path.display(),
                    mode = %format!("{mode:o}"),
                    "token file is readable by group/other; run `chmod 600` on it"
                );
            }
        }
    }

    #[cfg(not(unix))]
    fn audit_permissions(&self) {}
}

impl SecretStore for FileSecretStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::Io(err)),
        };
        self.audit_permissions();
        let token = raw.trim();
        if token.is_empty() {
            return Ok(None);
        }
        Ok(Some(token.to_string()))
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        atomic_write(&self.path, token.as_bytes())?;
        debug!(path = %self.path.display(), "session token saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session token cleared");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Io(err)),
        }
    }
}

/// Write `data` to `path` without ever exposing it with default permissions:
/// the bytes land in a freshly created `0o600` temp file in the same
/// directory, then rename into place. The temp file is removed on every
/// failure path.
fn atomic_write(path: &Path, data: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let mut builder = fs::DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            builder.mode(0o700);
            builder.create(parent)?;
        }
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| StoreError::InvalidPath(format!("{} has no file name", path.display())))?;

    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let temp_name = format!(
        ".{}.tmp-{}-{nonce}",
        file_name.to_string_lossy(),
        std::process::id()
    );
    let temp_path = path.with_file_name(temp_name);

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let write_result = (|| -> std::io::Result<()> {
        let mut temp_file = options.open(&temp_path)?;
        temp_file.write_all(data)?;
        temp_file.sync_all()?;
        Ok(())
    })();

    if let Err(err) = write_result {
        let _ = fs::remove_file(&temp_path);
        return Err(StoreError::Io(err));
    }

    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(StoreError::Io(err));
    }

    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;

    Ok(())
}
