use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::AuthError;
use super::token::AuthToken;

/// Storage abstraction for the current session token.
///
/// The store is the sole owner of the token: the session manager and the HTTP
/// client only read it and ask the store to replace it. `save` replaces the
/// token wholesale; there is no partial update. The store itself emits no
/// signals, callers do.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<AuthToken>, AuthError>;
    fn save(&self, token: &AuthToken) -> Result<(), AuthError>;
    fn clear(&self) -> Result<(), AuthError>;
}

/// File-backed token store using a TOML file, so the session survives a
/// process restart.
///
/// # Example
/// ```no_run
/// use flagdeck::auth::{FileTokenStore, TokenStore};
///
/// let store = FileTokenStore::new_default();
/// let token = store.load()?;
/// # Ok::<(), flagdeck::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store the token under `base_dir/session.toml`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: base_dir.into().join("session.toml"),
        }
    }

    /// Store under the default directory (`~/.flagdeck`).
    pub fn new_default() -> Self {
        Self::new(default_flagdeck_dir())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(path: &Path) -> Result<(), AuthError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<AuthToken>, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        let file: TokenFile = toml::from_str(&raw)?;
        Ok(Some(file.token))
    }

    fn save(&self, token: &AuthToken) -> Result<(), AuthError> {
        Self::ensure_parent(&self.path)?;
        let file = TokenFile {
            version: 1,
            saved_at: Utc::now(),
            token: token.clone(),
        };
        let serialized = toml::to_string(&file)?;
        fs::write(&self.path, serialized)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Io(err.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenFile {
    version: u32,
    saved_at: DateTime<Utc>,
    // Last field: TOML requires plain values before tables.
    token: AuthToken,
}

/// In-memory token store for tests and embedders that manage persistence
/// themselves.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<AuthToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a token.
    pub fn with_token(token: AuthToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<AuthToken>, AuthError> {
        Ok(self
            .token
            .lock()
            .map_err(|_| AuthError::Io("token store lock poisoned".to_string()))?
            .clone())
    }

    fn save(&self, token: &AuthToken) -> Result<(), AuthError> {
        *self
            .token
            .lock()
            .map_err(|_| AuthError::Io("token store lock poisoned".to_string()))? =
            Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self
            .token
            .lock()
            .map_err(|_| AuthError::Io("token store lock poisoned".to_string()))? = None;
        Ok(())
    }
}

fn default_flagdeck_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".flagdeck"))
        .unwrap_or_else(|| PathBuf::from(".flagdeck"))
}
