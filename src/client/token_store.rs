use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use super::error::ClientError;

/// The single authority for the client's bearer token.
///
/// The slot is backed by a file so an established session survives a process
/// restart; reads go through an in-memory cache so `set(None)` is visible to
/// every subsequent `get` immediately, before any filesystem work completes.
pub struct TokenStore {
    path: PathBuf,
    cached: RwLock<Option<String>>,
}

impl TokenStore {
    /// Opens the slot at `path`, loading any token persisted by an earlier
    /// run.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cached = fs::read_to_string(&path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        TokenStore {
            path,
            cached: RwLock::new(cached),
        }
    }

    pub fn get(&self) -> Option<String> {
        self.cached.read().unwrap().clone()
    }

    /// Replaces or clears the stored token.
    ///
    /// Clearing drops the cached value before touching the filesystem and is
    /// idempotent; an absent slot stays absent.
    pub fn set(&self, token: Option<&str>) -> Result<(), ClientError> {
        match token {
            Some(token) => {
                fs::write(&self.path, token)?;
                *self.cached.write().unwrap() = Some(token.to_string());
            }
            None => {
                *self.cached.write().unwrap() = None;
                match fs::remove_file(&self.path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_slot() -> PathBuf {
        std::env::temp_dir().join(format!("passage-token-{}", uuid::Uuid::new_v4()))
    }

    /// set followed by get returns exactly the stored token.
    #[test]
    fn test_round_trip() {
        let store = TokenStore::new(temp_slot());
        store.set(Some("tok-123")).unwrap();
        assert_eq!(store.get().as_deref(), Some("tok-123"));
        store.set(None).unwrap();
    }

    /// Clearing twice leaves the slot absent both times, without error.
    #[test]
    fn test_clear_is_idempotent() {
        let store = TokenStore::new(temp_slot());
        store.set(Some("tok-123")).unwrap();
        store.set(None).unwrap();
        assert!(store.get().is_none());
        store.set(None).unwrap();
        assert!(store.get().is_none());
    }

    /// A token persisted by one instance is visible to a fresh instance on
    /// the same path, as after a client restart.
    #[test]
    fn test_survives_reload() {
        let path = temp_slot();
        {
            let store = TokenStore::new(&path);
            store.set(Some("tok-456")).unwrap();
        }
        let reloaded = TokenStore::new(&path);
        assert_eq!(reloaded.get().as_deref(), Some("tok-456"));
        reloaded.set(None).unwrap();

        let empty = TokenStore::new(&path);
        assert!(empty.get().is_none());
    }
}
