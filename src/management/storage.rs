use std::{collections::BTreeMap, path::PathBuf, sync::Arc};

use tokio::sync::Mutex;

use crate::Res;

pub const KEY_SPOTIFY_TOKEN: &str = "spotifyToken";
pub const KEY_TOKEN_EXPIRY_TIME: &str = "tokenExpiryTime";
pub const KEY_IS_LOGGED_IN: &str = "isLoggedIn";
pub const KEY_SPOTIFY_PLAYLISTS: &str = "spotifyPlaylists";

/// String key/value store persisted as a single JSON object.
///
/// Every handle cloned from the same `LocalStorage` shares one in-memory
/// map. Each write rewrites the file, so a crash can lose at most the write
/// that was in flight.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl LocalStorage {
    /// Opens the storage file at `path`, starting empty if it does not exist.
    ///
    /// A file that cannot be parsed is treated as empty and overwritten on
    /// the next write.
    pub async fn open(path: PathBuf) -> Res<Self> {
        let entries = match async_fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    crate::warning!(
                        "Ignoring unreadable storage file {}: {}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries: Arc::new(Mutex::new(entries)),
        })
    }

    /// Returns the value stored under `key`, if any.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }

    /// Stores `value` under `key` and rewrites the file.
    ///
    /// The in-memory map is updated even when the write fails, so the
    /// running process keeps seeing the new value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the file cannot be written, or
    /// [`crate::Error::Serde`] if the map cannot be serialized.
    pub async fn set(&self, key: &str, value: impl Into<String>) -> Res<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.into());
        self.persist(&entries).await
    }

    /// Removes `key`. Removing an absent key still succeeds.
    pub async fn remove(&self, key: &str) -> Res<()> {
        let mut entries = self.entries.lock().await;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&entries).await
    }

    /// Removes several keys with a single file write.
    pub async fn remove_all(&self, keys: &[&str]) -> Res<()> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        for key in keys {
            entries.remove(*key);
        }
        if entries.len() == before {
            return Ok(());
        }
        self.persist(&entries).await
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.lock().await.contains_key(key)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}
