use crate::{
    Res,
    management::storage::{KEY_SPOTIFY_PLAYLISTS, LocalStorage},
    types::Playlist,
    warning,
};

/// Caches the last fetched playlists under `spotifyPlaylists`.
#[derive(Debug, Clone)]
pub struct PlaylistCache {
    storage: LocalStorage,
}

impl PlaylistCache {
    pub fn new(storage: LocalStorage) -> Self {
        PlaylistCache { storage }
    }

    /// Loads the cached playlists; a missing or corrupt entry yields an empty list.
    pub async fn load(&self) -> Vec<Playlist> {
        let Some(raw) = self.storage.get(KEY_SPOTIFY_PLAYLISTS).await else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<Playlist>>(&raw) {
            Ok(playlists) => playlists,
            Err(e) => {
                warning!("Ignoring cached playlists. Err: {}", e);
                Vec::new()
            }
        }
    }

    /// Replaces the cached list with `playlists`.
    ///
    /// # Errors
    ///
    /// Fails when the underlying [`LocalStorage`] cannot be written.
    pub async fn persist(&self, playlists: &[Playlist]) -> Res<()> {
        let json = serde_json::to_string(playlists)?;
        self.storage.set(KEY_SPOTIFY_PLAYLISTS, json).await
    }

    /// Looks a playlist up by its 1-based position in the cache.
    pub async fn get(&self, index: usize) -> Option<Playlist> {
        if index == 0 {
            return None;
        }
        self.load().await.into_iter().nth(index - 1)
    }
}
