mod auth;
mod playlist;
mod state;
mod storage;

pub use auth::Credential;
pub use auth::CredentialManager;
pub use playlist::PlaylistCache;
pub use state::Action;
pub use state::AppState;
pub use state::Store;
pub use state::reduce;
pub use storage::KEY_IS_LOGGED_IN;
pub use storage::KEY_SPOTIFY_PLAYLISTS;
pub use storage::KEY_SPOTIFY_TOKEN;
pub use storage::KEY_TOKEN_EXPIRY_TIME;
pub use storage::LocalStorage;
