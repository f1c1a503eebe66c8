use std::sync::Arc;

use tokio::sync::watch;

use crate::types::{Playlist, SunTimes, WeatherReport};

/// Shared application state read by every command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub is_logged_in: bool,
    pub spotify_token: Option<String>,
    pub weather: Option<WeatherReport>,
    pub sun: Option<SunTimes>,
    pub playlists: Vec<Playlist>,
    /// Context URI of the playlist last started from this application.
    pub now_playing: Option<String>,
}

/// The only way to change an [`AppState`].
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetLoggedIn {
        logged_in: bool,
        token: Option<String>,
    },
    SetWeather(WeatherReport),
    SetSunTimes(SunTimes),
    SetPlaylists(Vec<Playlist>),
    SetNowPlaying(Option<String>),
    Reset,
}

/// Applies `action` to `state`.
///
/// Reducing is pure: it touches nothing but `state`, so it is safe to call
/// while holding the store's lock.
///
/// # Example
///
/// ```
/// let mut state = AppState::default();
/// reduce(&mut state, Action::SetNowPlaying(Some("spotify:playlist:pl1".to_string())));
/// assert_eq!(state.now_playing.as_deref(), Some("spotify:playlist:pl1"));
/// ```
pub fn reduce(state: &mut AppState, action: Action) {
    match action {
        Action::SetLoggedIn { logged_in, token } => {
            state.is_logged_in = logged_in;
            // a logged-out state never keeps a token around
            state.spotify_token = if logged_in {
                token.or(state.spotify_token.take())
            } else {
                None
            };
        }
        Action::SetWeather(report) => state.weather = Some(report),
        Action::SetSunTimes(times) => state.sun = Some(times),
        Action::SetPlaylists(playlists) => state.playlists = playlists,
        Action::SetNowPlaying(uri) => state.now_playing = uri,
        Action::Reset => *state = AppState::default(),
    }
}

/// Injected state container.
///
/// `dispatch` is synchronous and runs to completion before any subscriber
/// observes the new state. Responses arriving out of order are applied in
/// arrival order.
#[derive(Debug, Clone)]
pub struct Store {
    tx: Arc<watch::Sender<AppState>>,
}

impl Store {
    pub fn new(initial: AppState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Store { tx: Arc::new(tx) }
    }

    /// Applies `action` and notifies subscribers.
    pub fn dispatch(&self, action: Action) {
        self.tx.send_modify(|state| reduce(state, action));
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.tx.subscribe()
    }
}

impl Default for Store {
    fn default() -> Self {
        Store::new(AppState::default())
    }
}
