//! Start-up sequencing.
//!
//! The [`Orchestrator`] owns every collaborator and walks through explicit
//! phases: load what is cached, settle the token, pull the context signals,
//! then serve commands. Each external failure on the way is logged and
//! degrades the feature it feeds; none of them aborts start-up.

use std::fmt;

use chrono::Utc;
use reqwest::Client;

use crate::{
    Error, Res,
    config::Settings,
    context::ContextFetcher,
    info,
    management::{Action, AppState, Credential, CredentialManager, LocalStorage, PlaylistCache, Store},
    mood::{MoodContext, PlaylistQuery, build_query},
    spotify::{SpotifyClient, auth::AuthService},
    success,
    types::Playlist,
    warning,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Bootstrap,
    TokenResolution,
    Context,
    Ready,
}

impl Phase {
    fn next(self) -> Option<Phase> {
        match self {
            Phase::Bootstrap => Some(Phase::TokenResolution),
            Phase::TokenResolution => Some(Phase::Context),
            Phase::Context => Some(Phase::Ready),
            Phase::Ready => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Bootstrap => "bootstrap",
            Phase::TokenResolution => "token resolution",
            Phase::Context => "context",
            Phase::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// Outcome of the token resolution phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    /// A stored, unexpired token was found.
    Authenticated,
    /// A pending authorization code was exchanged for a new token.
    Exchanged,
    /// The user has to log in explicitly.
    LoginRequired,
}

impl Session {
    pub fn is_authenticated(self) -> bool {
        !matches!(self, Session::LoginRequired)
    }
}

/// Result of [`Orchestrator::toggle_playlist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    Started(String),
    Paused(String),
}

pub struct Orchestrator {
    settings: Settings,
    credentials: CredentialManager,
    playlists: PlaylistCache,
    store: Store,
    auth: AuthService,
    spotify: SpotifyClient,
    context: ContextFetcher,
    phase: Phase,
}

impl Orchestrator {
    /// Opens the storage under `settings.data_dir` and wires every collaborator.
    pub async fn new(settings: Settings) -> Res<Self> {
        let storage = LocalStorage::open(settings.storage_path()).await?;
        Ok(Self::with_storage(settings, storage, Client::new()))
    }

    pub fn with_storage(settings: Settings, storage: LocalStorage, http: Client) -> Self {
        let credentials = CredentialManager::new(storage.clone());
        let playlists = PlaylistCache::new(storage);
        let auth = AuthService::new(http.clone(), settings.clone(), credentials.clone());
        let spotify = SpotifyClient::new(
            http.clone(),
            settings.spotify.api_url.clone(),
            credentials.clone(),
        );
        let context = ContextFetcher::new(http, settings.clone());

        Orchestrator {
            settings,
            credentials,
            playlists,
            store: Store::default(),
            auth,
            spotify,
            context,
            phase: Phase::Bootstrap,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn spotify(&self) -> &SpotifyClient {
        &self.spotify
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn playlist_cache(&self) -> &PlaylistCache {
        &self.playlists
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn advance(&mut self, to: Phase) -> Res<()> {
        if self.phase.next() != Some(to) {
            return Err(Error::Phase {
                from: self.phase.to_string(),
                to: to.to_string(),
            });
        }
        self.phase = to;
        Ok(())
    }

    /// Runs every start-up phase and leaves the orchestrator [`Phase::Ready`].
    ///
    /// `pending_code` is an authorization code received from a redirect that
    /// has not been exchanged yet.
    pub async fn start(&mut self, pending_code: Option<String>) -> Res<Session> {
        let credential = self.bootstrap().await?;
        let session = self.resolve_token(credential, pending_code).await?;
        self.fetch_context().await?;
        self.advance(Phase::Ready)?;
        Ok(session)
    }

    /// Loads the cached credential and playlists into the store.
    pub async fn bootstrap(&mut self) -> Res<Credential> {
        if self.phase != Phase::Bootstrap {
            return Err(Error::Phase {
                from: self.phase.to_string(),
                to: Phase::Bootstrap.to_string(),
            });
        }

        let credential = self.credentials.load().await;
        self.store.dispatch(Action::SetLoggedIn {
            logged_in: credential.is_logged_in,
            token: credential.access_token.clone(),
        });

        let cached = self.playlists.load().await;
        if !cached.is_empty() {
            self.store.dispatch(Action::SetPlaylists(cached));
        }

        Ok(credential)
    }

    /// Settles whether a usable token exists.
    ///
    /// A logged-in credential past its expiry is demoted to logged out. When
    /// not logged in, a pending authorization code is exchanged; a rejected
    /// exchange is logged and leaves the session at
    /// [`Session::LoginRequired`].
    pub async fn resolve_token(
        &mut self,
        credential: Credential,
        pending_code: Option<String>,
    ) -> Res<Session> {
        self.advance(Phase::TokenResolution)?;
        let now = Utc::now().timestamp_millis();

        if credential.is_logged_in {
            if credential.has_valid_token(now) {
                return Ok(Session::Authenticated);
            }
            info!("Stored Spotify token has expired.");
            self.credentials.mark_logged_out().await?;
            self.store.dispatch(Action::SetLoggedIn {
                logged_in: false,
                token: None,
            });
        }

        match pending_code {
            Some(code) => Ok(self.exchange(&code).await),
            None => Ok(Session::LoginRequired),
        }
    }

    async fn exchange(&self, code: &str) -> Session {
        match self.auth.exchange_code_for_token(code).await {
            Ok(credential) => {
                self.store.dispatch(Action::SetLoggedIn {
                    logged_in: true,
                    token: credential.access_token,
                });
                Session::Exchanged
            }
            Err(e) => {
                warning!("Failed to exchange authorization code. Err: {}", e);
                self.store.dispatch(Action::SetLoggedIn {
                    logged_in: false,
                    token: None,
                });
                Session::LoginRequired
            }
        }
    }

    /// Fetches weather, then sun times. Each failure is logged and skipped.
    pub async fn fetch_context(&mut self) -> Res<()> {
        self.advance(Phase::Context)?;

        match self.context.weather().await {
            Ok(report) => self.store.dispatch(Action::SetWeather(report)),
            Err(e) => warning!("Failed to fetch weather data: {}", e),
        }

        match self.context.sun_times().await {
            Ok(times) => self.store.dispatch(Action::SetSunTimes(times)),
            Err(e) => warning!("Failed to fetch sun position data: {}", e),
        }

        Ok(())
    }

    /// Mood context derived from the current store contents.
    pub fn mood_context(&self) -> MoodContext {
        MoodContext::from_state(&self.store.state(), self.settings.location, Utc::now())
    }

    pub fn playlist_query(&self, genres: &[String]) -> PlaylistQuery {
        build_query(&self.mood_context(), genres)
    }

    pub fn state(&self) -> AppState {
        self.store.state()
    }

    /// Searches playlists for the current mood and caches the result.
    pub async fn fetch_playlists(&self, genres: &[String]) -> Res<Vec<Playlist>> {
        let query = self.playlist_query(genres);

        let playlists = self
            .spotify
            .search_playlists(&query.query)
            .await
            .map_err(|e| self.observe(e))?;

        self.store.dispatch(Action::SetPlaylists(playlists.clone()));
        if let Err(e) = self.playlists.persist(&playlists).await {
            warning!("Failed to cache playlists. Err: {}", e);
        }
        info!("Fetched Spotify playlists for query: {}", query.query);

        Ok(playlists)
    }

    /// Pauses `uri` if it is the context currently playing, starts it otherwise.
    ///
    /// The decision is taken from Spotify's playback state at call time, so
    /// the result reflects the last call that succeeded.
    pub async fn toggle_playlist(&self, uri: &str) -> Res<Toggle> {
        let playing = self
            .spotify
            .currently_playing()
            .await
            .map_err(|e| self.observe(e))?;

        let same_context_playing = playing
            .as_ref()
            .filter(|p| p.is_playing)
            .and_then(|p| p.context.as_ref())
            .is_some_and(|c| c.uri == uri);

        if same_context_playing {
            self.spotify.pause().await.map_err(|e| self.observe(e))?;
            self.store.dispatch(Action::SetNowPlaying(None));
            return Ok(Toggle::Paused(uri.to_string()));
        }

        self.spotify
            .play_playlist(uri)
            .await
            .map_err(|e| self.observe(e))?;
        self.store
            .dispatch(Action::SetNowPlaying(Some(uri.to_string())));
        Ok(Toggle::Started(uri.to_string()))
    }

    /// Runs the interactive browser login and exchanges the received code.
    pub async fn login(&mut self) -> Res<Session> {
        let code = self.auth.authorize_interactively().await?;
        match self.auth.exchange_code_for_token(&code).await {
            Ok(credential) => {
                self.store.dispatch(Action::SetLoggedIn {
                    logged_in: true,
                    token: credential.access_token,
                });
                success!("Authentication successful!");
                Ok(Session::Exchanged)
            }
            Err(e) => {
                self.store.dispatch(Action::SetLoggedIn {
                    logged_in: false,
                    token: None,
                });
                Err(e)
            }
        }
    }

    /// Clears the stored credential and returns the store to its root state.
    pub async fn logout(&mut self) -> Res<()> {
        self.auth.logout().await?;
        self.store.dispatch(Action::Reset);
        Ok(())
    }

    /// Mirrors an expired session into the store before handing the error on.
    pub fn observe(&self, error: Error) -> Error {
        if error.is_session_expired() {
            self.store.dispatch(Action::SetLoggedIn {
                logged_in: false,
                token: None,
            });
        }
        error
    }
}
