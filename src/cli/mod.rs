//! # CLI Module
//!
//! This module provides the command-line interface layer for StellarMix. It
//! implements every user-facing command and coordinates the orchestrator,
//! the Spotify client and the local caches.
//!
//! ## Command Categories
//!
//! ### Authentication
//!
//! - [`login`] - Browser login through the local callback server
//! - [`logout`] - Removes the stored credential
//! - [`status`] - Shows the stored login state and token expiry
//!
//! ### Mood and Playlists
//!
//! - [`mood`] - Shows the current context signals and the query they produce
//! - [`playlists`] - Searches playlists for the current mood and caches them
//! - [`play`] - Starts a cached playlist, or pauses it when it is already playing
//! - [`follow`] / [`unfollow`] - Follows or unfollows a playlist
//! - [`genres`] - Lists the genre seeds Spotify knows about
//!
//! ### Playback
//!
//! - [`now_playing`], [`devices`], [`pause`], [`resume`], [`next`],
//!   [`previous`], [`volume`], [`shuffle`]
//!
//! ## Data Flow
//!
//! 1. **Bootstrap**: the orchestrator loads the stored credential and cached playlists
//! 2. **Token Resolution**: expired tokens are demoted, pending codes exchanged
//! 3. **Context** (mood and playlist commands only): weather, then sun times
//! 4. **Command**: the Spotify call, with a spinner while the request runs
//!
//! ## Error Handling
//!
//! Commands report failures with the status macros. A rejected token leads
//! to a hint to log in again; context failures only produce warnings and
//! the mood falls back to neutral values.

mod auth;
mod mood;
mod player;
mod playlist;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    error,
    orchestrator::{Orchestrator, Session},
};

pub use auth::login;
pub use auth::logout;
pub use auth::status;
pub use mood::genres;
pub use mood::mood;
pub use player::devices;
pub use player::next;
pub use player::now_playing;
pub use player::pause;
pub use player::previous;
pub use player::resume;
pub use player::shuffle;
pub use player::volume;
pub use playlist::follow;
pub use playlist::play;
pub use playlist::playlists;
pub use playlist::unfollow;

pub(crate) fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Bootstraps the orchestrator and resolves the token without fetching context.
pub(crate) async fn authenticated(app: &mut Orchestrator) {
    let credential = match app.bootstrap().await {
        Ok(c) => c,
        Err(e) => error!("Cannot read local storage. Err: {}", e),
    };

    match app.resolve_token(credential, None).await {
        Ok(Session::LoginRequired) => error!("Not logged in. Please run stellarmix login"),
        Ok(_) => {}
        Err(e) => error!("Cannot resolve Spotify session. Err: {}", e),
    }
}

/// Runs every start-up phase, including the context fetch.
pub(crate) async fn ready(app: &mut Orchestrator) -> Session {
    let pb = spinner("Reading the weather and the sky...");
    let session = app.start(None).await;
    pb.finish_and_clear();

    match session {
        Ok(session) => session,
        Err(e) => error!("Start-up failed. Err: {}", e),
    }
}
