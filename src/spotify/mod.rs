//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify accounts service and the
//! Spotify Web API. It covers authorization, playlist search and following,
//! playback control and a few browse endpoints.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, Orchestrator)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorization code flow)
//!     ├── Playlists (search, follow, unfollow)
//!     ├── Player (currently playing, devices, transport controls)
//!     └── Browse (profile, genre seeds)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! ### Authentication Module
//!
//! [`auth`] - Implements the authorization code flow with a client secret:
//! - **Authorization URL**: pure construction with fixed scopes and an optional `state`
//! - **Code Exchange**: a single form-encoded POST to the token endpoint
//! - **Logout**: removes every stored credential key
//! - **Interactive Login**: local callback server plus browser launch
//!
//! ### Resource Operations
//!
//! [`SpotifyClient`] is extended per feature area:
//! - `playlists` - `search_playlists`, `follow_playlist`, `unfollow_playlist`, `is_following`
//! - `player` - `currently_playing`, `devices`, `play`, `play_playlist`, `pause`,
//!   `next`, `previous`, `set_volume`, `set_shuffle`
//! - `browse` - `user_profile`, `available_genres`
//!
//! ## Response Mapping
//!
//! Every resource call attaches `Authorization: Bearer <token>` and maps the
//! answer the same way:
//!
//! | Status        | Result                                                    |
//! |---------------|-----------------------------------------------------------|
//! | 2xx           | parsed payload                                            |
//! | 204 / empty   | `None` for optional reads such as currently-playing       |
//! | 401           | stored credential marked logged out, `Error::SessionExpired` |
//! | other         | `Error::Api { status, message }`                          |
//!
//! Transport failures surface as `Error::Network`. No call is retried and
//! there is no backoff; the caller decides what happens next.
//!
//! ## API Coverage
//!
//! - `GET /search?type=playlist` - Playlist search
//! - `PUT|DELETE /playlists/{id}/followers` - Follow and unfollow
//! - `GET /playlists/{id}/followers/contains` - Follow check
//! - `GET /me/player/currently-playing` - Playback state
//! - `GET /me/player/devices` - Device listing
//! - `PUT /me/player/play|pause|volume|shuffle` - Transport controls
//! - `POST /me/player/next|previous` - Track skipping
//! - `GET /me` - User profile
//! - `GET /recommendations/available-genre-seeds` - Genre listing
//! - `POST /api/token` - Authorization code exchange
//!
//! ## Idempotency
//!
//! Pause, play, volume and shuffle are naturally idempotent at the resource.
//! Follow and unfollow are not guaranteed to be.

pub mod auth;
mod browse;
mod client;
mod player;
mod playlists;

pub use client::SpotifyClient;
pub use playlists::SEARCH_LIMIT;
