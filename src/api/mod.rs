//! # API Module
//!
//! HTTP endpoints served by the local server while a login is in progress.
//!
//! - [`callback`] - Receives the Spotify authorization redirect. The `code`
//!   (or the provider's `error`) is recorded in the shared pending
//!   authorization slot, where the waiting login flow picks it up. A
//!   redirect whose `state` does not match the one sent is recorded as a
//!   denial.
//! - [`health`] - Returns the application name and version so the server
//!   can be checked while waiting.
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use stellarmix::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
