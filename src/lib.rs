//! StellarMix CLI Library
//!
//! This library picks Spotify playlists that fit the moment. It authenticates
//! against the Spotify Web API, reads the current weather and the position of
//! the sun for a configured location, turns those signals into a playlist
//! search query and controls playback on the user's devices.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `context` - Weather and sun-position fetchers
//! - `error` - Error taxonomy shared by every module
//! - `management` - Persisted local storage, credentials and the application store
//! - `mood` - Mood derivation and playlist query construction
//! - `orchestrator` - Start-up sequencing of authentication, context and playlists
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use stellarmix::{config, orchestrator::Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> stellarmix::Res<()> {
//!     config::load_env().await?;
//!     let settings = config::Settings::from_env()?;
//!     let mut app = Orchestrator::new(settings).await?;
//!     app.start(None).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod management;
pub mod mood;
pub mod orchestrator;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::Error;

/// A convenient Result type alias for operations that may fail.
///
/// Every fallible operation in the crate reports one of the variants of
/// [`Error`], so callers can tell a rejected token exchange from an expired
/// session or a transport failure.
///
/// # Example
///
/// ```
/// use stellarmix::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Error>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Example
///
/// ```
/// info!("Fetching weather for {}", location);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Logged in to Spotify");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// This macro will cause the program to exit immediately after printing
/// the error message. Library code never calls it; it is reserved for the
/// binary's command handlers where recovery is not possible.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Every degraded code path reports through this macro: failed context
/// fetches, rejected API calls and cache writes that did not land.
///
/// # Example
///
/// ```
/// warning!("Failed to fetch weather data: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
