//! Configuration management for StellarMix.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including Spotify API credentials, the OAuth callback server,
//! the weather and sun-position services and the listener's location.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::{Error, Res};

pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_SUN_API_URL: &str = "https://api.sunrise-sunset.org";
pub const DEFAULT_LATITUDE: f64 = 40.732542;
pub const DEFAULT_LONGITUDE: f64 = -73.978773;

/// Scopes requested during authorization.
///
/// Covers profile reads, playback state and control, and following playlists.
pub const DEFAULT_SCOPE: &str = "user-read-private user-read-email user-read-currently-playing user-read-playback-state app-remote-control user-modify-playback-state playlist-modify-public playlist-modify-private";

const APP_DIR: &str = "stellarmix";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `stellarmix/.env`. A missing file is not an
/// error: every variable may also come from the process environment.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/stellarmix/.env`
/// - macOS: `~/Library/Application Support/stellarmix/.env`
/// - Windows: `%LOCALAPPDATA%/stellarmix/.env`
///
/// # Errors
///
/// This function will return an error if:
/// - The parent directory cannot be created
/// - The `.env` file exists but cannot be read or parsed
pub async fn load_env() -> Res<()> {
    let path = default_data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path)
            .map_err(|e| Error::Config(format!("cannot load {}: {}", path.display(), e)))?;
    }
    Ok(())
}

/// Platform-specific directory holding `.env` and the persisted storage file.
pub fn default_data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Spotify application credentials and endpoints.
#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct WeatherSettings {
    pub api_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SunSettings {
    pub api_url: String,
}

/// Coordinates the context signals are fetched for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for Location {
    fn default() -> Self {
        Location {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
        }
    }
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub spotify: SpotifySettings,
    pub weather: WeatherSettings,
    pub sun: SunSettings,
    pub location: Location,
    /// Address the OAuth callback server binds to.
    pub server_addr: String,
    pub data_dir: PathBuf,
}

impl Settings {
    /// Reads the configuration from the process environment.
    ///
    /// Call [`load_env`] first so values from the `.env` file are visible.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Config`] when `SPOTIFY_API_AUTH_CLIENT_ID` or
    /// `SPOTIFY_API_AUTH_CLIENT_SECRET` is missing, or when a coordinate is
    /// not a number.
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| var(key).ok_or_else(|| Error::Config(format!("{key} must be set")));
        let with_default = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());
        let coordinate = |key: &str, default: f64| -> Res<f64> {
            match var(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| Error::Config(format!("{key} is not a number: {e}"))),
                None => Ok(default),
            }
        };

        let spotify = SpotifySettings {
            client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            client_secret: required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
            redirect_uri: with_default("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            scope: with_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
            auth_url: with_default("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL),
            token_url: with_default("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL),
            api_url: trim_slash(with_default("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)),
        };

        let weather = WeatherSettings {
            api_url: trim_slash(with_default("OPENWEATHER_API_URL", DEFAULT_WEATHER_API_URL)),
            api_key: var("OPENWEATHER_API_KEY"),
        };

        let sun = SunSettings {
            api_url: trim_slash(with_default("SUN_API_URL", DEFAULT_SUN_API_URL)),
        };

        let location = Location {
            latitude: coordinate("STELLARMIX_LATITUDE", DEFAULT_LATITUDE)?,
            longitude: coordinate("STELLARMIX_LONGITUDE", DEFAULT_LONGITUDE)?,
        };

        let data_dir = var("STELLARMIX_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        Ok(Settings {
            spotify,
            weather,
            sun,
            location,
            server_addr: with_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            data_dir,
        })
    }

    /// Path of the key/value file standing in for browser local storage.
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("storage.json")
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
