use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaylistOwner {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner: Option<PlaylistOwner>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPlaylistsResponse {
    pub playlists: PlaylistPage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistPage {
    // Spotify answers `null` for playlists it can no longer resolve.
    #[serde(default)]
    pub items: Vec<Option<Playlist>>,
    pub total: Option<u64>,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub name: String,
    pub owner: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Device {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub is_active: bool,
    pub volume_percent: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevicesResponse {
    #[serde(default)]
    pub devices: Vec<Device>,
}

#[derive(Tabled)]
pub struct DeviceTableRow {
    pub name: String,
    #[tabled(rename = "type")]
    pub kind: String,
    pub active: String,
    pub volume: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtistRef {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybackContext {
    pub uri: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Body of `GET /me/player/currently-playing` when something is loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentlyPlaying {
    #[serde(default)]
    pub is_playing: bool,
    pub progress_ms: Option<u64>,
    pub item: Option<Track>,
    pub context: Option<PlaybackContext>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub product: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenresResponse {
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayRequest {
    pub context_uri: String,
}

/// Current weather as reported by the OpenWeather `weather` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherReport {
    #[serde(default)]
    pub weather: Vec<WeatherDescription>,
    pub main: Option<WeatherReadings>,
    /// Shift from UTC in seconds at the reported location.
    pub timezone: Option<i32>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherDescription {
    pub id: Option<u32>,
    pub main: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherReadings {
    pub temp: f64,
    pub feels_like: Option<f64>,
    pub humidity: Option<u8>,
}

/// Envelope of the sunrise-sunset.org answer.
///
/// `results` stays untyped until `status` is known: a rejected request
/// answers with an empty string in place of the times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SunResponse {
    #[serde(default)]
    pub results: serde_json::Value,
    pub status: String,
}

/// Sun events for the current day, in UTC.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub solar_noon: DateTime<Utc>,
    pub civil_twilight_begin: Option<DateTime<Utc>>,
    pub civil_twilight_end: Option<DateTime<Utc>>,
}

impl SunTimes {
    pub fn is_daytime(&self, at: DateTime<Utc>) -> bool {
        at >= self.sunrise && at < self.sunset
    }
}
