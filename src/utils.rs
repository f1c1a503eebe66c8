use rand::{Rng, distr::Alphanumeric};

use crate::{
    mood::PlaylistQuery,
    types::{Device, DeviceTableRow, Playlist, PlaylistTableRow},
};

/// Random value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

pub fn playlist_rows(playlists: &[Playlist]) -> Vec<PlaylistTableRow> {
    playlists
        .iter()
        .enumerate()
        .map(|(i, p)| PlaylistTableRow {
            index: i + 1,
            name: truncate(&p.name, 48),
            owner: p
                .owner
                .as_ref()
                .and_then(|o| o.display_name.clone())
                .unwrap_or_default(),
            uri: p.uri.clone(),
        })
        .collect()
}

pub fn device_rows(devices: &[Device]) -> Vec<DeviceTableRow> {
    devices
        .iter()
        .map(|d| DeviceTableRow {
            name: d.name.clone(),
            kind: d.kind.clone(),
            active: if d.is_active { "yes" } else { "no" }.to_string(),
            volume: d
                .volume_percent
                .map(|v| format!("{v}%"))
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect()
}

/// Shortens `text` to at most `max` characters, marking the cut with `…`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max.saturating_sub(1)).collect();
    short.push('…');
    short
}

/// One-line summary of the mood a query was built for.
pub fn describe_query(query: &PlaylistQuery) -> String {
    let mood = &query.mood;
    format!(
        "{} {} ({}, {}) genres: {}",
        mood.energy,
        mood.time_of_day.word(),
        format!("{:?}", mood.weather).to_lowercase(),
        if mood.is_daytime { "daylight" } else { "dark" },
        mood.genres.join(", ")
    )
}

/// Splits a `play`/`follow` argument into a cache index or a raw identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistRef {
    Index(usize),
    Uri(String),
    Id(String),
}

pub fn parse_playlist_ref(raw: &str) -> PlaylistRef {
    let raw = raw.trim();
    if let Ok(index) = raw.parse::<usize>() {
        return PlaylistRef::Index(index);
    }
    if raw.starts_with("spotify:") {
        return PlaylistRef::Uri(raw.to_string());
    }
    PlaylistRef::Id(raw.to_string())
}

/// Extracts the playlist id from a `spotify:playlist:<id>` URI.
pub fn playlist_id_from_uri(uri: &str) -> Option<&str> {
    uri.strip_prefix("spotify:playlist:").filter(|id| !id.is_empty())
}

pub fn parse_switch(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(format!("expected on or off, got {other}")),
    }
}
