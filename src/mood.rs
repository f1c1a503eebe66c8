//! Mood derivation and playlist query construction.
//!
//! [`MoodContext`] condenses the weather report, the sun times and the clock
//! into a handful of fields. [`build_query`] maps that context to a Spotify
//! search string and a [`Mood`] descriptor. Both steps are pure: the same
//! inputs always produce the same query, and missing inputs fall back to
//! neutral values instead of failing.

use std::fmt;

use chrono::{DateTime, FixedOffset, Local, Timelike, Utc};

use crate::{
    config::Location,
    context::sun::solar_elevation,
    management::AppState,
    types::WeatherReport,
};

/// Broad weather class, keyed on OpenWeather's `main` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Fog,
    Unknown,
}

impl WeatherCondition {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "clear" | "sunny" => WeatherCondition::Clear,
            "clouds" | "cloudy" => WeatherCondition::Clouds,
            "rain" | "rainy" => WeatherCondition::Rain,
            "drizzle" => WeatherCondition::Drizzle,
            "thunderstorm" | "storm" => WeatherCondition::Thunderstorm,
            "snow" => WeatherCondition::Snow,
            "mist" | "fog" | "haze" | "smoke" | "dust" | "sand" | "ash" | "squall"
            | "tornado" => WeatherCondition::Fog,
            _ => WeatherCondition::Unknown,
        }
    }

    fn score(self) -> i32 {
        match self {
            WeatherCondition::Clear => 2,
            WeatherCondition::Clouds => 0,
            WeatherCondition::Rain | WeatherCondition::Drizzle => -2,
            WeatherCondition::Thunderstorm | WeatherCondition::Snow | WeatherCondition::Fog => -1,
            WeatherCondition::Unknown => 0,
        }
    }

    fn word(self, is_daytime: bool) -> Option<&'static str> {
        match self {
            WeatherCondition::Clear if is_daytime => Some("sunny"),
            WeatherCondition::Clear => Some("starry"),
            WeatherCondition::Clouds => Some("cloudy"),
            WeatherCondition::Rain | WeatherCondition::Drizzle => Some("rainy"),
            WeatherCondition::Thunderstorm => Some("stormy"),
            WeatherCondition::Snow => Some("snowy"),
            WeatherCondition::Fog => Some("foggy"),
            WeatherCondition::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour % 24 {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    fn score(self) -> i32 {
        match self {
            TimeOfDay::Morning => 1,
            TimeOfDay::Afternoon => 2,
            TimeOfDay::Evening => 0,
            TimeOfDay::Night => -2,
        }
    }

    pub fn word(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Energy {
    Upbeat,
    Chill,
    Mellow,
}

impl Energy {
    fn from_score(score: i32) -> Self {
        match score {
            s if s >= 2 => Energy::Upbeat,
            0..=1 => Energy::Chill,
            _ => Energy::Mellow,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Energy::Upbeat => "upbeat",
            Energy::Chill => "chill",
            Energy::Mellow => "mellow",
        }
    }

    pub fn default_genres(self) -> &'static [&'static str] {
        match self {
            Energy::Upbeat => &["pop", "dance"],
            Energy::Chill => &["indie", "lo-fi"],
            Energy::Mellow => &["jazz", "acoustic"],
        }
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Contextual signals used to bias the playlist search.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodContext {
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    pub weather_condition: WeatherCondition,
    /// Degrees above the horizon.
    pub sun_altitude: Option<f64>,
    pub is_daytime: Option<bool>,
    /// Local hour, 0..=23.
    pub hour: u32,
}

impl Default for MoodContext {
    fn default() -> Self {
        MoodContext {
            temperature: None,
            weather_condition: WeatherCondition::Unknown,
            sun_altitude: None,
            is_daytime: None,
            hour: 12,
        }
    }
}

impl MoodContext {
    /// Derives the context from the store at instant `now`.
    ///
    /// The local hour uses the weather report's timezone shift when present
    /// and the machine's timezone otherwise. Daylight comes from the fetched
    /// sun times, falling back to the sign of the computed sun altitude.
    pub fn from_state(state: &AppState, location: Location, now: DateTime<Utc>) -> Self {
        let weather = state.weather.as_ref();
        let sun_altitude = solar_elevation(location, now);
        let is_daytime = match &state.sun {
            Some(times) => times.is_daytime(now),
            None => sun_altitude > 0.0,
        };

        MoodContext {
            temperature: weather.and_then(|w| w.main.as_ref()).map(|m| m.temp),
            weather_condition: weather
                .map(condition_of)
                .unwrap_or(WeatherCondition::Unknown),
            sun_altitude: Some(sun_altitude),
            is_daytime: Some(is_daytime),
            hour: local_hour(weather, now),
        }
    }
}

fn condition_of(report: &WeatherReport) -> WeatherCondition {
    report
        .weather
        .first()
        .map(|w| WeatherCondition::parse(&w.main))
        .unwrap_or(WeatherCondition::Unknown)
}

fn local_hour(weather: Option<&WeatherReport>, now: DateTime<Utc>) -> u32 {
    match weather
        .and_then(|w| w.timezone)
        .and_then(FixedOffset::east_opt)
    {
        Some(offset) => now.with_timezone(&offset).hour(),
        None => now.with_timezone(&Local).hour(),
    }
}

/// Descriptor of the mood a query was built for.
#[derive(Debug, Clone, PartialEq)]
pub struct Mood {
    pub energy: Energy,
    pub time_of_day: TimeOfDay,
    pub weather: WeatherCondition,
    pub is_daytime: bool,
    pub genres: Vec<String>,
}

/// A search string together with the mood it encodes.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistQuery {
    pub query: String,
    pub mood: Mood,
}

/// Classifies the context into a [`Mood`].
///
/// `genres` overrides the energy's default genres when it contains at least
/// one non-blank entry.
pub fn musical_mood(context: &MoodContext, genres: &[String]) -> Mood {
    let time_of_day = TimeOfDay::from_hour(context.hour);
    let is_daytime = context
        .is_daytime
        .or_else(|| context.sun_altitude.map(|a| a > 0.0))
        .unwrap_or(matches!(
            time_of_day,
            TimeOfDay::Morning | TimeOfDay::Afternoon
        ));

    let mut score = context.weather_condition.score() + time_of_day.score();
    if !is_daytime {
        score -= 1;
    }
    match context.temperature {
        Some(t) if t >= 25.0 => score += 1,
        Some(t) if t <= 5.0 => score -= 1,
        _ => {}
    }

    let energy = Energy::from_score(score);

    let mut selected: Vec<String> = Vec::new();
    for genre in genres {
        let genre = genre.trim().to_lowercase();
        if !genre.is_empty() && !selected.contains(&genre) {
            selected.push(genre);
        }
    }
    if selected.is_empty() {
        selected = energy
            .default_genres()
            .iter()
            .map(|g| g.to_string())
            .collect();
    }

    Mood {
        energy,
        time_of_day,
        weather: context.weather_condition,
        is_daytime,
        genres: selected,
    }
}

/// Builds the playlist search query for `context`.
///
/// The query joins the energy keyword, a weather word when the condition is
/// known, the time of day and the genres, so it is never empty.
pub fn build_query(context: &MoodContext, genres: &[String]) -> PlaylistQuery {
    let mood = musical_mood(context, genres);

    let mut parts: Vec<&str> = vec![mood.energy.keyword()];
    if let Some(word) = mood.weather.word(mood.is_daytime) {
        parts.push(word);
    }
    parts.push(mood.time_of_day.word());
    parts.extend(mood.genres.iter().map(String::as_str));

    PlaylistQuery {
        query: parts.join(" "),
        mood,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_map_to_time_of_day() {
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(20), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
    }

    #[test]
    fn weather_names_are_case_insensitive() {
        assert_eq!(WeatherCondition::parse("Rain"), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::parse(" CLEAR "), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::parse("Haze"), WeatherCondition::Fog);
        assert_eq!(WeatherCondition::parse(""), WeatherCondition::Unknown);
    }

    #[test]
    fn daylight_falls_back_to_clock() {
        let context = MoodContext {
            hour: 9,
            ..MoodContext::default()
        };
        assert!(musical_mood(&context, &[]).is_daytime);

        let context = MoodContext {
            hour: 23,
            ..MoodContext::default()
        };
        assert!(!musical_mood(&context, &[]).is_daytime);
    }
}
