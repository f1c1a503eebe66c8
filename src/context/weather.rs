use reqwest::Client;

use crate::{
    Error, Res,
    config::{Location, WeatherSettings},
    context::check_status,
    error::read_json,
    types::WeatherReport,
};

/// Fetches the current weather at `location` from the OpenWeather API.
///
/// Temperatures are requested in metric units.
///
/// # Errors
///
/// - [`Error::Config`] when no `OPENWEATHER_API_KEY` is configured
/// - [`Error::Api`] for a non-success answer
/// - [`Error::Network`] for transport failures
/// - [`Error::InvalidResponse`] when the body is not a weather report
pub async fn fetch_weather(
    client: &Client,
    settings: &WeatherSettings,
    location: Location,
) -> Res<WeatherReport> {
    let api_key = settings
        .api_key
        .as_deref()
        .ok_or_else(|| Error::Config("OPENWEATHER_API_KEY must be set".to_string()))?;

    let response = client
        .get(format!("{}/weather", settings.api_url))
        .query(&[
            ("lat", location.latitude.to_string()),
            ("lon", location.longitude.to_string()),
            ("appid", api_key.to_string()),
            ("units", "metric".to_string()),
        ])
        .send()
        .await?;

    let response = check_status(response).await?;
    read_json(response, "weather report").await
}
