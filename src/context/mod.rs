//! # Context Module
//!
//! Fetches the signals that bias the playlist search: the current weather and
//! today's sun times at the configured location. Both services are unrelated
//! to Spotify and to each other; a failure of one never prevents the other
//! from being used.
//!
//! - [`weather`] - OpenWeather current conditions
//! - [`sun`] - sunrise-sunset.org sun times and a local solar elevation estimate

pub mod sun;
pub mod weather;

use reqwest::{Client, Response};

use crate::{
    Error, Res,
    config::Settings,
    error::error_message,
    types::{SunTimes, WeatherReport},
};

/// Turns a non-success response into [`Error::Api`].
pub(crate) async fn check_status(response: Response) -> Res<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::Api {
        status: status.as_u16(),
        message: error_message(status, &body),
    })
}

/// Bundles the HTTP client and settings both context fetchers need.
#[derive(Debug, Clone)]
pub struct ContextFetcher {
    client: Client,
    settings: Settings,
}

impl ContextFetcher {
    pub fn new(client: Client, settings: Settings) -> Self {
        ContextFetcher { client, settings }
    }

    pub async fn weather(&self) -> Res<WeatherReport> {
        weather::fetch_weather(&self.client, &self.settings.weather, self.settings.location).await
    }

    pub async fn sun_times(&self) -> Res<SunTimes> {
        sun::fetch_sun_times(&self.client, &self.settings.sun, self.settings.location).await
    }
}
