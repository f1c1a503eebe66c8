use std::f64::consts::PI;

use chrono::{DateTime, Datelike, Timelike, Utc};
use reqwest::Client;

use crate::{
    Error, Res,
    config::{Location, SunSettings},
    error::error_message,
    types::{SunResponse, SunTimes},
};

/// Fetches today's sunrise, sunset and twilight times for `location`.
///
/// The service reports failures in its own `status` field, sometimes along
/// with a non-success HTTP status. The envelope is therefore read first and
/// the HTTP status only decides when the body is not an envelope at all.
///
/// # Errors
///
/// - [`Error::InvalidResponse`] when `status` is not `OK` or the times are
///   malformed
/// - [`Error::Api`] for a non-success answer without an envelope
/// - [`Error::Network`] for transport failures
pub async fn fetch_sun_times(
    client: &Client,
    settings: &SunSettings,
    location: Location,
) -> Res<SunTimes> {
    let response = client
        .get(format!("{}/json", settings.api_url))
        .query(&[
            ("lat", location.latitude.to_string()),
            ("lng", location.longitude.to_string()),
            ("formatted", "0".to_string()),
        ])
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    match serde_json::from_str::<SunResponse>(&body) {
        Ok(envelope) => sun_times_from(envelope),
        Err(_) if !status.is_success() => Err(Error::Api {
            status: status.as_u16(),
            message: error_message(status, &body),
        }),
        Err(e) => Err(Error::InvalidResponse(format!("sun times: {e}"))),
    }
}

/// Checks the envelope's `status` before decoding the times.
pub fn sun_times_from(envelope: SunResponse) -> Res<SunTimes> {
    if envelope.status != "OK" {
        return Err(Error::InvalidResponse(format!(
            "sun position service answered {}",
            envelope.status
        )));
    }

    serde_json::from_value::<SunTimes>(envelope.results)
        .map_err(|e| Error::InvalidResponse(format!("sun times: {e}")))
}

/// Approximate solar elevation in degrees above the horizon.
///
/// Uses the solar declination and the hour angle at the given longitude.
/// Ignores the equation of time and refraction, which keeps the error
/// within a couple of degrees.
pub fn solar_elevation(location: Location, at: DateTime<Utc>) -> f64 {
    let day_of_year = at.ordinal() as f64;
    let declination = 23.44_f64.to_radians() * ((2.0 * PI / 365.0) * (284.0 + day_of_year)).sin();

    let utc_hours =
        at.hour() as f64 + at.minute() as f64 / 60.0 + at.second() as f64 / 3600.0;
    let solar_time = utc_hours + location.longitude / 15.0;
    let hour_angle = (15.0 * (solar_time - 12.0)).to_radians();

    let latitude = location.latitude.to_radians();
    let sin_elevation = latitude.sin() * declination.sin()
        + latitude.cos() * declination.cos() * hour_angle.cos();

    sin_elevation.clamp(-1.0, 1.0).asin().to_degrees()
}
