use reqwest::Method;

use crate::{
    Error, Res,
    spotify::SpotifyClient,
    types::{CurrentlyPlaying, Device, DevicesResponse, PlayRequest},
};

impl SpotifyClient {
    /// Retrieves what is playing right now.
    ///
    /// Spotify answers `204 No Content` when no device has an active
    /// session; that case is reported as `Ok(None)` rather than an error.
    /// The `market` is taken from the token so track relinking matches the
    /// user's country.
    ///
    /// # Returns
    ///
    /// The playback state including the current track and the context
    /// (playlist, album) it was started from, or `None`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotLoggedIn`] when no token is stored
    /// - [`Error::SessionExpired`] when Spotify rejects the token
    /// - [`Error::InvalidResponse`] when the body is not a playback state
    ///
    /// # Example
    ///
    /// ```
    /// if let Some(playing) = client.currently_playing().await? {
    ///     println!("playing: {}", playing.is_playing);
    /// }
    /// ```
    pub async fn currently_playing(&self) -> Res<Option<CurrentlyPlaying>> {
        self.get_optional("/me/player/currently-playing", &[("market", "from_token".to_string())])
            .await
    }

    /// Lists the devices the user can play on, active or not.
    ///
    /// # Errors
    ///
    /// Fails like every other call of the client; see [`SpotifyClient`].
    pub async fn devices(&self) -> Res<Vec<Device>> {
        let response: DevicesResponse = self.get_json("/me/player/devices", &[]).await?;
        Ok(response.devices)
    }

    /// Resumes playback on the active device.
    ///
    /// Sends no body, so Spotify continues whatever context was loaded.
    pub async fn play(&self) -> Res<()> {
        self.send::<()>(Method::PUT, "/me/player/play", &[], None)
            .await
    }

    /// Starts `playlist_uri` on the first active device, or the first device
    /// listed when none is active.
    ///
    /// # Arguments
    ///
    /// * `playlist_uri` - A `spotify:playlist:<id>` URI, sent as `context_uri`
    ///
    /// # Device Selection
    ///
    /// 1. The first device flagged active that has an id
    /// 2. Otherwise the first listed device that has an id
    /// 3. Otherwise the call fails without contacting the player endpoint
    ///
    /// # Errors
    ///
    /// - [`Error::NoActiveDevice`] when the user has no device, or Spotify
    ///   answers 404
    /// - [`Error::PremiumRequired`] when Spotify answers 403
    pub async fn play_playlist(&self, playlist_uri: &str) -> Res<()> {
        let devices = self.devices().await?;
        let device = devices
            .iter()
            .find(|d| d.is_active && d.id.is_some())
            .or_else(|| devices.iter().find(|d| d.id.is_some()))
            .ok_or(Error::NoActiveDevice)?;

        let device_id = device.id.clone().unwrap_or_default();
        let body = PlayRequest {
            context_uri: playlist_uri.to_string(),
        };

        match self
            .send(
                Method::PUT,
                "/me/player/play",
                &[("device_id", device_id)],
                Some(&body),
            )
            .await
        {
            Err(Error::Api { status: 403, .. }) => Err(Error::PremiumRequired),
            Err(Error::Api { status: 404, .. }) => Err(Error::NoActiveDevice),
            other => other,
        }
    }

    /// Pauses playback. Pausing an already paused player is accepted by Spotify.
    pub async fn pause(&self) -> Res<()> {
        self.send::<()>(Method::PUT, "/me/player/pause", &[], None)
            .await
    }

    pub async fn next(&self) -> Res<()> {
        self.send::<()>(Method::POST, "/me/player/next", &[], None)
            .await
    }

    pub async fn previous(&self) -> Res<()> {
        self.send::<()>(Method::POST, "/me/player/previous", &[], None)
            .await
    }

    /// Sets the playback volume of the active device.
    ///
    /// # Arguments
    ///
    /// * `percent` - Target volume; values above 100 are clamped to 100
    ///
    /// # Example
    ///
    /// ```
    /// client.set_volume(40).await?;
    /// ```
    pub async fn set_volume(&self, percent: u8) -> Res<()> {
        let percent = percent.min(100);
        self.send::<()>(
            Method::PUT,
            "/me/player/volume",
            &[("volume_percent", percent.to_string())],
            None,
        )
        .await
    }

    /// Turns shuffle on (`true`) or off (`false`) for the active device.
    pub async fn set_shuffle(&self, state: bool) -> Res<()> {
        self.send::<()>(
            Method::PUT,
            "/me/player/shuffle",
            &[("state", state.to_string())],
            None,
        )
        .await
    }
}
