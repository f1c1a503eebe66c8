use reqwest::Method;

use crate::{
    Res,
    spotify::SpotifyClient,
    types::{Playlist, SearchPlaylistsResponse},
};

/// Number of playlists requested per search.
pub const SEARCH_LIMIT: u32 = 20;

impl SpotifyClient {
    /// Searches playlists matching `query`.
    ///
    /// Requests at most [`SEARCH_LIMIT`] results of type `playlist`.
    /// Entries Spotify reports as `null` are dropped; everything else is
    /// returned in the order received.
    ///
    /// # Arguments
    ///
    /// * `query` - Free-text search, usually built by [`crate::mood::build_query`]
    ///
    /// # Errors
    ///
    /// - [`crate::Error::NotLoggedIn`] when no token is stored
    /// - [`crate::Error::SessionExpired`] when Spotify rejects the token; the
    ///   stored credential is marked logged out first
    /// - [`crate::Error::Api`] for any other non-success answer
    /// - [`crate::Error::InvalidResponse`] when the body is not a search result
    ///
    /// # Example
    ///
    /// ```
    /// let playlists = client.search_playlists("chill rainy evening jazz").await?;
    /// for playlist in &playlists {
    ///     println!("{} ({})", playlist.name, playlist.uri);
    /// }
    /// ```
    pub async fn search_playlists(&self, query: &str) -> Res<Vec<Playlist>> {
        let response: SearchPlaylistsResponse = self
            .get_json(
                "/search",
                &[
                    ("q", query.to_string()),
                    ("type", "playlist".to_string()),
                    ("limit", SEARCH_LIMIT.to_string()),
                ],
            )
            .await?;

        Ok(response.playlists.items.into_iter().flatten().collect())
    }

    /// Follows the playlist with `playlist_id` as the current user.
    ///
    /// Following a playlist that is already followed succeeds.
    ///
    /// # Arguments
    ///
    /// * `playlist_id` - The bare id, not the `spotify:playlist:` URI
    pub async fn follow_playlist(&self, playlist_id: &str) -> Res<()> {
        self.send::<()>(
            Method::PUT,
            &format!("/playlists/{playlist_id}/followers"),
            &[],
            None,
        )
        .await
    }

    /// Unfollows the playlist with `playlist_id`.
    pub async fn unfollow_playlist(&self, playlist_id: &str) -> Res<()> {
        self.send::<()>(
            Method::DELETE,
            &format!("/playlists/{playlist_id}/followers"),
            &[],
            None,
        )
        .await
    }

    /// Whether the current user follows the playlist.
    ///
    /// Needs two requests: the user id comes from `GET /me`, then the
    /// followers endpoint is asked about that id.
    pub async fn is_following(&self, playlist_id: &str) -> Res<bool> {
        let profile = self.user_profile().await?;
        let answer: Vec<bool> = self
            .get_json(
                &format!("/playlists/{playlist_id}/followers/contains"),
                &[("ids", profile.id)],
            )
            .await?;

        Ok(answer.first().copied().unwrap_or(false))
    }
}
