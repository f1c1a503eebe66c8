use crate::{
    Res,
    spotify::SpotifyClient,
    types::{GenresResponse, UserProfile},
};

impl SpotifyClient {
    pub async fn user_profile(&self) -> Res<UserProfile> {
        self.get_json("/me", &[]).await
    }

    /// Genre seeds Spotify knows about.
    pub async fn available_genres(&self) -> Res<Vec<String>> {
        let response: GenresResponse = self
            .get_json("/recommendations/available-genre-seeds", &[])
            .await?;
        Ok(response.genres)
    }
}
