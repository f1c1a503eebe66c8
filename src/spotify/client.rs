use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    Error, Res,
    error::{error_message, read_json},
    management::CredentialManager,
    warning,
};

/// Bearer-authenticated client for the Spotify Web API.
///
/// Every request reads the current token from the [`CredentialManager`].
/// A 401 answer marks the stored credential logged out before the call
/// fails with [`Error::SessionExpired`]; nothing is retried.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    credentials: CredentialManager,
}

impl SpotifyClient {
    pub fn new(http: Client, api_url: impl Into<String>, credentials: CredentialManager) -> Self {
        SpotifyClient {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn credentials(&self) -> &CredentialManager {
        &self.credentials
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.api_url, path))
    }

    /// Sends `request` with the bearer token and maps the status code.
    pub(crate) async fn execute(&self, request: RequestBuilder) -> Res<Response> {
        let token = self
            .credentials
            .access_token()
            .await
            .ok_or(Error::NotLoggedIn)?;

        let response = request.bearer_auth(token).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warning!("Spotify rejected the stored token. Logging out.");
            if let Err(e) = self.credentials.mark_logged_out().await {
                warning!("Failed to clear stored credential. Err: {}", e);
            }
            return Err(Error::SessionExpired);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        Ok(response)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Res<T> {
        let response = self
            .execute(self.request(Method::GET, path).query(query))
            .await?;
        read_json(response, path).await
    }

    /// Like [`get_json`](Self::get_json), but a 204 or an empty body yields `None`.
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Res<Option<T>> {
        let response = self
            .execute(self.request(Method::GET, path).query(query))
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str::<T>(&body)
            .map(Some)
            .map_err(|e| Error::InvalidResponse(e.to_string()))
    }

    /// Issues a command whose answer body is ignored.
    pub(crate) async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Res<()> {
        let mut request = self.request(method, path).query(query);
        request = match body {
            Some(body) => request.json(body),
            // Spotify wants a Content-Length on body-less PUT and POST
            None => request.header(reqwest::header::CONTENT_LENGTH, 0),
        };

        self.execute(request).await?;
        Ok(())
    }
}
