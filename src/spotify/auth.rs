use std::{sync::Arc, time::Duration};

use reqwest::{Client, Url};
use tokio::sync::Mutex;

use crate::{
    Error, Res,
    config::{Settings, SpotifySettings},
    error::{error_message, read_json},
    management::{Credential, CredentialManager},
    server::start_api_server,
    types::TokenResponse,
    utils, warning,
};

/// Seconds a token lives when the provider omits `expires_in`.
pub const DEFAULT_EXPIRES_IN: u64 = 3600;

/// How long the interactive login waits for the browser redirect.
pub const CALLBACK_TIMEOUT: Duration = Duration::from_secs(120);

/// What the callback server received from the provider redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Code { code: String, state: Option<String> },
    Denied(String),
}

/// Shared slot between the login flow and the callback handler.
#[derive(Debug, Clone, Default)]
pub struct PendingAuthorization {
    pub expected_state: Option<String>,
    pub outcome: Option<CallbackOutcome>,
}

pub type SharedAuthorization = Arc<Mutex<PendingAuthorization>>;

/// Builds the provider authorization URL.
///
/// Pure: the same settings and state always give the same URL.
pub fn build_authorization_url(settings: &SpotifySettings, state: Option<&str>) -> Res<String> {
    let mut params = vec![
        ("client_id", settings.client_id.as_str()),
        ("response_type", "code"),
        ("redirect_uri", settings.redirect_uri.as_str()),
        ("scope", settings.scope.as_str()),
    ];
    if let Some(state) = state {
        params.push(("state", state));
    }

    let url = Url::parse_with_params(&settings.auth_url, &params)
        .map_err(|e| Error::Config(format!("invalid SPOTIFY_API_AUTH_URL: {e}")))?;
    Ok(url.to_string())
}

/// Obtains, stores and discards Spotify credentials.
#[derive(Debug, Clone)]
pub struct AuthService {
    http: Client,
    settings: Settings,
    credentials: CredentialManager,
}

impl AuthService {
    pub fn new(http: Client, settings: Settings, credentials: CredentialManager) -> Self {
        AuthService {
            http,
            settings,
            credentials,
        }
    }

    pub fn authorization_url(&self, state: Option<&str>) -> Res<String> {
        build_authorization_url(&self.settings.spotify, state)
    }

    /// Exchanges an authorization code for an access token.
    ///
    /// On success the credential is persisted and returned. On any other
    /// answer the login flag is cleared, nothing else is stored and the call
    /// fails with [`Error::AuthExchange`]. There is exactly one attempt.
    /// A failure to store the cleared flag is logged and does not replace
    /// the exchange error.
    pub async fn exchange_code_for_token(&self, code: &str) -> Res<Credential> {
        let spotify = &self.settings.spotify;
        let response = self
            .http
            .post(&spotify.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", spotify.redirect_uri.as_str()),
                ("client_id", spotify.client_id.as_str()),
                ("client_secret", spotify.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status, &body);
            warning!("Spotify token exchange failed: {}", message);
            if let Err(e) = self.credentials.mark_logged_out().await {
                warning!("Failed to clear stored login flag. Err: {}", e);
            }
            return Err(Error::AuthExchange {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = read_json(response, "token response").await?;

        self.credentials
            .persist_login(
                &token.access_token,
                token.expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
            )
            .await
    }

    /// Clears every stored credential key. Calling it twice is harmless.
    pub async fn logout(&self) -> Res<()> {
        self.credentials.clear().await
    }

    /// Runs the browser login and returns the authorization code.
    ///
    /// Starts the local callback server, opens the authorization URL in the
    /// default browser and waits until the redirect arrives or
    /// [`CALLBACK_TIMEOUT`] elapses. A redirect whose `state` does not match
    /// the one sent is rejected.
    pub async fn authorize_interactively(&self) -> Res<String> {
        let state = utils::generate_state();
        let shared: SharedAuthorization = Arc::new(Mutex::new(PendingAuthorization {
            expected_state: Some(state.clone()),
            outcome: None,
        }));

        let server = start_api_server(&self.settings.server_addr, Arc::clone(&shared)).await?;

        let auth_url = self.authorization_url(Some(&state))?;
        if webbrowser::open(&auth_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                auth_url
            )
        }

        let outcome = wait_for_callback(Arc::clone(&shared), CALLBACK_TIMEOUT).await;
        server.abort();

        match outcome {
            Some(CallbackOutcome::Code {
                code,
                state: returned,
            }) => {
                if returned.as_deref() != Some(state.as_str()) {
                    return Err(Error::Callback("state mismatch".to_string()));
                }
                Ok(code)
            }
            Some(CallbackOutcome::Denied(reason)) => Err(Error::Callback(reason)),
            None => Err(Error::Callback("timed out waiting for the redirect".to_string())),
        }
    }
}

/// Polls the shared slot until the callback handler fills it or `max_wait` passes.
pub async fn wait_for_callback(
    shared: SharedAuthorization,
    max_wait: Duration,
) -> Option<CallbackOutcome> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared.lock().await;
        if let Some(outcome) = &lock.outcome {
            return Some(outcome.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SpotifySettings {
        SpotifySettings {
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
            scope: "user-read-private user-modify-playback-state".to_string(),
            auth_url: "https://accounts.spotify.com/authorize".to_string(),
            token_url: "https://accounts.spotify.com/api/token".to_string(),
            api_url: "https://api.spotify.com/v1".to_string(),
        }
    }

    #[test]
    fn authorization_url_carries_fixed_params() {
        let url = build_authorization_url(&settings(), None).unwrap();
        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(parsed.host_str(), Some("accounts.spotify.com"));
        assert!(pairs.contains(&("client_id".into(), "client-123".into())));
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&(
            "redirect_uri".into(),
            "http://127.0.0.1:8888/callback".into()
        )));
        assert!(pairs.contains(&(
            "scope".into(),
            "user-read-private user-modify-playback-state".into()
        )));
        assert!(pairs.iter().all(|(k, _)| k != "state"));
    }

    #[test]
    fn authorization_url_is_deterministic_and_keeps_state() {
        let first = build_authorization_url(&settings(), Some("xyz")).unwrap();
        let second = build_authorization_url(&settings(), Some("xyz")).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("state=xyz"));
    }

    #[tokio::test]
    async fn waiting_returns_filled_outcome() {
        let shared: SharedAuthorization = Arc::new(Mutex::new(PendingAuthorization::default()));
        shared.lock().await.outcome = Some(CallbackOutcome::Denied("access_denied".into()));

        let outcome = wait_for_callback(shared, Duration::from_secs(1)).await;
        assert_eq!(outcome, Some(CallbackOutcome::Denied("access_denied".into())));
    }

    #[tokio::test]
    async fn waiting_times_out() {
        let shared: SharedAuthorization = Arc::new(Mutex::new(PendingAuthorization::default()));
        let outcome = wait_for_callback(shared, Duration::from_millis(300)).await;
        assert!(outcome.is_none());
    }
}
