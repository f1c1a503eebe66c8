use reqwest::{Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

/// Every failure the application distinguishes.
///
/// Transport failures, provider rejections and local storage problems are
/// kept apart so callers can pick a policy per kind: a 401 clears the stored
/// credential, a failed context fetch is logged and ignored, a rejected token
/// exchange leaves the user logged out.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Token exchange failed with status {status}: {message}")]
    AuthExchange { status: u16, message: String },

    #[error("Spotify session expired. Please run stellarmix login")]
    SessionExpired,

    #[error("Not logged in. Please run stellarmix login")]
    NotLoggedIn,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("No active devices found. Please start playback on a device")]
    NoActiveDevice,

    #[error("Spotify Premium is required or permissions are missing")]
    PremiumRequired,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authorization callback failed: {0}")]
    Callback(String),

    #[error("Cannot move from {from} to {to}")]
    Phase { from: String, to: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl Error {
    /// Status code of a rejected request, if the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::AuthExchange { status, .. } | Error::Api { status, .. } => Some(*status),
            Error::SessionExpired => Some(StatusCode::UNAUTHORIZED.as_u16()),
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, Error::SessionExpired)
    }
}

/// Reads a successful response body and decodes it as JSON.
///
/// Keeps the two failure kinds apart: a broken connection while reading the
/// body is [`Error::Network`], a body that is not the expected JSON shape is
/// [`Error::InvalidResponse`].
///
/// # Arguments
///
/// * `response` - A response whose status has already been checked
/// * `what` - Short name of the payload, used in the error message
///
/// # Errors
///
/// - [`Error::Network`] when the body cannot be read
/// - [`Error::InvalidResponse`] when the body does not decode into `T`
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, Error> {
    let body = response.text().await?;
    serde_json::from_str::<T>(&body).map_err(|e| Error::InvalidResponse(format!("{what}: {e}")))
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

// Spotify's Web API nests `{status, message}`; the accounts service answers
// with a flat `{error, error_description}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Detailed { message: String },
    Code(String),
}

#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlainErrorBody {
    message: Option<String>,
}

/// Extracts a human readable message from an error response body.
///
/// Falls back to the canonical reason phrase of `status` when the body is
/// empty or not one of the shapes the providers use.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(oauth) = serde_json::from_str::<OAuthErrorBody>(body) {
        if let Some(description) = oauth.error_description {
            return description;
        }
    }

    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error: ErrorBody::Detailed { message },
        }) => message,
        Ok(ErrorEnvelope {
            error: ErrorBody::Code(code),
        }) => code,
        Err(_) => {
            if let Ok(PlainErrorBody {
                message: Some(message),
            }) = serde_json::from_str::<PlainErrorBody>(body)
            {
                return message;
            }

            let trimmed = body.trim();
            if trimmed.is_empty() || trimmed.starts_with('{') {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                trimmed.to_string()
            }
        }
    }
}
