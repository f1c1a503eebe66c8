use chrono::Utc;

use crate::{
    Res,
    management::storage::{
        KEY_IS_LOGGED_IN, KEY_SPOTIFY_TOKEN, KEY_TOKEN_EXPIRY_TIME, LocalStorage,
    },
};

/// The locally cached authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
    pub access_token: Option<String>,
    /// Expiry as epoch milliseconds.
    pub expires_at: Option<i64>,
    pub is_logged_in: bool,
}

impl Credential {
    pub fn is_expired(&self, now_ms: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => now_ms >= expires_at,
            None => true,
        }
    }

    /// True when a token is present and its advisory expiry lies ahead.
    pub fn has_valid_token(&self, now_ms: i64) -> bool {
        self.access_token.is_some() && !self.is_expired(now_ms)
    }
}

/// Reads and writes the [`Credential`] through [`LocalStorage`].
///
/// The three credential keys are the only state this manager owns; every
/// other component goes through it to change them.
#[derive(Debug, Clone)]
pub struct CredentialManager {
    storage: LocalStorage,
}

impl CredentialManager {
    pub fn new(storage: LocalStorage) -> Self {
        CredentialManager { storage }
    }

    /// Loads the stored credential.
    ///
    /// A stored login flag without a token is reported as logged out.
    pub async fn load(&self) -> Credential {
        let access_token = self
            .storage
            .get(KEY_SPOTIFY_TOKEN)
            .await
            .filter(|t| !t.is_empty());
        let expires_at = self
            .storage
            .get(KEY_TOKEN_EXPIRY_TIME)
            .await
            .and_then(|raw| raw.trim().parse::<i64>().ok());
        let flagged = self.storage.get(KEY_IS_LOGGED_IN).await.as_deref() == Some("true");

        Credential {
            is_logged_in: flagged && access_token.is_some(),
            access_token,
            expires_at,
        }
    }

    /// Persists a freshly obtained token and marks the user logged in.
    ///
    /// # Arguments
    ///
    /// * `access_token` - The bearer token returned by the accounts service
    /// * `expires_in_secs` - Lifetime reported with the token; the stored
    ///   expiry saturates instead of overflowing for absurd values
    ///
    /// # Returns
    ///
    /// The credential as it now reads from storage.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the storage file cannot be written.
    ///
    /// # Example
    ///
    /// ```
    /// let credential = manager.persist_login("token", 3600).await?;
    /// assert!(credential.is_logged_in);
    /// ```
    pub async fn persist_login(&self, access_token: &str, expires_in_secs: u64) -> Res<Credential> {
        let lifetime_ms = i64::try_from(expires_in_secs)
            .unwrap_or(i64::MAX / 1000)
            .saturating_mul(1000);
        let expires_at = Utc::now().timestamp_millis().saturating_add(lifetime_ms);

        self.storage.set(KEY_SPOTIFY_TOKEN, access_token).await?;
        self.storage
            .set(KEY_TOKEN_EXPIRY_TIME, expires_at.to_string())
            .await?;
        self.storage.set(KEY_IS_LOGGED_IN, "true").await?;

        Ok(Credential {
            access_token: Some(access_token.to_string()),
            expires_at: Some(expires_at),
            is_logged_in: true,
        })
    }

    /// Drops the token and the login flag after a rejected call.
    ///
    /// The expiry timestamp is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the storage file cannot be written.
    pub async fn mark_logged_out(&self) -> Res<()> {
        self.storage.remove(KEY_SPOTIFY_TOKEN).await?;
        self.storage.set(KEY_IS_LOGGED_IN, "false").await
    }

    /// Removes all credential keys.
    pub async fn clear(&self) -> Res<()> {
        self.storage
            .remove_all(&[KEY_SPOTIFY_TOKEN, KEY_TOKEN_EXPIRY_TIME, KEY_IS_LOGGED_IN])
            .await
    }

    /// The stored token if the user is logged in.
    pub async fn access_token(&self) -> Option<String> {
        let credential = self.load().await;
        if credential.is_logged_in {
            credential.access_token
        } else {
            None
        }
    }
}
