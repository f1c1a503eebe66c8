use chrono::{DateTime, Local, Utc};

use crate::{error, info, orchestrator::Orchestrator, success, warning};

pub async fn login(app: &mut Orchestrator) {
    let credential = match app.bootstrap().await {
        Ok(c) => c,
        Err(e) => error!("Cannot read local storage. Err: {}", e),
    };

    if credential.has_valid_token(Utc::now().timestamp_millis()) && credential.is_logged_in {
        info!("Already logged in. Run stellarmix logout first to switch accounts.");
        return;
    }

    info!("Opening the Spotify authorization page...");
    if let Err(e) = app.login().await {
        error!("Authentication failed. Err: {}", e);
    }

    match app.spotify().user_profile().await {
        Ok(profile) => success!(
            "Logged in as {}",
            profile.display_name.unwrap_or(profile.id)
        ),
        Err(e) => warning!("Cannot fetch user profile. Err: {}", e),
    }
}

pub async fn logout(app: &mut Orchestrator) {
    match app.logout().await {
        Ok(()) => success!("Logged out."),
        Err(e) => error!("Failed to clear stored credential. Err: {}", e),
    }
}

pub async fn status(app: &mut Orchestrator) {
    let credential = match app.bootstrap().await {
        Ok(c) => c,
        Err(e) => error!("Cannot read local storage. Err: {}", e),
    };

    let now = Utc::now().timestamp_millis();
    let expiry = credential
        .expires_at
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string());

    match (credential.is_logged_in, credential.has_valid_token(now)) {
        (true, true) => success!(
            "Logged in. Token valid until {}",
            expiry.unwrap_or_else(|| "unknown".to_string())
        ),
        (true, false) => warning!("Logged in, but the token has expired. Please run stellarmix login"),
        (false, _) => info!("Not logged in."),
    }

    info!(
        "{} cached playlists in {}",
        app.state().playlists.len(),
        app.settings().storage_path().display()
    );
}
