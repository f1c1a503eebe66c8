use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr};
use tokio::task::JoinHandle;

use crate::{Error, Res, api, spotify::auth::SharedAuthorization, warning};

/// Routes served while a login is in progress.
pub fn router(state: SharedAuthorization) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Binds the callback server and serves it on a background task.
///
/// Binding happens before this returns, so a busy port is reported to the
/// caller instead of surfacing as a silent timeout.
pub async fn start_api_server(addr: &str, state: SharedAuthorization) -> Res<JoinHandle<()>> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| Error::Config(format!("Failed to parse server address {addr}: {e}")))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let app = router(state);

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warning!("Callback server stopped. Err: {}", e);
        }
    }))
}
