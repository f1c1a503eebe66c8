use std::collections::HashMap;

use axum::{Extension, extract::Query, response::Html};

use crate::spotify::auth::{CallbackOutcome, SharedAuthorization};

/// Receives the provider redirect and hands the outcome to the waiting login.
///
/// Only the first redirect counts; later hits leave the recorded outcome alone.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<SharedAuthorization>,
) -> Html<&'static str> {
    let mut pending = shared_state.lock().await;
    if pending.outcome.is_some() {
        return Html("<h4>Authorization already received.</h4>");
    }

    if let Some(reason) = params.get("error") {
        pending.outcome = Some(CallbackOutcome::Denied(reason.clone()));
        return Html("<h4>Login failed.</h4>");
    }

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let state = params.get("state").cloned();
    if pending.expected_state.is_some() && pending.expected_state != state {
        pending.outcome = Some(CallbackOutcome::Denied("state mismatch".to_string()));
        return Html("<h4>Login failed.</h4>");
    }

    pending.outcome = Some(CallbackOutcome::Code {
        code: code.clone(),
        state,
    });
    Html("<h2>Authentication successful.</h2><p>Close this browser window.</p>")
}
