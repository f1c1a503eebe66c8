use tabled::Table;

use crate::{
    Res,
    cli::{authenticated, spinner},
    error, info,
    orchestrator::Orchestrator,
    success, utils,
};

pub async fn now_playing(app: &mut Orchestrator) {
    authenticated(app).await;

    match app.spotify().currently_playing().await {
        Ok(None) => info!("Nothing is playing right now."),
        Ok(Some(playing)) => {
            let track = playing
                .item
                .as_ref()
                .map(|t| {
                    let artists: Vec<&str> = t.artists.iter().map(|a| a.name.as_str()).collect();
                    format!("{} - {}", t.name, artists.join(", "))
                })
                .unwrap_or_else(|| "unknown track".to_string());
            let state = if playing.is_playing { "Playing" } else { "Paused" };
            info!("{}: {}", state, track);
            if let Some(context) = playing.context {
                info!("From {}", context.uri);
            }
        }
        Err(e) => error!("Failed to fetch current playback. Err: {}", app.observe(e)),
    }
}

pub async fn devices(app: &mut Orchestrator) {
    authenticated(app).await;

    let pb = spinner("Fetching devices...");
    let result = app.spotify().devices().await;
    pb.finish_and_clear();

    match result {
        Ok(devices) if devices.is_empty() => info!("No devices available. Open Spotify on a device."),
        Ok(devices) => println!("{}", Table::new(utils::device_rows(&devices))),
        Err(e) => error!("Failed to fetch devices. Err: {}", app.observe(e)),
    }
}

pub async fn pause(app: &mut Orchestrator) {
    authenticated(app).await;
    let result = app.spotify().pause().await;
    report(app, result, "Paused playback.", "pause playback");
}

pub async fn resume(app: &mut Orchestrator) {
    authenticated(app).await;
    let result = app.spotify().play().await;
    report(app, result, "Resumed playback.", "resume playback");
}

pub async fn next(app: &mut Orchestrator) {
    authenticated(app).await;
    let result = app.spotify().next().await;
    report(app, result, "Skipped to the next track.", "skip to the next track");
}

pub async fn previous(app: &mut Orchestrator) {
    authenticated(app).await;
    let result = app.spotify().previous().await;
    report(app, result, "Back to the previous track.", "skip to the previous track");
}

pub async fn volume(app: &mut Orchestrator, percent: u8) {
    authenticated(app).await;
    let result = app.spotify().set_volume(percent).await;
    report(app, result, &format!("Volume set to {}%.", percent.min(100)), "set volume");
}

pub async fn shuffle(app: &mut Orchestrator, state: bool) {
    authenticated(app).await;
    let result = app.spotify().set_shuffle(state).await;
    let done = if state { "Shuffle on." } else { "Shuffle off." };
    report(app, result, done, "toggle shuffle");
}

fn report(app: &Orchestrator, result: Res<()>, done: &str, action: &str) {
    match result {
        Ok(()) => success!("{}", done),
        Err(e) => error!("Failed to {}. Err: {}", action, app.observe(e)),
    }
}
