use tabled::Table;

use crate::{
    cli::{authenticated, ready, spinner},
    error, info,
    orchestrator::{Orchestrator, Session, Toggle},
    success,
    utils::{self, PlaylistRef},
    warning,
};

pub async fn playlists(app: &mut Orchestrator, genres: Vec<String>, cached: bool) {
    if cached {
        let playlists = app.playlist_cache().load().await;
        if playlists.is_empty() {
            info!("No cached playlists. Run stellarmix playlists to fetch some.");
            return;
        }
        println!("{}", Table::new(utils::playlist_rows(&playlists)));
        return;
    }

    if ready(app).await == Session::LoginRequired {
        error!("Not logged in. Please run stellarmix login");
    }

    let query = app.playlist_query(&genres);
    info!("Mood: {}", utils::describe_query(&query));

    let pb = spinner("Searching playlists...");
    let result = app.fetch_playlists(&genres).await;
    pb.finish_and_clear();

    match result {
        Ok(playlists) if playlists.is_empty() => warning!("No playlists found for this mood."),
        Ok(playlists) => println!("{}", Table::new(utils::playlist_rows(&playlists))),
        Err(e) => error!("Failed to fetch playlists. Err: {}", e),
    }
}

pub async fn play(app: &mut Orchestrator, target: String) {
    authenticated(app).await;

    let uri = match resolve_uri(app, &target).await {
        Some(uri) => uri,
        None => error!("No cached playlist at position {}. Run stellarmix playlists first.", target),
    };

    match app.toggle_playlist(&uri).await {
        Ok(Toggle::Started(uri)) => success!("Playing {}", uri),
        Ok(Toggle::Paused(uri)) => success!("Paused {}", uri),
        Err(e) => error!("Failed to toggle playback. Err: {}", e),
    }
}

pub async fn follow(app: &mut Orchestrator, target: String) {
    authenticated(app).await;

    let Some(id) = resolve_id(app, &target).await else {
        error!("Cannot find playlist {}", target);
    };

    match app.spotify().follow_playlist(&id).await {
        Ok(()) => success!("Following playlist {}", id),
        Err(e) => error!("Failed to follow playlist. Err: {}", app.observe(e)),
    }
}

pub async fn unfollow(app: &mut Orchestrator, target: String) {
    authenticated(app).await;

    let Some(id) = resolve_id(app, &target).await else {
        error!("Cannot find playlist {}", target);
    };

    match app.spotify().is_following(&id).await {
        Ok(false) => {
            info!("Not following playlist {}", id);
            return;
        }
        Ok(true) => {}
        Err(e) => warning!("Cannot check follow state. Err: {}", app.observe(e)),
    }

    match app.spotify().unfollow_playlist(&id).await {
        Ok(()) => success!("Unfollowed playlist {}", id),
        Err(e) => error!("Failed to unfollow playlist. Err: {}", app.observe(e)),
    }
}

async fn resolve_uri(app: &Orchestrator, target: &str) -> Option<String> {
    match utils::parse_playlist_ref(target) {
        PlaylistRef::Index(index) => app.playlist_cache().get(index).await.map(|p| p.uri),
        PlaylistRef::Uri(uri) => Some(uri),
        PlaylistRef::Id(id) => Some(format!("spotify:playlist:{id}")),
    }
}

async fn resolve_id(app: &Orchestrator, target: &str) -> Option<String> {
    match utils::parse_playlist_ref(target) {
        PlaylistRef::Index(index) => app.playlist_cache().get(index).await.map(|p| p.id),
        PlaylistRef::Uri(uri) => utils::playlist_id_from_uri(&uri).map(str::to_string),
        PlaylistRef::Id(id) => Some(id),
    }
}
