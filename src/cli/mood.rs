use crate::{
    cli::{authenticated, ready, spinner},
    error, info,
    orchestrator::Orchestrator,
    utils,
};

pub async fn mood(app: &mut Orchestrator, genres: Vec<String>) {
    ready(app).await;

    let state = app.state();
    match &state.weather {
        Some(report) => {
            let condition = report
                .weather
                .first()
                .map(|w| w.description.clone().unwrap_or_else(|| w.main.clone()))
                .unwrap_or_else(|| "unknown".to_string());
            let temperature = report
                .main
                .as_ref()
                .map(|m| format!("{:.1}°C", m.temp))
                .unwrap_or_else(|| "n/a".to_string());
            info!(
                "Weather in {}: {}, {}",
                report.name.as_deref().unwrap_or("your area"),
                condition,
                temperature
            );
        }
        None => info!("Weather: unavailable"),
    }

    if let Some(sun) = &state.sun {
        info!(
            "Sunrise {} UTC, sunset {} UTC",
            sun.sunrise.format("%H:%M"),
            sun.sunset.format("%H:%M")
        );
    }

    let context = app.mood_context();
    if let Some(altitude) = context.sun_altitude {
        info!("Sun altitude: {:.1}°", altitude);
    }

    let query = app.playlist_query(&genres);
    info!("Mood: {}", utils::describe_query(&query));
    info!("Query: {}", query.query);
}

pub async fn genres(app: &mut Orchestrator) {
    authenticated(app).await;

    let pb = spinner("Fetching genres...");
    let result = app.spotify().available_genres().await;
    pb.finish_and_clear();

    match result {
        Ok(genres) if genres.is_empty() => info!("Spotify returned no genres."),
        Ok(genres) => println!("{}", genres.join("\n")),
        Err(e) => error!("Failed to fetch genres. Err: {}", app.observe(e)),
    }
}
