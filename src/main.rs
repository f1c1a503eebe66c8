use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use stellarmix::{cli, config, error, orchestrator::Orchestrator, utils};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in with Spotify
    Login,

    /// Forget the stored Spotify credential
    Logout,

    /// Show login state and cache information
    Status,

    /// Show the current weather, sun position and the resulting query
    Mood(GenreOptions),

    /// Search playlists matching the current mood
    Playlists(PlaylistsOptions),

    /// Play a cached playlist (by position), a playlist URI or id; pauses it if already playing
    Play(TargetOption),

    /// Pause playback
    Pause,

    /// Resume playback
    Resume,

    /// Skip to the next track
    Next,

    /// Go back to the previous track
    Previous,

    /// Set the playback volume
    Volume(VolumeOption),

    /// Turn shuffle on or off
    Shuffle(ShuffleOption),

    /// Show the track that is currently playing
    NowPlaying,

    /// List available playback devices
    Devices,

    /// Follow a playlist
    Follow(TargetOption),

    /// Unfollow a playlist
    Unfollow(TargetOption),

    /// List genres known to Spotify
    Genres,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct GenreOptions {
    /// Genre to include in the query; can be repeated
    #[clap(long = "genre")]
    pub genres: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Genre to include in the query; can be repeated
    #[clap(long = "genre")]
    pub genres: Vec<String>,

    /// Show the cached playlists without searching
    #[clap(long)]
    pub cached: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TargetOption {
    /// Position in the cached playlist list, a spotify:playlist URI or a playlist id
    target: String,
}

#[derive(Parser, Debug, Clone)]
pub struct VolumeOption {
    /// Volume in percent
    #[clap(value_parser = clap::value_parser!(u8).range(0..=100))]
    percent: u8,
}

#[derive(Parser, Debug, Clone)]
pub struct ShuffleOption {
    /// on or off
    #[clap(value_parser = utils::parse_switch, action = ArgAction::Set)]
    state: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let settings = match config::Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("{}", e),
    };

    let mut app = match Orchestrator::new(settings).await {
        Ok(app) => app,
        Err(e) => error!("Cannot open local storage. Err: {}", e),
    };

    match cli.command {
        Command::Login => cli::login(&mut app).await,
        Command::Logout => cli::logout(&mut app).await,
        Command::Status => cli::status(&mut app).await,
        Command::Mood(opt) => cli::mood(&mut app, opt.genres).await,
        Command::Playlists(opt) => cli::playlists(&mut app, opt.genres, opt.cached).await,
        Command::Play(opt) => cli::play(&mut app, opt.target).await,
        Command::Pause => cli::pause(&mut app).await,
        Command::Resume => cli::resume(&mut app).await,
        Command::Next => cli::next(&mut app).await,
        Command::Previous => cli::previous(&mut app).await,
        Command::Volume(opt) => cli::volume(&mut app, opt.percent).await,
        Command::Shuffle(opt) => cli::shuffle(&mut app, opt.state).await,
        Command::NowPlaying => cli::now_playing(&mut app).await,
        Command::Devices => cli::devices(&mut app).await,
        Command::Follow(opt) => cli::follow(&mut app, opt.target).await,
        Command::Unfollow(opt) => cli::unfollow(&mut app, opt.target).await,
        Command::Genres => cli::genres(&mut app).await,
        Command::Completions(_) => {}
    }
}
