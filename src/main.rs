use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use sortify::{
    cli,
    config::{self, Config},
    error, warning,
};

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
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Defaults to `sort`, prompting for the playlist URL
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Copy a playlist with its tracks grouped by album and artist
    Sort(SortOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone, Default)]
pub struct SortOptions {
    /// Playlist URL (https://open.spotify.com/playlist/<id>); prompted for when omitted
    #[clap(long)]
    url: Option<String>,

    /// Print the computed order instead of publishing it
    #[clap(long)]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Sort(SortOptions::default()));

    if let Command::Completions(opt) = command {
        let mut cmd = Cli::command_for_update();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let config = Config::from_env();
    if let Err(e) = config.validate() {
        open_dashboard(&config);
        error!("{}", e);
    }

    let result = match command {
        Command::Auth => cli::auth(config.clone()).await,
        Command::Sort(opt) => cli::sort(config.clone(), opt.url, opt.dry_run).await,
        Command::Completions(_) => Ok(()),
    };

    if let Err(e) = result {
        error!("{}", e);
    }
}

fn open_dashboard(config: &Config) {
    let url = config.dashboard_url();
    if webbrowser::open(&url).is_err() {
        warning!("Open {} to look up your application credentials", url);
    }
}
