use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scrollintoview_core::{Align, AppConfig, Insets, Rect};

mod commands;

#[derive(Parser)]
#[command(name = "scrollintoview")]
#[command(author, version, about = "Compute and replay scroll-into-view offsets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the offsets that bring a target into view
    Compute {
        /// Container rect in window coordinates: X,Y,W,H
        #[arg(long, value_parser = commands::compute::parse_rect, allow_hyphen_values = true)]
        container: Rect,
        /// Target rect in window coordinates: X,Y,W,H
        #[arg(long, value_parser = commands::compute::parse_rect, allow_hyphen_values = true)]
        target: Rect,
        /// Current vertical offset
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        scroll_y: f64,
        /// Current horizontal offset
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        scroll_x: f64,
        /// auto, start, end or center
        #[arg(long)]
        align: Option<Align>,
        /// Insets as top=N,bottom=N,left=N,right=N
        #[arg(long, value_parser = commands::compute::parse_insets)]
        insets: Option<Insets>,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Replay a scenario of scroll requests against an in-memory scroll view
    Simulate {
        /// Scenario file (TOML)
        scenario: PathBuf,
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the configuration file path
    Path,
    /// Print the effective configuration
    Show,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration; `config path` and `config init` still work when it is broken
    let config = AppConfig::load();
    let log_level = config
        .as_ref()
        .map(|c| c.general.log_level.clone())
        .unwrap_or_else(|_| "info".into());

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or(log_level),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Compute {
            container,
            target,
            scroll_y,
            scroll_x,
            align,
            insets,
            json,
        } => {
            let request = commands::compute::ComputeRequest {
                container,
                target,
                scroll_y,
                scroll_x,
                align,
                insets,
            };
            commands::compute::run(&config?, &request, json)
        }
        Commands::Simulate { scenario, json } => commands::simulate::run(&config?, &scenario, json).await,
        Commands::Config { action } => match action {
            ConfigAction::Path => commands::config::path(),
            ConfigAction::Show => commands::config::show(&config?),
            ConfigAction::Init { force } => commands::config::init(force),
        },
    }
}
