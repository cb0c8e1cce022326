use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

mod board;
mod config;
mod editor;
mod error;
mod grid;
mod html;
mod server;
mod week;

use board::Board;
use config::GridConfig;
use week::{Clock, SystemClock};

#[derive(Parser, Debug)]
#[command(name = "turnario")]
#[command(about = "Weekly shift planner served as a web view")]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output directory for generated files
    #[arg(short, long, default_value = ".", global = true)]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Render an empty planner page to index.html (no server)
    Build {
        /// Weeks relative to the current one
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i64,
    },

    /// Show the dates of a week
    Week {
        /// Weeks relative to the current one
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i64,
    },
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level))
        .add_directive("hyper=warn".parse()?);

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_max_level(Level::TRACE)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level)?;

    let config = GridConfig::from_env().context("Invalid configuration")?;
    let clock = SystemClock;
    let today = clock.today();

    match args.command.unwrap_or(Commands::Serve { port: 8080 }) {
        Commands::Serve { port } => {
            info!(
                people = config.people.len(),
                columns = ?config.columns,
                notes = ?config.notes,
                "Starting planner"
            );
            let board = Board::new(config, today)?;
            let state = server::AppState::new(board, Box::new(clock));
            server::serve(port, state).await?;
        }
        Commands::Build { offset } => {
            let mut board = Board::new(config, today)?;
            board.jump_to_week(offset);
            let html_path = args.output.join("index.html");
            html::generate_html(&board.view(today)?, &html_path)?;
            info!(path = %html_path.display(), "HTML saved");
        }
        Commands::Week { offset } => {
            let dates = week::compute_week(today, offset)?;
            info!(offset = offset, "{}", week::week_range_label(&dates));
            for label in week::column_labels(&dates, config.columns) {
                info!(day = %label, "Column");
            }
        }
    }

    Ok(())
}
