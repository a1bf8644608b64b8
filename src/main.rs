//! posedash - Live exercise form tracking dashboard

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use posedash::api::{Backend, HttpBackend};
use posedash::config::Config;
use posedash::controller::Controller;
use posedash::exercises::ExerciseKind;
use posedash::metrics::render_cards;
use posedash::tui::App;

#[derive(Parser)]
#[command(name = "posedash")]
#[command(author, version, about = "Live exercise form tracking dashboard")]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui,

    /// List supported exercises with their instructions
    Exercises,

    /// Select an exercise on the backend and print one metrics reading
    Metrics {
        /// Exercise id (e.g. "push_ups", "plank")
        exercise: ExerciseKind,
    },

    /// Reset the backend counter for the current exercise
    Reset,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.config;

    // The dashboard owns the terminal, so its logs go to a file
    let tui_mode = matches!(cli.command, None | Some(Commands::Tui));
    init_logging(tui_mode.then_some(config.log_file.as_path()))?;

    let backend = HttpBackend::new(&config.server, config.timeout())?;

    match cli.command {
        Some(Commands::Tui) | None => {
            tracing::info!("Dashboard starting against {}", backend.base_url());
            let controller = Controller::new(Arc::new(backend), config.poll_interval());
            let mut app = App::new(controller);
            app.run().await?;
        }

        Some(Commands::Exercises) => {
            for kind in ExerciseKind::all() {
                let info = kind.info();
                println!("[{}] {} {} ({})", kind.shortcut(), info.emoji, info.name, kind.id());
                println!("    {}", info.description);
                for (i, step) in info.instructions.iter().enumerate() {
                    println!("    {}. {}", i + 1, step);
                }
                let metrics: Vec<_> = kind.schema().iter().map(|f| f.key).collect();
                println!("    metrics: {}", metrics.join(", "));
                println!();
            }
        }

        Some(Commands::Metrics { exercise }) => {
            backend.set_exercise(exercise).await?;
            // Give the backend one poll period to process a frame
            tokio::time::sleep(config.poll_interval()).await;
            let metrics = backend.get_metrics().await?;

            println!("{} metrics", exercise.info().name);
            println!("{:-<40}", "");
            for card in render_cards(exercise, &metrics) {
                println!("{:20} {}", card.label, card.display());
            }
        }

        Some(Commands::Reset) => {
            backend.reset().await?;
            println!("Counter reset on {}", backend.base_url());
        }
    }

    Ok(())
}
