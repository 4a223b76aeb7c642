//! Folio CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Compose magazine issues into print-ready documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an issue description to a PDF (or HTML preview)
    Render {
        /// Path to the intake JSON document
        input: String,

        /// Template pack id (built-in or a JSON pack file)
        #[arg(short, long, default_value = "modern")]
        pack: String,

        /// Renderer: "paged" (PDF via external engine) or "fallback" (HTML)
        #[arg(short, long, default_value = "paged")]
        renderer: String,

        /// Directory artifacts are written into
        #[arg(short, long, default_value = "out")]
        output_dir: String,

        /// Suppress console output
        #[arg(long)]
        quiet: bool,
    },

    /// List the built-in template packs
    Packs,

    /// Validate an intake document without rendering
    Check {
        /// Path to the intake JSON document
        input: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; FOLIO_LOG wins over RUST_LOG
    let directives = std::env::var("FOLIO_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "folio=info,folio_core=info".to_string());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(directives))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            pack,
            renderer,
            output_dir,
            quiet,
        } => {
            commands::render::execute(commands::render::RenderArgs {
                input,
                pack,
                renderer,
                output_dir,
                quiet,
            })
            .await
        }
        Commands::Packs => commands::packs::execute(),
        Commands::Check { input } => commands::check::execute(&input),
    }
}
