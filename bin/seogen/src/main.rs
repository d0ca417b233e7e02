//! seogen CLI
//!
//! Generates sitemap.xml and robots.txt for a folder-based contents
//! repository and keeps them current while the content changes.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for seogen.
#[derive(Parser)]
#[command(
    name = "seogen",
    version,
    about = "Sitemap and robots.txt generator for contents repositories"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "seogen.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Generate sitemap.xml and robots.txt once
    Generate,
    /// Regenerate whenever the content tree changes
    Watch,
    /// Show where a page view would be redirected
    Redirect {
        /// Page path (e.g., /contents/boards/rust/2025-01-01_intro/)
        #[arg(short, long)]
        path: String,
        /// Visitor user agent; omitted means a non-browser client
        #[arg(short, long)]
        user_agent: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    seogen::init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate => {
            seogen::cmd::generate::run(&cli.config)?;
        }
        Commands::Watch => {
            seogen::cmd::watch::run(&cli.config).await?;
        }
        Commands::Redirect { path, user_agent } => {
            seogen::cmd::redirect::run(&cli.config, &path, user_agent.as_deref())?;
        }
    }

    Ok(())
}
