//! Sitewright CLI
//!
//! Composes declarative site configuration and content sources into a
//! route table for an external renderer.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::Result;

/// Command-line interface for Sitewright.
#[derive(Parser)]
#[command(
    name = "sitewright",
    version,
    about = "Compose declarative site configuration into a route table"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "sitewright.toml")]
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
    /// Compose the site and write the route table manifest
    Build {
        /// Output directory
        #[arg(short, long, default_value = "public")]
        output: std::path::PathBuf,
        /// Include draft pages
        #[arg(long)]
        drafts: bool,
        /// Override the site base URL (e.g., https://example.com)
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Validate configuration and content sources
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    sitewright::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build {
            output,
            drafts,
            base_url,
        } => {
            sitewright::cmd::build::run(&cli.config, &output, drafts, base_url.as_deref())?;
        }
        Commands::Check { strict } => {
            sitewright::cmd::check::run(&cli.config, strict)?;
        }
    }

    Ok(())
}
