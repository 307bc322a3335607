use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use shopfx::core::log::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for shopfx::AppCommand {
    fn from(cmd: Commands) -> shopfx::AppCommand {
        match cmd {
            Commands::Convert {
                amount,
                from,
                to,
                country,
            } => shopfx::AppCommand::Convert {
                amount,
                from,
                to,
                country,
            },
            Commands::Rates { base } => shopfx::AppCommand::Rates { base },
            Commands::Detect { page, country } => shopfx::AppCommand::Detect { page, country },
            Commands::Render { page, to, country } => {
                shopfx::AppCommand::Render { page, to, country }
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount into another currency for a visitor
    Convert {
        amount: f64,
        /// Source currency, defaults to the configured base currency
        #[arg(long)]
        from: Option<String>,
        /// Target currency
        #[arg(long)]
        to: String,
        /// Visitor country, skips geolocation
        #[arg(long)]
        country: Option<String>,
    },
    /// Show exchange rates for a base currency
    Rates {
        #[arg(long)]
        base: Option<String>,
    },
    /// Detect the currencies a storefront page offers
    Detect {
        /// Page snapshot as JSON
        #[arg(long)]
        page: PathBuf,
        #[arg(long)]
        country: Option<String>,
    },
    /// Rewrite the prices on a storefront page
    Render {
        /// Page snapshot as JSON
        #[arg(long)]
        page: PathBuf,
        /// Currency to show, defaults to the page's current one
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        country: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => shopfx::cli::setup::setup(),
        Some(cmd) => shopfx::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
