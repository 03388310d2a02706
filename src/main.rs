use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use kurs::core::log::init_logging;

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

impl From<Commands> for kurs::AppCommand {
    fn from(cmd: Commands) -> kurs::AppCommand {
        match cmd {
            Commands::Rate { inverse, json } => kurs::AppCommand::Rate { inverse, json },
            Commands::Convert { amount, inverse } => kurs::AppCommand::Convert { amount, inverse },
            Commands::Session { inverse } => kurs::AppCommand::Session { inverse },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the current NBP EUR/PLN mid rate
    Rate {
        /// Show 1 PLN in EUR instead of 1 EUR in PLN
        #[arg(short, long)]
        inverse: bool,
        /// Print the rate as JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert a single amount
    Convert {
        /// Amount in the base currency, e.g. 10 or 12,50
        amount: String,
        /// Convert PLN to EUR instead of EUR to PLN
        #[arg(short, long)]
        inverse: bool,
    },
    /// Start an interactive converter with a short history
    Session {
        /// Start with PLN as the base currency
        #[arg(short, long)]
        inverse: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => kurs::cli::setup::setup(),
        Some(cmd) => kurs::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
