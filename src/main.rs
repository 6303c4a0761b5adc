use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxconv::cli::convert::ConversionForm;
use fxconv::core::currency::DisplayCurrency;
use fxconv::core::log::init_logging;

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

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Run the conversion backend
    Serve {
        /// Port to listen on, overriding the configuration
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,
    },
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert
        amount: String,
        /// Source currency code
        #[arg(short, long, default_value = "INR")]
        from: DisplayCurrency,
        /// Destination currency code
        #[arg(short, long, default_value = "PKR")]
        to: DisplayCurrency,
        /// Send the request to a running backend instead of converting locally
        #[arg(short, long)]
        server: Option<String>,
    },
    /// List the currencies offered by the converter
    Currencies,
}

impl From<Commands> for fxconv::AppCommand {
    fn from(cmd: Commands) -> fxconv::AppCommand {
        match cmd {
            Commands::Serve { port } => fxconv::AppCommand::Serve { port },
            Commands::Convert {
                amount,
                from,
                to,
                server,
            } => fxconv::AppCommand::Convert {
                form: ConversionForm { amount, from, to },
                server,
            },
            Commands::Currencies => fxconv::AppCommand::Currencies,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxconv::cli::setup::setup(),
        Some(cmd) => fxconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
