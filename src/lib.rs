pub mod cli;
pub mod core;
pub mod providers;
pub mod server;

use crate::cli::convert::{ConversionForm, FormBackend};
use crate::core::config::AppConfig;
use crate::core::conversion::Converter;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    /// Run the HTTP backend, optionally overriding the configured port.
    Serve { port: Option<u16> },
    /// Submit the conversion form, in-process or against `server`.
    Convert {
        form: ConversionForm,
        server: Option<String>,
    },
    Currencies,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Serve { port } => {
            let provider = providers::rate_provider(&config)?;
            let state = server::AppState {
                converter: Converter::new(provider),
            };
            let port = port.unwrap_or(config.server.port);
            info!("Starting currency converter backend");
            server::run_server(&config.server.host, port, state).await
        }
        AppCommand::Convert { form, server } => {
            let backend = match server {
                Some(url) => FormBackend::remote(&url, config.provider.timeout())?,
                None => FormBackend::Local(Converter::new(providers::rate_provider(&config)?)),
            };
            cli::convert::run(&form, &backend).await
        }
        AppCommand::Currencies => {
            let provider = providers::rate_provider(&config)?;
            cli::currencies::run(provider.as_ref()).await
        }
    }
}
