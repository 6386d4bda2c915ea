//! Quire bookshop client entry point

use std::{io, process::ExitCode, sync::Arc};

use thiserror::Error;
use tracing::info;

use quire_app::{
    api::{ApiClient, BookshopApi},
    config::{AppConfig, ConfigError, Frontend},
    console::Console,
    gateway::{GatewayError, HttpGateway},
    observability::{self, ObservabilityError},
    session::SessionManager,
    shell::{self, ShellError, Terminal},
    store::FileStore,
    storefront::Storefront,
};

#[derive(Debug, Error)]
enum AppError {
    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    #[error("failed to initialise logging")]
    Observability(#[from] ObservabilityError),

    #[error("failed to create HTTP client")]
    Gateway(#[from] GatewayError),

    #[error("shell failed")]
    Shell(#[from] ShellError),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = AppConfig::load().unwrap_or_else(|error| error.exit());

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            #[expect(
                clippy::print_stderr,
                reason = "the shell has exited, stderr is the only place left to report"
            )]
            {
                eprintln!("Error: {error}");

                let mut source = std::error::Error::source(&error);

                while let Some(cause) = source {
                    eprintln!("  caused by: {cause}");
                    source = cause.source();
                }
            }

            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    observability::init(&config.logging)?;

    let currency = config.api.currency()?;
    let gateway = HttpGateway::new(&config.api.api_base)?;
    let api: Arc<dyn BookshopApi> = Arc::new(ApiClient::new(Arc::new(gateway)));
    let store = FileStore::new(config.api.state_dir_for(config.frontend));
    let session = SessionManager::new(config.frontend, api.clone(), Box::new(store));
    let mut terminal = Terminal::new(tokio::io::stdin(), io::stdout());

    info!(frontend = config.frontend.state_subdir(), api = %config.api.api_base, "starting shell");

    match config.frontend {
        Frontend::Storefront => {
            let mut storefront = Storefront::new(api, session);

            shell::storefront::run(&mut storefront, &mut terminal, currency).await?;
        }
        Frontend::Console => {
            let mut console = Console::new(api, session);

            shell::console::run(&mut console, &mut terminal, currency).await?;
        }
    }

    Ok(())
}
