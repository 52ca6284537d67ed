use crate::api::client::ApiClient;
use crate::cli::command_handlers::{
    AccountHandler, MemoryHandler, SearchHandler, WorkspaceHandler, version_response,
};
use crate::cli::main_types::{Cli, Commands};
use crate::core::services::config_service::{ConfigService, ResolvedConfig};
use crate::display::Response;
use crate::error::AppError;
use crate::storage::environment::{ConfigLayer, ENV_TOKEN};
use log::debug;
use std::io;

pub struct Dispatcher {
    config: ConfigService,
    flags: ConfigLayer,
}

impl Dispatcher {
    pub fn new(config: ConfigService, flags: ConfigLayer) -> Self {
        Self { config, flags }
    }

    /// Flag overrides as given on the command line
    pub fn flags_from_cli(cli: &Cli) -> ConfigLayer {
        ConfigLayer::new(
            cli.account.clone(),
            cli.token.clone(),
            cli.api_url.clone(),
            cli.workspace.clone(),
        )
    }

    /// Run one command. Every outcome, including failures, becomes an
    /// envelope.
    pub async fn dispatch(&self, command: Commands) -> Response {
        self.run(command).await.into()
    }

    async fn run(&self, command: Commands) -> crate::Result<Response> {
        match command {
            Commands::Version => Ok(version_response()),
            Commands::Account { command } => {
                AccountHandler::new().handle(command, &self.config, &self.flags)
            }
            Commands::Workspace { command } => {
                let resolved = self.authenticate()?;
                let client = Self::create_client(&resolved)?;
                WorkspaceHandler::new().handle(command, &client).await
            }
            Commands::Memory { command } => {
                let resolved = self.authenticate()?;
                let workspace = resolved.workspace().ok_or_else(|| {
                    AppError::InvalidArguments(
                        "no workspace specified: use --workspace or set workspace in .recuerd0.yaml"
                            .to_string(),
                    )
                })?;
                let client = Self::create_client(&resolved)?;
                MemoryHandler::new()
                    .handle(command, workspace, &client, &mut io::stdin())
                    .await
            }
            Commands::Search { query, page } => {
                let resolved = self.authenticate()?;
                let client = Self::create_client(&resolved)?;
                SearchHandler::new()
                    .handle(&query, self.flags.workspace.as_deref(), page, &client)
                    .await
            }
        }
    }

    /// Resolve configuration and require a token before any request is made
    fn authenticate(&self) -> crate::Result<ResolvedConfig> {
        let resolved = self.config.resolve(&self.flags)?;
        if !resolved.has_token() {
            return Err(AppError::Unauthorized {
                message: format!(
                    "not authenticated: run 'recuerd0 account add <name> --token TOKEN' or set {}",
                    ENV_TOKEN
                ),
            });
        }
        Ok(resolved)
    }

    fn create_client(resolved: &ResolvedConfig) -> crate::Result<ApiClient> {
        debug!("Using API at {}", resolved.api_url);
        ApiClient::new(&resolved.api_url, &resolved.token)
    }
}
