use clap::Parser;
use clap::error::ErrorKind as ClapErrorKind;
use recuerd0::AppError;
use recuerd0::cli::dispatcher::Dispatcher;
use recuerd0::cli::main_types::Cli;
use recuerd0::core::services::config_service::ConfigService;
use recuerd0::display::{OutputOptions, Response};
use recuerd0::utils::logging;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => e.exit(),
            _ => {
                let pretty = std::env::args().any(|arg| arg == "--pretty");
                let err = AppError::InvalidArguments(clap_message(&e));
                emit(&Response::failure(&err), OutputOptions::new().with_pretty(pretty));
            }
        },
    };

    let output = OutputOptions::new().with_pretty(cli.pretty);

    if logging::init(cli.verbose).is_err() {
        eprintln!("warning: logger already initialized");
    }

    let config = match ConfigService::from_environment(cli.config_dir.as_deref()) {
        Ok(config) => config,
        Err(err) => emit(&Response::failure(&err), output),
    };

    let flags = Dispatcher::flags_from_cli(&cli);
    let dispatcher = Dispatcher::new(config, flags);
    let response = dispatcher.dispatch(cli.command).await;

    emit(&response, output)
}

/// First line of a clap error without its `error: ` prefix
fn clap_message(e: &clap::Error) -> String {
    // Clap renders the whole help text for a missing subcommand
    if e.kind() == ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand {
        return "a subcommand is required; run with --help for usage".to_string();
    }

    let rendered = e.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.trim_start_matches("error: ").trim().to_string()
}

/// Print the envelope to stdout and exit with its code
fn emit(response: &Response, output: OutputOptions) -> ! {
    match output.render(response) {
        Ok(json) => {
            println!("{}", json);
            std::process::exit(response.exit_code());
        }
        Err(e) => {
            eprintln!("Error: failed to serialize response: {}", e);
            std::process::exit(1);
        }
    }
}
