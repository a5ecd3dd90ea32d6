use std::process::ExitCode;

use clap::Parser;

use omniprobe_cli::cli::Cli;
use omniprobe_cli::commands;
use omniprobe_cli::error::CliError;
use omniprobe_cli::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    };

    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

async fn run(cli: Cli) -> Result<i32, CliError> {
    let config = {
        let startup = logging::startup_subscriber(std::io::stderr);
        let _guard = tracing::subscriber::set_default(startup);
        commands::load_config(&cli).await?
    };

    logging::init_tracing(&config.general).map_err(|e| CliError::Logging(e.to_string()))?;
    omniprobe_core::metrics::describe_all();

    tracing::debug!(
        config = ?cli.config,
        base_url = %config.service.base_url,
        "omniprobe starting"
    );

    let mut stdout = std::io::stdout();
    commands::execute(&cli, &config, &mut stdout).await
}
