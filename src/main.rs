use clap::Parser;
use std::process::ExitCode;

use tutor_chat::cli::{self, Cli, Commands, ConfigSubcommands};
use tutor_chat::config::AppConfig;
use tutor_chat::core::{AppError, Result};
use tutor_chat::{logging, tui};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Config { command }) => run_config_command(command),
        Some(Commands::Ask { text }) => {
            logging::init_stderr(cli.verbose);
            let settings = cli::resolve_settings(&cli, AppConfig::load())?;
            let coordinator = cli::create_coordinator(&settings)?;
            cli::run_ask(coordinator, text).await
        }
        None => {
            let _log_guard = logging::init();
            let settings = cli::resolve_settings(&cli, AppConfig::load())?;
            let coordinator = cli::create_coordinator(&settings)?;
            tui::run_tui(coordinator).await
        }
    }
}

fn run_config_command(command: &ConfigSubcommands) -> Result<()> {
    match command {
        ConfigSubcommands::Init => {
            let path = AppConfig::init_default()?;
            println!("✓ Created config file at {}", path.display());
        }
        ConfigSubcommands::Where => {
            let path = AppConfig::get_config_path()
                .ok_or_else(|| AppError::Config("could not determine config path".into()))?;
            println!("{}", path.display());
        }
    }
    Ok(())
}
