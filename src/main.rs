//! Voice Diary CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_diary::cli::{
    app::{load_merged_config, run_command, ResolvedConfig, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    logging::init_logging,
    presenter::Presenter,
};
use voice_diary::domain::config::AppConfig;
use voice_diary::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = XdgConfigStore::new();

    if let Commands::Config { action } = cli.command {
        let presenter = Presenter::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    let cli_config = AppConfig {
        api_url: cli.api_url.clone(),
        ..Default::default()
    };
    let config = load_merged_config(&store, cli_config).await;

    run_command(cli.command, ResolvedConfig::from_app_config(&config)).await
}
