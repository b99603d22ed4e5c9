use assistant_core::prelude::*;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with prompts (RUST_LOG=debug for details)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = AppConfig::from_cli(Cli::parse())?;
    tracing::debug!(data_dir = %config.data_dir.display(), options = ?config.options, "Starting");

    if let Some(CliCommand::Helpers { action }) = &config.command {
        let console = TerminalConsole::new(config.options.plain_render);
        return run_helper(action, &config, &console).await;
    }

    let default_command = if config.options.non_interactive {
        CommandName::Help
    } else {
        CommandName::Root
    };
    let registry = CommandRegistry::builtin(default_command)?;
    let store = DataStore::load(&config.data_dir).await?;
    let console = TerminalConsole::new(config.options.plain_render);

    let mut session = ChatSession::new(registry, store, console, config.options);
    session.run(config.predefined_input).await
}
