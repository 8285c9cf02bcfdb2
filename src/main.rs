// src/main.rs

use watchrun::errors::WatchrunError;
use watchrun::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("watchrun error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;

    // Without a project file the command can only have come from `--`.
    let command_from_cli = args.config.is_none();
    match run(args).await {
        Err(WatchrunError::EmptyCommand) if command_from_cli => cli::exit_missing_command(),
        result => result?,
    }
    Ok(())
}
