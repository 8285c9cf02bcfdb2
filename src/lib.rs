// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod shutdown;
pub mod watch;

use tracing::{error, info};

use crate::cli::CliArgs;
use crate::config::Config;
use crate::engine::{handshake, Coordinator};
use crate::errors::Result;
use crate::shutdown::Shutdown;
use crate::watch::ChangeDetector;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (CLI + optional project file)
/// - Ctrl-C handling
/// - the change detector and the coordinator/supervisor
pub async fn run(args: CliArgs) -> Result<()> {
    let config = Config::resolve(&args)?;
    let shutdown = Shutdown::new();

    // Ctrl-C → graceful shutdown.
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("interrupt received; shutting down");
                    shutdown.trigger();
                }
                Err(e) => error!("failed to listen for Ctrl+C: {e}"),
            }
        });
    }

    supervise(&config, &shutdown).await?;
    info!("all tasks finished");
    Ok(())
}

/// Set up watching for `config` and supervise until `shutdown` fires.
///
/// Watch setup errors (unusable root, watcher init failure) are returned
/// before anything is built or spawned.
pub async fn supervise(config: &Config, shutdown: &Shutdown) -> Result<()> {
    let (notifier, listener) = handshake();
    let detector = ChangeDetector::watch(config, notifier, shutdown.signal())?;
    let mut coordinator = Coordinator::new(config, listener, shutdown.signal());

    drive(detector, &mut coordinator, shutdown).await
}

/// Run the detector and coordinator concurrently until both have finished.
///
/// If the detector dies on its own the whole loop is shut down, so the run
/// command is never left running unwatched; its error is returned once the
/// coordinator has stopped the process.
pub async fn drive(
    detector: ChangeDetector,
    coordinator: &mut Coordinator,
    shutdown: &Shutdown,
) -> Result<()> {
    let detector_task = async {
        let result = detector.run().await;
        if let Err(err) = &result {
            error!(error = %err, "change detector failed; shutting down");
            shutdown.trigger();
        }
        result
    };

    let coordinator_task = async {
        coordinator.run().await;
        // Nothing left to notify once the coordinator is done.
        shutdown.trigger();
    };

    let (detector_result, ()) = tokio::join!(detector_task, coordinator_task);
    detector_result
}
