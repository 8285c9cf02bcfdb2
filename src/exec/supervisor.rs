// src/exec/supervisor.rs

//! Lifecycle of the single managed run process.

use std::time::Duration;

use tokio::process::Child;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::errors::{Result, WatchrunError};
use crate::exec::command::{build_command, run_command, terminate};

/// The run process currently owned by a [`Supervisor`].
#[derive(Debug)]
struct ManagedProcess {
    child: Child,
    pid: Option<u32>,
}

/// Owns zero or one running managed process.
///
/// None of the methods lock anything: the supervisor must be driven from a
/// single task, one call at a time (the coordinator guarantees this).
#[derive(Debug)]
pub struct Supervisor {
    build: Option<String>,
    command: Vec<String>,
    kill_timeout: Option<Duration>,
    process: Option<ManagedProcess>,
    starts: u64,
}

impl Supervisor {
    pub fn new(config: &Config) -> Self {
        Self {
            build: config.build.clone(),
            command: config.command.clone(),
            kill_timeout: config.kill_timeout,
            process: None,
            starts: 0,
        }
    }

    /// PID of the owned run process, if any.
    pub fn running_pid(&self) -> Option<u32> {
        self.process.as_ref().and_then(|p| p.pid)
    }

    pub fn is_running(&self) -> bool {
        self.process.is_some()
    }

    /// Number of run processes successfully started so far.
    pub fn starts(&self) -> u64 {
        self.starts
    }

    /// Run the build command to completion.
    ///
    /// Succeeds immediately when no build command is configured.
    pub async fn run_build(&self) -> Result<()> {
        let Some(cmd) = &self.build else {
            return Ok(());
        };

        info!(cmd = %cmd, "running build");
        let status = build_command(cmd)
            .status()
            .await
            .map_err(WatchrunError::BuildSpawn)?;

        if !status.success() {
            return Err(WatchrunError::BuildFailed {
                code: status.code(),
            });
        }

        info!("build finished");
        Ok(())
    }

    /// Spawn the run command and take ownership of it.
    ///
    /// Fails with [`WatchrunError::AlreadyRunning`] (leaving the current
    /// process alone) if a process is already owned. A spawn failure leaves
    /// the supervisor without a process.
    pub fn start_run(&mut self) -> Result<()> {
        if let Some(existing) = &self.process {
            return Err(WatchrunError::AlreadyRunning { pid: existing.pid });
        }

        let child = run_command(&self.command)?
            .spawn()
            .map_err(|source| WatchrunError::RunSpawn {
                program: self.command[0].clone(),
                source,
            })?;

        let pid = child.id();
        info!(pid = ?pid, command = ?self.command, "run command started");
        self.process = Some(ManagedProcess { child, pid });
        self.starts += 1;
        Ok(())
    }

    /// Terminate and reap the owned process. No-op when nothing is owned.
    ///
    /// An unusual exit status is logged, never returned.
    pub async fn stop_run(&mut self) {
        let Some(mut process) = self.process.take() else {
            return;
        };

        info!(pid = ?process.pid, "stopping run command");
        match terminate(&mut process.child, self.kill_timeout).await {
            Ok(status) => match status.code() {
                Some(0) => info!(pid = ?process.pid, "run command exited"),
                Some(code) => warn!(
                    pid = ?process.pid,
                    exit_code = code,
                    "run command exited with non-zero status"
                ),
                None => info!(pid = ?process.pid, "run command terminated by signal"),
            },
            Err(err) => error!(pid = ?process.pid, error = %err, "failed to stop run command"),
        }
    }

    /// Build, then start the run command if the build succeeded.
    ///
    /// This is the startup half of [`Supervisor::restart`]; failures are
    /// logged and leave the supervisor with no process.
    pub async fn start(&mut self) {
        if let Err(err) = self.run_build().await {
            error!(error = %err, "build failed; run command not started");
            return;
        }

        if let Err(err) = self.start_run() {
            error!(error = %err, "failed to start run command");
        }
    }

    /// Stop the current process, rebuild, and start a fresh one.
    ///
    /// Always ends with either no process or exactly one new process.
    pub async fn restart(&mut self) {
        self.stop_run().await;
        self.start().await;
    }
}
