// src/exec/command.rs

use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::time;
use tracing::warn;

use crate::errors::{Result, WatchrunError};

/// Shell command for the build step; output goes straight to our terminal.
pub fn build_command(cmd: &str) -> Command {
    // Build a shell command appropriate for the platform.
    let mut c = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };

    c.stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    c
}

/// Direct (non-shell) command for the run step. `argv[0]` is the program.
pub fn run_command(argv: &[String]) -> Result<Command> {
    let (program, args) = argv.split_first().ok_or(WatchrunError::EmptyCommand)?;

    let mut c = Command::new(program);
    c.args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);
    Ok(c)
}

/// Ask `child` to exit and reap it.
///
/// Sends SIGTERM on Unix (a hard kill elsewhere). With `kill_timeout` set, a
/// child still alive after that long is killed outright; without it we wait
/// as long as the child takes.
pub async fn terminate(child: &mut Child, kill_timeout: Option<Duration>) -> io::Result<ExitStatus> {
    send_termination_signal(child)?;

    let Some(limit) = kill_timeout else {
        return child.wait().await;
    };

    match time::timeout(limit, child.wait()).await {
        Ok(status) => status,
        Err(_) => {
            warn!(
                pid = ?child.id(),
                timeout = ?limit,
                "process ignored termination signal; killing"
            );
            child.kill().await?;
            child.wait().await
        }
    }
}

#[cfg(unix)]
fn send_termination_signal(child: &mut Child) -> io::Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    // `None` once tokio has already reaped the child.
    let Some(pid) = child.id() else {
        return Ok(());
    };

    match kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(errno) => Err(io::Error::from(errno)),
    }
}

#[cfg(not(unix))]
fn send_termination_signal(child: &mut Child) -> io::Result<()> {
    child.start_kill()
}
