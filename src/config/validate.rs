// src/config/validate.rs

use std::time::Duration;

use crate::config::Config;
use crate::errors::{Result, WatchrunError};

/// Check the merged configuration before anything is spawned.
///
/// This checks:
/// - the run command has a non-empty program
/// - the debounce window and kill timeout are non-zero
/// - no exclude is empty (an empty exclude would prune the whole root)
pub fn validate_config(cfg: &Config) -> Result<()> {
    match cfg.command.first() {
        Some(program) if !program.trim().is_empty() => {}
        _ => return Err(WatchrunError::EmptyCommand),
    }

    if cfg.debounce == Duration::ZERO {
        return Err(WatchrunError::Config(
            "debounce window must be greater than 0ms".to_string(),
        ));
    }

    if cfg.kill_timeout == Some(Duration::ZERO) {
        return Err(WatchrunError::Config(
            "kill timeout must be greater than 0ms".to_string(),
        ));
    }

    if let Some(bad) = cfg
        .watch
        .excludes
        .iter()
        .find(|e| matches!(e.trim_end_matches('/'), "" | "."))
    {
        return Err(WatchrunError::Config(format!(
            "exclude {bad:?} would exclude the whole watch root"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{WatchRoot, DEFAULT_DEBOUNCE};

    fn config() -> Config {
        Config {
            watch: WatchRoot::new("/srv/app", vec![]),
            build: None,
            command: vec!["./app".into()],
            debounce: DEFAULT_DEBOUNCE,
            kill_timeout: None,
        }
    }

    #[test]
    fn valid_config_passes() {
        validate_config(&config()).unwrap();
    }

    #[test]
    fn blank_program_is_rejected() {
        let cfg = Config {
            command: vec![" ".into(), "arg".into()],
            ..config()
        };
        assert!(matches!(
            validate_config(&cfg),
            Err(WatchrunError::EmptyCommand)
        ));
    }

    #[test]
    fn zero_durations_are_rejected() {
        let cfg = Config {
            debounce: Duration::ZERO,
            ..config()
        };
        assert!(matches!(validate_config(&cfg), Err(WatchrunError::Config(_))));

        let cfg = Config {
            kill_timeout: Some(Duration::ZERO),
            ..config()
        };
        assert!(matches!(validate_config(&cfg), Err(WatchrunError::Config(_))));
    }

    #[test]
    fn root_exclude_is_rejected() {
        let cfg = Config {
            watch: WatchRoot::new("/srv/app", vec!["./".into()]),
            ..config()
        };
        let err = validate_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("whole watch root"));
    }
}
