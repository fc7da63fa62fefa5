//! Configuration management for the vellum application.
//!
//! Configuration comes from environment variables with sensible defaults;
//! the CLI can override the journal path per invocation.
//!
//! # Environment Variables
//!
//! - `VELLUM_JOURNAL`: path of the journal file (defaults to `~/.vellum/journal`)
//! - `VELLUM_PASSPHRASE`: passphrase for non-interactive use (see `crypto::passphrase`)
//! - `HOME`: used for expanding the default journal path

use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::constants::{DEFAULT_JOURNAL_RELPATH, ENV_VAR_HOME, ENV_VAR_JOURNAL_PATH};
use crate::errors::{AppError, AppResult};

/// Configuration for the vellum application.
pub struct Config {
    /// Path of the journal file.
    ///
    /// Resolution order: the `--file` CLI flag, then `VELLUM_JOURNAL`, then
    /// `~/.vellum/journal`.
    pub journal_path: PathBuf,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("journal_path", &"[REDACTED_PATH]")
            .finish()
    }
}

impl Config {
    /// Loads configuration from the environment.
    ///
    /// `override_path` (from the CLI) takes precedence over everything else.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if no path was given, `VELLUM_JOURNAL` is
    /// unset, and `HOME` is unavailable for the default.
    pub fn load(override_path: Option<PathBuf>) -> AppResult<Self> {
        let journal_path = if let Some(path) = override_path {
            path
        } else if let Some(path) = env::var_os(ENV_VAR_JOURNAL_PATH) {
            PathBuf::from(path)
        } else {
            let home = env::var_os(ENV_VAR_HOME).ok_or_else(|| {
                AppError::Config(format!(
                    "Cannot locate the default journal path: neither {} nor HOME is set",
                    ENV_VAR_JOURNAL_PATH
                ))
            })?;
            PathBuf::from(home).join(DEFAULT_JOURNAL_RELPATH)
        };

        let config = Config { journal_path };
        config.validate()?;
        Ok(config)
    }

    /// Validates the loaded configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.journal_path.as_os_str().is_empty() {
            return Err(AppError::Config(
                "Journal path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_path_wins() {
        let config = Config::load(Some(PathBuf::from("/tmp/elsewhere"))).unwrap();
        assert_eq!(config.journal_path, PathBuf::from("/tmp/elsewhere"));
    }

    #[test]
    fn test_empty_path_rejected() {
        let config = Config {
            journal_path: PathBuf::new(),
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_debug_redacts_path() {
        let config = Config {
            journal_path: PathBuf::from("/home/someone/.vellum/journal"),
        };
        let debugged = format!("{:?}", config);
        assert!(!debugged.contains("someone"));
        assert!(debugged.contains("REDACTED"));
    }
}
