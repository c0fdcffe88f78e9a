//! Command-line and environment configuration.

use clap::Parser;
use shelfmark_core::default_log_level;
use std::path::{Path, PathBuf};

const DEFAULT_LOG_DIR: &str = "logs";

/// Runtime settings for one catalog session.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "shelfmark",
    version,
    about = "Terminal library catalog: books, patrons and loans"
)]
pub struct Config {
    /// Catalog database file; created on first run.
    #[arg(long, env = "SHELFMARK_DB", default_value = "shelfmark.db")]
    pub db: PathBuf,

    /// Directory for rolling log files. Relative paths resolve against the working directory.
    #[arg(long, env = "SHELFMARK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error. Defaults to debug in debug builds, info otherwise.
    #[arg(long, env = "SHELFMARK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Disable file logging.
    #[arg(long)]
    pub no_log: bool,
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(default_log_level())
    }

    /// Absolute log directory, or `None` when logging is disabled.
    pub fn resolved_log_dir(&self, cwd: &Path) -> Option<PathBuf> {
        if self.no_log {
            return None;
        }
        let dir = self
            .log_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));
        if dir.is_absolute() {
            Some(dir)
        } else {
            Some(cwd.join(dir))
        }
    }
}
