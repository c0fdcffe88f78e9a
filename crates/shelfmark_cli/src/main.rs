//! Shelfmark terminal front end.
//!
//! # Responsibility
//! - Load configuration, start logging and open the catalog once per process.
//! - Hand the session to the interactive menu loop.
//!
//! # Invariants
//! - Failing to open the catalog is the only fatal startup error.

mod config;
mod menu;
mod render;
mod session;

use clap::Parser;
use config::Config;
use log::{error, info};
use session::{NoticeBoard, Session};
use shelfmark_core::{core_version, init_logging, Library};
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let config = Config::parse();

    let cwd = std::env::current_dir().unwrap_or_default();
    if let Some(log_dir) = config.resolved_log_dir(&cwd) {
        if let Err(err) = init_logging(config.log_level(), &log_dir.to_string_lossy()) {
            eprintln!("warning: file logging disabled: {err}");
        }
    }
    info!("event=cli_start module=cli status=ok version={}", core_version());

    let mut library = match Library::open(&config.db) {
        Ok(library) => library,
        Err(err) => {
            error!("event=cli_start module=cli status=error error_code=catalog_open_failed error={err}");
            eprintln!(
                "error: cannot open catalog `{}`: {err}",
                config.db.display()
            );
            return ExitCode::FAILURE;
        }
    };

    let notices = Arc::new(NoticeBoard::default());
    library.subscribe_all(notices.clone());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let result = Session::new(&library, notices, stdin.lock(), stdout.lock()).run();

    match result {
        Ok(()) => {
            info!("event=cli_exit module=cli status=ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
