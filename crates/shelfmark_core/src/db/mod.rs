//! Catalog store: one SQLite file holding books and patrons.
//!
//! # Responsibility
//! - Hand out a configured, migrated connection for a library session.
//! - Own the schema, including the rules the engine relies on.
//!
//! # Invariants
//! - A book row is on loan exactly when it names a borrower (`CHECK`).
//! - A patron row is banned exactly when it carries a ban date (`CHECK`).
//! - Titles are unique; borrowers reference existing patrons (`foreign_keys=ON`).
//! - Connections carry the `casefold` SQL function used by search.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod functions;
pub mod migrations;
mod open;

pub use functions::{register_catalog_functions, CASEFOLD_FN};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open or migrate the catalog store.
///
/// Fatal for the menu front end.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "catalog schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
