//! Repository contracts and SQLite implementations for the catalog store.
//!
//! # Responsibility
//! - Define use-case oriented data access for books and patrons.
//! - Keep SQL details out of the loan engine and services.
//!
//! # Invariants
//! - Write paths validate the model before SQL mutations.
//! - Read paths reject rows that break a model invariant instead of masking them.
//! - Missing targets surface as `RepoError::NotFound`, not as silent no-ops.

use crate::db::DbError;
use crate::model::book::BookValidationError;
use crate::model::patron::PatronValidationError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod book_repo;
pub mod patron_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error shared by book and patron repositories.
#[derive(Debug)]
pub enum RepoError {
    InvalidBook(BookValidationError),
    InvalidPatron(PatronValidationError),
    Db(DbError),
    NotFound { entity: &'static str, key: String },
    /// A `UNIQUE` constraint rejected the write; carries the offending key.
    UniqueViolation { entity: &'static str, key: String },
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBook(err) => write!(f, "{err}"),
            Self::InvalidPatron(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::UniqueViolation { entity, key } => write!(f, "{entity} already exists: {key}"),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "catalog table `{table}` is missing; migrations not applied?")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidBook(err) => Some(err),
            Self::InvalidPatron(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. }
            | Self::UniqueViolation { .. }
            | Self::InvalidData(_)
            | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<BookValidationError> for RepoError {
    fn from(value: BookValidationError) -> Self {
        Self::InvalidBook(value)
    }
}

impl From<PatronValidationError> for RepoError {
    fn from(value: PatronValidationError) -> Self {
        Self::InvalidPatron(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn ensure_tables(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    for &table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

pub(crate) fn flag_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_flag(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}
