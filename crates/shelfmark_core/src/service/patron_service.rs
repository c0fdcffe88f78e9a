//! Patron use-cases and the ban gate.
//!
//! # Invariants
//! - Ban and unban are unconditional: repeating either leaves the state as is.
//! - A patron who still borrows a book cannot be removed.

use crate::model::patron::{BanState, NewPatron, Patron, PatronValidationError};
use crate::repo::book_repo::BookRepository;
use crate::repo::patron_repo::PatronRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PatronResult<T> = Result<T, PatronServiceError>;

#[derive(Debug)]
pub enum PatronServiceError {
    /// No patron matches the given name (and surname, when one is used).
    PatronNotFound(String),
    PatronHasActiveLoans { name: String, loans: u32 },
    InvalidPatron(PatronValidationError),
    Repo(RepoError),
}

impl Display for PatronServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PatronNotFound(who) => write!(f, "patron not found: {who}"),
            Self::PatronHasActiveLoans { name, loans } => {
                write!(f, "patron `{name}` still has {loans} book(s) on loan")
            }
            Self::InvalidPatron(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PatronServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPatron(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::PatronNotFound(_) | Self::PatronHasActiveLoans { .. } => None,
        }
    }
}

impl From<RepoError> for PatronServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::InvalidPatron(err) => Self::InvalidPatron(err),
            other => Self::Repo(other),
        }
    }
}

/// Patron service; reads books only to guard removals.
pub struct PatronService<P: PatronRepository, B: BookRepository> {
    patrons: P,
    books: B,
}

impl<P: PatronRepository, B: BookRepository> PatronService<P, B> {
    pub fn new(patrons: P, books: B) -> Self {
        Self { patrons, books }
    }

    /// Registers an active patron and returns the stored record.
    pub fn add_patron(&self, patron: &NewPatron) -> PatronResult<Patron> {
        let id = self.patrons.create_patron(patron)?;
        info!("event=patron_add module=patron status=ok patron_id={id}");
        Ok(Patron {
            id,
            name: patron.name.clone(),
            surname: patron.surname.clone(),
            ban_state: BanState::Active,
            ban_date: None,
        })
    }

    /// Removes every patron named `name`; returns how many were removed.
    ///
    /// # Errors
    /// - `PatronNotFound` when nobody has this name.
    /// - `PatronHasActiveLoans` when any of them still borrows a book;
    ///   nobody is removed then.
    pub fn remove_patron(&self, name: &str) -> PatronResult<usize> {
        let name = name.trim();
        let matches = self.patrons.find_patrons_by_name(name)?;
        if matches.is_empty() {
            return Err(PatronServiceError::PatronNotFound(name.to_string()));
        }

        let mut loans = 0;
        for patron in &matches {
            loans += self.books.count_loans_for(patron.id)?;
        }
        if loans > 0 {
            warn!("event=patron_remove module=patron status=rejected reason=active_loans loans={loans}");
            return Err(PatronServiceError::PatronHasActiveLoans {
                name: name.to_string(),
                loans,
            });
        }

        let removed = self.patrons.delete_patrons_by_name(name)?;
        info!("event=patron_remove module=patron status=ok removed={removed}");
        Ok(removed)
    }

    /// Bans the first patron matching `name surname` as of `at_epoch_ms`.
    pub fn ban(&self, name: &str, surname: &str, at_epoch_ms: i64) -> PatronResult<Patron> {
        let mut patron = self.require_patron(name, surname)?;
        patron.ban(at_epoch_ms);
        self.patrons.update_ban(&patron)?;
        info!("event=patron_ban module=patron status=ok patron_id={}", patron.id);
        Ok(patron)
    }

    /// Lifts the ban of the first patron matching `name surname`.
    pub fn unban(&self, name: &str, surname: &str) -> PatronResult<Patron> {
        let mut patron = self.require_patron(name, surname)?;
        patron.unban();
        self.patrons.update_ban(&patron)?;
        info!("event=patron_unban module=patron status=ok patron_id={}", patron.id);
        Ok(patron)
    }

    /// Banned patrons when `banned`, otherwise active ones.
    pub fn list_patrons(&self, banned: bool) -> PatronResult<Vec<Patron>> {
        let state = if banned {
            BanState::Banned
        } else {
            BanState::Active
        };
        Ok(self.patrons.list_patrons(Some(state))?)
    }

    pub fn find_patron(&self, name: &str, surname: &str) -> PatronResult<Option<Patron>> {
        Ok(self.patrons.find_patron(name.trim(), surname.trim())?)
    }

    fn require_patron(&self, name: &str, surname: &str) -> PatronResult<Patron> {
        self.find_patron(name, surname)?.ok_or_else(|| {
            PatronServiceError::PatronNotFound(format!("{} {}", name.trim(), surname.trim()))
        })
    }
}
