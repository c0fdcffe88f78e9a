//! Patron record and the ban state used by the loan gate.
//!
//! # Invariants
//! - `ban_date.is_some()` iff `ban_state == BanState::Banned`.
//! - `(name, surname)` is a lookup key, not an identity: first match wins.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned surrogate key of a patron row.
pub type PatronId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BanState {
    Active,
    Banned,
}

/// Persisted patron snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patron {
    pub id: PatronId,
    pub name: String,
    pub surname: String,
    pub ban_state: BanState,
    /// Unix epoch milliseconds of the ban. Set only while banned.
    pub ban_date: Option<i64>,
}

/// Create command for a patron. Patrons always start active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatron {
    pub name: String,
    pub surname: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatronValidationError {
    BlankName,
    BlankSurname,
    BanDateWithoutBan { ban_date: i64 },
    BanWithoutDate,
}

impl Display for PatronValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "patron name cannot be blank"),
            Self::BlankSurname => write!(f, "patron surname cannot be blank"),
            Self::BanDateWithoutBan { ban_date } => {
                write!(f, "active patron cannot carry ban date {ban_date}")
            }
            Self::BanWithoutDate => write!(f, "banned patron must have a ban date"),
        }
    }
}

impl Error for PatronValidationError {}

impl NewPatron {
    pub fn new(name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            surname: surname.into().trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), PatronValidationError> {
        if self.name.is_empty() {
            return Err(PatronValidationError::BlankName);
        }
        if self.surname.is_empty() {
            return Err(PatronValidationError::BlankSurname);
        }
        Ok(())
    }
}

impl Patron {
    pub fn validate(&self) -> Result<(), PatronValidationError> {
        match (self.ban_state, self.ban_date) {
            (BanState::Active, Some(ban_date)) => {
                Err(PatronValidationError::BanDateWithoutBan { ban_date })
            }
            (BanState::Banned, None) => Err(PatronValidationError::BanWithoutDate),
            _ => Ok(()),
        }
    }

    pub fn is_banned(&self) -> bool {
        self.ban_state == BanState::Banned
    }

    /// Bans the patron as of `at_epoch_ms`. Re-banning refreshes the date.
    pub fn ban(&mut self, at_epoch_ms: i64) {
        self.ban_state = BanState::Banned;
        self.ban_date = Some(at_epoch_ms);
    }

    /// Lifts the ban. No-op for active patrons.
    pub fn unban(&mut self) {
        self.ban_state = BanState::Active;
        self.ban_date = None;
    }
}
