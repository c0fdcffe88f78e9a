//! Book record and loan-state transitions.
//!
//! # Invariants
//! - `borrower.is_some()` iff `loan_state == LoanState::OnLoan`.
//! - `title` is never blank; uniqueness is enforced by the store.

use crate::model::patron::PatronId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned surrogate key of a book row.
pub type BookId = i64;

/// Whether a book can currently be borrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanState {
    Available,
    OnLoan,
}

/// Persisted book snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: String,
    pub loan_state: LoanState,
    /// Borrowing patron; set only while the book is on loan.
    pub borrower: Option<PatronId>,
}

/// Create command for a catalog entry. Books always start available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    BlankTitle,
    BorrowerWithoutLoan { borrower: PatronId },
    LoanWithoutBorrower,
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "book title cannot be blank"),
            Self::BorrowerWithoutLoan { borrower } => {
                write!(f, "available book cannot have borrower {borrower}")
            }
            Self::LoanWithoutBorrower => write!(f, "book on loan must have a borrower"),
        }
    }
}

impl Error for BookValidationError {}

impl NewBook {
    /// Builds a create command with surrounding whitespace trimmed.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into().trim().to_string(),
            author: author.into().trim().to_string(),
            category: category.into().trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.title.trim().is_empty() {
            return Err(BookValidationError::BlankTitle);
        }
        Ok(())
    }
}

impl Book {
    /// Checks the borrower/loan-state invariant.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.title.trim().is_empty() {
            return Err(BookValidationError::BlankTitle);
        }
        match (self.loan_state, self.borrower) {
            (LoanState::Available, Some(borrower)) => {
                Err(BookValidationError::BorrowerWithoutLoan { borrower })
            }
            (LoanState::OnLoan, None) => Err(BookValidationError::LoanWithoutBorrower),
            _ => Ok(()),
        }
    }

    pub fn is_on_loan(&self) -> bool {
        self.loan_state == LoanState::OnLoan
    }

    /// Moves the book to `OnLoan` for `borrower`.
    pub fn lend_to(&mut self, borrower: PatronId) {
        self.loan_state = LoanState::OnLoan;
        self.borrower = Some(borrower);
    }

    /// Moves the book back to `Available` and clears the borrower.
    pub fn mark_returned(&mut self) {
        self.loan_state = LoanState::Available;
        self.borrower = None;
    }
}
