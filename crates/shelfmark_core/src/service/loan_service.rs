//! Loan engine: lending and returning books.
//!
//! # Responsibility
//! - Gate loans on patron existence and ban state.
//! - Apply loan/return transitions and notify availability observers.
//!
//! # Invariants
//! - Checks run in order: patron lookup, ban gate, book lookup, book state.
//! - No record is written unless every check passed.
//! - Observers are notified only after the transition is stored.

use crate::model::book::Book;
use crate::model::patron::PatronId;
use crate::notify::registry::AvailabilityRegistry;
use crate::repo::book_repo::BookRepository;
use crate::repo::patron_repo::PatronRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LoanResult<T> = Result<T, LoanError>;

#[derive(Debug)]
pub enum LoanError {
    PatronNotFound { name: String, surname: String },
    PatronBanned { patron_id: PatronId },
    BookNotFound(String),
    /// Single copy per title: a book on loan cannot be lent again.
    BookAlreadyOnLoan(String),
    /// Covers titles absent from the catalog as well.
    BookNotOnLoan(String),
    Repo(RepoError),
}

impl Display for LoanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PatronNotFound { name, surname } => {
                write!(f, "patron not found: {name} {surname}")
            }
            Self::PatronBanned { patron_id } => write!(f, "patron {patron_id} is banned"),
            Self::BookNotFound(title) => write!(f, "book not found: `{title}`"),
            Self::BookAlreadyOnLoan(title) => write!(f, "book is already on loan: `{title}`"),
            Self::BookNotOnLoan(title) => write!(f, "book is not on loan: `{title}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LoanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for LoanError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Loan engine over book/patron repositories and the session's notifier.
pub struct LoanService<'reg, B: BookRepository, P: PatronRepository> {
    books: B,
    patrons: P,
    registry: &'reg AvailabilityRegistry,
}

impl<'reg, B: BookRepository, P: PatronRepository> LoanService<'reg, B, P> {
    pub fn new(books: B, patrons: P, registry: &'reg AvailabilityRegistry) -> Self {
        Self {
            books,
            patrons,
            registry,
        }
    }

    /// Lends the book titled `title` to the first patron named `name surname`.
    ///
    /// Returns the updated book.
    ///
    /// # Errors
    /// - `PatronNotFound`, `PatronBanned`: nothing is touched.
    /// - `BookNotFound`: no book has exactly this title.
    /// - `BookAlreadyOnLoan`: the single copy is already out.
    pub fn loan(&self, title: &str, name: &str, surname: &str) -> LoanResult<Book> {
        let Some(patron) = self.patrons.find_patron(name.trim(), surname.trim())? else {
            warn!("event=book_loan module=loan status=rejected reason=patron_not_found");
            return Err(LoanError::PatronNotFound {
                name: name.trim().to_string(),
                surname: surname.trim().to_string(),
            });
        };

        if patron.is_banned() {
            warn!(
                "event=book_loan module=loan status=rejected reason=patron_banned patron_id={}",
                patron.id
            );
            return Err(LoanError::PatronBanned {
                patron_id: patron.id,
            });
        }

        let title = title.trim();
        let Some(mut book) = self.books.find_book_by_title(title)? else {
            warn!("event=book_loan module=loan status=rejected reason=book_not_found");
            return Err(LoanError::BookNotFound(title.to_string()));
        };

        if book.is_on_loan() {
            warn!(
                "event=book_loan module=loan status=rejected reason=already_on_loan book_id={}",
                book.id
            );
            return Err(LoanError::BookAlreadyOnLoan(book.title));
        }

        book.lend_to(patron.id);
        self.books.update_loan(&book)?;
        info!(
            "event=book_loan module=loan status=ok book_id={} patron_id={}",
            book.id, patron.id
        );

        self.registry.notify(&book);
        Ok(book)
    }

    /// Returns the book titled `title` to the shelf.
    ///
    /// # Errors
    /// - `BookNotOnLoan` when the title is not among the books on loan,
    ///   including titles that are not catalogued at all.
    pub fn return_book(&self, title: &str) -> LoanResult<Book> {
        let title = title.trim();
        let on_loan = self.books.list_on_loan_titles()?;
        if !on_loan.iter().any(|held| held == title) {
            warn!("event=book_return module=loan status=rejected reason=not_on_loan");
            return Err(LoanError::BookNotOnLoan(title.to_string()));
        }

        let Some(mut book) = self.books.find_book_by_title(title)? else {
            return Err(LoanError::BookNotOnLoan(title.to_string()));
        };

        book.mark_returned();
        self.books.update_loan(&book)?;
        info!("event=book_return module=loan status=ok book_id={}", book.id);

        self.registry.notify(&book);
        Ok(book)
    }

    /// Titles currently on loan, in catalog order.
    pub fn on_loan_titles(&self) -> LoanResult<Vec<String>> {
        Ok(self.books.list_on_loan_titles()?)
    }
}
