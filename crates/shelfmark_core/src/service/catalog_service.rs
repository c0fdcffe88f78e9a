//! Book catalog use-cases: add, remove, list, search.

use crate::model::book::{Book, BookValidationError, LoanState, NewBook};
use crate::repo::book_repo::BookRepository;
use crate::repo::RepoError;
use crate::search::strategy::{SearchQuery, SearchResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug)]
pub enum CatalogError {
    /// A book with this title is already catalogued.
    DuplicateBook(String),
    BookNotFound(String),
    /// The book is lent out; it must be returned before removal.
    BookOnLoan(String),
    InvalidBook(BookValidationError),
    Repo(RepoError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateBook(title) => write!(f, "book already exists: `{title}`"),
            Self::BookNotFound(title) => write!(f, "book not found: `{title}`"),
            Self::BookOnLoan(title) => {
                write!(f, "book is on loan and cannot be removed: `{title}`")
            }
            Self::InvalidBook(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidBook(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::DuplicateBook(_) | Self::BookNotFound(_) | Self::BookOnLoan(_) => None,
        }
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::UniqueViolation { key, .. } => Self::DuplicateBook(key),
            RepoError::NotFound { key, .. } => Self::BookNotFound(key),
            RepoError::InvalidBook(err) => Self::InvalidBook(err),
            other => Self::Repo(other),
        }
    }
}

/// Catalog service over a book repository.
pub struct CatalogService<B: BookRepository> {
    books: B,
}

impl<B: BookRepository> CatalogService<B> {
    pub fn new(books: B) -> Self {
        Self { books }
    }

    /// Adds an available book and returns the stored record.
    ///
    /// # Errors
    /// - `DuplicateBook` when the title is taken; the catalog keeps one record.
    /// - `InvalidBook` for a blank title.
    pub fn add_book(&self, book: &NewBook) -> CatalogResult<Book> {
        let id = self.books.create_book(book)?;
        info!("event=book_add module=catalog status=ok book_id={id}");
        Ok(Book {
            id,
            title: book.title.clone(),
            author: book.author.clone(),
            category: book.category.clone(),
            loan_state: LoanState::Available,
            borrower: None,
        })
    }

    /// Removes the book with exactly this title.
    ///
    /// # Errors
    /// - `BookNotFound` when no book has this title.
    /// - `BookOnLoan` while the book is lent out; the catalog is left as is.
    pub fn remove_book(&self, title: &str) -> CatalogResult<()> {
        let title = title.trim();
        let Some(book) = self.books.find_book_by_title(title)? else {
            return Err(CatalogError::BookNotFound(title.to_string()));
        };
        if book.is_on_loan() {
            warn!(
                "event=book_remove module=catalog status=rejected reason=on_loan book_id={}",
                book.id
            );
            return Err(CatalogError::BookOnLoan(book.title));
        }

        self.books.delete_book_by_title(title)?;
        info!("event=book_remove module=catalog status=ok book_id={}", book.id);
        Ok(())
    }

    pub fn find_book(&self, title: &str) -> CatalogResult<Option<Book>> {
        Ok(self.books.find_book_by_title(title.trim())?)
    }

    pub fn list_books(&self) -> CatalogResult<Vec<Book>> {
        Ok(self.books.list_books()?)
    }

    pub fn search(&self, query: &SearchQuery) -> SearchResult<Vec<Book>> {
        query.run(&self.books)
    }
}
