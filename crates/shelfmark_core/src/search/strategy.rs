//! Pluggable book search strategies.
//!
//! # Invariants
//! - Each strategy matches exactly one book field.
//! - Matching is a case-insensitive substring test; blank text matches every book.
//! - Searching never mutates the catalog.

use crate::model::book::Book;
use crate::repo::book_repo::{BookField, BookRepository};
use crate::repo::RepoError;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub type SearchResult<T> = Result<T, SearchError>;

#[derive(Debug)]
pub enum SearchError {
    /// Strategy name is not one of `title`, `author`, `category`.
    UnknownStrategy(String),
    Repo(RepoError),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownStrategy(value) => write!(
                f,
                "unknown search strategy `{value}`; expected title|author|category"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownStrategy(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for SearchError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Field a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    ByTitle,
    ByAuthor,
    ByCategory,
}

impl SearchStrategy {
    pub const ALL: [Self; 3] = [Self::ByTitle, Self::ByAuthor, Self::ByCategory];

    /// Returns every book whose field contains `text`, ordered by id.
    pub fn search(
        self,
        repo: &impl BookRepository,
        text: &str,
        limit: Option<u32>,
    ) -> SearchResult<Vec<Book>> {
        let books = repo.search_books(self.field(), text, limit)?;
        debug!(
            "event=book_search module=search status=ok strategy={} hits={}",
            self.as_str(),
            books.len()
        );
        Ok(books)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ByTitle => "title",
            Self::ByAuthor => "author",
            Self::ByCategory => "category",
        }
    }

    fn field(self) -> BookField {
        match self {
            Self::ByTitle => BookField::Title,
            Self::ByAuthor => BookField::Author,
            Self::ByCategory => BookField::Category,
        }
    }
}

impl FromStr for SearchStrategy {
    type Err = SearchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::ByTitle),
            "author" => Ok(Self::ByAuthor),
            "category" => Ok(Self::ByCategory),
            other => Err(SearchError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Search request: strategy, query text and optional row limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub strategy: SearchStrategy,
    pub text: String,
    pub limit: Option<u32>,
}

impl SearchQuery {
    /// Creates an unlimited query.
    pub fn new(strategy: SearchStrategy, text: impl Into<String>) -> Self {
        Self {
            strategy,
            text: text.into(),
            limit: None,
        }
    }

    pub fn run(&self, repo: &impl BookRepository) -> SearchResult<Vec<Book>> {
        self.strategy.search(repo, &self.text, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::{SearchError, SearchStrategy};

    #[test]
    fn strategy_parses_known_names() {
        assert_eq!(
            " Author ".parse::<SearchStrategy>().unwrap(),
            SearchStrategy::ByAuthor
        );
        for strategy in SearchStrategy::ALL {
            assert_eq!(strategy.as_str().parse::<SearchStrategy>().unwrap(), strategy);
        }
    }

    #[test]
    fn strategy_rejects_unknown_name() {
        let err = "isbn".parse::<SearchStrategy>().unwrap_err();
        assert!(matches!(err, SearchError::UnknownStrategy(ref value) if value == "isbn"));
    }
}
