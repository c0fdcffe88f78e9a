//! Menu choices and their parsing.

use shelfmark_core::SearchStrategy;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const MAIN_MENU: &str = "\
Welcome to the library!
 1. Search for a book
 2. Add a book
 3. Remove a book
 4. Loan a book
 5. Return a book
 6. Add a patron
 7. Remove a patron
 8. Ban a patron
 9. Unban a patron
10. List patrons
11. List books
12. Quit";

pub const SEARCH_MENU: &str = "\
 1. Search by title
 2. Search by author
 3. Search by category";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    InvalidMenuChoice(String),
}

impl Display for MenuError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMenuChoice(value) => write!(f, "invalid choice `{value}`"),
        }
    }
}

impl Error for MenuError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Search,
    AddBook,
    RemoveBook,
    LoanBook,
    ReturnBook,
    AddPatron,
    RemovePatron,
    BanPatron,
    UnbanPatron,
    ListPatrons,
    ListBooks,
    Quit,
}

impl FromStr for MenuChoice {
    type Err = MenuError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let choice = match value.trim() {
            "1" => Self::Search,
            "2" => Self::AddBook,
            "3" => Self::RemoveBook,
            "4" => Self::LoanBook,
            "5" => Self::ReturnBook,
            "6" => Self::AddPatron,
            "7" => Self::RemovePatron,
            "8" => Self::BanPatron,
            "9" => Self::UnbanPatron,
            "10" => Self::ListPatrons,
            "11" => Self::ListBooks,
            "12" => Self::Quit,
            other => return Err(MenuError::InvalidMenuChoice(other.to_string())),
        };
        Ok(choice)
    }
}

/// Maps the search sub-menu number to a strategy.
pub fn parse_search_choice(value: &str) -> Result<SearchStrategy, MenuError> {
    match value.trim() {
        "1" => Ok(SearchStrategy::ByTitle),
        "2" => Ok(SearchStrategy::ByAuthor),
        "3" => Ok(SearchStrategy::ByCategory),
        other => Err(MenuError::InvalidMenuChoice(other.to_string())),
    }
}
