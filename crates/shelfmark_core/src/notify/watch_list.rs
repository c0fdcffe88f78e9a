//! Reference observer collecting books that are on loan.

use crate::model::book::Book;
use crate::notify::registry::AvailabilityObserver;
use std::sync::{Mutex, PoisonError};

/// Accumulates books reported as on loan; drops them again when returned.
#[derive(Debug, Default)]
pub struct OnLoanWatchList {
    books: Mutex<Vec<Book>>,
}

impl OnLoanWatchList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collected books in notification order.
    pub fn books(&self) -> Vec<Book> {
        self.books
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.books().into_iter().map(|book| book.title).collect()
    }

    pub fn len(&self) -> usize {
        self.books
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AvailabilityObserver for OnLoanWatchList {
    fn update(&self, book: &Book) {
        let mut books = self.books.lock().unwrap_or_else(PoisonError::into_inner);
        if book.is_on_loan() {
            books.push(book.clone());
        } else {
            books.retain(|held| held.title != book.title);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OnLoanWatchList;
    use crate::model::book::{Book, LoanState};
    use crate::notify::registry::AvailabilityObserver;

    #[test]
    fn collects_loans_and_forgets_returns() {
        let watch_list = OnLoanWatchList::new();
        let mut book = Book {
            id: 4,
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            category: "SciFi".to_string(),
            loan_state: LoanState::Available,
            borrower: None,
        };

        watch_list.update(&book);
        assert!(watch_list.is_empty());

        book.lend_to(9);
        watch_list.update(&book);
        assert_eq!(watch_list.titles(), vec!["Dune".to_string()]);
        assert_eq!(watch_list.books()[0].borrower, Some(9));

        book.mark_returned();
        watch_list.update(&book);
        assert!(watch_list.is_empty());
    }
}
