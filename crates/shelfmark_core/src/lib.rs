//! Core of the Shelfmark library catalog.
//! Owns the catalog store, the loan rules and the search strategies.

pub mod db;
pub mod library;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod search;
pub mod service;

pub use library::{now_epoch_ms, Library};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{Book, BookId, BookValidationError, LoanState, NewBook};
pub use model::patron::{BanState, NewPatron, Patron, PatronId, PatronValidationError};
pub use notify::registry::{AvailabilityObserver, AvailabilityRegistry, ObserverId};
pub use notify::watch_list::OnLoanWatchList;
pub use repo::book_repo::{BookField, BookRepository, SqliteBookRepository};
pub use repo::patron_repo::{PatronRepository, SqlitePatronRepository};
pub use repo::{RepoError, RepoResult};
pub use search::strategy::{SearchError, SearchQuery, SearchResult, SearchStrategy};
pub use service::catalog_service::{CatalogError, CatalogResult, CatalogService};
pub use service::loan_service::{LoanError, LoanResult, LoanService};
pub use service::patron_service::{PatronResult, PatronService, PatronServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
