//! Session facade over the catalog store.
//!
//! # Responsibility
//! - Own the single SQLite connection and the availability registry of a session.
//! - Expose the operations offered to the menu front end.
//!
//! # Invariants
//! - One `Library` per session; it is passed by reference, never global.
//! - Observer subscriptions end when the `Library` is dropped.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::book::{Book, NewBook};
use crate::model::patron::{NewPatron, Patron};
use crate::notify::registry::{AvailabilityObserver, AvailabilityRegistry, ObserverId};
use crate::repo::book_repo::SqliteBookRepository;
use crate::repo::patron_repo::SqlitePatronRepository;
use crate::repo::RepoResult;
use crate::search::strategy::{SearchQuery, SearchResult, SearchStrategy};
use crate::service::catalog_service::{CatalogResult, CatalogService};
use crate::service::loan_service::{LoanResult, LoanService};
use crate::service::patron_service::{PatronResult, PatronService};
use log::info;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Library catalog session.
pub struct Library {
    conn: Connection,
    registry: AvailabilityRegistry,
}

impl Library {
    /// Opens the catalog file at `path`, creating and migrating it as needed.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        info!("event=session_open module=library status=ok");
        Self {
            conn,
            registry: AvailabilityRegistry::new(),
        }
    }

    /// Underlying connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn search(&self, strategy: SearchStrategy, text: &str) -> SearchResult<Vec<Book>> {
        self.search_with(&SearchQuery::new(strategy, text))
    }

    pub fn search_with(&self, query: &SearchQuery) -> SearchResult<Vec<Book>> {
        Ok(self.catalog()?.search(query)?)
    }

    pub fn add_book(&self, book: &NewBook) -> CatalogResult<Book> {
        self.catalog()?.add_book(book)
    }

    pub fn remove_book(&self, title: &str) -> CatalogResult<()> {
        self.catalog()?.remove_book(title)
    }

    pub fn find_book(&self, title: &str) -> CatalogResult<Option<Book>> {
        self.catalog()?.find_book(title)
    }

    pub fn list_books(&self) -> CatalogResult<Vec<Book>> {
        self.catalog()?.list_books()
    }

    pub fn loan(&self, title: &str, name: &str, surname: &str) -> LoanResult<Book> {
        self.loans()?.loan(title, name, surname)
    }

    pub fn return_book(&self, title: &str) -> LoanResult<Book> {
        self.loans()?.return_book(title)
    }

    pub fn on_loan_titles(&self) -> LoanResult<Vec<String>> {
        self.loans()?.on_loan_titles()
    }

    pub fn add_patron(&self, patron: &NewPatron) -> PatronResult<Patron> {
        self.patrons()?.add_patron(patron)
    }

    pub fn remove_patron(&self, name: &str) -> PatronResult<usize> {
        self.patrons()?.remove_patron(name)
    }

    pub fn find_patron(&self, name: &str, surname: &str) -> PatronResult<Option<Patron>> {
        self.patrons()?.find_patron(name, surname)
    }

    /// Bans the patron as of now.
    pub fn ban(&self, name: &str, surname: &str) -> PatronResult<Patron> {
        self.ban_at(name, surname, now_epoch_ms())
    }

    pub fn ban_at(&self, name: &str, surname: &str, at_epoch_ms: i64) -> PatronResult<Patron> {
        self.patrons()?.ban(name, surname, at_epoch_ms)
    }

    pub fn unban(&self, name: &str, surname: &str) -> PatronResult<Patron> {
        self.patrons()?.unban(name, surname)
    }

    pub fn list_patrons(&self, banned: bool) -> PatronResult<Vec<Patron>> {
        self.patrons()?.list_patrons(banned)
    }

    /// Watches loan-state changes of the book titled `title`.
    pub fn subscribe(
        &mut self,
        title: impl Into<String>,
        observer: Arc<dyn AvailabilityObserver>,
    ) -> ObserverId {
        self.registry.attach(title, observer)
    }

    /// Watches loan-state changes of every book.
    pub fn subscribe_all(&mut self, observer: Arc<dyn AvailabilityObserver>) -> ObserverId {
        self.registry.attach_global(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.registry.detach(id)
    }

    fn catalog(&self) -> RepoResult<CatalogService<SqliteBookRepository<'_>>> {
        Ok(CatalogService::new(SqliteBookRepository::try_new(&self.conn)?))
    }

    fn loans(
        &self,
    ) -> RepoResult<LoanService<'_, SqliteBookRepository<'_>, SqlitePatronRepository<'_>>> {
        Ok(LoanService::new(
            SqliteBookRepository::try_new(&self.conn)?,
            SqlitePatronRepository::try_new(&self.conn)?,
            &self.registry,
        ))
    }

    fn patrons(
        &self,
    ) -> RepoResult<PatronService<SqlitePatronRepository<'_>, SqliteBookRepository<'_>>> {
        Ok(PatronService::new(
            SqlitePatronRepository::try_new(&self.conn)?,
            SqliteBookRepository::try_new(&self.conn)?,
        ))
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        self.registry.clear();
        info!("event=session_close module=library status=ok");
    }
}

/// Current time as Unix epoch milliseconds; `0` if the clock is before 1970.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
