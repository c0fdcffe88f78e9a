use shelfmark_core::{
    AvailabilityObserver, Book, CatalogError, Library, LoanError, LoanState, NewBook, NewPatron,
    OnLoanWatchList,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingObserver {
    seen: Mutex<Vec<(String, LoanState)>>,
}

impl AvailabilityObserver for RecordingObserver {
    fn update(&self, book: &Book) {
        self.seen
            .lock()
            .unwrap()
            .push((book.title.clone(), book.loan_state));
    }
}

fn library_with_dune_and_paul() -> (Library, i64) {
    let library = Library::open_in_memory().unwrap();
    library
        .add_book(&NewBook::new("Dune", "Herbert", "SciFi"))
        .unwrap();
    let paul = library
        .add_patron(&NewPatron::new("Paul", "Atreides"))
        .unwrap();
    (library, paul.id)
}

fn assert_invariants(library: &Library) {
    for book in library.list_books().unwrap() {
        assert_eq!(book.borrower.is_some(), book.loan_state == LoanState::OnLoan);
    }
    for banned in [true, false] {
        for patron in library.list_patrons(banned).unwrap() {
            assert_eq!(patron.ban_date.is_some(), patron.is_banned());
        }
    }
}

#[test]
fn loan_to_active_patron_marks_book_on_loan() {
    let (library, paul_id) = library_with_dune_and_paul();

    let book = library.loan("Dune", "Paul", "Atreides").unwrap();
    assert_eq!(book.loan_state, LoanState::OnLoan);
    assert_eq!(book.borrower, Some(paul_id));

    let stored = library.find_book("Dune").unwrap().unwrap();
    assert_eq!(stored, book);
    assert_eq!(library.on_loan_titles().unwrap(), vec!["Dune".to_string()]);
    assert_invariants(&library);
}

#[test]
fn loan_to_banned_patron_is_rejected_and_book_unchanged() {
    let (library, paul_id) = library_with_dune_and_paul();
    library.ban_at("Paul", "Atreides", 1_700_000_000_000).unwrap();
    let before = library.find_book("Dune").unwrap().unwrap();

    let err = library.loan("Dune", "Paul", "Atreides").unwrap_err();
    assert!(matches!(err, LoanError::PatronBanned { patron_id } if patron_id == paul_id));

    assert_eq!(library.find_book("Dune").unwrap().unwrap(), before);
    assert_invariants(&library);
}

#[test]
fn loan_to_unknown_patron_mutates_nothing() {
    let (library, _) = library_with_dune_and_paul();
    let books_before = library.list_books().unwrap();
    let patrons_before = library.list_patrons(false).unwrap();

    let err = library.loan("Dune", "Leto", "Atreides").unwrap_err();
    assert!(matches!(
        err,
        LoanError::PatronNotFound { ref name, ref surname } if name == "Leto" && surname == "Atreides"
    ));

    assert_eq!(library.list_books().unwrap(), books_before);
    assert_eq!(library.list_patrons(false).unwrap(), patrons_before);
}

#[test]
fn loan_of_unknown_title_reports_book_not_found() {
    let (library, _) = library_with_dune_and_paul();
    let err = library.loan("Arrakis", "Paul", "Atreides").unwrap_err();
    assert!(matches!(err, LoanError::BookNotFound(ref title) if title == "Arrakis"));
    assert!(library.on_loan_titles().unwrap().is_empty());
}

#[test]
fn loan_of_book_already_on_loan_keeps_first_borrower() {
    let (library, paul_id) = library_with_dune_and_paul();
    library
        .add_patron(&NewPatron::new("Chani", "Kynes"))
        .unwrap();
    library.loan("Dune", "Paul", "Atreides").unwrap();

    let err = library.loan("Dune", "Chani", "Kynes").unwrap_err();
    assert!(matches!(err, LoanError::BookAlreadyOnLoan(_)));
    assert_eq!(
        library.find_book("Dune").unwrap().unwrap().borrower,
        Some(paul_id)
    );
}

#[test]
fn return_book_clears_borrower_and_fires_notifier() {
    let (mut library, _) = library_with_dune_and_paul();
    let observer = Arc::new(RecordingObserver::default());
    library.subscribe("Dune", observer.clone());

    library.loan("Dune", "Paul", "Atreides").unwrap();
    let book = library.return_book("Dune").unwrap();

    assert_eq!(book.loan_state, LoanState::Available);
    assert_eq!(book.borrower, None);
    assert_eq!(library.find_book("Dune").unwrap().unwrap(), book);
    assert_eq!(
        *observer.seen.lock().unwrap(),
        vec![
            ("Dune".to_string(), LoanState::OnLoan),
            ("Dune".to_string(), LoanState::Available),
        ]
    );
    assert_invariants(&library);
}

#[test]
fn returning_book_not_on_loan_is_rejected_and_unchanged() {
    let (library, _) = library_with_dune_and_paul();
    let before = library.find_book("Dune").unwrap().unwrap();

    let err = library.return_book("Dune").unwrap_err();
    assert!(matches!(err, LoanError::BookNotOnLoan(ref title) if title == "Dune"));
    assert_eq!(library.find_book("Dune").unwrap().unwrap(), before);

    let err = library.return_book("Arrakis").unwrap_err();
    assert!(matches!(err, LoanError::BookNotOnLoan(_)));
}

#[test]
fn failed_operations_do_not_notify() {
    let (mut library, _) = library_with_dune_and_paul();
    let observer = Arc::new(RecordingObserver::default());
    library.subscribe_all(observer.clone());

    library.ban_at("Paul", "Atreides", 1).unwrap();
    assert!(library.loan("Dune", "Paul", "Atreides").is_err());
    assert!(library.return_book("Dune").is_err());

    assert!(observer.seen.lock().unwrap().is_empty());
}

#[test]
fn watch_list_tracks_books_currently_on_loan() {
    let (mut library, _) = library_with_dune_and_paul();
    library
        .add_book(&NewBook::new("Emma", "Austen", "Classic"))
        .unwrap();
    let watch_list = Arc::new(OnLoanWatchList::new());
    library.subscribe_all(watch_list.clone());

    library.loan("Dune", "Paul", "Atreides").unwrap();
    library.loan("Emma", "Paul", "Atreides").unwrap();
    assert_eq!(
        watch_list.titles(),
        vec!["Dune".to_string(), "Emma".to_string()]
    );

    library.return_book("Dune").unwrap();
    assert_eq!(watch_list.titles(), vec!["Emma".to_string()]);
}

#[test]
fn watch_list_stays_consistent_when_removing_lent_book_is_refused() {
    let (mut library, _) = library_with_dune_and_paul();
    let watch_list = Arc::new(OnLoanWatchList::new());
    library.subscribe_all(watch_list.clone());
    library.loan("Dune", "Paul", "Atreides").unwrap();

    let err = library.remove_book("Dune").unwrap_err();
    assert!(matches!(err, CatalogError::BookOnLoan(_)));
    assert_eq!(library.list_books().unwrap().len(), 1);
    assert_eq!(watch_list.titles(), library.on_loan_titles().unwrap());
}

#[test]
fn unsubscribed_observer_is_not_notified() {
    let (mut library, _) = library_with_dune_and_paul();
    let observer = Arc::new(RecordingObserver::default());
    let id = library.subscribe("Dune", observer.clone());
    assert!(library.unsubscribe(id));

    library.loan("Dune", "Paul", "Atreides").unwrap();
    assert!(observer.seen.lock().unwrap().is_empty());
}

#[test]
fn first_matching_patron_borrows() {
    let (library, paul_id) = library_with_dune_and_paul();
    library
        .add_patron(&NewPatron::new("Paul", "Atreides"))
        .unwrap();

    let book = library.loan("Dune", "Paul", "Atreides").unwrap();
    assert_eq!(book.borrower, Some(paul_id));
}
