use shelfmark_core::{
    BookRepository, CatalogError, Library, LoanState, NewBook, NewPatron, SearchQuery,
    SearchStrategy, SqliteBookRepository,
};

fn library_with_books() -> Library {
    let library = Library::open_in_memory().unwrap();
    library
        .add_book(&NewBook::new("Dune", "Herbert", "SciFi"))
        .unwrap();
    library
        .add_book(&NewBook::new("Emma", "Austen", "Classic"))
        .unwrap();
    library
        .add_book(&NewBook::new("Children of Dune", "Herbert", "SciFi"))
        .unwrap();
    library
}

#[test]
fn add_book_starts_available_without_borrower() {
    let library = Library::open_in_memory().unwrap();
    let book = library
        .add_book(&NewBook::new("Dune", "Herbert", "SciFi"))
        .unwrap();

    let stored = library.find_book("Dune").unwrap().unwrap();
    assert_eq!(stored, book);
    assert_eq!(stored.loan_state, LoanState::Available);
    assert_eq!(stored.borrower, None);
}

#[test]
fn adding_same_title_twice_fails_and_keeps_one_record() {
    let library = Library::open_in_memory().unwrap();
    library
        .add_book(&NewBook::new("Dune", "Herbert", "SciFi"))
        .unwrap();

    let err = library
        .add_book(&NewBook::new("Dune", "Someone Else", "Drama"))
        .unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateBook(ref title) if title == "Dune"));

    let books = library.list_books().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].author, "Herbert");
}

#[test]
fn add_book_rejects_blank_title() {
    let library = Library::open_in_memory().unwrap();
    let err = library
        .add_book(&NewBook::new("  ", "Herbert", "SciFi"))
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidBook(_)));
    assert!(library.list_books().unwrap().is_empty());
}

#[test]
fn search_by_author_substring_returns_matching_book() {
    let library = Library::open_in_memory().unwrap();
    let dune = library
        .add_book(&NewBook::new("Dune", "Herbert", "SciFi"))
        .unwrap();

    let hits = library.search(SearchStrategy::ByAuthor, "erb").unwrap();
    assert_eq!(hits, vec![dune]);
}

#[test]
fn each_strategy_matches_only_its_own_field() {
    let library = library_with_books();

    let by_title = library.search(SearchStrategy::ByTitle, "dune").unwrap();
    assert_eq!(
        by_title.iter().map(|b| b.title.as_str()).collect::<Vec<_>>(),
        vec!["Dune", "Children of Dune"]
    );

    let by_category = library.search(SearchStrategy::ByCategory, "CLASS").unwrap();
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].title, "Emma");

    assert!(library
        .search(SearchStrategy::ByAuthor, "Classic")
        .unwrap()
        .is_empty());
}

#[test]
fn search_treats_wildcards_literally() {
    let library = library_with_books();
    library
        .add_book(&NewBook::new("100% Pure", "Anon", "Misc"))
        .unwrap();

    let hits = library.search(SearchStrategy::ByTitle, "%").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "100% Pure");
    assert!(library
        .search(SearchStrategy::ByTitle, "_")
        .unwrap()
        .is_empty());
}

#[test]
fn search_folds_case_of_accented_text() {
    let library = library_with_books();
    let emile = library
        .add_book(&NewBook::new("Émile", "Rousseau", "Littérature"))
        .unwrap();

    assert_eq!(
        library.search(SearchStrategy::ByTitle, "émile").unwrap(),
        vec![emile.clone()]
    );
    assert_eq!(
        library
            .search(SearchStrategy::ByCategory, "LITTÉRATURE")
            .unwrap(),
        vec![emile]
    );
}

#[test]
fn search_keeps_surrounding_spaces_of_query() {
    let library = library_with_books();
    library
        .add_book(&NewBook::new("Offspring", "Anon", "Misc"))
        .unwrap();

    let hits = library.search(SearchStrategy::ByTitle, " of ").unwrap();
    assert_eq!(
        hits.iter().map(|b| b.title.as_str()).collect::<Vec<_>>(),
        vec!["Children of Dune"]
    );
}

#[test]
fn blank_search_matches_everything_and_limit_applies() {
    let library = library_with_books();
    assert_eq!(library.search(SearchStrategy::ByTitle, "").unwrap().len(), 3);

    let mut query = SearchQuery::new(SearchStrategy::ByAuthor, "herbert");
    query.limit = Some(1);
    let hits = library.search_with(&query).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Dune");
}

#[test]
fn search_does_not_mutate_catalog() {
    let library = library_with_books();
    let before = library.list_books().unwrap();
    for strategy in SearchStrategy::ALL {
        library.search(strategy, "e").unwrap();
    }
    assert_eq!(library.list_books().unwrap(), before);
}

#[test]
fn remove_book_by_title() {
    let library = library_with_books();
    library.remove_book("Emma").unwrap();

    assert!(library.find_book("Emma").unwrap().is_none());
    assert_eq!(library.list_books().unwrap().len(), 2);

    let err = library.remove_book("Emma").unwrap_err();
    assert!(matches!(err, CatalogError::BookNotFound(ref title) if title == "Emma"));
}

#[test]
fn remove_book_refuses_book_on_loan() {
    let library = library_with_books();
    library
        .add_patron(&NewPatron::new("Paul", "Atreides"))
        .unwrap();
    library.loan("Dune", "Paul", "Atreides").unwrap();

    let err = library.remove_book("Dune").unwrap_err();
    assert!(matches!(err, CatalogError::BookOnLoan(ref title) if title == "Dune"));
    assert!(library.find_book("Dune").unwrap().unwrap().is_on_loan());
    assert_eq!(library.on_loan_titles().unwrap(), vec!["Dune".to_string()]);

    library.return_book("Dune").unwrap();
    library.remove_book("Dune").unwrap();
    assert!(library.find_book("Dune").unwrap().is_none());
}

#[test]
fn repository_reads_book_by_id() {
    let library = library_with_books();
    let emma = library.find_book("Emma").unwrap().unwrap();

    let repo = SqliteBookRepository::try_new(library.connection()).unwrap();
    assert_eq!(repo.get_book(emma.id).unwrap(), Some(emma));
    assert_eq!(repo.get_book(999).unwrap(), None);
}
