use shelfmark_core::{BanState, Book, LoanState, Patron};

#[test]
fn book_serialization_uses_expected_wire_fields() {
    let book = Book {
        id: 3,
        title: "Dune".to_string(),
        author: "Herbert".to_string(),
        category: "SciFi".to_string(),
        loan_state: LoanState::OnLoan,
        borrower: Some(7),
    };

    let json = serde_json::to_value(&book).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["title"], "Dune");
    assert_eq!(json["loan_state"], "on_loan");
    assert_eq!(json["borrower"], 7);

    let decoded: Book = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, book);
}

#[test]
fn patron_serialization_uses_expected_wire_fields() {
    let patron = Patron {
        id: 1,
        name: "Paul".to_string(),
        surname: "Atreides".to_string(),
        ban_state: BanState::Active,
        ban_date: None,
    };

    let json = serde_json::to_value(&patron).unwrap();
    assert_eq!(json["ban_state"], "active");
    assert!(json["ban_date"].is_null());
}
