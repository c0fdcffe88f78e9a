//! Plain-text rendering of catalog records.

use shelfmark_core::{Book, Patron};

pub const SEPARATOR: &str = "+------------------------------------+";

pub fn format_book(book: &Book) -> String {
    let borrower = book
        .borrower
        .map_or_else(|| "-".to_string(), |id| format!("patron #{id}"));
    format!(
        "{SEPARATOR}\nTitle    : {}\nAuthor   : {}\nCategory : {}\nOn loan  : {}\nBorrower : {}\n{SEPARATOR}",
        book.title,
        book.author,
        book.category,
        if book.is_on_loan() { "yes" } else { "no" },
        borrower
    )
}

pub fn format_patron(patron: &Patron) -> String {
    match patron.ban_date {
        Some(ban_date) => format!(
            "#{} {} {} (banned at {ban_date} ms)",
            patron.id, patron.name, patron.surname
        ),
        None => format!("#{} {} {}", patron.id, patron.name, patron.surname),
    }
}
