//! Book repository contract and SQLite implementation.
//!
//! # Invariants
//! - `books.title` is unique; duplicate inserts map to `RepoError::UniqueViolation`.
//! - Substring lookups escape `%`, `_` and `\` so user text is matched literally.
//! - Substring lookups fold case with Unicode rules through `casefold`, which the
//!   connection must have registered (`open_db*` does).
//! - List results are ordered by `id ASC`.

use crate::db::CASEFOLD_FN;
use crate::model::book::{Book, BookId, LoanState, NewBook};
use crate::model::patron::PatronId;
use crate::repo::{
    ensure_tables, flag_to_int, int_to_flag, is_unique_violation, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    author,
    category,
    loan_state,
    borrower_id
FROM books";

/// Searchable book column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Title,
    Author,
    Category,
}

impl BookField {
    fn column(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Category => "category",
        }
    }
}

/// Repository interface for book persistence.
pub trait BookRepository {
    /// Inserts an available book and returns its store-assigned id.
    fn create_book(&self, book: &NewBook) -> RepoResult<BookId>;
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    /// Exact, case-sensitive title lookup.
    fn find_book_by_title(&self, title: &str) -> RepoResult<Option<Book>>;
    fn list_books(&self) -> RepoResult<Vec<Book>>;
    /// Case-insensitive substring match on one column.
    fn search_books(&self, field: BookField, text: &str, limit: Option<u32>)
        -> RepoResult<Vec<Book>>;
    /// Titles of every book currently on loan.
    fn list_on_loan_titles(&self) -> RepoResult<Vec<String>>;
    /// Persists `loan_state` and `borrower` of an existing book.
    fn update_loan(&self, book: &Book) -> RepoResult<()>;
    fn delete_book_by_title(&self, title: &str) -> RepoResult<()>;
    /// Number of books currently lent to `patron`.
    fn count_loans_for(&self, patron: PatronId) -> RepoResult<u32>;
}

/// SQLite-backed book repository.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Builds a repository over a migrated connection.
    ///
    /// Fails with `MissingRequiredTable` when the schema is absent.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["books", "patrons"])?;
        Ok(Self { conn })
    }

    fn query_books(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Book>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }
        Ok(books)
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn create_book(&self, book: &NewBook) -> RepoResult<BookId> {
        book.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO books (
                title,
                author,
                category,
                loan_state,
                borrower_id
            ) VALUES (?1, ?2, ?3, 0, NULL);",
            params![book.title, book.author, book.category],
        );

        match inserted {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(err) if is_unique_violation(&err) => Err(RepoError::UniqueViolation {
                entity: "book",
                key: book.title.clone(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        let mut books = self.query_books(
            &format!("{BOOK_SELECT_SQL} WHERE id = ?1;"),
            vec![Value::Integer(id)],
        )?;
        Ok(books.pop())
    }

    fn find_book_by_title(&self, title: &str) -> RepoResult<Option<Book>> {
        let mut books = self.query_books(
            &format!("{BOOK_SELECT_SQL} WHERE title = ?1;"),
            vec![Value::Text(title.to_string())],
        )?;
        Ok(books.pop())
    }

    fn list_books(&self) -> RepoResult<Vec<Book>> {
        self.query_books(&format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"), Vec::new())
    }

    fn search_books(
        &self,
        field: BookField,
        text: &str,
        limit: Option<u32>,
    ) -> RepoResult<Vec<Book>> {
        let mut sql = format!(
            "{BOOK_SELECT_SQL} WHERE {CASEFOLD_FN}({}) LIKE {CASEFOLD_FN}(?) ESCAPE '\\' ORDER BY id ASC",
            field.column()
        );
        let mut bind_values = vec![Value::Text(format!("%{}%", escape_like(text)))];
        if let Some(limit) = limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }
        self.query_books(&sql, bind_values)
    }

    fn list_on_loan_titles(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT title FROM books WHERE loan_state = 1 ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut titles = Vec::new();
        while let Some(row) = rows.next()? {
            titles.push(row.get(0)?);
        }
        Ok(titles)
    }

    fn update_loan(&self, book: &Book) -> RepoResult<()> {
        book.validate()?;

        let changed = self.conn.execute(
            "UPDATE books
             SET
                loan_state = ?1,
                borrower_id = ?2
             WHERE id = ?3;",
            params![loan_state_to_db(book.loan_state), book.borrower, book.id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "book",
                key: book.id.to_string(),
            });
        }
        Ok(())
    }

    fn delete_book_by_title(&self, title: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM books WHERE title = ?1;", [title])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "book",
                key: title.to_string(),
            });
        }
        Ok(())
    }

    fn count_loans_for(&self, patron: PatronId) -> RepoResult<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM books WHERE loan_state = 1 AND borrower_id = ?1;",
            [patron],
            |row| row.get::<_, u32>(0),
        )?;
        Ok(count)
    }
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let on_loan = int_to_flag(row.get("loan_state")?, "books.loan_state")?;
    let book = Book {
        id: row.get("id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        category: row.get("category")?,
        loan_state: if on_loan {
            LoanState::OnLoan
        } else {
            LoanState::Available
        },
        borrower: row.get("borrower_id")?,
    };
    book.validate()?;
    Ok(book)
}

fn loan_state_to_db(state: LoanState) -> i64 {
    flag_to_int(state == LoanState::OnLoan)
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
        assert_eq!(escape_like("Dune"), "Dune");
    }
}
