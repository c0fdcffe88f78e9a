//! SQL functions the catalog queries rely on.
//!
//! # Invariants
//! - `casefold(text)` lowercases with Unicode rules; `NULL` passes through.
//! - Registered on every connection handed out by `open_db*`.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// Name of the Unicode lowercase function used by substring search.
pub const CASEFOLD_FN: &str = "casefold";

/// Registers the catalog's scalar functions on `conn`.
pub fn register_catalog_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        CASEFOLD_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text = ctx.get::<Option<String>>(0)?;
            Ok(text.map(|value| value.to_lowercase()))
        },
    )
}
