//! Patron repository contract and SQLite implementation.
//!
//! # Invariants
//! - `(name, surname)` lookups return the lowest-id match.
//! - Ban writes persist `ban_state` and `ban_date` together.

use crate::model::patron::{BanState, NewPatron, Patron, PatronId};
use crate::repo::{ensure_tables, flag_to_int, int_to_flag, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const PATRON_SELECT_SQL: &str = "SELECT
    id,
    name,
    surname,
    ban_state,
    ban_date
FROM patrons";

/// Repository interface for patron persistence.
pub trait PatronRepository {
    fn create_patron(&self, patron: &NewPatron) -> RepoResult<PatronId>;
    /// First patron matching both name and surname exactly.
    fn find_patron(&self, name: &str, surname: &str) -> RepoResult<Option<Patron>>;
    fn find_patrons_by_name(&self, name: &str) -> RepoResult<Vec<Patron>>;
    /// All patrons, or only those in `ban_state` when given.
    fn list_patrons(&self, ban_state: Option<BanState>) -> RepoResult<Vec<Patron>>;
    /// Persists `ban_state` and `ban_date` of an existing patron.
    fn update_ban(&self, patron: &Patron) -> RepoResult<()>;
    /// Deletes every patron named `name`; returns the number removed.
    fn delete_patrons_by_name(&self, name: &str) -> RepoResult<usize>;
}

/// SQLite-backed patron repository.
pub struct SqlitePatronRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePatronRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["patrons"])?;
        Ok(Self { conn })
    }

    fn query_patrons(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Patron>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut patrons = Vec::new();
        while let Some(row) = rows.next()? {
            patrons.push(parse_patron_row(row)?);
        }
        Ok(patrons)
    }
}

impl PatronRepository for SqlitePatronRepository<'_> {
    fn create_patron(&self, patron: &NewPatron) -> RepoResult<PatronId> {
        patron.validate()?;

        self.conn.execute(
            "INSERT INTO patrons (
                name,
                surname,
                ban_state,
                ban_date
            ) VALUES (?1, ?2, 0, NULL);",
            params![patron.name, patron.surname],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn find_patron(&self, name: &str, surname: &str) -> RepoResult<Option<Patron>> {
        let mut patrons = self.query_patrons(
            &format!(
                "{PATRON_SELECT_SQL}
                 WHERE name = ?1 AND surname = ?2
                 ORDER BY id ASC
                 LIMIT 1;"
            ),
            vec![
                Value::Text(name.to_string()),
                Value::Text(surname.to_string()),
            ],
        )?;
        Ok(patrons.pop())
    }

    fn find_patrons_by_name(&self, name: &str) -> RepoResult<Vec<Patron>> {
        self.query_patrons(
            &format!("{PATRON_SELECT_SQL} WHERE name = ?1 ORDER BY id ASC;"),
            vec![Value::Text(name.to_string())],
        )
    }

    fn list_patrons(&self, ban_state: Option<BanState>) -> RepoResult<Vec<Patron>> {
        let mut sql = format!("{PATRON_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values = Vec::new();
        if let Some(state) = ban_state {
            sql.push_str(" AND ban_state = ?");
            bind_values.push(Value::Integer(ban_state_to_db(state)));
        }
        sql.push_str(" ORDER BY id ASC");
        self.query_patrons(&sql, bind_values)
    }

    fn update_ban(&self, patron: &Patron) -> RepoResult<()> {
        patron.validate()?;

        let changed = self.conn.execute(
            "UPDATE patrons
             SET
                ban_state = ?1,
                ban_date = ?2
             WHERE id = ?3;",
            params![ban_state_to_db(patron.ban_state), patron.ban_date, patron.id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "patron",
                key: patron.id.to_string(),
            });
        }
        Ok(())
    }

    fn delete_patrons_by_name(&self, name: &str) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM patrons WHERE name = ?1;", [name])?;
        Ok(removed)
    }
}

fn parse_patron_row(row: &Row<'_>) -> RepoResult<Patron> {
    let banned = int_to_flag(row.get("ban_state")?, "patrons.ban_state")?;
    let patron = Patron {
        id: row.get("id")?,
        name: row.get("name")?,
        surname: row.get("surname")?,
        ban_state: if banned {
            BanState::Banned
        } else {
            BanState::Active
        },
        ban_date: row.get("ban_date")?,
    };
    patron.validate()?;
    Ok(patron)
}

fn ban_state_to_db(state: BanState) -> i64 {
    flag_to_int(state == BanState::Banned)
}
