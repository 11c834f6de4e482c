use rusqlite::Connection;
use std::cell::RefCell;
use std::fs;

use crate::errors::EstateError;

// Thread-local connection slot.
thread_local! {
    static DB_CONN: RefCell<Option<Connection>> = RefCell::new(None);
}

#[derive(Clone)]
pub struct Database {
    path: String,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Provides a mutable connection to the closure, opening one lazily for
    /// the calling thread on first use.
    ///
    /// The slot is keyed per thread, not per `Database`: a thread works
    /// against one database, and the first `Database` used on it wins.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, EstateError>
    where
        F: FnOnce(&mut Connection) -> Result<T, EstateError>,
    {
        let inner_result = DB_CONN
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();
                if slot.is_none() {
                    let conn = Connection::open(&self.path)
                        .map_err(|e| EstateError::DbError(format!("Open DB failed: {e}")))?;
                    // Cascade deletes on the offers/tag-link tables rely on
                    // foreign key enforcement.
                    conn.pragma_update(None, "foreign_keys", "ON")
                        .map_err(|e| EstateError::DbError(format!("Enable FKs failed: {e}")))?;
                    *slot = Some(conn);
                }
                let conn = slot.as_mut().unwrap();
                f(conn)
            })
            .map_err(|_| EstateError::DbError("thread-local connection unavailable".to_string()))?;
        inner_result
    }
}

/// Initialize database from a SQL schema file.
pub fn init_db(db: &Database, schema_path: &str) -> Result<(), EstateError> {
    let schema_sql = fs::read_to_string(schema_path)
        .map_err(|e| EstateError::DbError(format!("Failed to read schema file: {e}")))?;

    db.with_conn(|conn| {
        conn.execute_batch(&schema_sql)
            .map_err(|e| EstateError::DbError(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })?;

    log::info!("database initialized from {schema_path}");
    Ok(())
}
