//! Database connection management
//!
//! `init_db` turns a [`DbConfig`] into a [`Database`], the store handle the
//! service keeps for its lifetime. Requests borrow it through a
//! [`Session`], a single SQLite transaction that commits explicitly and
//! rolls back otherwise.

use catalog_core::{log_op_end, log_op_error, log_op_start};
use catalog_core_types::RequestContext;
use rusqlite::{Connection, Transaction};
use std::ops::Deref;
use std::path::Path;
use std::time::Instant;

use crate::config::{DbConfig, DbTarget};
use crate::errors::{from_rusqlite, io_error, Result};
use crate::schema::ensure_schema;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Apply connection settings
///
/// WAL is only requested for file databases; in-memory databases ignore it.
pub fn configure(conn: &Connection, config: &DbConfig, target: &DbTarget) -> Result<()> {
    conn.busy_timeout(config.busy_timeout)
        .map_err(from_rusqlite)?;
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(from_rusqlite)?;
    if matches!(target, DbTarget::File(_)) {
        // journal_mode answers with the resulting mode
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })
        .map_err(from_rusqlite)?;
    }
    Ok(())
}

/// Bind to the configured database and make sure the schema exists
pub fn init_db(config: &DbConfig) -> Result<Database> {
    let started = Instant::now();
    log_op_start!("db.init", database_uri = %config.database_uri);

    let result = connect(config);
    let duration_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(db) => log_op_end!("db.init", duration_ms = duration_ms, in_memory = db.is_in_memory()),
        Err(err) => log_op_error!("db.init", err, duration_ms = duration_ms),
    }
    result
}

fn connect(config: &DbConfig) -> Result<Database> {
    let target = config.target()?;
    let conn = match &target {
        DbTarget::Memory => open_in_memory()?,
        DbTarget::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| io_error("init_db", e))?;
            }
            open(path)?
        }
    };
    configure(&conn, config, &target)?;
    ensure_schema(&conn)?;

    Ok(Database { conn, target })
}

/// Store handle owning the connection
pub struct Database {
    conn: Connection,
    target: DbTarget,
}

impl Database {
    /// Borrow the connection for autocommit operations
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn target(&self) -> &DbTarget {
        &self.target
    }

    pub fn is_in_memory(&self) -> bool {
        self.target == DbTarget::Memory
    }

    /// Start a unit of work
    pub fn session(&mut self, ctx: RequestContext) -> Result<Session<'_>> {
        let tx = self.conn.transaction().map_err(from_rusqlite)?;
        tracing::debug!(
            op = "session.begin",
            request_id = %ctx.request_id,
            origin = ctx.origin_or_unknown(),
        );
        Ok(Session {
            tx,
            ctx,
            started: Instant::now(),
        })
    }

    /// Release the connection
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| from_rusqlite(e))?;
        tracing::debug!(op = "db.close");
        Ok(())
    }
}

/// One unit of work
///
/// Dereferences to the connection, so every `ProductRepo` operation runs
/// inside it. Dropping a session without `commit` rolls it back.
pub struct Session<'db> {
    tx: Transaction<'db>,
    ctx: RequestContext,
    started: Instant,
}

impl Session<'_> {
    pub fn context(&self) -> &RequestContext {
        &self.ctx
    }

    pub fn commit(self) -> Result<()> {
        let Session { tx, ctx, started } = self;
        tx.commit().map_err(from_rusqlite)?;
        tracing::debug!(
            op = "session.commit",
            request_id = %ctx.request_id,
            duration_ms = started.elapsed().as_millis() as u64,
        );
        Ok(())
    }

    pub fn rollback(self) -> Result<()> {
        let Session { tx, ctx, started } = self;
        tx.rollback().map_err(from_rusqlite)?;
        tracing::debug!(
            op = "session.rollback",
            request_id = %ctx.request_id,
            duration_ms = started.elapsed().as_millis() as u64,
        );
        Ok(())
    }
}

impl Deref for Session<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_rows(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM product", [], |row| row.get(0))
            .unwrap()
    }

    fn insert_one(conn: &Connection) {
        conn.execute(
            "INSERT INTO product (name, description, price, available, category)
             VALUES ('Apple', 'Red', '0.50', 1, 'FOOD')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_init_in_memory() {
        let db = init_db(&DbConfig::in_memory()).unwrap();
        assert!(db.is_in_memory());
        assert_eq!(count_rows(db.connection()), 0);
        db.close().unwrap();
    }

    #[test]
    fn test_session_commit_persists() {
        let mut db = init_db(&DbConfig::in_memory()).unwrap();

        let session = db.session(RequestContext::new().with_origin("test")).unwrap();
        insert_one(&session);
        session.commit().unwrap();

        assert_eq!(count_rows(db.connection()), 1);
    }

    #[test]
    fn test_session_rollback_and_drop_discard() {
        let mut db = init_db(&DbConfig::in_memory()).unwrap();

        let session = db.session(RequestContext::new()).unwrap();
        insert_one(&session);
        session.rollback().unwrap();
        assert_eq!(count_rows(db.connection()), 0);

        {
            let session = db.session(RequestContext::new()).unwrap();
            insert_one(&session);
        }
        assert_eq!(count_rows(db.connection()), 0);
    }

    #[test]
    fn test_unsupported_scheme_fails_init() {
        let result = init_db(&DbConfig::new("mysql://root@localhost/catalog"));
        assert!(result.is_err());
    }
}
