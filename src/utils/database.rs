//! Provides functions for interacting with the application's SQLite database.
//! Handles connection setup, versioned schema migrations, and the
//! command-history log written after each executed command.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Result as SqlResult, params};
use tracing::{debug, info};

/// Migration steps, applied in order. Index + 1 is the schema version.
const MIGRATIONS: &[&[&str]] = &[
    // v1: command history
    &[
        "CREATE TABLE IF NOT EXISTS command_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            guild_id INTEGER,
            channel_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            command_name TEXT NOT NULL,
            command_args TEXT,
            executed_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            success INTEGER DEFAULT 1
        )",
        "CREATE INDEX IF NOT EXISTS idx_command_history_guild
            ON command_history(guild_id)",
        "CREATE INDEX IF NOT EXISTS idx_command_history_user
            ON command_history(user_id)",
    ],
];

/// Cloneable handle to the bot's SQLite database. All writes are append-only
/// log rows, so a single connection behind a mutex is sufficient.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (creating if necessary) the database file and configures the
    /// connection. The parent directory is created when missing.
    pub fn open(path: &Path) -> SqlResult<Self> {
        // A failure here surfaces through Connection::open below.
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = std::fs::create_dir_all(parent);
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;
        configure(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> SqlResult<Self> {
        let conn = Connection::open_in_memory()?;
        configure(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Applies any pending schema migrations. Safe to call repeatedly.
    pub fn migrate(&self) -> SqlResult<()> {
        let mut conn = self.conn.lock().expect("database mutex poisoned");

        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY,
                applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        let current: i64 = conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )?;

        for (idx, steps) in MIGRATIONS.iter().enumerate() {
            let version = (idx + 1) as i64;
            if version <= current {
                continue;
            }

            info!("Applying database migration version {}", version);
            let tx = conn.transaction()?;
            for sql in *steps {
                tx.execute(sql, [])?;
            }
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![version],
            )?;
            tx.commit()?;
        }

        Ok(())
    }

    /// Current schema version (0 when uninitialized).
    pub fn schema_version(&self) -> SqlResult<i64> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
    }

    /// Appends one command-invocation record. Rows are never mutated or
    /// deleted by the bot; retention is operator-managed.
    pub fn log_command(
        &self,
        guild_id: Option<u64>,
        channel_id: u64,
        user_id: u64,
        command_name: &str,
        command_args: Option<&str>,
        success: bool,
    ) -> SqlResult<()> {
        debug!(
            "Recording command `{}` by user {} (success: {})",
            command_name, user_id, success
        );
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.execute(
            "INSERT INTO command_history
                (guild_id, channel_id, user_id, command_name, command_args, success)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                guild_id.map(|id| id as i64),
                channel_id as i64,
                user_id as i64,
                command_name,
                command_args,
                success as i64,
            ],
        )?;
        Ok(())
    }

    /// Number of recorded invocations, used by tests and `/info`.
    pub fn command_count(&self) -> SqlResult<i64> {
        let conn = self.conn.lock().expect("database mutex poisoned");
        conn.query_row("SELECT COUNT(*) FROM command_history", [], |row| row.get(0))
    }
}

fn configure(conn: &Connection) -> SqlResult<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "busy_timeout", 5000)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn setup_db() -> Database {
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        db.migrate().expect("Failed to run migrations");
        db
    }

    #[test]
    fn test_migrations_apply_and_report_version() {
        let db = setup_db();
        assert_eq!(db.schema_version().unwrap(), MIGRATIONS.len() as i64);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let db = setup_db();
        db.migrate().expect("Second migrate call should be a no-op");
        assert_eq!(db.schema_version().unwrap(), MIGRATIONS.len() as i64);
    }

    #[test]
    fn test_log_command_appends_rows() {
        let db = setup_db();

        db.log_command(Some(1), 2, 3, "ask", Some("prompt:hello"), true)
            .expect("Failed to log command");
        db.log_command(None, 2, 3, "ping", None, true)
            .expect("Failed to log DM command");

        assert_eq!(db.command_count().unwrap(), 2);
    }

    #[test]
    fn test_log_command_records_failure_outcome() {
        let db = setup_db();

        db.log_command(Some(1), 2, 3, "ask", None, false)
            .expect("Failed to log command");

        let conn = db.conn.lock().unwrap();
        let success: i64 = conn
            .query_row(
                "SELECT success FROM command_history WHERE command_name = 'ask'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(success, 0);
    }

    #[test]
    fn test_log_command_before_migrate_fails() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.log_command(None, 1, 1, "ping", None, true).is_err());
    }
}
