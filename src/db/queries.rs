use crate::db::{Database, KeyValueStore};
use crate::error::Result;
use chrono::Utc;
use rusqlite::params;

// Key-value queries

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
        })
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO kv_store (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                "#,
                params![key, value, Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
            Ok(())
        })
    }
}

impl Database {
    /// Number of slots that currently hold at least one task.
    pub fn task_slot_count(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM kv_store WHERE key LIKE 'tasks-%'",
                [],
                |row| row.get(0),
            )?;
            Ok(count as usize)
        })
    }
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get("tasks-a").unwrap(), None);

        db.set("tasks-a", r#"["walk dog"]"#).unwrap();
        assert_eq!(db.get("tasks-a").unwrap().as_deref(), Some(r#"["walk dog"]"#));

        db.set("tasks-a", r#"["walk dog","water plants"]"#).unwrap();
        assert_eq!(
            db.get("tasks-a").unwrap().as_deref(),
            Some(r#"["walk dog","water plants"]"#)
        );

        db.remove("tasks-a").unwrap();
        assert_eq!(db.get("tasks-a").unwrap(), None);
    }

    #[test]
    fn counts_task_slots_only() {
        let db = Database::open_in_memory().unwrap();
        db.set("tasks-a", "[]").unwrap();
        db.set("tasks-b", "[]").unwrap();
        db.set("darkMode", "true").unwrap();
        assert_eq!(db.task_slot_count().unwrap(), 2);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hourcast.db");

        {
            let db = Database::open(&path).unwrap();
            db.set("allowUnsuitableTasks", "true").unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(db.get("allowUnsuitableTasks").unwrap().as_deref(), Some("true"));
        assert_eq!(db.path(), &path);
    }
}
