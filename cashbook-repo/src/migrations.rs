use anyhow::Context;
use chrono::{Duration, Utc};
use sqlx::{query, query_scalar, SqlitePool};
use thiserror::Error;
use tracing::{info, instrument, warn};

/// A lock held longer than this has no live owner and may be cleared.
const LOCK_TIMEOUT_SECONDS: i64 = 300;

struct Migration {
    version: i64,
    name: &'static str,
    up: &'static str,
    down: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create-transactions",
        up: "CREATE TABLE transactions (\
             id TEXT PRIMARY KEY, \
             title TEXT NOT NULL, \
             amount REAL NOT NULL, \
             created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP)",
        down: "DROP TABLE transactions",
    },
    Migration {
        version: 2,
        name: "add-session-id-to-transactions",
        up: "ALTER TABLE transactions ADD COLUMN session_id TEXT",
        down: "ALTER TABLE transactions DROP COLUMN session_id",
    },
    Migration {
        version: 3,
        name: "index-transactions-session-id",
        up: "CREATE INDEX transactions_session_id_index ON transactions (session_id)",
        down: "DROP INDEX transactions_session_id_index",
    },
];

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Migration lock is held by another migration run")]
    Locked,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub struct Migrator {
    pool: SqlitePool,
}

impl Migrator {
    pub fn new(pool: SqlitePool) -> Migrator {
        Migrator { pool }
    }

    /// Applies all pending migrations in version order. Running this again
    /// once everything is applied is a no-op.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<(), MigrationError> {
        self.ensure_migration_tables().await?;
        self.acquire_lock().await?;
        let result = self.apply_pending().await;
        self.release_lock().await?;
        result
    }

    /// Reverts the most recently applied migration.
    #[instrument(skip(self))]
    pub async fn rollback(&self) -> Result<(), MigrationError> {
        self.ensure_migration_tables().await?;
        self.acquire_lock().await?;
        let result = self.revert_last().await;
        self.release_lock().await?;
        result
    }

    /// Reverts every applied migration, newest first.
    #[instrument(skip(self))]
    pub async fn rollback_all(&self) -> Result<(), MigrationError> {
        self.ensure_migration_tables().await?;
        self.acquire_lock().await?;
        let result = async {
            while self.applied_version().await? > 0 {
                self.revert_last().await?;
            }
            Ok(())
        }
        .await;
        self.release_lock().await?;
        result
    }

    /// Clears a lock whose holder crashed mid-migration. Safe to call at any
    /// time: a lock younger than the timeout is left untouched. Returns
    /// whether a lock was cleared.
    pub async fn clear_stale_lock(&self) -> Result<bool, MigrationError> {
        let cutoff = Utc::now().naive_utc() - Duration::seconds(LOCK_TIMEOUT_SECONDS);
        let result = query(
            "UPDATE migration_lock SET is_locked = 0, locked_at = NULL \
             WHERE id = 1 AND is_locked = 1 AND locked_at < ?",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .context("Unable to clear stale migration lock")?;
        Ok(result.rows_affected() == 1)
    }

    async fn ensure_migration_tables(&self) -> Result<(), MigrationError> {
        query(
            "CREATE TABLE IF NOT EXISTS migrations (\
             version INTEGER PRIMARY KEY, \
             name TEXT NOT NULL, \
             applied_at TIMESTAMP NOT NULL)",
        )
        .execute(&self.pool)
        .await
        .context("Unable to create migrations table")?;
        query(
            "CREATE TABLE IF NOT EXISTS migration_lock (\
             id INTEGER PRIMARY KEY, \
             is_locked INTEGER NOT NULL DEFAULT 0, \
             locked_at TIMESTAMP)",
        )
        .execute(&self.pool)
        .await
        .context("Unable to create migration lock table")?;
        query("INSERT OR IGNORE INTO migration_lock (id, is_locked) VALUES (1, 0)")
            .execute(&self.pool)
            .await
            .context("Unable to seed migration lock row")?;
        Ok(())
    }

    async fn acquire_lock(&self) -> Result<(), MigrationError> {
        if self.try_lock().await? {
            return Ok(());
        }
        // A crashed run leaves the lock row held forever. Clear it if the
        // holder is past the timeout, then retry once.
        if self.clear_stale_lock().await? {
            warn!("Cleared stale migration lock");
        }
        if self.try_lock().await? {
            Ok(())
        } else {
            Err(MigrationError::Locked)
        }
    }

    async fn try_lock(&self) -> Result<bool, MigrationError> {
        let result = query(
            "UPDATE migration_lock SET is_locked = 1, locked_at = ? \
             WHERE id = 1 AND is_locked = 0",
        )
        .bind(Utc::now().naive_utc())
        .execute(&self.pool)
        .await
        .context("Unable to acquire migration lock")?;
        Ok(result.rows_affected() == 1)
    }

    async fn release_lock(&self) -> Result<(), MigrationError> {
        query("UPDATE migration_lock SET is_locked = 0, locked_at = NULL WHERE id = 1")
            .execute(&self.pool)
            .await
            .context("Unable to release migration lock")?;
        Ok(())
    }

    async fn applied_version(&self) -> Result<i64, MigrationError> {
        let version: Option<i64> = query_scalar("SELECT MAX(version) FROM migrations")
            .fetch_one(&self.pool)
            .await
            .context("Unable to read applied migrations")?;
        Ok(version.unwrap_or(0))
    }

    async fn apply_pending(&self) -> Result<(), MigrationError> {
        let applied = self.applied_version().await?;
        for migration in MIGRATIONS.iter().filter(|m| m.version > applied) {
            let mut tx = self
                .pool
                .begin()
                .await
                .context("Unable to start migration transaction")?;
            query(migration.up)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Unable to apply migration {}", migration.name))?;
            query("INSERT INTO migrations (version, name, applied_at) VALUES (?, ?, ?)")
                .bind(migration.version)
                .bind(migration.name)
                .bind(Utc::now().naive_utc())
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Unable to record migration {}", migration.name))?;
            tx.commit()
                .await
                .with_context(|| format!("Unable to commit migration {}", migration.name))?;
            info!(
                version = migration.version,
                name = migration.name,
                "Applied migration"
            );
        }
        Ok(())
    }

    async fn revert_last(&self) -> Result<(), MigrationError> {
        let applied = self.applied_version().await?;
        let Some(migration) = MIGRATIONS.iter().find(|m| m.version == applied) else {
            return Ok(());
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Unable to start migration transaction")?;
        query(migration.down)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Unable to revert migration {}", migration.name))?;
        query("DELETE FROM migrations WHERE version = ?")
            .bind(migration.version)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Unable to unrecord migration {}", migration.name))?;
        tx.commit()
            .await
            .with_context(|| format!("Unable to commit rollback of {}", migration.name))?;
        info!(
            version = migration.version,
            name = migration.name,
            "Reverted migration"
        );
        Ok(())
    }
}
