mod transaction_repo;

use crate::transaction_repo::TransactionRepo;
use crate::HealthCheck;
use anyhow::Context;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;

pub struct SQLxRepo {
    pool: SqlitePool,
}

impl SQLxRepo {
    pub fn new(pool: SqlitePool) -> SQLxRepo {
        SQLxRepo { pool }
    }
}

pub async fn create_pool(
    database_url: &str,
    max_pool_size: u32,
) -> Result<SqlitePool, anyhow::Error> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid database URL: {}", database_url))?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_pool_size)
        .connect_with(options)
        .await
        .context("Unable to connect to database")?;
    Ok(pool)
}

pub fn create_repos(pool: SqlitePool) -> (Arc<dyn TransactionRepo>, Arc<dyn HealthCheck>) {
    let repo = Arc::new(SQLxRepo::new(pool));
    (repo.clone(), repo)
}

#[async_trait]
impl HealthCheck for SQLxRepo {
    async fn check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
