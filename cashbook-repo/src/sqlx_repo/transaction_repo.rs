use crate::sqlx_repo::SQLxRepo;
use crate::transaction_repo::TransactionRepoError::TransactionNotFound;
use crate::transaction_repo::{NewTransaction, Transaction, TransactionRepo, TransactionRepoError};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use sqlx::{query, query_as, query_scalar};
use tracing::instrument;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct TransactionEntry {
    id: String,
    title: String,
    amount: f64,
    created_at: NaiveDateTime,
    #[allow(dead_code)]
    session_id: Option<String>,
}

impl TryFrom<TransactionEntry> for Transaction {
    type Error = anyhow::Error;

    fn try_from(value: TransactionEntry) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&value.id)
            .with_context(|| format!("Invalid transaction id in store: {}", value.id))?;
        Ok(Transaction::new(
            id,
            value.title,
            value.amount,
            value.created_at,
        ))
    }
}

#[async_trait]
impl TransactionRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn get_transaction(
        &self,
        session: &str,
        transaction_id: Uuid,
    ) -> Result<Transaction, TransactionRepoError> {
        let transaction_entry: Option<TransactionEntry> =
            query_as("SELECT * FROM transactions WHERE id = ? AND session_id = ?")
                .bind(transaction_id.to_string())
                .bind(session)
                .fetch_optional(&self.pool)
                .await
                .with_context(|| format!("Unable to get transaction {}", transaction_id))?;
        let transaction = transaction_entry
            .ok_or(TransactionNotFound(transaction_id))?
            .try_into()
            .map_err(TransactionRepoError::Other)?;
        Ok(transaction)
    }

    #[instrument(skip(self))]
    async fn get_all_transactions(
        &self,
        session: &str,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let transaction_entries: Vec<TransactionEntry> = query_as(
            "SELECT * FROM transactions WHERE session_id = ? ORDER BY created_at ASC, rowid ASC",
        )
        .bind(session)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Unable to get transactions for session {}", session))?;

        let transactions = transaction_entries
            .into_iter()
            .map(|transaction_entry| transaction_entry.try_into())
            .collect::<Result<Vec<Transaction>, anyhow::Error>>()
            .map_err(TransactionRepoError::Other)?;
        Ok(transactions)
    }

    #[instrument(skip(self, new_transaction))]
    async fn create_new_transaction(
        &self,
        session: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let id = Uuid::new_v4();
        let amount = new_transaction.signed_amount();
        let created_at = Utc::now().naive_utc();
        query(
            "INSERT INTO transactions (id, title, amount, created_at, session_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&new_transaction.title)
        .bind(amount)
        .bind(created_at)
        .bind(session)
        .execute(&self.pool)
        .await
        .context("Unable to insert transaction")?;

        Ok(Transaction::new(
            id,
            new_transaction.title,
            amount,
            created_at,
        ))
    }

    #[instrument(skip(self))]
    async fn get_balance(&self, session: &str) -> Result<f64, TransactionRepoError> {
        let balance: Option<f64> =
            query_scalar("SELECT SUM(amount) FROM transactions WHERE session_id = ?")
                .bind(session)
                .fetch_one(&self.pool)
                .await
                .with_context(|| format!("Unable to get balance for session {}", session))?;
        Ok(balance.unwrap_or(0.0))
    }
}
