use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[async_trait]
pub trait TransactionRepo: Sync + Send {
    async fn get_transaction(
        &self,
        session: &str,
        transaction_id: Uuid,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn get_all_transactions(
        &self,
        session: &str,
    ) -> Result<Vec<Transaction>, TransactionRepoError>;

    async fn create_new_transaction(
        &self,
        session: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn get_balance(&self, session: &str) -> Result<f64, TransactionRepoError>;
}

#[derive(Error, Debug)]
pub enum TransactionRepoError {
    #[error("Transaction with id {0} not found")]
    TransactionNotFound(Uuid),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Transaction {
    pub id: Uuid,
    pub title: String,
    pub amount: f64,
    pub created_at: NaiveDateTime,
}

impl Transaction {
    pub const fn new(
        id: Uuid,
        title: String,
        amount: f64,
        created_at: NaiveDateTime,
    ) -> Transaction {
        Transaction {
            id,
            title,
            amount,
            created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    Debit,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewTransaction {
    pub title: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

impl NewTransaction {
    pub const fn new(
        title: String,
        amount: f64,
        transaction_type: TransactionType,
    ) -> NewTransaction {
        NewTransaction {
            title,
            amount,
            transaction_type,
        }
    }

    /// The amount as stored: debits are negated so the balance is a plain sum.
    pub fn signed_amount(&self) -> f64 {
        match self.transaction_type {
            TransactionType::Credit => self.amount,
            TransactionType::Debit => -self.amount,
        }
    }
}
