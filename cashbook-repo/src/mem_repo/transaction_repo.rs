use crate::transaction_repo::TransactionRepoError::TransactionNotFound;
use crate::transaction_repo::{
    NewTransaction, Transaction, TransactionRepo, TransactionRepoError,
};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

struct State {
    transactions: HashMap<Uuid, Transaction>,
    // ids per session in insertion order
    session_transactions: HashMap<String, Vec<Uuid>>,
}

pub struct MemTransactionRepo {
    state: RwLock<State>,
}

impl MemTransactionRepo {
    pub fn new() -> MemTransactionRepo {
        let state = State {
            transactions: HashMap::new(),
            session_transactions: HashMap::new(),
        };
        MemTransactionRepo {
            state: RwLock::new(state),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<State>, anyhow::Error> {
        self.state
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<State>, anyhow::Error> {
        self.state
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

#[async_trait]
impl TransactionRepo for MemTransactionRepo {
    async fn get_transaction(
        &self,
        session: &str,
        transaction_id: Uuid,
    ) -> Result<Transaction, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let Some(transaction_ids) = read_guard.session_transactions.get(session) else {
            return Err(TransactionNotFound(transaction_id));
        };
        if !transaction_ids.contains(&transaction_id) {
            return Err(TransactionNotFound(transaction_id));
        }

        let transaction = read_guard
            .transactions
            .get(&transaction_id)
            .expect("transactions should contain same ids as session_transactions")
            .clone();
        Ok(transaction)
    }

    async fn get_all_transactions(
        &self,
        session: &str,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let Some(transaction_ids) = read_guard.session_transactions.get(session) else {
            return Ok(Vec::new());
        };

        let transactions = transaction_ids
            .iter()
            .map(|id| {
                read_guard
                    .transactions
                    .get(id)
                    .expect("transactions should have all the ids from session_transactions")
            })
            .cloned()
            .collect();
        Ok(transactions)
    }

    async fn create_new_transaction(
        &self,
        session: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        let id = Uuid::new_v4();
        let amount = new_transaction.signed_amount();
        let transaction = Transaction::new(
            id,
            new_transaction.title,
            amount,
            Utc::now().naive_utc(),
        );

        write_guard.transactions.insert(id, transaction.clone());
        write_guard
            .session_transactions
            .entry(session.to_owned())
            .or_insert_with(Vec::new)
            .push(id);

        Ok(transaction)
    }

    async fn get_balance(&self, session: &str) -> Result<f64, TransactionRepoError> {
        let sum = self
            .get_all_transactions(session)
            .await?
            .into_iter()
            .map(|t| t.amount)
            .sum();
        Ok(sum)
    }
}
