mod transaction_repo;

use crate::mem_repo::transaction_repo::MemTransactionRepo;
use crate::transaction_repo::TransactionRepo;
use crate::HealthCheck;
use async_trait::async_trait;
use std::sync::Arc;

pub fn create_repos() -> (Arc<dyn TransactionRepo>, Arc<dyn HealthCheck>) {
    let repo = Arc::new(MemTransactionRepo::new());
    (repo.clone(), repo)
}

#[async_trait]
impl HealthCheck for MemTransactionRepo {
    async fn check(&self) -> bool {
        true
    }
}
