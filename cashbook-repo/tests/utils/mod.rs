use cashbook_repo::migrations::Migrator;
use cashbook_repo::transaction_repo::TransactionRepo;
use cashbook_repo::HealthCheck;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug)]
pub enum RepoType {
    SQLx,
    Mem,
}

pub async fn build_repos(repo_type: RepoType) -> (Arc<dyn TransactionRepo>, Arc<dyn HealthCheck>) {
    match repo_type {
        RepoType::SQLx => {
            let pool = cashbook_repo::sqlx_repo::create_pool("sqlite::memory:", 1)
                .await
                .unwrap();
            let migrator = Migrator::new(pool.clone());
            // roll back then reapply so every scenario starts from a clean table
            migrator.rollback_all().await.unwrap();
            migrator.run().await.unwrap();
            cashbook_repo::sqlx_repo::create_repos(pool)
        }
        RepoType::Mem => cashbook_repo::mem_repo::create_repos(),
    }
}

pub fn test_session() -> String {
    "test-session-".to_owned() + &Uuid::new_v4().to_string()
}
