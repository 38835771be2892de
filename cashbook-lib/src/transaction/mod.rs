use actix_web::{web, Scope};
use cashbook_repo::transaction_repo::Transaction;
use serde::{Deserialize, Serialize};

pub mod handlers;

pub fn transaction_service() -> Scope {
    // "/summary" has to be registered ahead of the id match
    web::scope("/transactions")
        .service(handlers::get_summary)
        .service(handlers::get_transaction)
        .service(handlers::get_all_transactions)
        .service(handlers::create_new_transaction)
}

#[derive(Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
}

#[derive(Serialize, Deserialize)]
pub struct TransactionResponse {
    pub transaction: Transaction,
}

#[derive(Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: Summary,
}

#[derive(Serialize, Deserialize)]
pub struct Summary {
    pub amount: f64,
}
