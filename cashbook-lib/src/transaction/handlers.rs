use crate::error::HandlerError;
use crate::session::Session;
use crate::transaction::{Summary, SummaryResponse, TransactionResponse, TransactionsResponse};
use actix_web::{get, post, web, HttpResponse, Responder};
use cashbook_repo::transaction_repo::{NewTransaction, TransactionRepo};
use std::sync::Arc;
use uuid::Uuid;

#[post("")]
pub async fn create_new_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    session: Session,
    new_transaction: web::Json<NewTransaction>,
) -> Result<impl Responder, HandlerError> {
    let new_transaction = new_transaction.into_inner();
    validate(&new_transaction)?;

    transaction_repo
        .create_new_transaction(session.id(), new_transaction)
        .await?;

    let mut response = HttpResponse::Created();
    if session.is_new() {
        response.cookie(session.cookie());
    }
    Ok(response.finish())
}

#[get("")]
pub async fn get_all_transactions(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    session: Session,
) -> Result<impl Responder, HandlerError> {
    let transactions = transaction_repo.get_all_transactions(session.id()).await?;

    let mut response = HttpResponse::Ok();
    if session.is_new() {
        response.cookie(session.cookie());
    }
    Ok(response.json(TransactionsResponse { transactions }))
}

#[get("/summary")]
pub async fn get_summary(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    session: Session,
) -> Result<impl Responder, HandlerError> {
    let amount = transaction_repo.get_balance(session.id()).await?;

    let mut response = HttpResponse::Ok();
    if session.is_new() {
        response.cookie(session.cookie());
    }
    Ok(response.json(SummaryResponse {
        summary: Summary { amount },
    }))
}

#[get("/{transaction_id}")]
pub async fn get_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    session: Session,
    transaction_id: web::Path<Uuid>,
) -> Result<impl Responder, HandlerError> {
    let transaction = transaction_repo
        .get_transaction(session.id(), transaction_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(TransactionResponse { transaction }))
}

fn validate(new_transaction: &NewTransaction) -> Result<(), HandlerError> {
    if new_transaction.title.trim().is_empty() {
        return Err(HandlerError::Validation(
            "title must not be empty".to_owned(),
        ));
    }
    if !new_transaction.amount.is_finite() || new_transaction.amount < 0.0 {
        return Err(HandlerError::Validation(
            "amount must be a non-negative number".to_owned(),
        ));
    }
    Ok(())
}
