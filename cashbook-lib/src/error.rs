use actix_web::body::BoxBody;
use actix_web::{HttpResponse, ResponseError};
use cashbook_repo::transaction_repo::TransactionRepoError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Repo(#[from] TransactionRepoError),
}

impl ResponseError for HandlerError {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            HandlerError::Validation(message) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
            }
            HandlerError::Repo(TransactionRepoError::TransactionNotFound(_)) => {
                HttpResponse::NotFound().finish()
            }
            HandlerError::Repo(TransactionRepoError::Other(e)) => {
                error!(%e, "Storage error while handling request");
                HttpResponse::InternalServerError().finish()
            }
        }
    }
}
