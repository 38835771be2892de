use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use actix_web::test::TestRequest;
use actix_web::web::Data;
use actix_web::App;
use rstest::rstest;

use cashbook_lib::transaction::SummaryResponse;
use cashbook_repo::transaction_repo::{NewTransaction, TransactionRepo, TransactionType};
use utils::tracing_setup;
use utils::transaction_repo;

#[macro_use]
mod utils;

#[rstest]
#[actix_rt::test]
async fn test_summary_without_transactions_is_zero(
    _tracing_setup: &(),
    transaction_repo: Arc<dyn TransactionRepo>,
) {
    let app = build_app!(transaction_repo);
    let service = test::init_service(app).await;

    let request = TestRequest::get().uri("/transactions/summary").to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: SummaryResponse = test::read_body_json(response).await;
    assert_eq!(body.summary.amount, 0.0);
}

#[rstest]
#[actix_rt::test]
async fn test_summary_after_credit(
    _tracing_setup: &(),
    transaction_repo: Arc<dyn TransactionRepo>,
) {
    let app = build_app!(transaction_repo);
    let service = test::init_service(app).await;

    let new_transaction = NewTransaction::new(
        "New Transaction".to_string(),
        100.0,
        TransactionType::Credit,
    );
    let response = create_transaction!(&service, new_transaction);
    let cookie = session_cookie!(response);

    let request = TestRequest::get()
        .uri("/transactions/summary")
        .cookie(cookie)
        .to_request();
    let response = test::call_service(&service, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: SummaryResponse = test::read_body_json(response).await;
    assert_eq!(body.summary.amount, 100.0);
}

#[rstest]
#[actix_rt::test]
async fn test_summary_nets_credits_and_debits(
    _tracing_setup: &(),
    transaction_repo: Arc<dyn TransactionRepo>,
) {
    let app = build_app!(transaction_repo);
    let service = test::init_service(app).await;

    let credit = NewTransaction::new("Salary".to_string(), 100.0, TransactionType::Credit);
    let response = create_transaction!(&service, credit);
    let cookie = session_cookie!(response);

    let debit = NewTransaction::new("Groceries".to_string(), 40.0, TransactionType::Debit);
    create_transaction!(&service, debit, cookie.clone());

    let request = TestRequest::get()
        .uri("/transactions/summary")
        .cookie(cookie)
        .to_request();
    let response = test::call_service(&service, request).await;
    let body: SummaryResponse = test::read_body_json(response).await;
    assert_eq!(body.summary.amount, 60.0);
}

#[rstest]
#[actix_rt::test]
async fn test_summary_scoped_to_session(
    _tracing_setup: &(),
    transaction_repo: Arc<dyn TransactionRepo>,
) {
    let app = build_app!(transaction_repo);
    let service = test::init_service(app).await;

    let credit = NewTransaction::new("Salary".to_string(), 100.0, TransactionType::Credit);
    create_transaction!(&service, credit);

    let request = TestRequest::get().uri("/transactions/summary").to_request();
    let response = test::call_service(&service, request).await;
    let body: SummaryResponse = test::read_body_json(response).await;
    assert_eq!(body.summary.amount, 0.0);
}
