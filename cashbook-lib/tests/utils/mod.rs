use rstest::*;
use std::sync::Arc;
use tracing::info;
use tracing::Level;

use cashbook_repo::transaction_repo::TransactionRepo;

macro_rules! build_app {
    ($transaction_repo:ident) => {{
        let app = App::new()
            .app_data(Data::new($transaction_repo))
            .wrap(cashbook_lib::tracing::create_middleware())
            .service(cashbook_lib::transaction::transaction_service());
        tracing::info!("Built app");
        app
    }};
}

macro_rules! create_transaction {
    (&$service:ident, $new_transaction:expr) => {{
        let request = TestRequest::post()
            .uri("/transactions")
            .set_json(&$new_transaction)
            .to_request();
        let response = test::call_service(&$service, request).await;
        assert_eq!(
            StatusCode::CREATED,
            response.status(),
            "Got {} response when creating transaction",
            response.status()
        );
        response
    }};
    (&$service:ident, $new_transaction:expr, $cookie:expr) => {{
        let request = TestRequest::post()
            .uri("/transactions")
            .set_json(&$new_transaction)
            .cookie($cookie)
            .to_request();
        let response = test::call_service(&$service, request).await;
        assert_eq!(
            StatusCode::CREATED,
            response.status(),
            "Got {} response when creating transaction",
            response.status()
        );
        response
    }};
}

macro_rules! session_cookie {
    ($response:expr) => {{
        $response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == cashbook_lib::session::SESSION_COOKIE)
            .expect("session cookie should be set")
            .into_owned()
    }};
}

#[fixture]
#[once]
pub fn tracing_setup() -> () {
    tracing_subscriber::fmt()
        .pretty()
        .with_max_level(Level::DEBUG)
        .init();
    info!("tracing initialized");
}

#[fixture]
pub fn transaction_repo() -> Arc<dyn TransactionRepo> {
    let (transaction_repo, _health_check) = cashbook_repo::mem_repo::create_repos();
    transaction_repo
}
