use actix_web::{get, web, HttpResponse, Responder};
use cashbook_repo::HealthCheck;
use std::sync::Arc;

#[get("/health")]
pub async fn health(health_check: web::Data<Arc<dyn HealthCheck>>) -> impl Responder {
    if health_check.check().await {
        HttpResponse::Ok().finish()
    } else {
        HttpResponse::ServiceUnavailable().finish()
    }
}
