#[macro_use]
extern crate tracing;
extern crate serde_json;

use std::error::Error;
use std::path::PathBuf;

use actix_web::error::JsonPayloadError;
use actix_web::web::Data;
use actix_web::{web, App};
use actix_web::{HttpResponse, HttpServer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;

use cashbook_lib::config::Config;
use cashbook_lib::{health, transaction};
use cashbook_repo::migrations::Migrator;

const LISTEN_ADDR: &str = "0.0.0.0:3333";

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = registry::Registry::default()
        .with(LevelFilter::INFO)
        .with(tracing_subscriber::fmt::Layer::default());
    tracing::subscriber::set_global_default(subscriber).expect("set up subscriber");
    info!("tracing initialized");

    let config = load_config()?;

    let pool = cashbook_repo::sqlx_repo::create_pool(&config.database_url, 10).await?;
    Migrator::new(pool.clone()).run().await?;
    let (transaction_repo, health_check) = cashbook_repo::sqlx_repo::create_repos(pool);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(Data::new(transaction_repo.clone()))
            .app_data(Data::new(health_check.clone()))
            .wrap(cashbook_lib::tracing::create_middleware())
            .service(transaction::transaction_service())
            .service(health::health)
            .app_data(web::JsonConfig::default().error_handler(|err, req| {
                error!(req_path = req.path(), %err);
                match err {
                    JsonPayloadError::Deserialize(deserialize_err) => {
                        let error_body = serde_json::json!({
                            "error": "Unable to parse JSON payload",
                            "detail": format!("{}", deserialize_err),
                        });
                        actix_web::error::InternalError::from_response(
                            deserialize_err,
                            HttpResponse::BadRequest()
                                .content_type("application/json")
                                .body(error_body.to_string()),
                        )
                        .into()
                    }
                    _ => err.into(),
                }
            }))
    })
    .bind(LISTEN_ADDR)?;
    info!(addr = LISTEN_ADDR, "Listening");
    server.run().await?;

    Ok(())
}

fn load_config() -> Result<Config, anyhow::Error> {
    if let Some(path) = find_config_file() {
        return Config::from_file(path);
    }
    Config::from_env()
}

fn find_config_file() -> Option<PathBuf> {
    let config_current_dir = PathBuf::from("config.toml");
    if config_current_dir.exists() {
        return Some(config_current_dir);
    }
    if let Ok(config_env) = std::env::var("CONFIGURATION_DIRECTORY") {
        let config_path = PathBuf::from(config_env).join("config.toml");
        if config_path.exists() {
            return Some(config_path);
        }
    }
    None
}
