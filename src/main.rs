use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use staybook_api::data::mongo::MongoStore;
use staybook_api::infrastructure::config::AppConfig;
use staybook_api::infrastructure::logging::init_logging;
use staybook_api::infrastructure::media::{HttpImageFetcher, MediaStore};
use staybook_api::presentation::handlers::AppState;
use staybook_api::presentation::middleware::RequestTrace;
use staybook_api::presentation::routes::configure;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    info!(database = %config.mongo_db, "Connecting to MongoDB");
    let store = match MongoStore::connect(&config.mongo_url, &config.mongo_db).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            let detail = format!("{:#}", e);
            error!(error = %detail, "Database unreachable, shutting down");
            std::process::exit(1);
        }
    };

    let fetcher = HttpImageFetcher::new(config.download_timeout).map_err(std::io::Error::other)?;
    let media = MediaStore::new(config.upload_dir.clone(), Arc::new(fetcher));
    media.ensure_dir().await.map_err(std::io::Error::other)?;
    info!(dir = %config.upload_dir.display(), "Upload directory ready");

    info!(hardened = config.api_mode.is_hardened(), "API contract selected");
    let state = web::Data::new(AppState::new(store, config.api_mode.clone(), media));

    let upload_dir = config.upload_dir.clone();
    let cors_origin = config.cors_origin.clone();
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "PUT"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .supports_credentials();

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(RequestTrace)
            .configure(configure(upload_dir.clone()))
    });

    let server = server.bind((config.host.as_str(), config.port))?;
    info!(host = %config.host, port = config.port, "Server running");
    server.run().await
}
