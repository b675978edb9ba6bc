mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::io;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::database::{MongoDB, MongoUserStore};
use crate::middleware::TokenVerifier;
use crate::services::UserService;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        io::Error::other(e.to_string())
    })?;

    log::info!("🚀 Starting User Records Service...");
    log::info!("📊 Database: {} / {}", config.database_name, config.user_collection);

    let db = MongoDB::new(&config.database_url, &config.database_name)
        .await
        .map_err(|e| {
            log::error!("❌ Failed to connect to MongoDB: {}", e);
            io::Error::other(e.to_string())
        })?;

    log::info!("✅ MongoDB connected successfully");

    if let Err(e) = db.ensure_indexes(&config.user_collection).await {
        log::warn!("⚠️  Could not create indexes: {}", e);
    }

    let store = Arc::new(MongoUserStore::new(&db, &config.user_collection));
    let service = web::Data::new(UserService::new(store));
    let verifier = Arc::new(TokenVerifier::new(&config.jwt_secret));
    let origins = config.allowed_origins.clone();

    let bind = config.bind_address();
    log::info!("🌐 Server starting on {}", bind);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind);
    log::info!("📄 OpenAPI spec at: http://{}/api-docs/openapi.json", bind);

    HttpServer::new(move || {
        let cors = origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .expose_headers(vec![header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        let verifier = verifier.clone();

        App::new()
            .app_data(service.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", api::swagger::ApiDoc::openapi()),
            )
            .configure(move |cfg| api::configure(cfg, verifier))
    })
    .bind(bind)?
    .run()
    .await
}
