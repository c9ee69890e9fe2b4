use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::{Context, anyhow};
use tracing_subscriber::fmt::writer::MakeWriterExt;

mod api;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod routes;
mod utils;

use config::Config;
use db::{init_db, run_migrations};

use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Payslip service is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log, mirrored to stdout
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking.and(std::io::stdout))
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("Failed to apply database migrations")?;

    info!("Connected to PostgreSQL database");

    let rate_limit = routes::build_rate_limit(config.rate_per_min)
        .ok_or_else(|| anyhow!("RATE_PER_MIN must be greater than zero"))?;

    let server_addr = config.server_addr.clone();
    info!(%server_addr, api_prefix = %config.api_prefix, "Listening");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(routes::json_config())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config, &rate_limit))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
