use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use rideshare_service::db::{
    PgPostRepository, PgReportRepository, PgSessionStore, PgUserRepository,
};
use rideshare_service::services::{FcmNotifier, GoogleVerifier, Notifier, NullNotifier};
use rideshare_service::{handlers, AppState, Config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!("starting rideshare-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("environment: {}", config.app.env);

    let pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("database pool creation failed: {e:#}");
            std::process::exit(1);
        }
    };

    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        tracing::error!("migrations failed: {e:#}");
        std::process::exit(1);
    }
    tracing::info!("connected to database, migrations applied");

    let notifier: Arc<dyn Notifier> = match config.push.fcm_server_key.clone() {
        Some(key) => Arc::new(FcmNotifier::new(key)),
        None => {
            tracing::warn!("FCM_SERVER_KEY not set; push notifications are disabled");
            Arc::new(NullNotifier)
        }
    };

    let state = AppState {
        users: Arc::new(PgUserRepository::new(pool.clone())),
        posts: Arc::new(PgPostRepository::new(pool.clone())),
        reports: Arc::new(PgReportRepository::new(pool.clone())),
        sessions: Arc::new(PgSessionStore::new(pool, config.session.ttl_days)),
        verifier: Arc::new(GoogleVerifier::new(config.auth.google_client_id.clone())),
        notifier,
    };

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("listening on {bind_address}");

    let allowed_origins = config.cors.allowed_origins.clone();
    HttpServer::new(move || {
        let mut cors = Cors::default();
        let mut any_origin = false;
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
                any_origin = true;
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);
        // Credentialed CORS is incompatible with a wildcard origin.
        if !any_origin {
            cors = cors.supports_credentials();
        }

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .run()
    .await
}
