use std::sync::Arc;

use auth::Authenticator;
use auth::SystemClock;
use chirpy_service::config::Config;
use chirpy_service::domain::chirp::service::ChirpService;
use chirpy_service::domain::metrics::HitCounter;
use chirpy_service::domain::user::service::UserService;
use chirpy_service::inbound::http::router::create_router;
use chirpy_service::inbound::http::router::AppState;
use chirpy_service::outbound::repositories::PostgresChirpRepository;
use chirpy_service::outbound::repositories::PostgresRefreshTokenStore;
use chirpy_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const MAX_DB_CONNECTIONS: u32 = 5;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chirpy_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "chirpy-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        filepath_root = %config.server.filepath_root,
        platform = %config.platform,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(MAX_DB_CONNECTIONS)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = MAX_DB_CONNECTIONS,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let refresh_token_store = Arc::new(PostgresRefreshTokenStore::new(pg_pool.clone()));
    let authenticator = Arc::new(Authenticator::new(
        config.auth(),
        refresh_token_store,
        Arc::new(SystemClock),
    ));

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let chirp_repository = Arc::new(PostgresChirpRepository::new(pg_pool));

    let state = AppState {
        user_service: Arc::new(UserService::new(user_repository)),
        chirp_service: Arc::new(ChirpService::new(chirp_repository)),
        authenticator,
        hits: Arc::new(HitCounter::new()),
        platform: config.platform.clone(),
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(state, &config.server.filepath_root);

    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
