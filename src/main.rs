use dataset_platform_api::{app, config::AppConfig, database, state::AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    tracing::info!(
        "Starting Dataset Platform API in {:?} mode",
        config.environment
    );

    if config.security.jwt_secret.is_empty() {
        panic!("JWT_SECRET must be set outside development");
    }

    let pool = database::manager::connect(&config.database)
        .unwrap_or_else(|e| panic!("failed to create database pool: {}", e));

    database::manager::create_tables(&pool)
        .await
        .unwrap_or_else(|e| panic!("failed to bootstrap database schema: {}", e));

    let state = AppState::new(config, pool);
    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Dataset Platform API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
