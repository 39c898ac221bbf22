use tenantry::server::{
    config::Config,
    error::Error,
    model::app::AppState,
    router, scheduler::Scheduler,
    service::rate_limit::RateLimiter,
    startup,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        tracing::error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Error> {
    let session = startup::connect_to_session(&config).await?;
    let db = startup::connect_to_database(&config).await?;
    let rate_limit_pool = startup::connect_to_rate_limiter(&config).await?;
    let mail = startup::start_workers(&config).await?;

    let state = AppState {
        db: db.clone(),
        mail,
        rate_limiter: RateLimiter::new(rate_limit_pool),
        app_url: config.app_url.clone(),
    };

    startup::bootstrap_admin(&config, &state).await?;

    Scheduler::new(db).await?.start().await?;

    let app = router::routes()
        .with_state(state)
        .layer(session)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
