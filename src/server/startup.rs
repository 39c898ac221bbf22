//! Connection setup and background service startup.

use apalis_redis::RedisStorage;
use tower_sessions::SessionManagerLayer;
use tower_sessions_redis_store::RedisStore;

use crate::server::{
    config::Config,
    error::Error,
    model::{app::AppState, worker::WorkerJob},
    service::{
        auth::AuthService,
        mail::{MailDispatch, Mailer},
    },
    worker::handle_job,
};

/// Connect to the database and run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, Error> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Connect to Valkey/Redis and configure session management
pub async fn connect_to_session(
    config: &Config,
) -> Result<SessionManagerLayer<RedisStore<tower_sessions_redis_store::fred::prelude::Pool>>, Error>
{
    use time::Duration;
    use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};
    use tower_sessions_redis_store::fred::prelude::*;

    let config = Config::from_url(&config.valkey_url)?;
    let pool = tower_sessions_redis_store::fred::prelude::Pool::new(config, None, None, None, 6)?;

    pool.connect();
    pool.wait_for_connect().await?;

    let session_store = RedisStore::new(pool);

    // Plain HTTP cookies in debug builds only
    let secure_cookies = !cfg!(debug_assertions);

    let session = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(7)));

    Ok(session)
}

/// Connect to Redis for rate-limit counters
pub async fn connect_to_rate_limiter(config: &Config) -> Result<fred::prelude::Pool, Error> {
    use fred::prelude::*;

    let redis_config = Config::from_url(&config.valkey_url)?;
    let pool = Pool::new(redis_config, None, None, None, 6)?;

    pool.connect();
    pool.wait_for_connect().await?;

    Ok(pool)
}

/// Start the e-mail worker and return the queue handlers push jobs onto
pub async fn start_workers(config: &Config) -> Result<MailDispatch, Error> {
    use apalis::prelude::*;

    let conn = apalis_redis::connect(config.valkey_url.to_string()).await?;
    let storage: RedisStorage<WorkerJob> = RedisStorage::new(conn);
    let workers = config.workers;
    let mailer = Mailer::from_config(config);

    let storage_clone = storage.clone();

    let _ = tokio::spawn(async move {
        WorkerBuilder::new("tenantry-mail-worker")
            .concurrency(workers)
            .data(mailer)
            .backend(storage_clone)
            .build_fn(handle_job)
            .run()
            .await;
    });

    Ok(MailDispatch::Queue(storage))
}

/// Create the configured admin account if it doesn't exist yet
pub async fn bootstrap_admin(config: &Config, state: &AppState) -> Result<(), Error> {
    let Some(admin_email) = &config.admin_email else {
        return Ok(());
    };

    AuthService::new(&state.db, &state.mail, &state.rate_limiter)
        .bootstrap_admin(admin_email)
        .await?;

    Ok(())
}
