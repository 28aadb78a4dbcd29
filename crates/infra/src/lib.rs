mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, VapidConfig};
use repos::Repos;
pub use repos::TimeWindow;
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
use tracing::warn;

#[derive(Clone)]
pub struct Context {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub push: Arc<dyn IPushTransport>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl Context {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let config = Config::new();
        let push = create_push_transport(&config);
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            push,
        }
    }
}

fn create_push_transport(config: &Config) -> Arc<dyn IPushTransport> {
    if config.vapid.private_key_pem.is_none() {
        return Arc::new(DisabledPushTransport);
    }
    match WebPushTransport::new(&config.vapid, config.delivery_send_timeout_secs) {
        Ok(transport) => Arc::new(transport),
        Err(e) => {
            warn!(
                "Invalid VAPID key material, push delivery is disabled: {:?}",
                e
            );
            Arc::new(DisabledPushTransport)
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> Context {
    Context::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

/// Context backed entirely by inmemory repositories and a recording
/// push transport. Used by tests.
pub fn setup_context_inmemory() -> Context {
    Context {
        repos: Repos::create_inmemory(),
        config: Config::new(),
        sys: Arc::new(RealSys {}),
        push: Arc::new(InMemoryPushTransport::new()),
    }
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
