//! Data access for shelf: the PostgreSQL connection factory, the narrow
//! author store interface consumed by HTTP handlers, and the migration runner.

pub mod migrate;
pub mod postgres;
pub mod store;

use std::time::Duration;

use shelf_kernel::settings::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

pub use migrate::migrate;
pub use postgres::PgAuthorStore;
pub use sqlx;
pub use store::{AuthorConnection, AuthorRecord, AuthorStore, BookRecord, DbError, Lookup};

/// Translate settings into driver connection options.
pub fn connect_options(settings: &DatabaseSettings) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(&settings.name)
}

/// Build a pool that opens connections on first use, so an unreachable store
/// surfaces per request instead of at startup. Must run inside a Tokio runtime.
pub fn connect_lazy(settings: &DatabaseSettings) -> PgPool {
    tracing::info!(
        target: "shelf-db",
        endpoint = %settings.endpoint(),
        max_connections = settings.max_connections,
        "configuring database pool"
    );

    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_millis(settings.acquire_timeout_ms))
        .connect_lazy_with(connect_options(settings))
}
