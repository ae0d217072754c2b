//! Applies module migrations exactly once per database.

use shelf_kernel::Migration;
use sqlx::postgres::PgPool;

use crate::store::DbError;

const BOOKKEEPING_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    module     TEXT        NOT NULL,
    id         TEXT        NOT NULL,
    applied_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (module, id)
)";

/// Apply every migration not yet recorded in `schema_migrations`, each in its
/// own transaction. Returns how many were applied.
pub async fn migrate(pool: &PgPool, migrations: &[(String, Migration)]) -> Result<usize, DbError> {
    sqlx::raw_sql(BOOKKEEPING_TABLE)
        .execute(pool)
        .await
        .map_err(|err| DbError::query("create schema_migrations", err))?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let wrap = |source| DbError::Migration {
            module: module.clone(),
            id: migration.id.to_string(),
            source,
        };

        let done: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM schema_migrations WHERE module = $1 AND id = $2)",
        )
        .bind(module.as_str())
        .bind(migration.id)
        .fetch_one(pool)
        .await
        .map_err(wrap)?;

        if done {
            tracing::debug!(
                target: "shelf-db",
                %module,
                id = migration.id,
                "migration already applied"
            );
            continue;
        }

        let mut tx = pool.begin().await.map_err(wrap)?;
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(wrap)?;
        sqlx::query("INSERT INTO schema_migrations (module, id) VALUES ($1, $2)")
            .bind(module.as_str())
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .map_err(wrap)?;
        tx.commit().await.map_err(wrap)?;

        tracing::info!(target: "shelf-db", %module, id = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
