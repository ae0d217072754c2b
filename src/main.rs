use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_db::PgAuthorStore;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

#[derive(Debug, Parser)]
#[command(name = "shelf-app", version, about = "Author and bibliography lookup service")]
struct Cli {
    /// Address to listen on, overriding server.host/server.port
    #[arg(short, long, value_name = "HOST:PORT", global = true)]
    address: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Apply pending schema migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load shelf settings")?;
    shelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.endpoint(),
        "shelf-app bootstrap starting"
    );

    let pool = shelf_db::connect_lazy(&settings.database);
    let mut registry = ModuleRegistry::new();
    shelf_app::register_all(&mut registry, Arc::new(PgAuthorStore::new(pool.clone())));

    let outcome = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&registry, &settings, cli.address).await,
        Command::Migrate => migrate(&registry, &pool).await,
    };

    pool.close().await;
    outcome
}

async fn serve(
    registry: &ModuleRegistry,
    settings: &Settings,
    address: Option<String>,
) -> anyhow::Result<()> {
    let ctx = InitCtx { settings };
    registry.init_modules(&ctx).await?;

    let address = address.unwrap_or_else(|| settings.server.address());
    let app = shelf_http::build_router(registry, settings);
    tracing::info!("shelf-app bootstrap complete");

    shelf_http::start_server(app, &address).await?;
    registry.stop_modules().await
}

async fn migrate(registry: &ModuleRegistry, pool: &shelf_db::sqlx::PgPool) -> anyhow::Result<()> {
    let migrations = registry.collect_migrations();
    let applied = shelf_db::migrate(pool, &migrations)
        .await
        .context("failed to apply migrations")?;

    tracing::info!(applied, pending = migrations.len(), "migrations complete");
    Ok(())
}
