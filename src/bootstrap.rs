use anyhow::Context;
use tokio::net::TcpListener;

use crate::{
    application::task_usecase::TaskUsecaseImpl,
    config::{Config, DatabaseConfig, ServerConfig},
    domain::repository::TaskRepository,
    http::{routes::tasks, routing},
    infrastructure::{postgres_repo::PgTaskRepository, sqlite_repo::SqliteTaskRepository},
};

/// Connects the configured store and serves HTTP until Ctrl-C.
pub async fn run(config: Config) -> anyhow::Result<()> {
    match &config.database {
        DatabaseConfig::Postgres(pg) => {
            let options = pg.connect_options().context("invalid PostgreSQL settings")?;
            let repo = PgTaskRepository::connect(options).await.context("connecting to PostgreSQL")?;
            repo.ensure_schema().await.context("creating task table")?;
            tracing::info!(backend = "postgres", "connected to database");
            serve(&config.server, repo).await
        }
        DatabaseConfig::Sqlite { url } => {
            let repo = SqliteTaskRepository::connect(url).await.with_context(|| format!("opening {url}"))?;
            repo.ensure_schema().await.context("creating task table")?;
            tracing::info!(backend = "sqlite", %url, "connected to database");
            serve(&config.server, repo).await
        }
    }
}

async fn serve<R: TaskRepository>(server: &ServerConfig, repo: R) -> anyhow::Result<()> {
    let usecase = TaskUsecaseImpl::new(repo);
    let router = routing::app(tasks::router(tasks::AppState::new(usecase)));

    let addr = server.addr();
    let listener = TcpListener::bind(addr).await.with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}
