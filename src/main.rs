use tracing_subscriber::EnvFilter;

use latchkey::config::Config;
use latchkey::db::{self, AppState};
use latchkey::{audit, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("latchkey=info,tower_http=info")),
        )
        .init();

    let pool = db::init_pool(&config.database_path)?;

    if config.audit_log_retention_days > 0 {
        let purged =
            audit::purge_old_user_audit_logs(&*pool.get()?, config.audit_log_retention_days)?;
        if purged > 0 {
            tracing::info!(purged, "purged aged end-user audit rows");
        }
    }

    let app = routes::router(AppState { db: pool });

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
