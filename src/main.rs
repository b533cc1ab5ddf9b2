use portfolio_tabs::{router, source::HttpSnapshotSource, AppState, Config, RefreshController};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    let source = HttpSnapshotSource::new(
        &config.upstream_url,
        &config.timescale_path,
        config.upstream_cookie.clone(),
        config.upstream_timeout,
    )?;
    info!(endpoint = source.endpoint(), "fetching range snapshots");

    let controller = RefreshController::new(source, config.display.clone());
    let app = router(AppState::new(controller, config.default_range));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    Ok(())
}
