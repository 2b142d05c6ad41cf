use olympix_dashboard::{ApiClient, AppState, Config, router, shutdown_on};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let api = ApiClient::new(&config.api)?;
    info!("analytics api at {}", api.base_url());

    let state = AppState::new(api);
    let store = state.store.clone();
    tokio::spawn(async move {
        store.bootstrap().await;
        info!("initial data load finished");
    });

    let app = router(state);
    let addr = config.bind_addr();

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await?;

    Ok(())
}
