use anyhow::Result;
use stayfinder::web::{router, AppConfig};
use tokio::net::TcpListener;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env()?;
    let listen_addr = config.listen_addr().to_string();

    let app = router(config);

    let listener = TcpListener::bind(&listen_addr).await?;
    tracing::info!(%listen_addr, "stayfinder listening");

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
