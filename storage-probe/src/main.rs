use std::net::SocketAddr;

use anyhow::Result;
use log::info;
use storage_probe::azure::DefaultCredentialProvider;
use storage_probe::host::{self, HostState};
use storage_probe::{default_context, AccessProber, Context, FunctionConfig, OsEnv};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = FunctionConfig::from_env(&Context::new().with_env(OsEnv))?;
    let ctx = default_context(config.timeout)?;
    let prober = AccessProber::new(ctx, DefaultCredentialProvider::new(), config.blob.clone());
    let app = host::router(HostState::new(prober, config.trigger_path.clone()));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = TcpListener::bind(addr).await?;
    let trigger_path = config.trigger_path.to_string();
    info!(
        trigger_path = trigger_path.as_str(),
        timeout_secs = config.timeout.as_secs();
        "storage probe listening on {addr}"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
