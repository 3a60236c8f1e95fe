use anyhow::Context;
use lattice_steps::{
    utils::{config::Config, logging},
    Application,
};
use tracing::{error, info};

#[actix_rt::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::new().context("Failed to load configuration")?;
    // keep the guard alive so buffered file logs are flushed on exit
    let _guard = logging::init(&config.logging).context("Failed to initialise logging")?;

    info!("Starting Lattice Steps v{}", env!("CARGO_PKG_VERSION"));

    let app = Application::new(config);
    if let Err(e) = app.run().await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Shutdown complete");
    Ok(())
}
