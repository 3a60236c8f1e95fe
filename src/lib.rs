//! Step-by-step lattice cryptography engine.
//!
//! [`Registry`](crate::core::registry::Registry) is the entry point: it creates a
//! [`SessionState`](crate::core::crypto::SessionState) for a named algorithm and renders any step
//! of it as a [`StepView`](crate::core::steps::StepView). The state is plain data, so callers
//! keep it between steps and send it back.

pub mod api;
pub mod core;
pub mod utils;

use tracing::info;

use crate::{
    api::RestApi,
    utils::{config::Config, error::Result},
};

pub struct Application {
    config: Config,
    api: RestApi,
}

impl Application {
    pub fn new(config: Config) -> Self {
        let api = RestApi::new(&config);
        Self { config, api }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Serve until the server stops or receives a shutdown signal
    pub async fn run(&self) -> Result<()> {
        info!(
            max_dimension = self.config.engine.max_dimension,
            default_dimension = self.config.engine.default_dimension,
            "Starting API server"
        );
        self.api.start().await?;
        info!("API server stopped");
        Ok(())
    }
}
