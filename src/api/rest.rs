// src/api/rest.rs
use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web::Data, App, HttpServer};
use tracing::info;

use crate::{
    api::handlers::engine::{self, EngineState},
    core::registry::Registry,
    utils::{
        config::Config,
        error::{EngineError, Result},
    },
};

pub struct RestApi {
    host: String,
    port: u16,
    allowed_origins: Vec<String>,
    state: EngineState,
}

impl RestApi {
    pub fn new(config: &Config) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            allowed_origins: config.server.allowed_origins.clone(),
            state: EngineState {
                registry: Registry::new(config.ggh_params()),
                default_dimension: config.engine.default_dimension,
            },
        }
    }

    pub async fn start(&self) -> Result<()> {
        let state = Data::new(self.state.clone());
        let origins = self.allowed_origins.clone();

        info!("Listening on {}:{}", self.host, self.port);
        HttpServer::new(move || {
            App::new()
                .wrap(cors(&origins))
                .wrap(Logger::default())
                .app_data(state.clone())
                .configure(engine::configure)
        })
        .bind((self.host.as_str(), self.port))
        .map_err(|e| EngineError::Server(format!("Failed to bind API server: {}", e)))?
        .run()
        .await
        .map_err(|e| EngineError::Server(e.to_string()))?;

        Ok(())
    }
}

/// `*` allows any origin; an empty list allows none
fn cors(origins: &[String]) -> Cors {
    if origins.iter().any(|o| o == "*") {
        return Cors::permissive();
    }

    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}
