use actix_web::{
    error::InternalError,
    web::{self, Data, Json, Path},
    HttpResponse, Scope,
};
use tracing::{error, info, warn};

use crate::{
    api::types::{
        ErrorResponse, HealthResponse, InitializeRequest, InitializeResponse, PhasesResponse,
        StepRequest, UnsupportedResponse,
    },
    core::{
        crypto::{
            sampling::EngineRng,
            serialization::state_fingerprint,
        },
        reduction::gauss::GAUSS_DIMENSION,
        registry::{Availability, Registry, Scheme},
    },
    utils::error::EngineError,
};

/// Shared, read-only handler state
#[derive(Debug, Clone)]
pub struct EngineState {
    pub registry: Registry,
    pub default_dimension: usize,
}

pub fn scope() -> Scope {
    web::scope("/engine")
        .service(web::resource("/algorithms").route(web::get().to(list_algorithms)))
        .service(web::resource("/algorithms/{name}/phases").route(web::get().to(algorithm_phases)))
        .service(web::resource("/initialize").route(web::post().to(initialize)))
        .service(web::resource("/step").route(web::post().to(step)))
}

/// All engine routes plus `/health`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(scope())
        .service(web::resource("/health").route(web::get().to(health)));
}

fn into_http_error(err: EngineError) -> actix_web::Error {
    let body = ErrorResponse {
        error: err.to_string(),
    };
    let response = if err.is_client_error() {
        warn!("Rejected engine request: {}", err);
        HttpResponse::BadRequest().json(body)
    } else {
        error!("Engine request failed: {}", err);
        HttpResponse::InternalServerError().json(body)
    };
    InternalError::from_response(err, response).into()
}

async fn list_algorithms(engine: Data<EngineState>) -> HttpResponse {
    HttpResponse::Ok().json(engine.registry.catalog())
}

async fn algorithm_phases(engine: Data<EngineState>, name: Path<String>) -> HttpResponse {
    match engine.registry.step_phases(&name) {
        Availability::Ready(phases) => HttpResponse::Ok().json(PhasesResponse {
            algorithm: name.into_inner(),
            max_steps: phases.max_step(),
            phases,
        }),
        Availability::Unsupported(unsupported) => {
            HttpResponse::UnprocessableEntity().json(UnsupportedResponse::from(unsupported))
        }
    }
}

async fn initialize(
    engine: Data<EngineState>,
    request: Json<InitializeRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    let request = request.into_inner();
    let dimension = request.dimension.unwrap_or(match Scheme::from_name(&request.algorithm) {
        Some(Scheme::GaussReduction) => GAUSS_DIMENSION,
        _ => engine.default_dimension,
    });
    info!(algorithm = %request.algorithm, dimension, "Received initialize request");

    // rejection sampling is unbounded, keep it off the worker thread
    let registry = engine.registry.clone();
    let algorithm = request.algorithm.clone();
    let availability = tokio::task::spawn_blocking(move || {
        let mut rng = EngineRng::from_system()?;
        registry.initialize(&algorithm, dimension, &mut rng)
    })
    .await
    .map_err(|e| into_http_error(EngineError::Server(e.to_string())))?
    .map_err(into_http_error)?;

    let state = match availability {
        Availability::Ready(state) => state,
        Availability::Unsupported(unsupported) => {
            return Ok(HttpResponse::UnprocessableEntity().json(UnsupportedResponse::from(unsupported)))
        }
    };

    let fingerprint = state_fingerprint(&state).map_err(into_http_error)?;
    let max_steps = engine
        .registry
        .max_steps(state.algorithm())
        .ready()
        .unwrap_or_default();
    info!(%fingerprint, "Initialized session state");

    Ok(HttpResponse::Ok().json(InitializeResponse {
        status: "ready".to_string(),
        state,
        fingerprint,
        max_steps,
    }))
}

async fn step(
    engine: Data<EngineState>,
    request: Json<StepRequest>,
) -> Result<HttpResponse, actix_web::Error> {
    let request = request.into_inner();
    let state = engine.registry.load_state(request.state).map_err(into_http_error)?;
    let view = engine
        .registry
        .advance(request.step, &state)
        .map_err(into_http_error)?;

    Ok(HttpResponse::Ok().json(view))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
