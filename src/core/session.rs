// src/core/session.rs
use tracing::{debug, info, info_span};
use uuid::Uuid;

use crate::{
    core::{
        crypto::{sampling::EngineRng, types::SessionState},
        registry::{Availability, Registry},
        steps::render::StepView,
    },
    utils::error::{EngineError, Result},
};

/// Caller-side step counter over one snapshot, with next and reset
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    algorithm: String,
    max_step: usize,
    step: usize,
    state: Option<SessionState>,
}

impl Session {
    pub fn start(
        registry: &Registry,
        name: &str,
        dimension: usize,
        rng: &mut EngineRng,
    ) -> Result<Availability<Session>> {
        let id = Uuid::new_v4();
        let span = info_span!("session", %id);
        let _enter = span.enter();

        let state = match registry.initialize(name, dimension, rng)? {
            Availability::Ready(state) => state,
            Availability::Unsupported(unsupported) => return Ok(Availability::Unsupported(unsupported)),
        };
        let max_step = match registry.max_steps(state.algorithm()) {
            Availability::Ready(max_step) => max_step,
            Availability::Unsupported(unsupported) => return Ok(Availability::Unsupported(unsupported)),
        };

        info!(algorithm = state.algorithm(), max_step, "Session started");
        Ok(Availability::Ready(Session {
            id,
            algorithm: state.algorithm().to_string(),
            max_step,
            step: 0,
            state: Some(state),
        }))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn max_step(&self) -> usize {
        self.max_step
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.state.as_ref()
    }

    /// Move to the next step, wrapping to 1 after the last one
    pub fn advance(&mut self, registry: &Registry) -> Result<StepView> {
        let next = if self.step >= self.max_step { 1 } else { self.step + 1 };
        let view = self.render(registry, next)?;
        self.step = next;
        Ok(view)
    }

    /// Jump to `step` and render it
    pub fn rewind_to(&mut self, registry: &Registry, step: usize) -> Result<StepView> {
        let view = self.render(registry, step)?;
        self.step = step;
        Ok(view)
    }

    pub fn reset(&mut self) {
        debug!(id = %self.id, "Session reset");
        self.state = None;
        self.step = 0;
    }

    fn render(&self, registry: &Registry, step: usize) -> Result<StepView> {
        let state = self.state.as_ref().ok_or(EngineError::NoSession)?;
        let span = info_span!("session", id = %self.id, step);
        let _enter = span.enter();
        registry.advance(step, state)
    }
}
