// src/core/registry.rs
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    core::{
        crypto::{
            ggh::{Ggh, GghParams},
            sampling::EngineRng,
            serialization::state_from_value,
            types::SessionState,
        },
        reduction::gauss::GaussReduction,
        steps::{self, phases::PhaseTable, render::StepView},
    },
    utils::error::{EngineError, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Cryptosystem,
    ReductionMethod,
}

/// Every scheme the catalog knows about, implemented or not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Ggh,
    Lwe,
    Alkaline,
    GaussReduction,
    Lll,
    Bkz,
}

impl Scheme {
    pub const ALL: [Scheme; 6] = [
        Scheme::Ggh,
        Scheme::Lwe,
        Scheme::Alkaline,
        Scheme::GaussReduction,
        Scheme::Lll,
        Scheme::Bkz,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().to_lowercase();
        // label used by the Portuguese catalog
        if wanted == "redução de gauss" {
            return Some(Scheme::GaussReduction);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|scheme| scheme.name().to_lowercase() == wanted)
    }

    pub fn name(self) -> &'static str {
        match self {
            Scheme::Ggh => "GGH",
            Scheme::Lwe => "LWE",
            Scheme::Alkaline => "Alkaline",
            Scheme::GaussReduction => "Gauss Reduction",
            Scheme::Lll => "LLL",
            Scheme::Bkz => "BKZ",
        }
    }

    pub fn family(self) -> Family {
        match self {
            Scheme::Ggh | Scheme::Lwe | Scheme::Alkaline => Family::Cryptosystem,
            Scheme::GaussReduction | Scheme::Lll | Scheme::Bkz => Family::ReductionMethod,
        }
    }

    pub fn engine(self, params: &GghParams) -> Option<Engine> {
        match self {
            Scheme::Ggh => Some(Engine::Ggh(Ggh::new(*params))),
            Scheme::GaussReduction => Some(Engine::GaussReduction(GaussReduction::new(params.max_scale))),
            Scheme::Lwe | Scheme::Alkaline | Scheme::Lll | Scheme::Bkz => None,
        }
    }
}

/// Implemented engines
#[derive(Debug, Clone)]
pub enum Engine {
    Ggh(Ggh),
    GaussReduction(GaussReduction),
}

impl Engine {
    pub fn initialize(&self, dimension: usize, rng: &mut EngineRng) -> Result<SessionState> {
        match self {
            Engine::Ggh(ggh) => ggh.initialize(dimension, rng).map(SessionState::Ggh),
            Engine::GaussReduction(gauss) => gauss.initialize(dimension, rng).map(SessionState::GaussReduction),
        }
    }

    pub fn phase_table(&self) -> PhaseTable {
        match self {
            Engine::Ggh(_) => steps::ggh::phase_table(),
            Engine::GaussReduction(_) => steps::gauss::phase_table(),
        }
    }
}

/// A catalog entry with no engine behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unsupported {
    pub name: String,
    /// `None` when the name is not in the catalog at all
    pub family: Option<Family>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Availability<T> {
    Ready(T),
    Unsupported(Unsupported),
}

impl<T> Availability<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Availability::Ready(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Availability::Ready(value) => Some(value),
            Availability::Unsupported(_) => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Availability<U> {
        match self {
            Availability::Ready(value) => Availability::Ready(f(value)),
            Availability::Unsupported(unsupported) => Availability::Unsupported(unsupported),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeInfo {
    pub name: String,
    pub family: Family,
    pub supported: bool,
}

/// Name-based entry point over all engines
#[derive(Debug, Clone, Default)]
pub struct Registry {
    params: GghParams,
}

impl Registry {
    pub fn new(params: GghParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &GghParams {
        &self.params
    }

    pub fn resolve(&self, name: &str) -> Availability<Engine> {
        match Scheme::from_name(name) {
            Some(scheme) => match scheme.engine(&self.params) {
                Some(engine) => Availability::Ready(engine),
                None => Availability::Unsupported(Unsupported {
                    name: scheme.name().to_string(),
                    family: Some(scheme.family()),
                }),
            },
            None => Availability::Unsupported(Unsupported {
                name: name.to_string(),
                family: None,
            }),
        }
    }

    pub fn initialize(
        &self,
        name: &str,
        dimension: usize,
        rng: &mut EngineRng,
    ) -> Result<Availability<SessionState>> {
        match self.resolve(name) {
            Availability::Ready(engine) => {
                let state = engine.initialize(dimension, rng)?;
                info!(algorithm = state.algorithm(), dimension, "Session state created");
                Ok(Availability::Ready(state))
            }
            Availability::Unsupported(unsupported) => {
                debug!(name = %unsupported.name, "Requested scheme is not implemented");
                Ok(Availability::Unsupported(unsupported))
            }
        }
    }

    /// Decode a caller-held blob, refusing dimensions this registry would
    /// never have produced before any matrix work happens
    pub fn load_state(&self, value: serde_json::Value) -> Result<SessionState> {
        let max_dimension = self.params.max_dimension;
        if let Some(dimension) = value.get("dimension").and_then(|d| d.as_u64()) {
            if dimension > max_dimension as u64 {
                return Err(EngineError::InvalidInput(format!(
                    "State dimension {} exceeds the maximum of {}",
                    dimension, max_dimension
                )));
            }
        }
        state_from_value(value)
    }

    /// Render `step` for whichever algorithm produced `state`
    pub fn advance(&self, step: usize, state: &SessionState) -> Result<StepView> {
        match state {
            SessionState::Ggh(state) => steps::ggh::process_step(step, state),
            SessionState::GaussReduction(state) => steps::gauss::process_step(step, state),
        }
    }

    pub fn max_steps(&self, name: &str) -> Availability<usize> {
        self.step_phases(name).map(|table| table.max_step())
    }

    pub fn step_phases(&self, name: &str) -> Availability<PhaseTable> {
        self.resolve(name).map(|engine| engine.phase_table())
    }

    pub fn catalog(&self) -> Vec<SchemeInfo> {
        Scheme::ALL
            .iter()
            .map(|&scheme| SchemeInfo {
                name: scheme.name().to_string(),
                family: scheme.family(),
                supported: scheme.engine(&self.params).is_some(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_resolve_case_insensitively() {
        assert_eq!(Scheme::from_name("ggh"), Some(Scheme::Ggh));
        assert_eq!(Scheme::from_name(" GAUSS REDUCTION "), Some(Scheme::GaussReduction));
        assert_eq!(Scheme::from_name("Redução de Gauss"), Some(Scheme::GaussReduction));
        assert_eq!(Scheme::from_name("lll"), Some(Scheme::Lll));
        assert_eq!(Scheme::from_name("NTRU"), None);
    }

    #[test]
    fn test_placeholders_are_unsupported() {
        let registry = Registry::default();
        let mut rng = EngineRng::from_seed(3);

        for name in ["LWE", "Alkaline", "LLL", "BKZ"] {
            match registry.initialize(name, 2, &mut rng).unwrap() {
                Availability::Unsupported(unsupported) => {
                    assert_eq!(unsupported.name, name);
                    assert!(unsupported.family.is_some());
                }
                Availability::Ready(_) => panic!("{} should not be implemented", name),
            }
        }

        assert_eq!(
            registry.max_steps("NTRU"),
            Availability::Unsupported(Unsupported {
                name: "NTRU".to_string(),
                family: None,
            })
        );
    }

    #[test]
    fn test_ready_engines() {
        let registry = Registry::default();
        let mut rng = EngineRng::from_seed(4);

        let state = registry.initialize("GGH", 3, &mut rng).unwrap().ready().unwrap();
        assert_eq!(state.algorithm(), "GGH");
        assert_eq!(registry.max_steps("GGH"), Availability::Ready(10));

        let view = registry.advance(10, &state).unwrap();
        assert_eq!(view.algorithm, "GGH");
        assert_eq!(view.phase.as_deref(), Some("decrypt"));

        let state = registry.initialize("Gauss Reduction", 2, &mut rng).unwrap().ready().unwrap();
        assert_eq!(registry.advance(3, &state).unwrap().algorithm, "Gauss Reduction");
        assert_eq!(registry.max_steps("Gauss Reduction"), Availability::Ready(3));
    }

    #[test]
    fn test_invalid_dimension_is_an_error() {
        let registry = Registry::default();
        let mut rng = EngineRng::from_seed(5);
        assert!(registry.initialize("GGH", 1, &mut rng).is_err());
        assert!(registry.initialize("Gauss Reduction", 3, &mut rng).is_err());
    }

    #[test]
    fn test_load_state_bounds_dimension() {
        let registry = Registry::new(GghParams {
            max_dimension: 3,
            ..GghParams::default()
        });
        let mut rng = EngineRng::from_seed(6);

        let state = registry.initialize("GGH", 3, &mut rng).unwrap().ready().unwrap();
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(registry.load_state(value).unwrap(), state);

        let oversized = Registry::default().initialize("GGH", 4, &mut rng).unwrap().ready().unwrap();
        let value = serde_json::to_value(&oversized).unwrap();
        assert!(matches!(registry.load_state(value), Err(EngineError::InvalidInput(_))));

        let huge = serde_json::json!({ "algorithm": "GGH", "dimension": 500 });
        assert!(matches!(registry.load_state(huge), Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_catalog() {
        let catalog = Registry::default().catalog();
        assert_eq!(catalog.len(), 6);
        let supported: Vec<_> = catalog.iter().filter(|s| s.supported).map(|s| s.name.as_str()).collect();
        assert_eq!(supported, vec!["GGH", "Gauss Reduction"]);
        assert!(catalog
            .iter()
            .filter(|s| s.family == Family::ReductionMethod)
            .all(|s| ["Gauss Reduction", "LLL", "BKZ"].contains(&s.name.as_str())));
    }
}
