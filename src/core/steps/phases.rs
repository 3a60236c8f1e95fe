// src/core/steps/phases.rs
use serde::{Deserialize, Serialize};

use crate::utils::error::{EngineError, Result};

/// Inclusive step range belonging to one named phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

impl Phase {
    pub fn contains(&self, step: usize) -> bool {
        self.start <= step && step <= self.end
    }
}

/// Where a step falls: phase index, phase, and 1-based offset inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepPosition<'a> {
    pub index: usize,
    pub phase: &'a Phase,
    pub offset: usize,
}

/// Ordered phases covering `1..=max_step` with no gaps or overlaps
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PhaseTable {
    phases: Vec<Phase>,
}

impl PhaseTable {
    pub fn new(phases: &[(&str, usize, usize)]) -> Result<Self> {
        if phases.is_empty() {
            return Err(EngineError::InvalidInput("Phase table must not be empty".into()));
        }

        let mut expected_start = 1;
        for &(name, start, end) in phases {
            if start != expected_start || end < start {
                return Err(EngineError::InvalidInput(format!(
                    "Phase '{}' spans {}..={}, expected it to start at {}",
                    name, start, end, expected_start
                )));
            }
            expected_start = end + 1;
        }

        Ok(Self {
            phases: phases
                .iter()
                .map(|&(name, start, end)| Phase {
                    name: name.to_string(),
                    start,
                    end,
                })
                .collect(),
        })
    }

    /// Lay phases end to end from step 1; zero-length entries are skipped
    pub fn sequential(lengths: &[(&str, usize)]) -> Self {
        let mut start = 1;
        let mut phases = Vec::with_capacity(lengths.len());
        for &(name, len) in lengths.iter().filter(|(_, len)| *len > 0) {
            phases.push(Phase {
                name: name.to_string(),
                start,
                end: start + len - 1,
            });
            start += len;
        }
        Self { phases }
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn max_step(&self) -> usize {
        self.phases.last().map(|p| p.end).unwrap_or(0)
    }

    pub fn phase_for_step(&self, step: usize) -> Option<StepPosition<'_>> {
        self.phases
            .iter()
            .enumerate()
            .find(|(_, p)| p.contains(step))
            .map(|(index, phase)| StepPosition {
                index,
                phase,
                offset: step - phase.start + 1,
            })
    }

    /// Accept `0..=max_step`; step 0 is the empty view
    pub fn check_step(&self, step: usize) -> Result<()> {
        let max_step = self.max_step();
        if step > max_step {
            return Err(EngineError::InvalidStep { step, max_step });
        }
        Ok(())
    }
}
