//! Step-phase disclosure of algorithm runs

pub mod format;
pub mod gauss;
pub mod ggh;
pub mod phases;
pub mod render;

pub use phases::{Phase, PhaseTable, StepPosition};
pub use render::{Arrow, Color, LineStyle, NarrativeItem, RenderPayload, StepView, Table};
