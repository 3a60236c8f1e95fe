// src/core/steps/render.rs
use serde::{Deserialize, Serialize};

use crate::core::crypto::ggh::DecodingOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Gray,
    Blue,
    Red,
    Green,
    Orange,
    Yellow,
    Purple,
    Cyan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dash,
    Dot,
}

/// Origin-anchored 2-D arrow to `(x, y)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub label: String,
    /// Matrix row the arrow came from, `None` for plain vectors
    pub row: Option<usize>,
    pub x: f64,
    pub y: f64,
    pub color: Color,
    pub style: LineStyle,
}

/// A labelled matrix, or a vector as a single row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub label: String,
    pub rows: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum RenderPayload {
    Vectors(Vec<Arrow>),
    Tables(Vec<Table>),
}

impl RenderPayload {
    pub fn len(&self) -> usize {
        match self {
            RenderPayload::Vectors(arrows) => arrows.len(),
            RenderPayload::Tables(tables) => tables.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Labels in draw order, one per arrow or table
    pub fn labels(&self) -> Vec<&str> {
        match self {
            RenderPayload::Vectors(arrows) => arrows.iter().map(|a| a.label.as_str()).collect(),
            RenderPayload::Tables(tables) => tables.iter().map(|t| t.label.as_str()).collect(),
        }
    }
}

/// One revealed artifact: what it is, how it was computed, and its value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeItem {
    pub title: String,
    pub expression: String,
    pub value: String,
}

impl NarrativeItem {
    pub fn new(title: impl Into<String>, expression: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            expression: expression.into(),
            value: value.into(),
        }
    }
}

/// Everything the presentation layer needs to draw one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepView {
    pub algorithm: String,
    pub step: usize,
    pub max_step: usize,
    pub phase: Option<String>,
    /// Artifact keys revealed so far in this phase
    pub revealed: Vec<String>,
    pub payload: RenderPayload,
    pub narrative: Vec<NarrativeItem>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub outcome: Option<DecodingOutcome>,
}

/// Collects drawables as arrows for dimension 2 and as tables otherwise
pub struct Canvas {
    geometric: bool,
    arrows: Vec<Arrow>,
    tables: Vec<Table>,
}

impl Canvas {
    pub fn for_dimension(dimension: usize) -> Self {
        Self {
            geometric: dimension == 2,
            arrows: Vec::new(),
            tables: Vec::new(),
        }
    }

    pub fn is_geometric(&self) -> bool {
        self.geometric
    }

    pub fn matrix(&mut self, label: &str, rows: &[Vec<f64>], color: Color, style: LineStyle) {
        if self.geometric {
            for (i, row) in rows.iter().enumerate() {
                self.push_arrow(label, Some(i), row, color, style);
            }
        } else {
            self.tables.push(Table {
                label: label.to_string(),
                rows: rows.to_vec(),
            });
        }
    }

    pub fn vector(&mut self, label: &str, v: &[f64], color: Color, style: LineStyle) {
        if self.geometric {
            self.push_arrow(label, None, v, color, style);
        } else {
            self.tables.push(Table {
                label: label.to_string(),
                rows: vec![v.to_vec()],
            });
        }
    }

    fn push_arrow(&mut self, label: &str, row: Option<usize>, v: &[f64], color: Color, style: LineStyle) {
        self.arrows.push(Arrow {
            label: label.to_string(),
            row,
            x: v.first().copied().unwrap_or(0.0),
            y: v.get(1).copied().unwrap_or(0.0),
            color,
            style,
        });
    }

    pub fn finish(self) -> RenderPayload {
        if self.geometric {
            RenderPayload::Vectors(self.arrows)
        } else {
            RenderPayload::Tables(self.tables)
        }
    }
}
