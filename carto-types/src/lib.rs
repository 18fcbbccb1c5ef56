mod image;
mod position;
mod spec;
mod style;

pub use image::Image;
pub use position::ControlPosition;
pub use spec::{LayerKind, LayerSpec, layout, paint};
pub use style::{ContainerRef, PitchAlignment, Visibility};

use smartstring::{LazyCompact, SmartString};
use thiserror::Error;

/// Engine-side identifier of a layer (and of the image bound to it)
pub type LayerId = SmartString<LazyCompact>;

/// Raised when a style keyword does not name a known variant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct ValueParseError {
    pub kind: &'static str,
    pub value: String,
}

impl ValueParseError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
