use crate::ValueParseError;
use serde::{Deserialize, Serialize};
use smartstring::{LazyCompact, SmartString};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    None,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Visible => "visible",
            Visibility::None => "none",
        }
    }
}

impl FromStr for Visibility {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visible" => Ok(Visibility::Visible),
            "none" => Ok(Visibility::None),
            other => Err(ValueParseError::new("visibility", other)),
        }
    }
}

/// Orientation of a background relative to the camera pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PitchAlignment {
    #[default]
    Map,
    Viewport,
}

impl PitchAlignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            PitchAlignment::Map => "map",
            PitchAlignment::Viewport => "viewport",
        }
    }
}

impl FromStr for PitchAlignment {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "map" => Ok(PitchAlignment::Map),
            "viewport" => Ok(PitchAlignment::Viewport),
            other => Err(ValueParseError::new("pitch alignment", other)),
        }
    }
}

/// Alternate mount point for a control, addressed by element id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerRef(SmartString<LazyCompact>);

impl ContainerRef {
    pub fn new(element_id: &str) -> Self {
        Self(element_id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContainerRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
