use crate::ValueParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Screen corner a control is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlPosition {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ControlPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlPosition::TopLeft => "top-left",
            ControlPosition::TopRight => "top-right",
            ControlPosition::BottomLeft => "bottom-left",
            ControlPosition::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for ControlPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlPosition {
    type Err = ValueParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top-left" => Ok(ControlPosition::TopLeft),
            "top-right" => Ok(ControlPosition::TopRight),
            "bottom-left" => Ok(ControlPosition::BottomLeft),
            "bottom-right" => Ok(ControlPosition::BottomRight),
            other => Err(ValueParseError::new("control position", other)),
        }
    }
}
