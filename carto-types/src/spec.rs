use crate::LayerId;
use serde::Serialize;
use serde_json::{Map, Value};

/// Paint property keys understood by background layers
pub mod paint {
    pub const BACKGROUND_COLOR: &str = "background-color";
    pub const BACKGROUND_EMISSIVE_STRENGTH: &str = "background-emissive-strength";
    pub const BACKGROUND_OPACITY: &str = "background-opacity";
    pub const BACKGROUND_PITCH_ALIGNMENT: &str = "background-pitch-alignment";
    pub const BACKGROUND_PATTERN: &str = "background-pattern";
}

/// Layout property keys
pub mod layout {
    pub const VISIBILITY: &str = "visibility";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Background,
}

impl LayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Background => "background",
        }
    }
}

/// Full layer definition handed to the engine's `add_layer`
///
/// Serializes to the style-document shape the engine consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSpec {
    pub id: LayerId,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    pub minzoom: f64,
    pub maxzoom: f64,
    pub paint: Map<String, Value>,
    pub layout: Map<String, Value>,
}

impl LayerSpec {
    pub fn new(id: &str, kind: LayerKind) -> Self {
        Self {
            id: id.into(),
            kind,
            filter: None,
            slot: None,
            minzoom: 0.0,
            maxzoom: 24.0,
            paint: Map::new(),
            layout: Map::new(),
        }
    }

    pub fn set_paint(&mut self, key: &str, value: impl Into<Value>) {
        self.paint.insert(key.to_string(), value.into());
    }

    pub fn set_layout(&mut self, key: &str, value: impl Into<Value>) {
        self.layout.insert(key.to_string(), value.into());
    }

    pub fn paint_value(&self, key: &str) -> Option<&Value> {
        self.paint.get(key)
    }

    pub fn layout_value(&self, key: &str) -> Option<&Value> {
        self.layout.get(key)
    }

    pub fn to_json(&self) -> Value {
        // Every field is plain JSON data, serialization cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
