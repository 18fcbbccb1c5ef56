use crate::config::LayerDefaults;
use carto_types::{
    LayerId, LayerKind, LayerSpec, PitchAlignment, Visibility, layout, paint,
};
use serde_json::Value;

/// Declarative description of one background layer
///
/// Every patchable field carries a concrete value so consecutive renders can
/// always be compared field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundLayerProps {
    pub id: LayerId,
    pub filter: Option<Value>,
    pub minzoom: f64,
    pub maxzoom: f64,
    pub slot: Option<String>,
    pub color: String,
    pub emissive_strength: f64,
    pub opacity: f64,
    pub pitch_alignment: PitchAlignment,
    pub visibility: Visibility,
    /// Raster bound as the layer's pattern once loaded
    pub image_url: Option<String>,
    pub before_id: Option<String>,
}

impl BackgroundLayerProps {
    pub fn new(id: &str) -> Self {
        Self::with_defaults(id, &LayerDefaults::default())
    }

    pub fn with_defaults(id: &str, defaults: &LayerDefaults) -> Self {
        Self {
            id: id.into(),
            filter: None,
            minzoom: defaults.minzoom,
            maxzoom: defaults.maxzoom,
            slot: None,
            color: defaults.color.clone(),
            emissive_strength: defaults.emissive_strength,
            opacity: defaults.opacity,
            pitch_alignment: defaults.pitch_alignment,
            visibility: defaults.visibility,
            image_url: None,
            before_id: None,
        }
    }

    pub fn filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn zoom_range(mut self, minzoom: f64, maxzoom: f64) -> Self {
        self.minzoom = minzoom;
        self.maxzoom = maxzoom;
        self
    }

    pub fn slot(mut self, slot: &str) -> Self {
        self.slot = Some(slot.to_string());
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    pub fn emissive_strength(mut self, strength: f64) -> Self {
        self.emissive_strength = strength;
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn pitch_alignment(mut self, alignment: PitchAlignment) -> Self {
        self.pitch_alignment = alignment;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn image_url(mut self, url: &str) -> Self {
        self.image_url = Some(url.to_string());
        self
    }

    pub fn before_id(mut self, before_id: &str) -> Self {
        self.before_id = Some(before_id.to_string());
        self
    }

    /// Assemble the full layer definition, optionally using image `pattern` as fill
    pub fn to_spec(&self, pattern: Option<&str>) -> LayerSpec {
        let mut spec = LayerSpec::new(&self.id, LayerKind::Background);
        spec.filter = self.filter.clone();
        spec.slot = self.slot.clone();
        spec.minzoom = self.minzoom;
        spec.maxzoom = self.maxzoom;

        spec.set_paint(paint::BACKGROUND_COLOR, self.color.as_str());
        spec.set_paint(paint::BACKGROUND_EMISSIVE_STRENGTH, self.emissive_strength);
        spec.set_paint(paint::BACKGROUND_OPACITY, self.opacity);
        spec.set_paint(
            paint::BACKGROUND_PITCH_ALIGNMENT,
            self.pitch_alignment.as_str(),
        );
        if let Some(pattern) = pattern {
            spec.set_paint(paint::BACKGROUND_PATTERN, pattern);
        }

        spec.set_layout(layout::VISIBILITY, self.visibility.as_str());
        spec
    }
}
