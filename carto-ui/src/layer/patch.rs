use super::props::BackgroundLayerProps;
use crate::host::{HostError, MapHost};
use carto_types::{layout, paint};
use serde_json::Value;
use smallvec::SmallVec;

/// One narrow update against an existing layer
#[derive(Debug, Clone, PartialEq)]
pub enum LayerPatch {
    Filter(Option<Value>),
    ZoomRange { minzoom: f64, maxzoom: f64 },
    Slot(Option<String>),
    Paint { key: &'static str, value: Value },
    Layout { key: &'static str, value: Value },
    Move { before_id: Option<String> },
}

impl LayerPatch {
    pub fn apply(&self, map: &mut dyn MapHost, id: &str) -> Result<(), HostError> {
        match self {
            LayerPatch::Filter(filter) => map.set_filter(id, filter.as_ref()),
            LayerPatch::ZoomRange { minzoom, maxzoom } => {
                map.set_layer_zoom_range(id, *minzoom, *maxzoom)
            }
            LayerPatch::Slot(slot) => map.set_slot(id, slot.as_deref()),
            LayerPatch::Paint { key, value } => map.set_paint_property(id, key, value.clone()),
            LayerPatch::Layout { key, value } => map.set_layout_property(id, key, value.clone()),
            LayerPatch::Move { before_id } => map.move_layer(id, before_id.as_deref()),
        }
    }
}

type FieldRule = fn(&BackgroundLayerProps, &BackgroundLayerProps) -> Option<LayerPatch>;

/// Patchable fields in application order: name, comparison + resulting call
const PATCH_TABLE: &[(&str, FieldRule)] = &[
    ("filter", filter),
    ("zoom-range", zoom_range),
    ("slot", slot),
    ("color", color),
    ("emissive-strength", emissive_strength),
    ("opacity", opacity),
    ("pitch-alignment", pitch_alignment),
    ("visibility", visibility),
    ("before-id", before_id),
];

/// Patches that turn a layer rendered with `prev` into one rendered with `next`
///
/// Identity (id, image url) is not compared here; changing it recreates the
/// layer instead.
pub fn diff(prev: &BackgroundLayerProps, next: &BackgroundLayerProps) -> SmallVec<[LayerPatch; 4]> {
    PATCH_TABLE
        .iter()
        .filter_map(|(field, rule)| {
            let patch = rule(prev, next)?;
            tracing::trace!(layer = %next.id, field, "field changed");
            Some(patch)
        })
        .collect()
}

fn filter(prev: &BackgroundLayerProps, next: &BackgroundLayerProps) -> Option<LayerPatch> {
    // Value equality is structural
    (prev.filter != next.filter).then(|| LayerPatch::Filter(next.filter.clone()))
}

/// Zero counts as unset: the range is only pushed when both bounds are non-zero
fn zoom_range(prev: &BackgroundLayerProps, next: &BackgroundLayerProps) -> Option<LayerPatch> {
    let both_set = is_set(next.minzoom) && is_set(next.maxzoom);
    let changed = prev.minzoom != next.minzoom || prev.maxzoom != next.maxzoom;
    (both_set && changed).then_some(LayerPatch::ZoomRange {
        minzoom: next.minzoom,
        maxzoom: next.maxzoom,
    })
}

fn is_set(zoom: f64) -> bool {
    zoom != 0.0 && !zoom.is_nan()
}

fn slot(prev: &BackgroundLayerProps, next: &BackgroundLayerProps) -> Option<LayerPatch> {
    (prev.slot != next.slot).then(|| LayerPatch::Slot(next.slot.clone()))
}

fn color(prev: &BackgroundLayerProps, next: &BackgroundLayerProps) -> Option<LayerPatch> {
    (prev.color != next.color).then(|| LayerPatch::Paint {
        key: paint::BACKGROUND_COLOR,
        value: Value::from(next.color.as_str()),
    })
}

fn emissive_strength(prev: &BackgroundLayerProps, next: &BackgroundLayerProps) -> Option<LayerPatch> {
    (prev.emissive_strength != next.emissive_strength).then(|| LayerPatch::Paint {
        key: paint::BACKGROUND_EMISSIVE_STRENGTH,
        value: Value::from(next.emissive_strength),
    })
}

fn opacity(prev: &BackgroundLayerProps, next: &BackgroundLayerProps) -> Option<LayerPatch> {
    (prev.opacity != next.opacity).then(|| LayerPatch::Paint {
        key: paint::BACKGROUND_OPACITY,
        value: Value::from(next.opacity),
    })
}

fn pitch_alignment(prev: &BackgroundLayerProps, next: &BackgroundLayerProps) -> Option<LayerPatch> {
    (prev.pitch_alignment != next.pitch_alignment).then(|| LayerPatch::Paint {
        key: paint::BACKGROUND_PITCH_ALIGNMENT,
        value: Value::from(next.pitch_alignment.as_str()),
    })
}

fn visibility(prev: &BackgroundLayerProps, next: &BackgroundLayerProps) -> Option<LayerPatch> {
    (prev.visibility != next.visibility).then(|| LayerPatch::Layout {
        key: layout::VISIBILITY,
        value: Value::from(next.visibility.as_str()),
    })
}

fn before_id(prev: &BackgroundLayerProps, next: &BackgroundLayerProps) -> Option<LayerPatch> {
    (prev.before_id != next.before_id).then(|| LayerPatch::Move {
        before_id: next.before_id.clone(),
    })
}
