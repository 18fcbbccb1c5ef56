/// Integration tests for background layer reconciliation against a recording engine
mod common;

use carto_ui::host::{HostCall, RecordingMap};
use carto_ui::types::{Visibility, paint};
use carto_ui::{
    BackgroundLayer, BackgroundLayerProps, HostError, LayerState, MapHost, SyncError,
};
use serde_json::json;

#[test]
fn test_color_change_is_a_single_paint_call() {
    let h = common::setup();
    let mut layer = BackgroundLayer::new();

    layer
        .render(Some(&h.host), &BackgroundLayerProps::new("bg").color("#000000"))
        .unwrap();
    let created = h.take_calls();
    assert_eq!(created.len(), 1);
    assert!(created[0].is_add_layer());

    layer
        .render(Some(&h.host), &BackgroundLayerProps::new("bg").color("#ffffff"))
        .unwrap();
    assert_eq!(
        h.take_calls(),
        vec![HostCall::SetPaintProperty {
            id: "bg".to_string(),
            key: paint::BACKGROUND_COLOR.to_string(),
            value: json!("#ffffff"),
        }]
    );
}

#[test]
fn test_rerender_with_equal_props_is_silent() {
    let h = common::setup();
    let mut layer = BackgroundLayer::new();
    let props = BackgroundLayerProps::new("bg")
        .filter(json!(["==", ["get", "class"], "land"]))
        .slot("bottom");

    layer.render(Some(&h.host), &props).unwrap();
    h.take_calls();
    layer.render(Some(&h.host), &props.clone()).unwrap();

    assert!(h.take_calls().is_empty());
}

#[test]
fn test_image_layer_is_added_only_after_load() {
    let mut h = common::setup();
    let mut layer = BackgroundLayer::new();

    let binding = layer
        .render(Some(&h.host), &BackgroundLayerProps::new("bg").image_url("x.png"))
        .unwrap()
        .expect("image layers return a binding");
    h.scheduler.spawn(binding).unwrap();
    assert!(h.scheduler.tick().is_empty());

    assert_eq!(
        h.take_calls(),
        vec![HostCall::LoadImage {
            url: "x.png".to_string()
        }]
    );
    assert_eq!(layer.state(), LayerState::LoadingImage);

    assert!(h.map.borrow_mut().resolve_image("x.png", common::tile()));
    assert!(h.scheduler.tick().is_empty());

    let calls = h.take_calls();
    assert_eq!(
        calls[0],
        HostCall::AddImage {
            id: "bg".to_string()
        }
    );
    assert!(calls[1].is_add_layer());
    assert_eq!(
        h.map.borrow().layer("bg").unwrap().paint_value(paint::BACKGROUND_PATTERN),
        Some(&json!("bg"))
    );
    assert_eq!(layer.state(), LayerState::Present);
}

#[test]
fn test_late_image_after_unmount_is_dropped() {
    let mut h = common::setup();
    let mut layer = BackgroundLayer::new();

    let binding = layer
        .render(Some(&h.host), &BackgroundLayerProps::new("bg").image_url("x.png"))
        .unwrap()
        .unwrap();
    h.scheduler.spawn(binding).unwrap();
    layer.unmount().unwrap();

    h.map.borrow_mut().resolve_image("x.png", common::tile());
    assert!(h.scheduler.tick().is_empty());

    let map = h.map.borrow();
    assert!(map.layer_ids().is_empty());
    assert_eq!(map.image_count(), 0);
    assert_eq!(layer.state(), LayerState::Absent);
}

#[test]
fn test_late_image_for_previous_id_is_dropped() {
    let mut h = common::setup();
    let mut layer = BackgroundLayer::new();

    let first = layer
        .render(Some(&h.host), &BackgroundLayerProps::new("a").image_url("x.png"))
        .unwrap()
        .unwrap();
    let second = layer
        .render(Some(&h.host), &BackgroundLayerProps::new("b").image_url("x.png"))
        .unwrap()
        .unwrap();
    h.scheduler.spawn(first).unwrap();
    h.scheduler.spawn(second).unwrap();

    // Oldest load first: this one belongs to "a"
    h.map.borrow_mut().resolve_image("x.png", common::tile());
    assert!(h.scheduler.tick().is_empty());
    assert!(h.map.borrow().layer_ids().is_empty());

    h.map.borrow_mut().resolve_image("x.png", common::tile());
    assert!(h.scheduler.tick().is_empty());
    assert_eq!(h.map.borrow().layer_ids(), vec!["b"]);
    assert!(h.map.borrow().image("a").is_none());
}

#[test]
fn test_id_change_removes_old_layer_first() {
    let h = common::setup();
    let mut layer = BackgroundLayer::new();

    layer
        .render(Some(&h.host), &BackgroundLayerProps::new("a"))
        .unwrap();
    h.take_calls();
    layer
        .render(Some(&h.host), &BackgroundLayerProps::new("b"))
        .unwrap();

    let calls = h.take_calls();
    assert_eq!(calls[0], HostCall::RemoveLayer { id: "a".to_string() });
    assert!(matches!(&calls[1], HostCall::AddLayer { spec, .. } if spec.id.as_str() == "b"));
    assert_eq!(calls.len(), 2);
    assert_eq!(layer.layer_id(), Some("b"));
}

#[test]
fn test_zoom_range_update_sends_both_bounds() {
    let h = common::setup();
    let mut layer = BackgroundLayer::new();

    layer
        .render(Some(&h.host), &BackgroundLayerProps::new("bg").zoom_range(0.0, 24.0))
        .unwrap();
    h.take_calls();
    layer
        .render(Some(&h.host), &BackgroundLayerProps::new("bg").zoom_range(2.0, 24.0))
        .unwrap();

    assert_eq!(
        h.take_calls(),
        vec![HostCall::SetLayerZoomRange {
            id: "bg".to_string(),
            minzoom: 2.0,
            maxzoom: 24.0,
        }]
    );
}

#[test]
fn test_before_id_positions_layer() {
    let h = common::setup();
    h.map
        .borrow_mut()
        .add_layer(BackgroundLayerProps::new("labels").to_spec(None), None)
        .unwrap();
    let mut layer = BackgroundLayer::new();

    layer
        .render(Some(&h.host), &BackgroundLayerProps::new("bg").before_id("labels"))
        .unwrap();
    assert_eq!(h.map.borrow().layer_ids(), vec!["bg", "labels"]);

    layer
        .render(Some(&h.host), &BackgroundLayerProps::new("bg"))
        .unwrap();
    assert_eq!(h.map.borrow().layer_ids(), vec!["labels", "bg"]);
}

#[test]
fn test_props_changed_while_loading_land_in_created_layer() {
    let mut h = common::setup();
    let mut layer = BackgroundLayer::new();
    let props = BackgroundLayerProps::new("bg").image_url("x.png");

    let binding = layer.render(Some(&h.host), &props).unwrap().unwrap();
    h.scheduler.spawn(binding).unwrap();
    h.take_calls();

    let latest = props.clone().opacity(0.4).visibility(Visibility::None);
    assert!(layer.render(Some(&h.host), &latest).unwrap().is_none());
    assert!(h.take_calls().is_empty());

    h.map.borrow_mut().resolve_image("x.png", common::tile());
    assert!(h.scheduler.tick().is_empty());

    let map = h.map.borrow();
    let spec = map.layer("bg").unwrap();
    assert_eq!(spec.paint_value(paint::BACKGROUND_OPACITY), Some(&json!(0.4)));
    assert_eq!(spec.layout_value("visibility"), Some(&json!("none")));
}

#[test]
fn test_image_failure_is_reported() {
    let mut h = common::setup();
    let mut layer = BackgroundLayer::new();

    let binding = layer
        .render(Some(&h.host), &BackgroundLayerProps::new("bg").image_url("missing.png"))
        .unwrap()
        .unwrap();
    h.scheduler.spawn(binding).unwrap();
    h.map.borrow_mut().fail_image("missing.png", "404");

    let failures = h.scheduler.tick();
    assert_eq!(failures.len(), 1);
    match &failures[0] {
        SyncError::ImageLoad { layer, url, .. } => {
            assert_eq!(layer.as_str(), "bg");
            assert_eq!(url, "missing.png");
        }
        other => panic!("unexpected failure: {other}"),
    }
    assert_eq!(layer.state(), LayerState::Failed);
    assert!(h.map.borrow().layer_ids().is_empty());

    // A new image url recreates the layer
    let binding = layer
        .render(Some(&h.host), &BackgroundLayerProps::new("bg").image_url("ok.png"))
        .unwrap()
        .unwrap();
    h.scheduler.spawn(binding).unwrap();
    h.map.borrow_mut().resolve_image("ok.png", common::tile());
    assert!(h.scheduler.tick().is_empty());
    assert_eq!(layer.state(), LayerState::Present);
}

#[test]
fn test_host_swap_never_touches_retired_engine() {
    let mut h = common::setup();
    let mut layer = BackgroundLayer::new();
    layer
        .render(Some(&h.host), &BackgroundLayerProps::new("bg"))
        .unwrap();
    h.take_calls();

    let next = RecordingMap::shared();
    let host = h.provider.provide(next.clone());
    assert!(!h.host.is_live());
    layer
        .render(Some(&host), &BackgroundLayerProps::new("bg"))
        .unwrap();

    assert!(h.take_calls().is_empty());
    assert_eq!(next.borrow().layer_ids(), vec!["bg"]);
}

#[test]
fn test_host_retired_mid_load_drops_binding() {
    let mut h = common::setup();
    let mut layer = BackgroundLayer::new();
    let binding = layer
        .render(Some(&h.host), &BackgroundLayerProps::new("bg").image_url("x.png"))
        .unwrap()
        .unwrap();
    h.scheduler.spawn(binding).unwrap();
    h.take_calls();

    h.provider.clear();
    h.map.borrow_mut().resolve_image("x.png", common::tile());
    assert!(h.scheduler.tick().is_empty());
    assert!(h.take_calls().is_empty());

    layer.render(h.provider.current(), &BackgroundLayerProps::new("bg").image_url("x.png"))
        .unwrap();
    assert_eq!(layer.state(), LayerState::Absent);
}

#[test]
fn test_unmount_releases_everything_created() {
    let mut h = common::setup();
    let mut layer = BackgroundLayer::new();
    let props = BackgroundLayerProps::new("bg").image_url("x.png");

    let binding = layer.render(Some(&h.host), &props).unwrap().unwrap();
    h.scheduler.spawn(binding).unwrap();
    h.map.borrow_mut().resolve_image("x.png", common::tile());
    assert!(h.scheduler.tick().is_empty());
    layer
        .render(Some(&h.host), &props.clone().color("#336699").slot("bottom"))
        .unwrap();

    layer.unmount().unwrap();
    layer.unmount().unwrap();

    let map = h.map.borrow();
    assert!(map.layer_ids().is_empty());
    assert_eq!(map.image_count(), 0);
    assert_eq!(
        map.count_calls(HostCall::is_add_layer),
        map.count_calls(HostCall::is_remove_layer)
    );
}

#[test]
fn test_rejected_patch_surfaces_and_keeps_snapshot() {
    let h = common::setup();
    let mut layer = BackgroundLayer::new();
    layer
        .render(Some(&h.host), &BackgroundLayerProps::new("bg"))
        .unwrap();
    h.take_calls();

    let err = layer
        .render(Some(&h.host), &BackgroundLayerProps::new("bg").before_id("missing"))
        .unwrap_err();
    assert!(matches!(
        err,
        SyncError::Host(HostError::MissingLayer(ref id)) if id.as_str() == "missing"
    ));
    h.take_calls();

    // Diffed against the last applied props, so nothing is left to move
    layer
        .render(Some(&h.host), &BackgroundLayerProps::new("bg"))
        .unwrap();
    assert_eq!(
        h.map
            .borrow()
            .count_calls(|call| matches!(call, HostCall::MoveLayer { .. })),
        0
    );
    assert_eq!(h.map.borrow().layer_ids(), vec!["bg"]);
    assert_eq!(layer.state(), LayerState::Present);
}

#[test]
fn test_id_change_releases_bound_image() {
    let mut h = common::setup();
    let mut layer = BackgroundLayer::new();

    let binding = layer
        .render(Some(&h.host), &BackgroundLayerProps::new("a").image_url("x.png"))
        .unwrap()
        .unwrap();
    h.scheduler.spawn(binding).unwrap();
    h.map.borrow_mut().resolve_image("x.png", common::tile());
    assert!(h.scheduler.tick().is_empty());
    h.take_calls();

    let created = layer
        .render(Some(&h.host), &BackgroundLayerProps::new("b"))
        .unwrap();
    assert!(created.is_none());

    let calls = h.take_calls();
    assert_eq!(calls[0], HostCall::RemoveLayer { id: "a".to_string() });
    assert_eq!(calls[1], HostCall::RemoveImage { id: "a".to_string() });
    assert!(calls[2].is_add_layer());
    assert_eq!(h.map.borrow().image_count(), 0);
    assert_eq!(h.map.borrow().layer_ids(), vec!["b"]);
}

#[test]
fn test_remount_after_unmount_recreates_layer() {
    let h = common::setup();
    let mut layer = BackgroundLayer::new();
    let props = BackgroundLayerProps::new("bg").opacity(0.5);

    layer.render(Some(&h.host), &props).unwrap();
    layer.unmount().unwrap();
    assert!(h.map.borrow().layer_ids().is_empty());

    layer.render(Some(&h.host), &props).unwrap();
    assert_eq!(h.map.borrow().layer_ids(), vec!["bg"]);
    assert_eq!(h.map.borrow().count_calls(HostCall::is_add_layer), 2);
    assert_eq!(layer.state(), LayerState::Present);
}
