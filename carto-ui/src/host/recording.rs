use super::{HostError, ImageFuture, MapHost};
use crate::control::SharedControl;
use carto_types::{ContainerRef, ControlPosition, Image, LayerId, LayerSpec};
use futures::FutureExt;
use futures::channel::oneshot;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One mutating call received by a [`RecordingMap`]
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    AddControl {
        kind: &'static str,
        position: ControlPosition,
    },
    RemoveControl {
        kind: &'static str,
    },
    AddLayer {
        spec: LayerSpec,
        before_id: Option<String>,
    },
    RemoveLayer {
        id: String,
    },
    SetFilter {
        id: String,
        filter: Option<Value>,
    },
    SetLayerZoomRange {
        id: String,
        minzoom: f64,
        maxzoom: f64,
    },
    SetSlot {
        id: String,
        slot: Option<String>,
    },
    MoveLayer {
        id: String,
        before_id: Option<String>,
    },
    SetPaintProperty {
        id: String,
        key: String,
        value: Value,
    },
    SetLayoutProperty {
        id: String,
        key: String,
        value: Value,
    },
    LoadImage {
        url: String,
    },
    AddImage {
        id: String,
    },
    RemoveImage {
        id: String,
    },
}

impl HostCall {
    pub fn is_add_layer(&self) -> bool {
        matches!(self, HostCall::AddLayer { .. })
    }

    pub fn is_remove_layer(&self) -> bool {
        matches!(self, HostCall::RemoveLayer { .. })
    }
}

struct PendingLoad {
    url: String,
    reply: oneshot::Sender<Result<Image, HostError>>,
}

/// In-memory engine that records every call it receives
///
/// Keeps a real layer stack, image table and control list so it rejects the
/// same things the engine does (duplicate ids, unknown `before_id`, patches
/// against missing layers). Image loads stay pending until the test calls
/// [`RecordingMap::resolve_image`] or [`RecordingMap::fail_image`].
#[derive(Default)]
pub struct RecordingMap {
    calls: Vec<HostCall>,
    /// Bottom of the stack first
    layers: Vec<LayerSpec>,
    images: HashMap<LayerId, Image>,
    controls: Vec<(SharedControl, ControlPosition)>,
    pending_loads: Vec<PendingLoad>,
}

impl RecordingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn count_calls(&self, pred: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }

    /// Layer ids from bottom to top
    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|spec| spec.id.as_str()).collect()
    }

    pub fn layer(&self, id: &str) -> Option<&LayerSpec> {
        self.layers.iter().find(|spec| spec.id.as_str() == id)
    }

    pub fn image(&self, id: &str) -> Option<&Image> {
        self.images.get(id)
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Attached controls as (kind, position, container)
    pub fn controls(&self) -> Vec<(&'static str, ControlPosition, Option<ContainerRef>)> {
        self.controls
            .iter()
            .map(|(control, position)| (control.kind(), *position, control.container().cloned()))
            .collect()
    }

    pub fn pending_image_loads(&self) -> usize {
        self.pending_loads
            .iter()
            .filter(|load| !load.reply.is_canceled())
            .count()
    }

    /// Complete the oldest pending load of `url`; false if none was waiting
    pub fn resolve_image(&mut self, url: &str, image: Image) -> bool {
        self.reply(url, Ok(image))
    }

    pub fn fail_image(&mut self, url: &str, reason: &str) -> bool {
        let error = HostError::ImageLoad {
            url: url.to_string(),
            reason: reason.to_string(),
        };
        self.reply(url, Err(error))
    }

    fn reply(&mut self, url: &str, result: Result<Image, HostError>) -> bool {
        let Some(index) = self.pending_loads.iter().position(|load| load.url == url) else {
            return false;
        };
        let load = self.pending_loads.remove(index);
        // A dropped receiver means the binding was abandoned; nothing to deliver
        load.reply.send(result).is_ok()
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|spec| spec.id.as_str() == id)
    }

    fn layer_mut(&mut self, id: &str) -> Result<&mut LayerSpec, HostError> {
        self.layers
            .iter_mut()
            .find(|spec| spec.id.as_str() == id)
            .ok_or_else(|| HostError::MissingLayer(id.into()))
    }

    fn insertion_index(&self, before_id: Option<&str>) -> Result<usize, HostError> {
        match before_id {
            Some(before) => self
                .position_of(before)
                .ok_or_else(|| HostError::MissingLayer(before.into())),
            None => Ok(self.layers.len()),
        }
    }
}

impl MapHost for RecordingMap {
    fn add_control(
        &mut self,
        control: SharedControl,
        position: ControlPosition,
    ) -> Result<(), HostError> {
        self.calls.push(HostCall::AddControl {
            kind: control.kind(),
            position,
        });
        self.controls.push((control, position));
        Ok(())
    }

    fn remove_control(&mut self, control: &SharedControl) -> Result<(), HostError> {
        self.calls.push(HostCall::RemoveControl {
            kind: control.kind(),
        });
        let index = self
            .controls
            .iter()
            .position(|(attached, _)| Rc::ptr_eq(attached, control))
            .ok_or(HostError::UnknownControl)?;
        self.controls.remove(index);
        Ok(())
    }

    fn add_layer(&mut self, spec: LayerSpec, before_id: Option<&str>) -> Result<(), HostError> {
        self.calls.push(HostCall::AddLayer {
            spec: spec.clone(),
            before_id: before_id.map(str::to_string),
        });
        if self.position_of(&spec.id).is_some() {
            return Err(HostError::DuplicateLayer(spec.id));
        }
        let index = self.insertion_index(before_id)?;
        self.layers.insert(index, spec);
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> Result<(), HostError> {
        self.calls.push(HostCall::RemoveLayer { id: id.to_string() });
        let index = self
            .position_of(id)
            .ok_or_else(|| HostError::MissingLayer(id.into()))?;
        self.layers.remove(index);
        Ok(())
    }

    fn has_layer(&self, id: &str) -> bool {
        self.position_of(id).is_some()
    }

    fn set_filter(&mut self, id: &str, filter: Option<&Value>) -> Result<(), HostError> {
        self.calls.push(HostCall::SetFilter {
            id: id.to_string(),
            filter: filter.cloned(),
        });
        self.layer_mut(id)?.filter = filter.cloned();
        Ok(())
    }

    fn set_layer_zoom_range(
        &mut self,
        id: &str,
        minzoom: f64,
        maxzoom: f64,
    ) -> Result<(), HostError> {
        self.calls.push(HostCall::SetLayerZoomRange {
            id: id.to_string(),
            minzoom,
            maxzoom,
        });
        let spec = self.layer_mut(id)?;
        spec.minzoom = minzoom;
        spec.maxzoom = maxzoom;
        Ok(())
    }

    fn set_slot(&mut self, id: &str, slot: Option<&str>) -> Result<(), HostError> {
        self.calls.push(HostCall::SetSlot {
            id: id.to_string(),
            slot: slot.map(str::to_string),
        });
        self.layer_mut(id)?.slot = slot.map(str::to_string);
        Ok(())
    }

    fn move_layer(&mut self, id: &str, before_id: Option<&str>) -> Result<(), HostError> {
        self.calls.push(HostCall::MoveLayer {
            id: id.to_string(),
            before_id: before_id.map(str::to_string),
        });
        let from = self
            .position_of(id)
            .ok_or_else(|| HostError::MissingLayer(id.into()))?;
        if before_id == Some(id) {
            return Err(HostError::SelfTarget(id.into()));
        }
        // Validate the target before touching the stack
        self.insertion_index(before_id)?;
        let spec = self.layers.remove(from);
        let to = self.insertion_index(before_id)?;
        self.layers.insert(to, spec);
        Ok(())
    }

    fn set_paint_property(&mut self, id: &str, key: &str, value: Value) -> Result<(), HostError> {
        self.calls.push(HostCall::SetPaintProperty {
            id: id.to_string(),
            key: key.to_string(),
            value: value.clone(),
        });
        self.layer_mut(id)?.set_paint(key, value);
        Ok(())
    }

    fn set_layout_property(
        &mut self,
        id: &str,
        key: &str,
        value: Value,
    ) -> Result<(), HostError> {
        self.calls.push(HostCall::SetLayoutProperty {
            id: id.to_string(),
            key: key.to_string(),
            value: value.clone(),
        });
        self.layer_mut(id)?.set_layout(key, value);
        Ok(())
    }

    fn load_image(&mut self, url: &str) -> ImageFuture {
        self.calls.push(HostCall::LoadImage {
            url: url.to_string(),
        });
        let (reply, response) = oneshot::channel();
        self.pending_loads.push(PendingLoad {
            url: url.to_string(),
            reply,
        });
        let url = url.to_string();
        async move {
            response.await.unwrap_or_else(|_| {
                Err(HostError::ImageLoad {
                    url,
                    reason: "loader dropped".to_string(),
                })
            })
        }
        .boxed_local()
    }

    fn has_image(&self, id: &str) -> bool {
        self.images.contains_key(id)
    }

    fn remove_image(&mut self, id: &str) -> Result<(), HostError> {
        self.calls.push(HostCall::RemoveImage { id: id.to_string() });
        self.images
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| HostError::MissingImage(id.into()))
    }

    fn add_image(&mut self, id: &str, image: Image) -> Result<(), HostError> {
        self.calls.push(HostCall::AddImage { id: id.to_string() });
        if self.images.contains_key(id) {
            return Err(HostError::DuplicateImage(id.into()));
        }
        self.images.insert(id.into(), image);
        Ok(())
    }
}
