mod error;
pub mod recording;

pub use error::HostError;
pub use recording::{HostCall, RecordingMap};

use crate::control::SharedControl;
use carto_types::{ControlPosition, Image, LayerSpec};
use futures::future::LocalBoxFuture;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Pending result of [`MapHost::load_image`]
pub type ImageFuture = LocalBoxFuture<'static, Result<Image, HostError>>;

/// Shared reference to a live engine (interior mutability handled by the cell)
pub type SharedMap = Rc<RefCell<dyn MapHost>>;

/// Imperative surface of the map engine that synchronizers drive
///
/// Implementations own layers, images and controls by identity. The
/// synchronizers never read state back except through the presence checks
/// (`has_layer`, `has_image`).
pub trait MapHost {
    fn add_control(
        &mut self,
        control: SharedControl,
        position: ControlPosition,
    ) -> Result<(), HostError>;
    fn remove_control(&mut self, control: &SharedControl) -> Result<(), HostError>;

    /// Insert `spec` immediately below `before_id`, or on top of the stack when `None`
    fn add_layer(&mut self, spec: LayerSpec, before_id: Option<&str>) -> Result<(), HostError>;
    fn remove_layer(&mut self, id: &str) -> Result<(), HostError>;
    fn has_layer(&self, id: &str) -> bool;

    fn set_filter(&mut self, id: &str, filter: Option<&Value>) -> Result<(), HostError>;
    fn set_layer_zoom_range(&mut self, id: &str, minzoom: f64, maxzoom: f64)
    -> Result<(), HostError>;
    fn set_slot(&mut self, id: &str, slot: Option<&str>) -> Result<(), HostError>;
    fn move_layer(&mut self, id: &str, before_id: Option<&str>) -> Result<(), HostError>;
    fn set_paint_property(&mut self, id: &str, key: &str, value: Value) -> Result<(), HostError>;
    fn set_layout_property(&mut self, id: &str, key: &str, value: Value)
    -> Result<(), HostError>;

    /// Start fetching a raster; the returned future must not borrow the engine
    fn load_image(&mut self, url: &str) -> ImageFuture;
    fn has_image(&self, id: &str) -> bool;
    fn remove_image(&mut self, id: &str) -> Result<(), HostError>;
    fn add_image(&mut self, id: &str, image: Image) -> Result<(), HostError>;
}

/// Handle to the engine published by a [`HostProvider`]
///
/// Two handles are equal only when they come from the same publication.
/// Once the provider swaps or clears the engine the handle is retired and
/// every resource created through it is considered gone.
#[derive(Clone)]
pub struct HostHandle {
    engine: SharedMap,
    generation: u64,
    live: Rc<Cell<bool>>,
}

impl HostHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut dyn MapHost) -> R) -> R {
        f(&mut *self.engine.borrow_mut())
    }

    fn retire(&self) {
        self.live.set(false);
    }
}

impl PartialEq for HostHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.live, &other.live)
    }
}

impl Eq for HostHandle {}

impl fmt::Debug for HostHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostHandle")
            .field("generation", &self.generation)
            .field("live", &self.is_live())
            .finish()
    }
}

/// Publishes the current engine to the synchronizers mounted under a map
#[derive(Debug, Default)]
pub struct HostProvider {
    current: Option<HostHandle>,
    generation: u64,
}

impl HostProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `engine`, retiring whatever was published before
    pub fn provide(&mut self, engine: SharedMap) -> HostHandle {
        self.clear();
        self.generation += 1;
        let handle = HostHandle {
            engine,
            generation: self.generation,
            live: Rc::new(Cell::new(true)),
        };
        tracing::debug!(generation = handle.generation, "map host published");
        self.current = Some(handle.clone());
        handle
    }

    /// Engine torn down: retire the current handle
    pub fn clear(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.retire();
            tracing::debug!(generation = handle.generation, "map host retired");
        }
    }

    pub fn current(&self) -> Option<&HostHandle> {
        self.current.as_ref()
    }
}

impl Drop for HostProvider {
    fn drop(&mut self) {
        self.clear();
    }
}
