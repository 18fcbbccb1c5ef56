use super::image::ImageBinding;
use super::patch;
use super::props::BackgroundLayerProps;
use crate::effect::{Effect, EpochCounter, EpochToken};
use crate::error::{Result, SyncError};
use crate::host::{HostError, HostHandle, ImageFuture, MapHost};
use carto_types::{LayerId, LayerSpec};
use futures::FutureExt;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Where a layer is in its create/load lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerState {
    #[default]
    Absent,
    LoadingImage,
    Present,
    /// The image or the layer could not be added; stays until the next recreation
    Failed,
}

/// Inputs whose change forces a full recreate
#[derive(Debug, PartialEq)]
struct IdentityDeps {
    host: Option<HostHandle>,
    id: LayerId,
    image_url: Option<String>,
}

/// State shared with an in-flight image continuation
#[derive(Debug, Default)]
struct LayerShared {
    state: Cell<LayerState>,
    /// Props of the last render applied against a live host
    snapshot: RefCell<Option<BackgroundLayerProps>>,
    /// Image this synchronizer registered under the layer id
    bound_image: RefCell<Option<LayerId>>,
}

/// Keeps one background layer on the map in line with its props
///
/// Identity (host, id, image url) changes tear the layer down and build it
/// again; every other prop change becomes a single narrow patch call.
#[derive(Debug, Default)]
pub struct BackgroundLayer {
    identity: Effect<IdentityDeps>,
    epoch: EpochCounter,
    shared: Rc<LayerShared>,
}

impl BackgroundLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LayerState {
        self.shared.state.get()
    }

    /// Id of the layer this synchronizer currently owns
    pub fn layer_id(&self) -> Option<&str> {
        self.identity.deps().map(|deps| deps.id.as_str())
    }

    /// Reconcile the map with `props`
    ///
    /// Returns a binding when the layer waits on an image; the layer is only
    /// added once the binding completes.
    pub fn render(
        &mut self,
        host: Option<&HostHandle>,
        props: &BackgroundLayerProps,
    ) -> Result<Option<ImageBinding>> {
        let host = host.filter(|host| host.is_live());
        let deps = IdentityDeps {
            host: host.cloned(),
            id: props.id.clone(),
            image_url: props.image_url.clone(),
        };

        if self.identity.changed(&deps) {
            self.teardown()?;
            self.identity.commit(deps);
            let Some(host) = host else {
                trace!(layer = %props.id, "no map host yet, layer deferred");
                return Ok(None);
            };
            // Creation applies every prop, so this render has nothing to patch
            self.shared.snapshot.replace(Some(props.clone()));
            return self.create(host, props);
        }

        if let Some(host) = host {
            self.patch(host, props)?;
        }
        Ok(None)
    }

    /// Remove the layer (and its image) and drop any pending image load
    pub fn unmount(&mut self) -> Result<()> {
        let result = self.teardown();
        self.shared.snapshot.replace(None);
        self.shared.state.set(LayerState::Absent);
        result
    }

    fn create(
        &mut self,
        host: &HostHandle,
        props: &BackgroundLayerProps,
    ) -> Result<Option<ImageBinding>> {
        let Some(url) = props.image_url.clone() else {
            let spec = props.to_spec(None);
            host.with_mut(|map| replace_layer(map, spec, props.before_id.as_deref()))
                .inspect_err(|_| self.shared.state.set(LayerState::Failed))?;
            self.shared.state.set(LayerState::Present);
            debug!(layer = %props.id, "layer created");
            return Ok(None);
        };

        self.shared.state.set(LayerState::LoadingImage);
        let load = host.with_mut(|map| map.load_image(&url));
        debug!(layer = %props.id, url = %url, "loading layer image");

        let task = BindTask {
            token: self.epoch.token(),
            host: host.clone(),
            layer: props.id.clone(),
            url: url.clone(),
            shared: Rc::clone(&self.shared),
        };
        Ok(Some(ImageBinding::new(
            props.id.clone(),
            url,
            bind_image(task, load).boxed_local(),
        )))
    }

    fn patch(&mut self, host: &HostHandle, props: &BackgroundLayerProps) -> Result<()> {
        let patches = match self.shared.snapshot.borrow().as_ref() {
            Some(prev) => patch::diff(prev, props),
            None => Default::default(),
        };

        if !patches.is_empty() {
            let applied = host.with_mut(|map| -> std::result::Result<bool, HostError> {
                // Still loading its image, or removed behind our back
                if !map.has_layer(&props.id) {
                    return Ok(false);
                }
                for patch in &patches {
                    patch.apply(map, &props.id)?;
                }
                Ok(true)
            })?;
            if applied {
                debug!(layer = %props.id, count = patches.len(), "layer patched");
            } else {
                trace!(layer = %props.id, "layer not on the map, patches skipped");
            }
        }

        self.shared.snapshot.replace(Some(props.clone()));
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        self.epoch.advance();
        let bound = self.shared.bound_image.take();
        let Some(prev) = self.identity.reset() else {
            return Ok(());
        };
        self.shared.state.set(LayerState::Absent);

        let Some(host) = prev.host.filter(HostHandle::is_live) else {
            return Ok(());
        };
        host.with_mut(|map| -> std::result::Result<(), HostError> {
            if map.has_layer(&prev.id) {
                map.remove_layer(&prev.id)?;
                debug!(layer = %prev.id, "layer removed");
            }
            if let Some(image) = bound.filter(|image| map.has_image(image)) {
                map.remove_image(&image)?;
            }
            Ok(())
        })?;
        Ok(())
    }
}

impl Drop for BackgroundLayer {
    fn drop(&mut self) {
        if let Err(e) = self.unmount() {
            warn!("failed to remove layer on drop: {}", e);
        }
    }
}

/// Remove any same-id layer, then add `spec`
fn replace_layer(
    map: &mut dyn MapHost,
    spec: LayerSpec,
    before_id: Option<&str>,
) -> std::result::Result<(), HostError> {
    if map.has_layer(&spec.id) {
        map.remove_layer(&spec.id)?;
    }
    map.add_layer(spec, before_id)
}

struct BindTask {
    token: EpochToken,
    host: HostHandle,
    layer: LayerId,
    url: String,
    shared: Rc<LayerShared>,
}

impl BindTask {
    fn is_current(&self) -> bool {
        self.token.is_current() && self.host.is_live()
    }

    fn fail(&self) {
        self.shared.state.set(LayerState::Failed);
    }
}

async fn bind_image(task: BindTask, load: ImageFuture) -> Result<()> {
    let loaded = load.await;
    if !task.is_current() {
        debug!(layer = %task.layer, url = %task.url, "stale image load dropped");
        return Ok(());
    }

    let image = match loaded {
        Ok(image) => image,
        Err(source) => {
            task.fail();
            warn!(layer = %task.layer, url = %task.url, "layer image failed to load: {}", source);
            return Err(SyncError::ImageLoad {
                layer: task.layer,
                url: task.url,
                source,
            });
        }
    };

    // Props may have moved on while the image was loading
    let Some(props) = task.shared.snapshot.borrow().clone() else {
        return Ok(());
    };
    let spec = props.to_spec(Some(task.layer.as_str()));

    let attached = task.host.with_mut(|map| -> std::result::Result<(), HostError> {
        if map.has_image(&task.layer) {
            map.remove_image(&task.layer)?;
        }
        map.add_image(&task.layer, image)?;
        task.shared.bound_image.replace(Some(task.layer.clone()));
        replace_layer(map, spec, props.before_id.as_deref())
    });
    if let Err(e) = attached {
        task.fail();
        return Err(e.into());
    }

    task.shared.state.set(LayerState::Present);
    debug!(layer = %task.layer, "layer created with image pattern");
    Ok(())
}
