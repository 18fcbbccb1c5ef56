use crate::error::Result;
use carto_types::LayerId;
use futures::future::LocalBoxFuture;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Continuation that binds a loaded image to its layer
///
/// Returned by [`super::BackgroundLayer::render`] when the layer needs an
/// image. Rendering does not wait for it: the host runtime drives it (for
/// example through [`crate::Scheduler`]) and must surface its error. If the
/// layer was torn down or re-keyed before the image arrives, the binding
/// resolves to `Ok(())` without touching the map.
#[must_use = "the layer is only added once the binding is driven to completion"]
pub struct ImageBinding {
    layer: LayerId,
    url: String,
    task: LocalBoxFuture<'static, Result<()>>,
}

impl ImageBinding {
    pub(crate) fn new(layer: LayerId, url: String, task: LocalBoxFuture<'static, Result<()>>) -> Self {
        Self { layer, url, task }
    }

    pub fn layer_id(&self) -> &str {
        &self.layer
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Future for ImageBinding {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.task.as_mut().poll(cx)
    }
}

impl fmt::Debug for ImageBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBinding")
            .field("layer", &self.layer)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}
