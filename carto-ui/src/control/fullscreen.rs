use super::{BuildControl, Control};
use carto_types::ContainerRef;

/// Toggle that puts the map (or `container`) into fullscreen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FullscreenControl {
    container: Option<ContainerRef>,
}

impl Control for FullscreenControl {
    fn kind(&self) -> &'static str {
        "fullscreen"
    }

    fn container(&self) -> Option<&ContainerRef> {
        self.container.as_ref()
    }
}

impl BuildControl for FullscreenControl {
    fn build(container: Option<ContainerRef>) -> Self {
        Self { container }
    }
}
