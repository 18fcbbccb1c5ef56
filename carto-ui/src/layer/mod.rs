mod background;
mod image;
pub mod patch;
mod props;

pub use background::{BackgroundLayer, LayerState};
pub use image::ImageBinding;
pub use patch::LayerPatch;
pub use props::BackgroundLayerProps;
