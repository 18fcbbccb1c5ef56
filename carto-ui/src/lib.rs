pub mod config;
pub mod control;
pub mod effect;
mod error;
pub mod host;
pub mod layer;
pub mod scheduler;

// Re-export key types
pub use config::{ConfigError, LayerDefaults, SyncConfig};
pub use control::{
    BuildControl, Control, ControlProps, ControlSynchronizer, FullscreenControl, SharedControl,
};
pub use error::SyncError;
pub use host::{HostError, HostHandle, HostProvider, MapHost, SharedMap};
pub use layer::{BackgroundLayer, BackgroundLayerProps, ImageBinding, LayerState};
pub use scheduler::{Scheduler, SharedScheduler};

pub use carto_types as types;
