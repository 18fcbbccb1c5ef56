use carto_types::LayerId;
use thiserror::Error;

/// Failures reported by the map engine itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("layer '{0}' already exists")]
    DuplicateLayer(LayerId),

    #[error("layer '{0}' does not exist")]
    MissingLayer(LayerId),

    #[error("layer '{0}' cannot be moved before itself")]
    SelfTarget(LayerId),

    #[error("image '{0}' already exists")]
    DuplicateImage(LayerId),

    #[error("image '{0}' does not exist")]
    MissingImage(LayerId),

    #[error("control is not attached to this map")]
    UnknownControl,

    #[error("failed to load image '{url}': {reason}")]
    ImageLoad { url: String, reason: String },
}
