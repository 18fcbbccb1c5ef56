use crate::host::HostError;
use carto_types::LayerId;
use futures::task::SpawnError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// The engine rejected an operation (duplicate id, unknown `before_id`, ...)
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("image for layer '{layer}' failed to load from '{url}'")]
    ImageLoad {
        layer: LayerId,
        url: String,
        #[source]
        source: HostError,
    },

    #[error("failed to schedule image binding: {0}")]
    Spawn(#[from] SpawnError),
}

pub type Result<T> = std::result::Result<T, SyncError>;
