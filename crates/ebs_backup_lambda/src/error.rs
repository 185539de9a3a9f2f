use thiserror::Error;

/// Failures raised while talking to the cloud provider or notification
/// service. Whether one aborts the invocation is decided by the handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("failed to describe regions: {0}")]
    RegionEnumeration(String),

    #[error("failed to describe volumes in region {region}: {message}")]
    VolumeEnumeration { region: String, message: String },

    #[error("failed to describe instance {instance_id}: {message}")]
    InstanceLookup {
        instance_id: String,
        message: String,
    },

    #[error("instance {0} was not found")]
    InstanceNotFound(String),

    #[error("failed to create snapshot for volume {volume_id}: {message}")]
    SnapshotCreation { volume_id: String, message: String },

    #[error("failed to tag snapshot {snapshot_id}: {message}")]
    Tagging {
        snapshot_id: String,
        message: String,
    },

    #[error("failed to publish notification: {0}")]
    Notification(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
}
