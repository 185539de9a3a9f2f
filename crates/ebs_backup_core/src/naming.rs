use chrono::{DateTime, Utc};

use crate::contract::{ResourceTag, CREATED_BY_MARKER};

pub const INVOCATION_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%SZ";

pub fn invocation_timestamp(now: DateTime<Utc>) -> String {
    now.format(INVOCATION_TIMESTAMP_FORMAT).to_string()
}

pub fn sweep_snapshot_description(volume_id: &str, region: &str) -> String {
    format!("Snapshot of {volume_id} from region {region}")
}

pub fn auto_backup_description(instance_id: &str, volume_id: &str, timestamp: &str) -> String {
    format!("AutoBackup-{instance_id}-{volume_id}-{timestamp}")
}

pub fn auto_backup_tags(description: &str, instance_id: &str) -> Vec<ResourceTag> {
    vec![
        ResourceTag::new("Name", description),
        ResourceTag::new("CreatedBy", CREATED_BY_MARKER),
        ResourceTag::new("InstanceId", instance_id),
    ]
}

pub fn sweep_success_message(snapshot_id: &str, volume_id: &str, region: &str) -> String {
    format!("Snapshot created: {snapshot_id} for Volume {volume_id} in Region {region}")
}

pub fn sweep_error_message(volume_id: &str, region: &str, error: &str) -> String {
    format!("Error creating snapshot for Volume {volume_id} in Region {region}: {error}")
}

pub fn tagged_success_message(snapshot_ids: &[String], instance_id: &str) -> String {
    format!(
        "Created snapshots [{}] for instance {instance_id}",
        snapshot_ids.join(", ")
    )
}

pub fn tagged_failure_message(error: &str) -> String {
    format!("Error creating snapshot: {error}")
}
