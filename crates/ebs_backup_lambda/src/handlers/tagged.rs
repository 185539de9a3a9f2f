use chrono::{DateTime, Utc};
use ebs_backup_core::contract::{
    instance_id_from_event, TagSnapshotResponse, TAGGED_FAILURE_SUBJECT, TAGGED_SUCCESS_SUBJECT,
};
use ebs_backup_core::eligibility::{is_backup_enabled, tag_map};
use ebs_backup_core::naming::{
    auto_backup_description, auto_backup_tags, invocation_timestamp, tagged_failure_message,
    tagged_success_message,
};
use serde_json::Value;
use tracing::{error, info};

use crate::adapters::ec2::Ec2Api;
use crate::adapters::notify::Notifier;
use crate::config::TagSnapshotConfig;
use crate::error::SnapshotError;

const COMPONENT: &str = "tag_snapshot";

/// Snapshots and tags every EBS volume of the instance named in a lifecycle
/// event, provided the instance opted in with `Backup=true`.
///
/// Any failure past the eligibility check aborts the remaining volumes, is
/// reported once through the configured topic and returned to the caller.
/// Snapshots created before the failure are kept.
pub fn handle_tag_snapshot_event(
    event: &Value,
    config: &TagSnapshotConfig,
    now: DateTime<Utc>,
    ec2: &dyn Ec2Api,
    notifier: &dyn Notifier,
) -> Result<TagSnapshotResponse, SnapshotError> {
    info!(component = COMPONENT, event = "event_received", payload = %event);

    let Some(instance_id) = instance_id_from_event(event) else {
        info!(component = COMPONENT, event = "no_instance_id");
        return Ok(TagSnapshotResponse::NoInstanceId);
    };

    match snapshot_instance(&instance_id, config, now, ec2, notifier) {
        Ok(response) => Ok(response),
        Err(failure) => {
            let detail = failure.to_string();
            error!(
                component = COMPONENT,
                event = "invocation_failed",
                instance_id = %instance_id,
                error = %detail
            );
            if let Some(topic_arn) = config.topic_arn.as_deref() {
                if let Err(publish_error) = notifier.publish(
                    topic_arn,
                    TAGGED_FAILURE_SUBJECT,
                    &tagged_failure_message(&detail),
                ) {
                    error!(
                        component = COMPONENT,
                        event = "failure_notification_failed",
                        instance_id = %instance_id,
                        error = %publish_error
                    );
                }
            }
            Err(failure)
        }
    }
}

fn snapshot_instance(
    instance_id: &str,
    config: &TagSnapshotConfig,
    now: DateTime<Utc>,
    ec2: &dyn Ec2Api,
    notifier: &dyn Notifier,
) -> Result<TagSnapshotResponse, SnapshotError> {
    let instance = ec2
        .describe_instance(instance_id)
        .map_err(|message| SnapshotError::InstanceLookup {
            instance_id: instance_id.to_string(),
            message,
        })?
        .ok_or_else(|| SnapshotError::InstanceNotFound(instance_id.to_string()))?;

    let tags = tag_map(&instance.tags);
    info!(component = COMPONENT, event = "instance_tags", instance_id = %instance_id, tags = ?tags);

    if !is_backup_enabled(&instance.tags) {
        info!(
            component = COMPONENT,
            event = "instance_skipped",
            instance_id = %instance_id,
            "Backup tag not present or not true"
        );
        return Ok(TagSnapshotResponse::SkippedNoTag);
    }

    // One timestamp for every snapshot of this invocation.
    let timestamp = invocation_timestamp(now);
    let mut snapshots = Vec::with_capacity(instance.volume_ids.len());

    for volume_id in &instance.volume_ids {
        let description = auto_backup_description(instance_id, volume_id, &timestamp);
        let snapshot_id = ec2
            .create_snapshot(volume_id, &description)
            .map_err(|message| SnapshotError::SnapshotCreation {
                volume_id: volume_id.clone(),
                message,
            })?;
        ec2.create_tags(&snapshot_id, &auto_backup_tags(&description, instance_id))
            .map_err(|message| SnapshotError::Tagging {
                snapshot_id: snapshot_id.clone(),
                message,
            })?;
        info!(
            component = COMPONENT,
            event = "snapshot_created",
            instance_id = %instance_id,
            volume_id = %volume_id,
            snapshot_id = %snapshot_id
        );
        snapshots.push(snapshot_id);
    }

    if let Some(topic_arn) = config.topic_arn.as_deref() {
        notifier
            .publish(
                topic_arn,
                TAGGED_SUCCESS_SUBJECT,
                &tagged_success_message(&snapshots, instance_id),
            )
            .map_err(SnapshotError::Notification)?;
    }

    Ok(TagSnapshotResponse::Success { snapshots })
}
