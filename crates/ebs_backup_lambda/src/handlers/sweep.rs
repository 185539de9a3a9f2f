use ebs_backup_core::contract::{
    CreatedSnapshot, SweepResponse, VolumeFailure, IN_USE_VOLUME_STATUS, SWEEP_ERROR_SUBJECT,
    SWEEP_SUCCESS_SUBJECT,
};
use ebs_backup_core::naming::{
    sweep_error_message, sweep_snapshot_description, sweep_success_message,
};
use tracing::{error, info};

use crate::adapters::ec2::{Ec2Api, RegionalEc2};
use crate::adapters::notify::Notifier;
use crate::config::SweepConfig;
use crate::error::SnapshotError;

const COMPONENT: &str = "region_sweep";

/// Snapshots every in-use volume in every region.
///
/// Region and volume enumeration failures abort the sweep. A failure while
/// snapshotting one volume is logged, notified and recorded, and the sweep
/// moves on to the next volume.
pub fn handle_region_sweep(
    config: &SweepConfig,
    home_client: &dyn Ec2Api,
    regional_clients: &dyn RegionalEc2,
    notifier: &dyn Notifier,
) -> Result<SweepResponse, SnapshotError> {
    let regions = home_client
        .describe_regions()
        .map_err(|message| abort(SnapshotError::RegionEnumeration(message)))?;
    info!(
        component = COMPONENT,
        event = "sweep_started",
        region_count = regions.len()
    );

    let mut snapshots_created = Vec::new();
    let mut failures = Vec::new();

    for region in &regions {
        info!(component = COMPONENT, event = "region_started", region = %region);
        let client = regional_clients.client_for_region(region);
        let volumes = client
            .describe_volumes(IN_USE_VOLUME_STATUS)
            .map_err(|message| {
                abort(SnapshotError::VolumeEnumeration {
                    region: region.clone(),
                    message,
                })
            })?;

        for volume in volumes.iter().filter(|volume| volume.is_in_use()) {
            info!(
                component = COMPONENT,
                event = "snapshot_requested",
                region = %region,
                volume_id = %volume.volume_id
            );
            if let Err(error) = snapshot_volume(
                config,
                client.as_ref(),
                notifier,
                region,
                &volume.volume_id,
                &mut snapshots_created,
            ) {
                failures.push(report_volume_failure(
                    config,
                    notifier,
                    region,
                    &volume.volume_id,
                    &error,
                ));
            }
        }
    }

    info!(
        component = COMPONENT,
        event = "sweep_completed",
        regions = regions.len(),
        snapshots_created = snapshots_created.len(),
        failures = failures.len()
    );
    Ok(SweepResponse::completed(snapshots_created, failures))
}

fn snapshot_volume(
    config: &SweepConfig,
    client: &dyn Ec2Api,
    notifier: &dyn Notifier,
    region: &str,
    volume_id: &str,
    snapshots_created: &mut Vec<CreatedSnapshot>,
) -> Result<(), SnapshotError> {
    let description = sweep_snapshot_description(volume_id, region);
    let snapshot_id = client
        .create_snapshot(volume_id, &description)
        .map_err(|message| SnapshotError::SnapshotCreation {
            volume_id: volume_id.to_string(),
            message,
        })?;

    // Recorded before notifying: the snapshot exists even if the publish fails.
    snapshots_created.push(CreatedSnapshot {
        region: region.to_string(),
        volume_id: volume_id.to_string(),
        snapshot_id: snapshot_id.clone(),
    });

    let message = sweep_success_message(&snapshot_id, volume_id, region);
    info!(
        component = COMPONENT,
        event = "snapshot_created",
        region = %region,
        volume_id = %volume_id,
        snapshot_id = %snapshot_id,
        "{message}"
    );
    notifier
        .publish(&config.topic_arn, SWEEP_SUCCESS_SUBJECT, &message)
        .map_err(SnapshotError::Notification)
}

fn report_volume_failure(
    config: &SweepConfig,
    notifier: &dyn Notifier,
    region: &str,
    volume_id: &str,
    error: &SnapshotError,
) -> VolumeFailure {
    let detail = error.to_string();
    let message = sweep_error_message(volume_id, region, &detail);
    error!(
        component = COMPONENT,
        event = "snapshot_failed",
        region = %region,
        volume_id = %volume_id,
        error = %detail,
        "{message}"
    );

    let published = notifier.publish(&config.topic_arn, SWEEP_ERROR_SUBJECT, &message);
    if let Err(publish_error) = published {
        error!(
            component = COMPONENT,
            event = "failure_notification_failed",
            region = %region,
            volume_id = %volume_id,
            error = %publish_error
        );
    }

    VolumeFailure {
        region: region.to_string(),
        volume_id: volume_id.to_string(),
        error: detail,
    }
}

fn abort(error: SnapshotError) -> SnapshotError {
    error!(component = COMPONENT, event = "sweep_aborted", error = %error);
    error
}
