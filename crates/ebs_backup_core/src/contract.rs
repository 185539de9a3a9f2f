use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const IN_USE_VOLUME_STATUS: &str = "in-use";
pub const SWEEP_SUCCESS_STATUS_CODE: u16 = 200;
pub const CREATED_BY_MARKER: &str = "LambdaAutomation";

pub const SWEEP_SUCCESS_SUBJECT: &str = "Snapshot Success";
pub const SWEEP_ERROR_SUBJECT: &str = "Snapshot Error";
pub const TAGGED_SUCCESS_SUBJECT: &str = "EBS Snapshot Created";
pub const TAGGED_FAILURE_SUBJECT: &str = "EBS Snapshot Failure";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceTag {
    pub key: String,
    pub value: String,
}

impl ResourceTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolumeSummary {
    pub volume_id: String,
    pub status: String,
}

impl VolumeSummary {
    pub fn is_in_use(&self) -> bool {
        self.status == IN_USE_VOLUME_STATUS
    }
}

/// The parts of a described instance the tag-triggered workflow consumes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceDescription {
    pub instance_id: String,
    pub tags: Vec<ResourceTag>,
    /// EBS volume ids in block-device-mapping order.
    pub volume_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CreatedSnapshot {
    pub region: String,
    pub volume_id: String,
    pub snapshot_id: String,
}

impl fmt::Display for CreatedSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Region: {}, ", self.region)?;
        write!(f, "VolumeId: {}, ", self.volume_id)?;
        write!(f, "SnapshotId: {}}}", self.snapshot_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolumeFailure {
    pub region: String,
    pub volume_id: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SweepResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
    pub snapshots_created: Vec<CreatedSnapshot>,
    pub failures: Vec<VolumeFailure>,
}

impl SweepResponse {
    /// The body lists every created row, as in `Snapshots created: [{Region: ..}]`.
    pub fn completed(
        snapshots_created: Vec<CreatedSnapshot>,
        failures: Vec<VolumeFailure>,
    ) -> Self {
        let rows = snapshots_created
            .iter()
            .map(CreatedSnapshot::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            status_code: SWEEP_SUCCESS_STATUS_CODE,
            body: format!("Snapshots created: [{rows}]"),
            snapshots_created,
            failures,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum TagSnapshotResponse {
    NoInstanceId,
    SkippedNoTag,
    Success { snapshots: Vec<String> },
}

/// Reads `detail.instance-id` from a lifecycle event. Anything other than a
/// non-empty string yields `None`; the id is passed through untouched.
pub fn instance_id_from_event(event: &Value) -> Option<String> {
    event
        .get("detail")
        .and_then(|detail| detail.get("instance-id"))
        .and_then(Value::as_str)
        .filter(|instance_id| !instance_id.is_empty())
        .map(str::to_string)
}
