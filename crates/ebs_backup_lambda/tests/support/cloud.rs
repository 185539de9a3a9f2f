use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use ebs_backup_core::contract::{InstanceDescription, ResourceTag, VolumeSummary};
use ebs_backup_lambda::adapters::ec2::{Ec2Api, RegionalEc2};

pub const HOME_REGION: &str = "us-east-1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    DescribeRegions,
    DescribeVolumes {
        region: String,
        status: String,
    },
    CreateSnapshot {
        region: String,
        volume_id: String,
        description: String,
    },
    DescribeInstance {
        instance_id: String,
    },
    CreateTags {
        resource_id: String,
        tags: Vec<ResourceTag>,
    },
}

/// In-memory EC2 account spanning several regions.
#[derive(Default)]
pub struct FakeCloud {
    regions: Vec<String>,
    volumes: HashMap<String, Vec<VolumeSummary>>,
    instances: HashMap<String, InstanceDescription>,
    failing_snapshots: HashSet<String>,
    failing_volume_listings: HashSet<String>,
    failing_region_listing: bool,
    failing_instance_lookup: bool,
    failing_tags: bool,
    calls: Mutex<Vec<ProviderCall>>,
    snapshots_issued: Mutex<usize>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: &str, volumes: &[(&str, &str)]) -> Self {
        self.regions.push(region.to_string());
        self.volumes.insert(
            region.to_string(),
            volumes
                .iter()
                .map(|(volume_id, status)| VolumeSummary {
                    volume_id: volume_id.to_string(),
                    status: status.to_string(),
                })
                .collect(),
        );
        self
    }

    pub fn with_instance(
        mut self,
        instance_id: &str,
        tags: &[(&str, &str)],
        volumes: &[&str],
    ) -> Self {
        self.instances.insert(
            instance_id.to_string(),
            InstanceDescription {
                instance_id: instance_id.to_string(),
                tags: tags
                    .iter()
                    .map(|(key, value)| ResourceTag::new(*key, *value))
                    .collect(),
                volume_ids: volumes.iter().map(|volume| volume.to_string()).collect(),
            },
        );
        self
    }

    pub fn failing_snapshot(mut self, volume_id: &str) -> Self {
        self.failing_snapshots.insert(volume_id.to_string());
        self
    }

    pub fn failing_volume_listing(mut self, region: &str) -> Self {
        self.failing_volume_listings.insert(region.to_string());
        self
    }

    pub fn failing_region_listing(mut self) -> Self {
        self.failing_region_listing = true;
        self
    }

    pub fn failing_instance_lookup(mut self) -> Self {
        self.failing_instance_lookup = true;
        self
    }

    pub fn failing_tags(mut self) -> Self {
        self.failing_tags = true;
        self
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().expect("poisoned mutex").clone()
    }

    pub fn snapshot_attempts(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::CreateSnapshot {
                    region, volume_id, ..
                } => Some((region, volume_id)),
                _ => None,
            })
            .collect()
    }

    pub fn snapshot_descriptions(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::CreateSnapshot { description, .. } => Some(description),
                _ => None,
            })
            .collect()
    }

    pub fn tag_calls(&self) -> Vec<(String, Vec<ResourceTag>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProviderCall::CreateTags { resource_id, tags } => Some((resource_id, tags)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ProviderCall) {
        self.calls.lock().expect("poisoned mutex").push(call);
    }

    fn scoped(&self, region: &str) -> ScopedClient<'_> {
        ScopedClient {
            cloud: self,
            region: region.to_string(),
        }
    }
}

pub struct ScopedClient<'a> {
    cloud: &'a FakeCloud,
    region: String,
}

impl Ec2Api for ScopedClient<'_> {
    fn describe_regions(&self) -> Result<Vec<String>, String> {
        self.cloud.record(ProviderCall::DescribeRegions);
        if self.cloud.failing_region_listing {
            return Err("UnauthorizedOperation: ec2:DescribeRegions denied".to_string());
        }
        Ok(self.cloud.regions.clone())
    }

    fn describe_volumes(&self, status: &str) -> Result<Vec<VolumeSummary>, String> {
        self.cloud.record(ProviderCall::DescribeVolumes {
            region: self.region.clone(),
            status: status.to_string(),
        });
        if self.cloud.failing_volume_listings.contains(&self.region) {
            return Err(format!("RequestExpired in {}", self.region));
        }
        Ok(self
            .cloud
            .volumes
            .get(&self.region)
            .map(|volumes| {
                volumes
                    .iter()
                    .filter(|volume| volume.status == status)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn create_snapshot(&self, volume_id: &str, description: &str) -> Result<String, String> {
        self.cloud.record(ProviderCall::CreateSnapshot {
            region: self.region.clone(),
            volume_id: volume_id.to_string(),
            description: description.to_string(),
        });
        if self.cloud.failing_snapshots.contains(volume_id) {
            return Err(format!("IncorrectState: volume {volume_id} is busy"));
        }

        let mut issued = self.cloud.snapshots_issued.lock().expect("poisoned mutex");
        *issued += 1;
        Ok(format!("snap-{:04}", *issued))
    }

    fn describe_instance(&self, instance_id: &str) -> Result<Option<InstanceDescription>, String> {
        self.cloud.record(ProviderCall::DescribeInstance {
            instance_id: instance_id.to_string(),
        });
        if self.cloud.failing_instance_lookup {
            return Err("InvalidInstanceID.Malformed".to_string());
        }
        Ok(self.cloud.instances.get(instance_id).cloned())
    }

    fn create_tags(&self, resource_id: &str, tags: &[ResourceTag]) -> Result<(), String> {
        self.cloud.record(ProviderCall::CreateTags {
            resource_id: resource_id.to_string(),
            tags: tags.to_vec(),
        });
        if self.cloud.failing_tags {
            return Err("TagLimitExceeded".to_string());
        }
        Ok(())
    }
}

impl Ec2Api for FakeCloud {
    fn describe_regions(&self) -> Result<Vec<String>, String> {
        self.scoped(HOME_REGION).describe_regions()
    }

    fn describe_volumes(&self, status: &str) -> Result<Vec<VolumeSummary>, String> {
        self.scoped(HOME_REGION).describe_volumes(status)
    }

    fn create_snapshot(&self, volume_id: &str, description: &str) -> Result<String, String> {
        self.scoped(HOME_REGION)
            .create_snapshot(volume_id, description)
    }

    fn describe_instance(&self, instance_id: &str) -> Result<Option<InstanceDescription>, String> {
        self.scoped(HOME_REGION).describe_instance(instance_id)
    }

    fn create_tags(&self, resource_id: &str, tags: &[ResourceTag]) -> Result<(), String> {
        self.scoped(HOME_REGION).create_tags(resource_id, tags)
    }
}

impl RegionalEc2 for FakeCloud {
    fn client_for_region(&self, region: &str) -> Box<dyn Ec2Api + '_> {
        Box::new(self.scoped(region))
    }
}
