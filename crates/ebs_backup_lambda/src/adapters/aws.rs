use std::future::Future;

use aws_config::SdkConfig;
use aws_sdk_ec2::config::Region;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::{Filter, Tag};
use ebs_backup_core::contract::{InstanceDescription, ResourceTag, VolumeSummary};

use crate::adapters::ec2::{Ec2Api, RegionalEc2};
use crate::adapters::notify::Notifier;

const VOLUME_STATUS_FILTER: &str = "status";

/// Runs an SDK future to completion from the synchronous adapter contract.
/// Needs the multi-threaded tokio runtime.
fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

fn sdk_message(error: impl std::error::Error) -> String {
    DisplayErrorContext(error).to_string()
}

/// Tags without a key are dropped; a missing value reads as empty.
fn resource_tag(tag: &Tag) -> Option<ResourceTag> {
    let key = tag.key()?;
    Some(ResourceTag::new(key, tag.value().unwrap_or_default()))
}

#[derive(Clone)]
pub struct AwsEc2 {
    client: aws_sdk_ec2::Client,
}

impl AwsEc2 {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_ec2::Client::new(config),
        }
    }

    pub fn for_region(config: &SdkConfig, region: &str) -> Self {
        let regional_config = aws_sdk_ec2::config::Builder::from(config)
            .region(Region::new(region.to_string()))
            .build();
        Self {
            client: aws_sdk_ec2::Client::from_conf(regional_config),
        }
    }
}

impl Ec2Api for AwsEc2 {
    fn describe_regions(&self) -> Result<Vec<String>, String> {
        let client = self.client.clone();

        block_on(async move {
            let output = client.describe_regions().send().await.map_err(sdk_message)?;
            let regions = output
                .regions()
                .iter()
                .filter_map(|region| region.region_name())
                .map(str::to_string)
                .collect::<Vec<_>>();
            Ok::<_, String>(regions)
        })
    }

    fn describe_volumes(&self, status: &str) -> Result<Vec<VolumeSummary>, String> {
        let client = self.client.clone();
        let status = status.to_string();

        block_on(async move {
            let volumes = client
                .describe_volumes()
                .filters(
                    Filter::builder()
                        .name(VOLUME_STATUS_FILTER)
                        .values(status)
                        .build(),
                )
                .into_paginator()
                .items()
                .send()
                .collect::<Result<Vec<_>, _>>()
                .await
                .map_err(sdk_message)?;

            let summaries = volumes
                .iter()
                .filter_map(|volume| {
                    Some(VolumeSummary {
                        volume_id: volume.volume_id()?.to_string(),
                        status: volume
                            .state()
                            .map(|state| state.as_str().to_string())
                            .unwrap_or_default(),
                    })
                })
                .collect::<Vec<_>>();
            Ok::<_, String>(summaries)
        })
    }

    fn create_snapshot(&self, volume_id: &str, description: &str) -> Result<String, String> {
        let client = self.client.clone();
        let volume_id = volume_id.to_string();
        let description = description.to_string();

        block_on(async move {
            let output = client
                .create_snapshot()
                .volume_id(volume_id)
                .description(description)
                .send()
                .await
                .map_err(sdk_message)?;
            output
                .snapshot_id()
                .map(str::to_string)
                .ok_or_else(|| "create_snapshot response did not include a snapshot id".to_string())
        })
    }

    fn describe_instance(&self, instance_id: &str) -> Result<Option<InstanceDescription>, String> {
        let client = self.client.clone();
        let requested_id = instance_id.to_string();

        block_on(async move {
            let output = client
                .describe_instances()
                .instance_ids(requested_id.clone())
                .send()
                .await
                .map_err(sdk_message)?;

            let Some(instance) = output
                .reservations()
                .first()
                .and_then(|reservation| reservation.instances().first())
            else {
                return Ok::<_, String>(None);
            };

            Ok(Some(InstanceDescription {
                instance_id: instance
                    .instance_id()
                    .map(str::to_string)
                    .unwrap_or(requested_id),
                tags: instance.tags().iter().filter_map(resource_tag).collect(),
                volume_ids: instance
                    .block_device_mappings()
                    .iter()
                    .filter_map(|mapping| mapping.ebs().and_then(|ebs| ebs.volume_id()))
                    .map(str::to_string)
                    .collect(),
            }))
        })
    }

    fn create_tags(&self, resource_id: &str, tags: &[ResourceTag]) -> Result<(), String> {
        let client = self.client.clone();
        let resource_id = resource_id.to_string();
        let sdk_tags = tags
            .iter()
            .map(|tag| Tag::builder().key(&tag.key).value(&tag.value).build())
            .collect::<Vec<_>>();

        block_on(async move {
            client
                .create_tags()
                .resources(resource_id)
                .set_tags(Some(sdk_tags))
                .send()
                .await
                .map(|_| ())
                .map_err(sdk_message)
        })
    }
}

/// Builds one EC2 client per swept region from the shared SDK config.
#[derive(Clone)]
pub struct AwsRegionalEc2 {
    config: SdkConfig,
}

impl AwsRegionalEc2 {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl RegionalEc2 for AwsRegionalEc2 {
    fn client_for_region(&self, region: &str) -> Box<dyn Ec2Api + '_> {
        Box::new(AwsEc2::for_region(&self.config, region))
    }
}

#[derive(Clone)]
pub struct SnsNotifier {
    client: aws_sdk_sns::Client,
}

impl SnsNotifier {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_sns::Client::new(config),
        }
    }
}

impl Notifier for SnsNotifier {
    fn publish(&self, topic_arn: &str, subject: &str, message: &str) -> Result<(), String> {
        let client = self.client.clone();
        let topic_arn = topic_arn.to_string();
        let subject = subject.to_string();
        let message = message.to_string();

        block_on(async move {
            client
                .publish()
                .topic_arn(topic_arn)
                .subject(subject)
                .message(message)
                .send()
                .await
                .map(|_| ())
                .map_err(sdk_message)
        })
    }
}
