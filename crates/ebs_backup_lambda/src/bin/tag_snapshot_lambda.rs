use aws_config::BehaviorVersion;
use chrono::Utc;
use ebs_backup_core::contract::TagSnapshotResponse;
use ebs_backup_lambda::adapters::aws::{AwsEc2, SnsNotifier};
use ebs_backup_lambda::config::TagSnapshotConfig;
use ebs_backup_lambda::handlers::tagged::handle_tag_snapshot_event;
use ebs_backup_lambda::logging;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

struct TagSnapshotDependencies {
    config: TagSnapshotConfig,
    ec2: AwsEc2,
    notifier: SnsNotifier,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &TagSnapshotDependencies,
) -> Result<TagSnapshotResponse, Error> {
    handle_tag_snapshot_event(
        &event.payload,
        &deps.config,
        Utc::now(),
        &deps.ec2,
        &deps.notifier,
    )
    .map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let deps = TagSnapshotDependencies {
        config: TagSnapshotConfig::from_env(),
        ec2: AwsEc2::new(&aws_config),
        notifier: SnsNotifier::new(&aws_config),
    };

    lambda_runtime::run(service_fn(|event| handle_request(event, &deps))).await
}
