use aws_config::BehaviorVersion;
use ebs_backup_core::contract::SweepResponse;
use ebs_backup_lambda::adapters::aws::{AwsEc2, AwsRegionalEc2, SnsNotifier};
use ebs_backup_lambda::config::SweepConfig;
use ebs_backup_lambda::handlers::sweep::handle_region_sweep;
use ebs_backup_lambda::logging;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

struct SweepDependencies {
    config: SweepConfig,
    home_client: AwsEc2,
    regional_clients: AwsRegionalEc2,
    notifier: SnsNotifier,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &SweepDependencies,
) -> Result<SweepResponse, Error> {
    tracing::info!(
        component = "region_sweep",
        event = "invocation_received",
        request_id = %event.context.request_id,
        payload = %event.payload
    );

    handle_region_sweep(
        &deps.config,
        &deps.home_client,
        &deps.regional_clients,
        &deps.notifier,
    )
    .map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();

    let config = SweepConfig::from_env()?;
    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let deps = SweepDependencies {
        config,
        home_client: AwsEc2::new(&aws_config),
        regional_clients: AwsRegionalEc2::new(&aws_config),
        notifier: SnsNotifier::new(&aws_config),
    };

    lambda_runtime::run(service_fn(|event| handle_request(event, &deps))).await
}
