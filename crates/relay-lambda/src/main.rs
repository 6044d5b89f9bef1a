use anyhow::Context;
use aws_config::timeout::TimeoutConfig;
use aws_lambda_events::event::s3::S3Event;
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use relay_core::DispatcherBuilder;
use relay_lambda::{config, ecs::EcsTaskLauncher, handler, telemetry};

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init();

    tracing::trace!("initiating lambda");

    // Idle → Validating: 設定が不正ならここで終了し、イベントを受け付けない
    let config = config::load_from_env()?;
    tracing::info!(
        cluster = config.cluster(),
        task_definition = config.task_definition(),
        subnets = config.subnets().len(),
        bucket = config.bucket(),
        "initialized config"
    );

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        // SDK 側の期限切れも ecs::sdk_rejection 経由で Timeout に分類される
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(config.run_task_timeout())
                .build(),
        )
        .load()
        .await;

    let launcher = EcsTaskLauncher::new(aws_sdk_ecs::Client::new(&aws_config));
    tracing::trace!("initialized ecs client");

    let dispatcher = DispatcherBuilder::new(config)
        .launcher(launcher)
        .build()
        .context("dispatcher must be ready before accepting events")?;

    let func = service_fn(move |event: LambdaEvent<S3Event>| {
        let dispatcher = dispatcher.clone();
        async move { handler::handler(&dispatcher, event).await }
    });

    run(func).await
}
