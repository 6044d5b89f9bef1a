//! EcsTaskLauncher - aws-sdk-ecs による TaskLauncher 実装
//!
//! SDK の型への変換と、SDK エラーから `LaunchRejection`（コード + メッセージ）
//! への変換だけを行います。分類は relay-core の `ErrorKind::from_code` が担当します。

use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_ecs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ecs::operation::run_task::{RunTaskError, RunTaskOutput};
use aws_sdk_ecs::types::{
    AssignPublicIp, AwsVpcConfiguration, ContainerOverride, KeyValuePair, LaunchType,
    NetworkConfiguration, TaskOverride,
};
use relay_core::domain::{self, LaunchFailure, TaskLaunchRequest};
use relay_core::ports::{LaunchAck, LaunchRejection, TaskLauncher};

pub struct EcsTaskLauncher {
    client: aws_sdk_ecs::Client,
}

impl EcsTaskLauncher {
    pub fn new(client: aws_sdk_ecs::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TaskLauncher for EcsTaskLauncher {
    #[tracing::instrument(skip(self, request), fields(cluster = %request.cluster))]
    async fn run_task(&self, request: &TaskLaunchRequest) -> Result<LaunchAck, LaunchRejection> {
        let network_configuration = network_configuration(request)
            .map_err(|e| LaunchRejection::uncoded(format!("{e:#}")))?;

        let output = self
            .client
            .run_task()
            .cluster(&request.cluster)
            .task_definition(&request.task_definition)
            .launch_type(launch_type(request.launch_type))
            .count(request.count)
            .network_configuration(network_configuration)
            .overrides(task_override(request))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %DisplayErrorContext(&e), "unable to run task");
                sdk_rejection(&e)
            })?;

        Ok(ack(&output))
    }
}

fn launch_type(launch_type: domain::LaunchType) -> LaunchType {
    match launch_type {
        domain::LaunchType::Fargate => LaunchType::Fargate,
    }
}

fn assign_public_ip(assign: domain::AssignPublicIp) -> AssignPublicIp {
    match assign {
        domain::AssignPublicIp::Enabled => AssignPublicIp::Enabled,
        domain::AssignPublicIp::Disabled => AssignPublicIp::Disabled,
    }
}

pub(crate) fn network_configuration(
    request: &TaskLaunchRequest,
) -> anyhow::Result<NetworkConfiguration> {
    let aws_vpc_configuration = AwsVpcConfiguration::builder()
        .set_subnets(Some(request.subnets().to_vec()))
        .assign_public_ip(assign_public_ip(request.assign_public_ip()))
        .build()
        .context("can build aws vpc configuration")?;

    Ok(NetworkConfiguration::builder()
        .awsvpc_configuration(aws_vpc_configuration)
        .build())
}

pub(crate) fn task_override(request: &TaskLaunchRequest) -> TaskOverride {
    let container_overrides = request
        .overrides
        .container_overrides
        .iter()
        .map(|container| {
            let environment = container
                .environment
                .iter()
                .map(|kv| {
                    KeyValuePair::builder()
                        .name(&kv.name)
                        .value(&kv.value)
                        .build()
                })
                .collect();
            ContainerOverride::builder()
                .name(&container.name)
                .set_environment(Some(environment))
                .build()
        })
        .collect();

    TaskOverride::builder()
        .set_container_overrides(Some(container_overrides))
        .build()
}

pub(crate) fn ack(output: &RunTaskOutput) -> LaunchAck {
    LaunchAck {
        task_arns: output
            .tasks()
            .iter()
            .filter_map(|task| task.task_arn().map(str::to_string))
            .collect(),
        failures: output
            .failures()
            .iter()
            .map(|failure| LaunchFailure {
                arn: failure.arn().map(str::to_string),
                reason: failure.reason().map(str::to_string),
                detail: failure.detail().map(str::to_string),
            })
            .collect(),
    }
}

/// The client's operation timeout surfaces as `TimeoutError` with no
/// service code; report it as timed out instead of uncoded.
pub(crate) fn sdk_rejection<R>(err: &SdkError<RunTaskError, R>) -> LaunchRejection
where
    R: std::fmt::Debug,
{
    match err {
        SdkError::TimeoutError(_) => {
            LaunchRejection::timed_out(DisplayErrorContext(err).to_string())
        }
        _ => rejection(err),
    }
}

/// Keep the service error code when there is one; anything that never
/// reached the service (dispatch, timeout, response parsing) has none.
pub(crate) fn rejection<E>(err: &E) -> LaunchRejection
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(err).to_string());
    LaunchRejection {
        code: err.code().map(str::to_string),
        message,
        timed_out: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ecs::error::ErrorMetadata;
    use aws_sdk_ecs::operation::run_task::RunTaskError;
    use aws_sdk_ecs::types::{Failure, Task};
    use relay_core::domain::LaunchConfiguration;
    use relay_core::impls::ScriptedLauncher;
    use relay_core::{DispatchError, DispatcherBuilder, ErrorKind};

    fn request() -> TaskLaunchRequest {
        let config = LaunchConfiguration::builder()
            .cluster("C1")
            .task_definition("T1")
            .container_name("worker")
            .bucket("uploads")
            .subnet("subnet-a")
            .subnet("subnet-b")
            .build()
            .unwrap();
        let dispatcher = DispatcherBuilder::new(config)
            .launcher(ScriptedLauncher::new())
            .build()
            .unwrap();
        dispatcher.request_for(&dispatcher.event("uploads", "in.csv"))
    }

    #[test]
    fn network_configuration_uses_all_subnets_with_public_ip() {
        let nc = network_configuration(&request()).unwrap();
        let vpc = nc.awsvpc_configuration().unwrap();
        assert_eq!(vpc.subnets(), &["subnet-a".to_string(), "subnet-b".to_string()]);
        assert_eq!(vpc.assign_public_ip(), Some(&AssignPublicIp::Enabled));
    }

    #[test]
    fn task_override_carries_object_key() {
        let overrides = task_override(&request());
        let container = &overrides.container_overrides()[0];
        assert_eq!(container.name(), Some("worker"));

        let env: Vec<(Option<&str>, Option<&str>)> = container
            .environment()
            .iter()
            .map(|kv| (kv.name(), kv.value()))
            .collect();
        assert_eq!(
            env,
            vec![
                (Some("S3_BUCKET"), Some("uploads")),
                (Some("S3_KEY"), Some("in.csv")),
            ]
        );
    }

    #[test]
    fn ack_collects_task_arns_and_failures() {
        let output = RunTaskOutput::builder()
            .tasks(Task::builder().task_arn("arn:task/1").build())
            .failures(Failure::builder().reason("MISSING").detail("no capacity").build())
            .build();

        let ack = ack(&output);
        assert_eq!(ack.task_arns, vec!["arn:task/1".to_string()]);
        assert_eq!(ack.failures.len(), 1);
        assert_eq!(ack.failures[0].reason.as_deref(), Some("MISSING"));
        assert_eq!(ack.failures[0].detail.as_deref(), Some("no capacity"));
    }

    #[test]
    fn service_error_code_is_classified() {
        let err = RunTaskError::generic(
            ErrorMetadata::builder()
                .code("ClusterNotFoundException")
                .message("Cluster not found.")
                .build(),
        );

        let rejection = rejection(&err);
        assert_eq!(rejection.code.as_deref(), Some("ClusterNotFoundException"));

        let classified = DispatchError::from_rejection(rejection.code, rejection.message);
        assert_eq!(classified.kind, ErrorKind::ClusterNotFound);
        assert_eq!(classified.message, "Cluster not found.");
    }

    #[test]
    fn error_without_code_is_unclassified() {
        let err = RunTaskError::generic(ErrorMetadata::builder().message("socket closed").build());

        let rejection = rejection(&err);
        assert!(rejection.code.is_none());
        let classified = DispatchError::from_rejection(rejection.code, rejection.message);
        assert_eq!(classified.kind, ErrorKind::Unclassified);
    }

    #[test]
    fn sdk_timeout_is_reported_as_timed_out() {
        let err: SdkError<RunTaskError, ()> = SdkError::timeout_error("operation timed out");

        let rejection = sdk_rejection(&err);
        assert!(rejection.timed_out);
        assert!(rejection.code.is_none());
    }

    #[test]
    fn sdk_service_error_keeps_its_code() {
        let err: SdkError<RunTaskError, ()> = SdkError::service_error(
            RunTaskError::generic(
                ErrorMetadata::builder()
                    .code("AccessDeniedException")
                    .message("not authorized")
                    .build(),
            ),
            (),
        );

        let rejection = sdk_rejection(&err);
        assert!(!rejection.timed_out);
        assert_eq!(rejection.code.as_deref(), Some("AccessDeniedException"));
    }
}
