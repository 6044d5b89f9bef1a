//! TaskLaunchRequest - RunTask 呼び出しの形
//!
//! LaunchConfiguration と DispatchEvent から決定的に導出されます。
//! 同じ入力からは byte 単位で同一の JSON が得られます
//! （dispatch_id や received_at はリクエストに含めない）。
//!
//! フィールド名は ECS API の camelCase に合わせています。

use serde::{Deserialize, Serialize};

use super::config::LaunchConfiguration;
use super::event::DispatchEvent;

/// Container environment variable carrying the source bucket.
pub const BUCKET_ENV: &str = "S3_BUCKET";
/// Container environment variable carrying the decoded object key.
pub const KEY_ENV: &str = "S3_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LaunchType {
    Fargate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignPublicIp {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsVpcConfiguration {
    pub subnets: Vec<String>,
    pub assign_public_ip: AssignPublicIp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfiguration {
    pub awsvpc_configuration: AwsVpcConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerOverride {
    pub name: String,
    pub environment: Vec<KeyValuePair>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOverride {
    pub container_overrides: Vec<ContainerOverride>,
}

/// One run-task request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskLaunchRequest {
    pub cluster: String,
    pub task_definition: String,
    pub launch_type: LaunchType,
    pub count: i32,
    pub network_configuration: NetworkConfiguration,
    pub overrides: TaskOverride,
}

impl TaskLaunchRequest {
    /// Build the request for one event.
    ///
    /// Always a single Fargate task on every configured subnet, with a
    /// public IP so the task can pull its image without a NAT gateway.
    pub fn build(config: &LaunchConfiguration, event: &DispatchEvent) -> Self {
        Self {
            cluster: config.cluster().to_string(),
            task_definition: config.task_definition().to_string(),
            launch_type: LaunchType::Fargate,
            count: 1,
            network_configuration: NetworkConfiguration {
                awsvpc_configuration: AwsVpcConfiguration {
                    subnets: config
                        .subnets()
                        .iter()
                        .map(|s| s.as_str().to_string())
                        .collect(),
                    assign_public_ip: AssignPublicIp::Enabled,
                },
            },
            overrides: TaskOverride {
                container_overrides: vec![ContainerOverride {
                    name: config.container_name().to_string(),
                    environment: vec![
                        KeyValuePair {
                            name: BUCKET_ENV.to_string(),
                            value: event.bucket.clone(),
                        },
                        KeyValuePair {
                            name: KEY_ENV.to_string(),
                            value: event.key.clone(),
                        },
                    ],
                }],
            },
        }
    }

    pub fn subnets(&self) -> &[String] {
        &self.network_configuration.awsvpc_configuration.subnets
    }

    pub fn assign_public_ip(&self) -> AssignPublicIp {
        self.network_configuration.awsvpc_configuration.assign_public_ip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::DispatchId;
    use chrono::{TimeZone, Utc};
    use ulid::Ulid;

    fn config() -> LaunchConfiguration {
        LaunchConfiguration::builder()
            .cluster("C1")
            .task_definition("T1")
            .container_name("worker")
            .bucket("uploads")
            .subnet("subnet-a")
            .subnet("subnet-b")
            .build()
            .unwrap()
    }

    fn event(key: &str) -> DispatchEvent {
        DispatchEvent::new(
            DispatchId::from_ulid(Ulid::new()),
            "uploads",
            key,
            Utc::now(),
        )
    }

    #[test]
    fn request_matches_api_shape() {
        let req = TaskLaunchRequest::build(&config(), &event("in.csv"));
        let v = serde_json::to_value(&req).unwrap();

        assert_eq!(v["cluster"], "C1");
        assert_eq!(v["taskDefinition"], "T1");
        assert_eq!(v["launchType"], "FARGATE");
        assert_eq!(v["count"], 1);
        assert_eq!(
            v["networkConfiguration"]["awsvpcConfiguration"]["subnets"],
            serde_json::json!(["subnet-a", "subnet-b"])
        );
        assert_eq!(
            v["networkConfiguration"]["awsvpcConfiguration"]["assignPublicIp"],
            "ENABLED"
        );

        let container = &v["overrides"]["containerOverrides"][0];
        assert_eq!(container["name"], "worker");
        assert_eq!(
            container["environment"],
            serde_json::json!([
                { "name": "S3_BUCKET", "value": "uploads" },
                { "name": "S3_KEY", "value": "in.csv" },
            ])
        );
    }

    #[test]
    fn equal_events_give_identical_bytes() {
        // ID と時刻だけが異なる 2 つのイベント
        let a = event("in.csv");
        let mut b = event("in.csv");
        b.received_at = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();

        let cfg = config();
        let bytes_a = serde_json::to_vec(&TaskLaunchRequest::build(&cfg, &a)).unwrap();
        let bytes_b = serde_json::to_vec(&TaskLaunchRequest::build(&cfg, &b)).unwrap();
        assert_eq!(bytes_a, bytes_b);
    }
}
