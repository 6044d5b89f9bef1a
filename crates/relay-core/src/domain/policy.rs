//! DispatcherPolicy - Dispatcher 実行 ID に付与する最小権限
//!
//! provisioning 側が消費する IAM ポリシー文書を生成します。
//! - `ecs:RunTask`: 指定の task definition のみ、`ecs:cluster` 条件で cluster を限定
//! - `iam:PassRole`: execution role と task role の 2 つのみ、ECS タスクにだけ渡せる

use serde::Serialize;
use serde_json::json;

use super::config::LaunchConfiguration;

pub const POLICY_VERSION: &str = "2012-10-17";
const ECS_TASKS_SERVICE: &str = "ecs-tasks.amazonaws.com";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    pub sid: String,
    pub effect: &'static str,
    pub action: Vec<&'static str>,
    pub resource: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DispatcherPolicy {
    pub version: &'static str,
    pub statement: Vec<PolicyStatement>,
}

impl DispatcherPolicy {
    pub fn for_config(
        config: &LaunchConfiguration,
        execution_role_arn: &str,
        task_role_arn: &str,
    ) -> Self {
        let run_task = PolicyStatement {
            sid: "RunConfiguredTask".to_string(),
            effect: "Allow",
            action: vec!["ecs:RunTask"],
            resource: vec![config.task_definition().to_string()],
            condition: Some(json!({
                "ArnEquals": { "ecs:cluster": config.cluster() }
            })),
        };

        let mut roles = vec![execution_role_arn.to_string()];
        if task_role_arn != execution_role_arn {
            roles.push(task_role_arn.to_string());
        }
        let pass_role = PolicyStatement {
            sid: "PassTaskRoles".to_string(),
            effect: "Allow",
            action: vec!["iam:PassRole"],
            resource: roles,
            condition: Some(json!({
                "StringEquals": { "iam:PassedToService": ECS_TASKS_SERVICE }
            })),
        };

        Self {
            version: POLICY_VERSION,
            statement: vec![run_task, pass_role],
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
