//! TaskLauncher port - オーケストレーション API（ECS RunTask）の抽象化
//!
//! Dispatcher は特定の SDK のエラー型に依存しません。
//! 実装は SDK のエラーを `LaunchRejection`（コード + メッセージ）に変換します。
//!
//! # 実装
//! - **EcsTaskLauncher**（relay-lambda）: aws-sdk-ecs
//! - **ScriptedLauncher**（impls）: テスト・ローカル用

use async_trait::async_trait;

use crate::domain::{LaunchFailure, TaskLaunchRequest};

/// An accepted run-task call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchAck {
    pub task_arns: Vec<String>,
    pub failures: Vec<LaunchFailure>,
}

/// A rejected run-task call.
///
/// `code` is the API's error code (e.g. `ClusterNotFoundException`);
/// `None` when the failure never reached the service.
/// `timed_out` marks a call the client itself gave up on; the dispatcher
/// classifies it as `Timeout` regardless of `code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRejection {
    pub code: Option<String>,
    pub message: String,
    pub timed_out: bool,
}

impl LaunchRejection {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn uncoded(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            timed_out: false,
        }
    }

    /// The client's own deadline elapsed before the service answered.
    pub fn timed_out(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            timed_out: true,
        }
    }
}

/// Submits exactly one run-task call per invocation. No retries.
#[async_trait]
pub trait TaskLauncher: Send + Sync {
    async fn run_task(&self, request: &TaskLaunchRequest) -> Result<LaunchAck, LaunchRejection>;
}
