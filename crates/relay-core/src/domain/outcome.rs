//! Outcome model: the result of one dispatch.
//!
//! Once the task is submitted its lifecycle belongs to the orchestration
//! system; this only records what the run-task call reported.

use serde::{Deserialize, Serialize};

use super::errors::{DispatchError, ErrorKind};

/// A placement failure reported alongside an accepted run-task call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchFailure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl LaunchFailure {
    fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(arn) = &self.arn {
            parts.push(arn.as_str());
        }
        if let Some(reason) = &self.reason {
            parts.push(reason.as_str());
        }
        if let Some(detail) = &self.detail {
            parts.push(detail.as_str());
        }
        parts.join(": ")
    }
}

/// Outcome of `Dispatcher::dispatch`.
///
/// Serialized shape:
/// - `{"status":"SUCCEEDED","task_arns":[...]}`
/// - `{"status":"FAILED","kind":"CLUSTER_NOT_FOUND","code":"...","message":"..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskLaunchResult {
    Succeeded { task_arns: Vec<String> },
    Failed(DispatchError),
}

impl TaskLaunchResult {
    /// Interpret an accepted run-task response.
    ///
    /// No task ARNs means `EmptyLaunch`, carrying any placement failures
    /// in the message.
    pub fn accepted(task_arns: Vec<String>, failures: &[LaunchFailure]) -> Self {
        if !task_arns.is_empty() {
            return Self::Succeeded { task_arns };
        }

        let message = if failures.is_empty() {
            "run-task accepted but started no tasks".to_string()
        } else {
            let reasons: Vec<String> = failures.iter().map(LaunchFailure::describe).collect();
            format!("run-task accepted but started no tasks: {}", reasons.join("; "))
        };
        Self::Failed(DispatchError::new(ErrorKind::EmptyLaunch, message))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Succeeded { .. } => None,
            Self::Failed(err) => Some(err.kind),
        }
    }

    pub fn task_arns(&self) -> &[String] {
        match self {
            Self::Succeeded { task_arns } => task_arns,
            Self::Failed(_) => &[],
        }
    }

    pub fn into_result(self) -> Result<Vec<String>, DispatchError> {
        match self {
            Self::Succeeded { task_arns } => Ok(task_arns),
            Self::Failed(err) => Err(err),
        }
    }
}
