//! Errors - RunTask 失敗の分類
//!
//! オーケストレーション API のエラーコード（文字列）を閉じた `ErrorKind`
//! に写像します。写像は `ErrorKind::from_code` の 1 箇所だけで、
//! 未知のコードは `Unclassified` になります（黙って捨てない）。
//!
//! すべての kind は現在の invocation にとって終端です。Dispatcher 内での
//! リトライはしません。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified failure of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// API-internal failure.
    ServerFault,
    /// Malformed request; a configuration bug.
    ClientFault,
    /// One field of the request is invalid.
    InvalidParameter,
    /// The configured cluster no longer exists.
    ClusterNotFound,
    UnsupportedFeature,
    PlatformUnknown,
    /// Task definition incompatible with the launch platform.
    PlatformIncompatible,
    AccessDenied,
    /// Account or resource blocked by provider policy.
    Blocked,
    /// The run-task call exceeded its bound.
    Timeout,
    /// Accepted, but zero tasks started.
    EmptyLaunch,
    Unclassified,
}

impl ErrorKind {
    /// Map a raw orchestration API error code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "ServerException" => Self::ServerFault,
            "ClientException" => Self::ClientFault,
            "InvalidParameterException" => Self::InvalidParameter,
            "ClusterNotFoundException" => Self::ClusterNotFound,
            "UnsupportedFeatureException" => Self::UnsupportedFeature,
            "PlatformUnknownException" => Self::PlatformUnknown,
            "PlatformTaskDefinitionIncompatibilityException" => Self::PlatformIncompatible,
            "AccessDeniedException" => Self::AccessDenied,
            "BlockedException" => Self::Blocked,
            _ => Self::Unclassified,
        }
    }

    /// Kinds that point at drift between provisioning and configuration.
    ///
    /// Operators should treat the first occurrence as fatal: redelivery
    /// will fail the same way until the deployment is fixed.
    pub fn is_fatal_for_operators(&self) -> bool {
        matches!(
            self,
            Self::ClientFault
                | Self::ClusterNotFound
                | Self::AccessDenied
                | Self::PlatformUnknown
                | Self::PlatformIncompatible
        )
    }

    /// A surfaced but non-fatal outcome.
    pub fn is_anomaly(&self) -> bool {
        matches!(self, Self::EmptyLaunch)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServerFault => "SERVER_FAULT",
            Self::ClientFault => "CLIENT_FAULT",
            Self::InvalidParameter => "INVALID_PARAMETER",
            Self::ClusterNotFound => "CLUSTER_NOT_FOUND",
            Self::UnsupportedFeature => "UNSUPPORTED_FEATURE",
            Self::PlatformUnknown => "PLATFORM_UNKNOWN",
            Self::PlatformIncompatible => "PLATFORM_INCOMPATIBLE",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::Blocked => "BLOCKED",
            Self::Timeout => "TIMEOUT",
            Self::EmptyLaunch => "EMPTY_LAUNCH",
            Self::Unclassified => "UNCLASSIFIED",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed dispatch: the kind plus the raw code and message, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("dispatch failed (kind: {kind}): {message}")]
pub struct DispatchError {
    pub kind: ErrorKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

impl DispatchError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
        }
    }

    /// Classify a rejection returned by the orchestration API.
    ///
    /// A missing code (transport failure, unparseable response) is
    /// `Unclassified`.
    pub fn from_rejection(code: Option<String>, message: impl Into<String>) -> Self {
        let kind = code
            .as_deref()
            .map(ErrorKind::from_code)
            .unwrap_or(ErrorKind::Unclassified);
        Self {
            kind,
            code,
            message: message.into(),
        }
    }

    pub fn timeout(after: std::time::Duration) -> Self {
        Self::new(
            ErrorKind::Timeout,
            format!("run-task did not complete within {}s", after.as_secs_f64()),
        )
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}
