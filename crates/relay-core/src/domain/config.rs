//! LaunchConfiguration - 起動時に一度だけ解決される不変の設定
//!
//! # 設計原則
//! - プロセス起動時に解決し、以後は読み取り専用（`Arc` で共有）
//! - ハンドラ内で環境変数を読まない（`from_lookup` に値の取得元を渡す）
//! - 検証失敗は致命的（Dispatcher を構築しない）
//!
//! subnet がクラスタと同じ VPC に属することは provisioning 側の保証であり、
//! ここではネットワーク照会を行いません。

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const CLUSTER_ARN: &str = "CLUSTER_ARN";
pub const TASK_DEFINITION_ARN: &str = "TASK_DEFINITION_ARN";
pub const CONTAINER_NAME: &str = "CONTAINER_NAME";
pub const SUBNETS: &str = "SUBNETS";
pub const S3_BUCKET: &str = "S3_BUCKET";
pub const RUN_TASK_TIMEOUT_SECS: &str = "RUN_TASK_TIMEOUT_SECS";

/// Bound on the run-task call when `RUN_TASK_TIMEOUT_SECS` is unset.
pub const DEFAULT_RUN_TASK_TIMEOUT: Duration = Duration::from_secs(60);

const SUBNET_PREFIX: &str = "subnet-";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be provided")]
    Missing(&'static str),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("invalid subnet id '{0}': expected a 'subnet-' identifier")]
    InvalidSubnet(String),

    #[error("subnet '{0}' is listed more than once")]
    DuplicateSubnet(String),

    #[error("invalid run-task timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// A VPC subnet identifier (`subnet-...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubnetId(String);

impl SubnetId {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let value = value.trim();
        if value.len() <= SUBNET_PREFIX.len() || !value.starts_with(SUBNET_PREFIX) {
            return Err(ConfigError::InvalidSubnet(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubnetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static launch parameters shared by every dispatch.
///
/// Construct with [`LaunchConfiguration::builder`] or
/// [`LaunchConfiguration::from_lookup`]; both run [`LaunchConfiguration::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfiguration {
    cluster: String,
    task_definition: String,
    container_name: String,
    subnets: Vec<SubnetId>,
    bucket: String,
    run_task_timeout: Duration,
}

impl LaunchConfiguration {
    pub fn builder() -> LaunchConfigurationBuilder {
        LaunchConfigurationBuilder::default()
    }

    /// Resolve the configuration from a key/value source.
    ///
    /// # Example
    /// ```ignore
    /// let config = LaunchConfiguration::from_lookup(|name| std::env::var(name).ok())?;
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let cluster = required(CLUSTER_ARN)?;
        let task_definition = required(TASK_DEFINITION_ARN)?;
        let container_name = required(CONTAINER_NAME)?;
        let subnets = split_subnets(&required(SUBNETS)?)?;
        let bucket = required(S3_BUCKET)?;
        let run_task_timeout = match lookup(RUN_TASK_TIMEOUT_SECS) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_RUN_TASK_TIMEOUT,
        };

        LaunchConfigurationBuilder {
            cluster: Some(cluster),
            task_definition: Some(task_definition),
            container_name: Some(container_name),
            subnets,
            bucket: Some(bucket),
            run_task_timeout: Some(run_task_timeout),
        }
        .build()
    }

    /// Check every invariant. Called by the builder and again by
    /// `DispatcherBuilder::build` before the dispatcher becomes ready.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_empty(CLUSTER_ARN, &self.cluster)?;
        non_empty(TASK_DEFINITION_ARN, &self.task_definition)?;
        non_empty(CONTAINER_NAME, &self.container_name)?;
        non_empty(S3_BUCKET, &self.bucket)?;

        if self.subnets.is_empty() {
            return Err(ConfigError::Empty(SUBNETS));
        }
        for (i, subnet) in self.subnets.iter().enumerate() {
            if self.subnets[..i].contains(subnet) {
                return Err(ConfigError::DuplicateSubnet(subnet.to_string()));
            }
        }

        if self.run_task_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("0".to_string()));
        }
        Ok(())
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    pub fn task_definition(&self) -> &str {
        &self.task_definition
    }

    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    pub fn subnets(&self) -> &[SubnetId] {
        &self.subnets
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn run_task_timeout(&self) -> Duration {
        self.run_task_timeout
    }
}

#[derive(Debug, Default)]
pub struct LaunchConfigurationBuilder {
    cluster: Option<String>,
    task_definition: Option<String>,
    container_name: Option<String>,
    subnets: Vec<String>,
    bucket: Option<String>,
    run_task_timeout: Option<Duration>,
}

impl LaunchConfigurationBuilder {
    pub fn cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    pub fn task_definition(mut self, task_definition: impl Into<String>) -> Self {
        self.task_definition = Some(task_definition.into());
        self
    }

    pub fn container_name(mut self, container_name: impl Into<String>) -> Self {
        self.container_name = Some(container_name.into());
        self
    }

    /// Append one subnet; order is preserved. Parsed in [`Self::build`].
    pub fn subnet(mut self, subnet: impl Into<String>) -> Self {
        self.subnets.push(subnet.into());
        self
    }

    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    pub fn run_task_timeout(mut self, timeout: Duration) -> Self {
        self.run_task_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<LaunchConfiguration, ConfigError> {
        let config = LaunchConfiguration {
            cluster: trimmed(self.cluster.ok_or(ConfigError::Missing(CLUSTER_ARN))?),
            task_definition: trimmed(
                self.task_definition
                    .ok_or(ConfigError::Missing(TASK_DEFINITION_ARN))?,
            ),
            container_name: trimmed(
                self.container_name
                    .ok_or(ConfigError::Missing(CONTAINER_NAME))?,
            ),
            subnets: self
                .subnets
                .iter()
                .map(|raw| SubnetId::parse(raw))
                .collect::<Result<_, _>>()?,
            bucket: trimmed(self.bucket.ok_or(ConfigError::Missing(S3_BUCKET))?),
            run_task_timeout: self.run_task_timeout.unwrap_or(DEFAULT_RUN_TASK_TIMEOUT),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Split a comma-separated `SUBNETS` value.
///
/// Items are kept as-is so empty ones (`"a,,b"`, trailing commas) are
/// rejected by `SubnetId::parse` rather than skipped.
fn split_subnets(raw: &str) -> Result<Vec<String>, ConfigError> {
    if raw.trim().is_empty() {
        return Err(ConfigError::Empty(SUBNETS));
    }
    Ok(raw.split(',').map(str::to_string).collect())
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

fn non_empty(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Empty(name));
    }
    Ok(())
}

fn trimmed(value: String) -> String {
    value.trim().to_string()
}
