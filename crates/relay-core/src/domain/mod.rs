//! Domain model (configuration, events, requests, outcomes, errors, ...).
//!
//! - config: LaunchConfiguration（起動時に一度だけ検証）
//! - event: DispatchEvent（1 invocation 分）
//! - request: TaskLaunchRequest（RunTask の形）
//! - outcome: TaskLaunchResult
//! - errors: ErrorKind / DispatchError
//! - policy: Dispatcher 実行 ID の最小権限
//! - events: DomainEvent
//! - ids: DispatchId

pub mod config;
pub mod errors;
pub mod event;
pub mod events;
pub mod ids;
pub mod outcome;
pub mod policy;
pub mod request;

pub use self::config::{ConfigError, LaunchConfiguration, LaunchConfigurationBuilder, SubnetId};
pub use self::errors::{DispatchError, ErrorKind};
pub use self::event::{DispatchEvent, KeyDecodeError, ObjectKey};
pub use self::events::DomainEvent;
pub use self::ids::DispatchId;
pub use self::outcome::{LaunchFailure, TaskLaunchResult};
pub use self::policy::{DispatcherPolicy, PolicyStatement};
pub use self::request::{AssignPublicIp, LaunchType, TaskLaunchRequest};
