//! relay-core
//!
//! ストレージ作成イベントを 1 回の ECS RunTask（Fargate）に変換する
//! Dispatcher の中核。AWS SDK には依存しません。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（config, event, request, outcome, errors, policy, events, ids）
//! - **ports**: 抽象化レイヤー（TaskLauncher, Clock, IdGenerator, EventSink）
//! - **app**: アプリケーションロジック（DispatcherBuilder, Dispatcher）
//! - **impls**: 実装（TracingEventSink、テスト用の ScriptedLauncher など）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{BuildError, Dispatcher, DispatcherBuilder};
pub use domain::{
    ConfigError, DispatchError, DispatchEvent, ErrorKind, LaunchConfiguration,
    TaskLaunchRequest, TaskLaunchResult,
};
