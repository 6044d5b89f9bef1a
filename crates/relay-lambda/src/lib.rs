//! relay-lambda
//!
//! S3 の作成通知を受けて ECS Fargate タスクを 1 つ起動する Lambda。
//!
//! - **config**: 環境変数から LaunchConfiguration を解決（起動時に 1 回）
//! - **ecs**: aws-sdk-ecs による TaskLauncher 実装
//! - **handler**: S3Event → DispatchEvent → Dispatcher
//! - **telemetry**: tracing-subscriber の初期化

pub mod config;
pub mod ecs;
pub mod handler;
pub mod telemetry;
