//! Impls - 実装（開発用・テスト用 + tracing）
//!
//! # 含まれる実装
//! - **TracingEventSink**: DomainEvent を構造化ログに出力
//! - **RecordingEventSink**: テスト用の EventSink
//! - **ScriptedLauncher**: 応答を事前に積んでおく TaskLauncher（テスト・ローカル用）
//!
//! # 本番用実装
//! ECS への実装は `relay-lambda` の `EcsTaskLauncher` にあります。

pub mod event_sink;
pub mod scripted_launcher;

// 主要な型を再エクスポート
pub use self::event_sink::{RecordingEventSink, TracingEventSink};
pub use self::scripted_launcher::ScriptedLauncher;
