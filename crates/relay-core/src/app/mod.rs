//! App - アプリケーション層
//!
//! ports を組み合わせて dispatch ロジックを実装します。
//!
//! # 主要コンポーネント
//! - **DispatcherBuilder**: 構築とワイヤリング（起動時検証: Idle → Validating → Ready | Fatal）
//! - **Dispatcher**: 1 イベント → 1 回の RunTask → 分類済みの結果

pub mod builder;
pub mod dispatcher;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, DispatcherBuilder};
pub use self::dispatcher::Dispatcher;
