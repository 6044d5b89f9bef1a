//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」を定義します。
//! Dispatcher はここにある trait だけに依存し、AWS SDK には依存しません。

pub mod task_launcher;
pub mod clock;
pub mod id_generator;
pub mod event_sink;

// 主要な trait を再エクスポート
pub use self::task_launcher::{LaunchAck, LaunchRejection, TaskLauncher};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::event_sink::EventSink;
