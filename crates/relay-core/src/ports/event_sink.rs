//! EventSink port - イベント記録の抽象化
//!
//! # 実装
//! - TracingEventSink: 構造化ログとして出力（本番用）
//! - RecordingEventSink: メモリに保持（テスト用）

use crate::domain::DomainEvent;

/// EventSink はドメインイベントを記録
///
/// 記録の失敗で dispatch を失敗させないため、戻り値はありません。
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &DomainEvent);
}
