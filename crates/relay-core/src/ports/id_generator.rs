//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（本番用）

use crate::domain::ids::DispatchId;
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は相関用の ID を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（並行する invocation から使える）
pub trait IdGenerator: Send + Sync {
    fn generate_dispatch_id(&self) -> DispatchId;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock を使って現在時刻ベースの ULID を生成します。
/// テスト時は FixedClock で timestamp 部分を固定できます。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_dispatch_id(&self) -> DispatchId {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        DispatchId::from(ulid)
    }
}
