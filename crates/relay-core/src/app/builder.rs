//! DispatcherBuilder - Dispatcher の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - build() 時に LaunchConfiguration を検証
//! - 失敗すれば Dispatcher は存在しない（Fatal からは戻らない）
//! - launcher 未設定も BuildError

use std::sync::Arc;

use crate::domain::{ConfigError, LaunchConfiguration};
use crate::impls::TracingEventSink;
use crate::ports::{Clock, EventSink, IdGenerator, SystemClock, TaskLauncher, UlidGenerator};

use super::dispatcher::Dispatcher;

/// BuildError は Dispatcher 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid launch configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("no task launcher was provided")]
    MissingLauncher,
}

/// # 使用例
/// ```ignore
/// let dispatcher = DispatcherBuilder::new(config)
///     .launcher(EcsTaskLauncher::new(client))
///     .build()?;
/// ```
///
/// clock / ids / event_sink は省略時に SystemClock / UlidGenerator /
/// TracingEventSink を使います。
pub struct DispatcherBuilder {
    config: LaunchConfiguration,
    launcher: Option<Arc<dyn TaskLauncher>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    event_sink: Option<Arc<dyn EventSink>>,
}

impl DispatcherBuilder {
    pub fn new(config: LaunchConfiguration) -> Self {
        Self {
            config,
            launcher: None,
            clock: None,
            ids: None,
            event_sink: None,
        }
    }

    pub fn launcher(self, launcher: impl TaskLauncher + 'static) -> Self {
        self.shared_launcher(Arc::new(launcher))
    }

    /// Use a launcher the caller keeps a handle to (tests inspect it).
    pub fn shared_launcher(mut self, launcher: Arc<dyn TaskLauncher>) -> Self {
        self.launcher = Some(launcher);
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    pub fn ids(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Some(Arc::new(ids));
        self
    }

    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = Some(sink);
        self
    }

    pub fn build(self) -> Result<Dispatcher, BuildError> {
        self.config.validate()?;
        let launcher = self.launcher.ok_or(BuildError::MissingLauncher)?;

        Ok(Dispatcher::from_parts(
            Arc::new(self.config),
            launcher,
            self.clock
                .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>),
            self.ids
                .unwrap_or_else(|| Arc::new(UlidGenerator::new(SystemClock)) as Arc<dyn IdGenerator>),
            self.event_sink
                .unwrap_or_else(|| Arc::new(TracingEventSink) as Arc<dyn EventSink>),
        ))
    }
}
