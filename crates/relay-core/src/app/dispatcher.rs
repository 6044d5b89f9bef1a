//! Dispatcher - ストレージ作成イベント 1 件を RunTask 1 回に変換
//!
//! # 状態遷移（イベントごと）
//! Ready → Building request → Submitted → {Succeeded | Failed(kind)} → Ready
//!
//! # 設計原則
//! - ステートレス: 共有するのは読み取り専用の設定と ports のみ（ロック不要）
//! - at-most-once: 1 invocation につき launcher 呼び出しは必ず 1 回、リトライなし
//! - 重複排除はしない（同じ object key の再配送は再度タスクを起動する）
//! - RunTask は run_task_timeout で打ち切り、Timeout に分類
//!   （launcher 自身が期限切れを報告した場合も Timeout）

use std::sync::Arc;

use crate::domain::{
    DispatchError, DispatchEvent, DomainEvent, LaunchConfiguration, TaskLaunchRequest,
    TaskLaunchResult,
};
use crate::ports::{Clock, EventSink, IdGenerator, TaskLauncher};

#[derive(Clone)]
pub struct Dispatcher {
    config: Arc<LaunchConfiguration>,
    launcher: Arc<dyn TaskLauncher>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    event_sink: Arc<dyn EventSink>,
}

impl Dispatcher {
    pub(crate) fn from_parts(
        config: Arc<LaunchConfiguration>,
        launcher: Arc<dyn TaskLauncher>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        event_sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config,
            launcher,
            clock,
            ids,
            event_sink,
        }
    }

    pub fn config(&self) -> &LaunchConfiguration {
        &self.config
    }

    /// Stamp a new event with a dispatch ID and the current time.
    pub fn event(&self, bucket: impl Into<String>, key: impl Into<String>) -> DispatchEvent {
        DispatchEvent::new(
            self.ids.generate_dispatch_id(),
            bucket,
            key,
            self.clock.now(),
        )
    }

    /// The request `dispatch` would submit for `event`.
    pub fn request_for(&self, event: &DispatchEvent) -> TaskLaunchRequest {
        TaskLaunchRequest::build(&self.config, event)
    }

    /// Submit exactly one run-task call for `event` and classify the result.
    ///
    /// The event's bucket is not checked against the configured bucket;
    /// that trust boundary belongs to the notification subscription.
    #[tracing::instrument(
        skip(self, event),
        fields(dispatch_id = %event.dispatch_id, key = %event.key)
    )]
    pub async fn dispatch(&self, event: &DispatchEvent) -> TaskLaunchResult {
        let request = self.request_for(event);

        self.event_sink.emit(&DomainEvent::DispatchSubmitted {
            dispatch_id: event.dispatch_id,
            bucket: event.bucket.clone(),
            key: event.key.clone(),
        });

        let timeout = self.config.run_task_timeout();
        let result = match tokio::time::timeout(timeout, self.launcher.run_task(&request)).await {
            Ok(Ok(ack)) => TaskLaunchResult::accepted(ack.task_arns, &ack.failures),
            // クライアント側の期限切れもこちらの期限切れと同じ扱い
            Ok(Err(rejection)) if rejection.timed_out => {
                tracing::debug!(
                    message = %rejection.message,
                    "launcher gave up before the service answered"
                );
                TaskLaunchResult::Failed(DispatchError::timeout(timeout))
            }
            Ok(Err(rejection)) => TaskLaunchResult::Failed(DispatchError::from_rejection(
                rejection.code,
                rejection.message,
            )),
            Err(_elapsed) => TaskLaunchResult::Failed(DispatchError::timeout(timeout)),
        };

        self.event_sink.emit(&match &result {
            TaskLaunchResult::Succeeded { task_arns } => DomainEvent::DispatchSucceeded {
                dispatch_id: event.dispatch_id,
                task_arns: task_arns.clone(),
            },
            TaskLaunchResult::Failed(err) => DomainEvent::DispatchFailed {
                dispatch_id: event.dispatch_id,
                kind: err.kind,
                code: err.code.clone(),
                message: err.message.clone(),
            },
        });

        result
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
