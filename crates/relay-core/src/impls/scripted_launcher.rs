//! ScriptedLauncher - 応答を事前に積んでおく TaskLauncher
//!
//! # 学習ポイント
//! - Mutex で守った VecDeque から応答を順に取り出す（ロックは await を跨がない）
//! - 受け取ったリクエストを記録して、送信内容を検証できる

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::TaskLaunchRequest;
use crate::ports::{LaunchAck, LaunchRejection, TaskLauncher};

#[derive(Debug, Clone)]
enum Script {
    Respond(Result<LaunchAck, LaunchRejection>),
    Stall(Duration),
}

/// A launcher that replays queued responses.
///
/// When the script runs out, every call is accepted with one synthetic
/// task ARN.
#[derive(Debug, Default)]
pub struct ScriptedLauncher {
    script: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<TaskLaunchRequest>>,
}

impl ScriptedLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an accepted response.
    pub fn accept(self, task_arns: &[&str]) -> Self {
        self.push(Script::Respond(Ok(LaunchAck {
            task_arns: task_arns.iter().map(|s| s.to_string()).collect(),
            failures: Vec::new(),
        })))
    }

    /// Queue an arbitrary accepted response (e.g. with placement failures).
    pub fn ack(self, ack: LaunchAck) -> Self {
        self.push(Script::Respond(Ok(ack)))
    }

    /// Queue a rejection with an API error code.
    pub fn reject(self, code: &str, message: &str) -> Self {
        self.push(Script::Respond(Err(LaunchRejection::new(code, message))))
    }

    /// Queue a rejection that carries no error code.
    pub fn fail_uncoded(self, message: &str) -> Self {
        self.push(Script::Respond(Err(LaunchRejection::uncoded(message))))
    }

    /// Queue a rejection reporting that the client's deadline elapsed.
    pub fn time_out(self, message: &str) -> Self {
        self.push(Script::Respond(Err(LaunchRejection::timed_out(message))))
    }

    /// Queue a call that sleeps before accepting.
    pub fn stall(self, delay: Duration) -> Self {
        self.push(Script::Stall(delay))
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<TaskLaunchRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn push(self, script: Script) -> Self {
        if let Ok(mut queue) = self.script.lock() {
            queue.push_back(script);
        }
        self
    }

    fn next(&self) -> Option<Script> {
        self.script.lock().ok().and_then(|mut queue| queue.pop_front())
    }
}

#[async_trait]
impl TaskLauncher for ScriptedLauncher {
    async fn run_task(&self, request: &TaskLaunchRequest) -> Result<LaunchAck, LaunchRejection> {
        let call = {
            let mut requests = self
                .requests
                .lock()
                .map_err(|_| LaunchRejection::uncoded("scripted launcher poisoned"))?;
            requests.push(request.clone());
            requests.len()
        };

        match self.next() {
            Some(Script::Respond(response)) => response,
            Some(Script::Stall(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(synthetic_ack(request, call))
            }
            None => Ok(synthetic_ack(request, call)),
        }
    }
}

fn synthetic_ack(request: &TaskLaunchRequest, call: usize) -> LaunchAck {
    LaunchAck {
        task_arns: vec![format!("{}/task-{call}", request.cluster)],
        failures: Vec::new(),
    }
}
