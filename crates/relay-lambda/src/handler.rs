use aws_lambda_events::event::s3::{S3Event, S3EventRecord};
use lambda_runtime::{Error, LambdaEvent};
use relay_core::domain::{DispatchId, ObjectKey};
use relay_core::{Dispatcher, TaskLaunchResult};
use serde::Serialize;

/// Result of one dispatched record.
#[derive(Debug, Serialize)]
pub struct RecordResult {
    pub dispatch_id: DispatchId,
    pub bucket: String,
    pub key: String,
    pub outcome: TaskLaunchResult,
}

/// A record that was not dispatched.
#[derive(Debug, Serialize)]
pub struct SkippedRecord {
    pub bucket: Option<String>,
    pub key: Option<String>,
    pub reason: String,
}

#[derive(Debug, Default, Serialize)]
pub struct DispatchReport {
    pub results: Vec<RecordResult>,
    pub skipped: Vec<SkippedRecord>,
}

impl DispatchReport {
    /// Records whose failure should make the notification system redeliver.
    ///
    /// `EmptyLaunch` is reported but does not fail the invocation.
    pub fn failed(&self) -> impl Iterator<Item = &RecordResult> {
        self.results.iter().filter(|r| {
            r.outcome
                .error_kind()
                .is_some_and(|kind| !kind.is_anomaly())
        })
    }

    pub fn into_invocation_result(self) -> Result<Self, Error> {
        let failed: Vec<String> = self
            .failed()
            .map(|r| format!("{} ({})", r.key, r.outcome.error_kind().map_or("", |k| k.as_str())))
            .collect();
        if failed.is_empty() {
            Ok(self)
        } else {
            Err(Error::from(format!(
                "dispatch failed for {} record(s): {}",
                failed.len(),
                failed.join(", ")
            )))
        }
    }
}

/// Handles the s3 notification
#[tracing::instrument(skip(dispatcher, event), fields(request_id = %event.context.request_id))]
pub async fn handler(
    dispatcher: &Dispatcher,
    event: LambdaEvent<S3Event>,
) -> Result<DispatchReport, Error> {
    tracing::info!(
        record_count = event.payload.records.len(),
        "processing s3 records"
    );

    let report = process(dispatcher, event.payload).await;

    tracing::info!(
        dispatched = report.results.len(),
        skipped = report.skipped.len(),
        "processing complete"
    );

    report.into_invocation_result()
}

pub async fn process(dispatcher: &Dispatcher, event: S3Event) -> DispatchReport {
    let mut report = DispatchReport::default();

    for record in event.records {
        let (bucket, key) = match accept(dispatcher, &record) {
            Ok(target) => target,
            Err(reason) => {
                tracing::warn!(
                    bucket = ?record.s3.bucket.name,
                    key = ?record.s3.object.key,
                    reason = %reason,
                    "skipping record"
                );
                report.skipped.push(SkippedRecord {
                    bucket: record.s3.bucket.name.clone(),
                    key: record.s3.object.key.clone(),
                    reason,
                });
                continue;
            }
        };

        let event = dispatcher.event(bucket, key);
        let outcome = dispatcher.dispatch(&event).await;
        report.results.push(RecordResult {
            dispatch_id: event.dispatch_id,
            bucket: event.bucket,
            key: event.key,
            outcome,
        });
    }

    report
}

/// Narrow trust to creation events in the configured bucket.
fn accept(dispatcher: &Dispatcher, record: &S3EventRecord) -> Result<(String, String), String> {
    if let Some(name) = record.event_name.as_deref()
        && !name.starts_with("ObjectCreated:")
    {
        return Err(format!("not an object-created event: {name}"));
    }

    let bucket = record
        .s3
        .bucket
        .name
        .as_deref()
        .ok_or_else(|| "record has no bucket name".to_string())?;
    let expected = dispatcher.config().bucket();
    if bucket != expected {
        return Err(format!("bucket '{bucket}' is not the configured bucket '{expected}'"));
    }

    let raw_key = record
        .s3
        .object
        .key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| "record has no object key".to_string())?;
    let key = ObjectKey::decode(raw_key).map_err(|e| e.to_string())?;

    Ok((bucket.to_string(), key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::domain::LaunchConfiguration;
    use relay_core::impls::ScriptedLauncher;
    use relay_core::{DispatcherBuilder, ErrorKind};
    use std::sync::Arc;

    fn dispatcher(launcher: Arc<ScriptedLauncher>) -> Dispatcher {
        let config = LaunchConfiguration::builder()
            .cluster("C1")
            .task_definition("T1")
            .container_name("worker")
            .bucket("uploads")
            .subnet("subnet-a")
            .build()
            .unwrap();
        DispatcherBuilder::new(config)
            .shared_launcher(launcher)
            .build()
            .unwrap()
    }

    fn record(event_name: &str, bucket: &str, key: &str) -> serde_json::Value {
        serde_json::json!({
            "eventVersion": "2.1",
            "eventSource": "aws:s3",
            "awsRegion": "us-east-1",
            "eventTime": "2024-01-01T12:00:00.000Z",
            "eventName": event_name,
            "userIdentity": { "principalId": "EXAMPLE" },
            "requestParameters": { "sourceIPAddress": "127.0.0.1" },
            "responseElements": {
                "x-amz-request-id": "EXAMPLE123456789",
                "x-amz-id-2": "EXAMPLE123/5678abcdefghijklambdaisawesome/mnopqrstuvwxyzABCDEFGH"
            },
            "s3": {
                "s3SchemaVersion": "1.0",
                "configurationId": "dispatch",
                "bucket": {
                    "name": bucket,
                    "ownerIdentity": { "principalId": "EXAMPLE" },
                    "arn": format!("arn:aws:s3:::{bucket}")
                },
                "object": {
                    "key": key,
                    "size": 1024,
                    "eTag": "0123456789abcdef0123456789abcdef",
                    "sequencer": "0A1B2C3D4E5F678901"
                }
            }
        })
    }

    fn s3_event(records: Vec<serde_json::Value>) -> S3Event {
        serde_json::from_value(serde_json::json!({ "Records": records })).unwrap()
    }

    #[tokio::test]
    async fn dispatches_created_object_with_decoded_key() {
        let launcher = Arc::new(ScriptedLauncher::new().accept(&["arn:task/1"]));
        let dispatcher = dispatcher(launcher.clone());

        let report = process(
            &dispatcher,
            s3_event(vec![record("ObjectCreated:Put", "uploads", "inbox/my+file.csv")]),
        )
        .await;

        assert_eq!(report.results.len(), 1);
        assert!(report.skipped.is_empty());
        assert_eq!(report.results[0].key, "inbox/my file.csv");
        assert!(report.results[0].outcome.is_success());

        let requests = launcher.requests();
        assert_eq!(requests.len(), 1);
        let env = &requests[0].overrides.container_overrides[0].environment;
        assert_eq!(env[1].value, "inbox/my file.csv");

        assert!(report.into_invocation_result().is_ok());
    }

    #[tokio::test]
    async fn foreign_bucket_and_non_create_events_are_skipped() {
        let launcher = Arc::new(ScriptedLauncher::new());
        let dispatcher = dispatcher(launcher.clone());

        let report = process(
            &dispatcher,
            s3_event(vec![
                record("ObjectCreated:Put", "other-bucket", "in.csv"),
                record("ObjectRemoved:Delete", "uploads", "in.csv"),
            ]),
        )
        .await;

        assert!(report.results.is_empty());
        assert_eq!(report.skipped.len(), 2);
        assert!(launcher.requests().is_empty());
    }

    #[tokio::test]
    async fn api_failure_fails_the_invocation() {
        let launcher = Arc::new(
            ScriptedLauncher::new().reject("ClusterNotFoundException", "Cluster not found."),
        );
        let dispatcher = dispatcher(launcher);

        let report = process(
            &dispatcher,
            s3_event(vec![record("ObjectCreated:Put", "uploads", "in.csv")]),
        )
        .await;

        assert_eq!(
            report.results[0].outcome.error_kind(),
            Some(ErrorKind::ClusterNotFound)
        );
        let err = report.into_invocation_result().unwrap_err();
        assert!(err.to_string().contains("CLUSTER_NOT_FOUND"));
    }

    #[tokio::test]
    async fn empty_launch_is_reported_without_failing() {
        let launcher = Arc::new(ScriptedLauncher::new().accept(&[]));
        let dispatcher = dispatcher(launcher);

        let report = process(
            &dispatcher,
            s3_event(vec![record("ObjectCreated:Put", "uploads", "in.csv")]),
        )
        .await;

        assert_eq!(
            report.results[0].outcome.error_kind(),
            Some(ErrorKind::EmptyLaunch)
        );
        assert!(report.into_invocation_result().is_ok());
    }

    #[test]
    fn report_serializes_outcomes() {
        let report = DispatchReport {
            results: Vec::new(),
            skipped: vec![SkippedRecord {
                bucket: Some("other".to_string()),
                key: Some("in.csv".to_string()),
                reason: "bucket mismatch".to_string(),
            }],
        };
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["skipped"][0]["reason"], "bucket mismatch");
    }
}
