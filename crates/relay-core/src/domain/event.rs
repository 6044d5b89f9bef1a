//! DispatchEvent - 1 回の呼び出しに対応するストレージ作成イベント
//!
//! 永続化しません。寿命は 1 invocation です。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::DispatchId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("object key '{raw}' is not valid url-encoded utf-8")]
pub struct KeyDecodeError {
    pub raw: String,
}

/// Object key helpers.
pub struct ObjectKey;

impl ObjectKey {
    /// Decode a key as delivered in an S3 notification.
    ///
    /// Notifications form-encode keys: spaces arrive as `+` and a literal
    /// `+` arrives as `%2B`.
    pub fn decode(raw: &str) -> Result<String, KeyDecodeError> {
        let spaced = raw.replace('+', " ");
        urlencoding::decode(&spaced)
            .map(|decoded| decoded.into_owned())
            .map_err(|_| KeyDecodeError {
                raw: raw.to_string(),
            })
    }
}

/// The object whose creation triggered a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchEvent {
    pub dispatch_id: DispatchId,
    pub bucket: String,
    /// Decoded object key.
    pub key: String,
    pub received_at: DateTime<Utc>,
}

impl DispatchEvent {
    pub fn new(
        dispatch_id: DispatchId,
        bucket: impl Into<String>,
        key: impl Into<String>,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            dispatch_id,
            bucket: bucket.into(),
            key: key.into(),
            received_at,
        }
    }
}
