//! Blob - Blob ストレージ上のオブジェクトの参照とメタデータ
//!
//! # 学習ポイント
//! - scheme と bucket の検証は `url` crate、object キーは元の文字列から切り出す
//!   （`Url` は path を percent-encode し `..` を畳むため、キーが別物になる）
//! - Newtype パターン（`Metageneration`）で version token を他の整数と混同させない

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

use super::errors::TargetError;

/// オブジェクトに付与するカスタムメタデータ（キー順で安定した出力）
pub type Metadata = BTreeMap<String, String>;

/// BlobUri は `scheme://bucket/object/path` 形式の参照
///
/// # 解決ルール
/// - bucket: URI の host
/// - object: `scheme://bucket/` より後ろの生の文字列（`?` / `#` 以降は除く）。
///   エスケープの付与や `.` / `..` の正規化はしない
///
/// # 使用例
/// ```ignore
/// let blob = BlobUri::parse("gs://my-bucket/reports/2024.csv")?;
/// assert_eq!(blob.bucket(), "my-bucket");
/// assert_eq!(blob.object(), "reports/2024.csv");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobUri {
    scheme: String,
    bucket: String,
    object: String,
}

impl BlobUri {
    pub fn parse(uri: &str) -> Result<Self, TargetError> {
        let invalid = |reason: &str| TargetError::InvalidUri {
            uri: uri.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(uri).map_err(|e| invalid(&e.to_string()))?;
        let bucket = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(invalid("missing bucket")),
        };
        let object = raw_object_key(uri);
        if object.is_empty() {
            return Err(invalid("missing object path"));
        }

        Ok(Self {
            scheme: url.scheme().to_string(),
            bucket,
            object: object.to_string(),
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn object(&self) -> &str {
        &self.object
    }
}

/// `scheme://authority/` の後ろをそのまま返す（query と fragment は除く）
fn raw_object_key(uri: &str) -> &str {
    let after_scheme = uri.split_once("://").map_or("", |(_, rest)| rest);
    let path = after_scheme.split_once('/').map_or("", |(_, path)| path);
    path.split(['?', '#']).next().unwrap_or_default()
}

impl fmt::Display for BlobUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.bucket, self.object)
    }
}

/// Metageneration はオブジェクトのメタデータ版数
///
/// メタデータが変更されるたびに単調増加します。
/// 条件付き書き込み（if_metageneration_match）の precondition として使います。
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Metageneration(u64);

impl Metageneration {
    /// 新規オブジェクトの初期値
    pub const INITIAL: Metageneration = Metageneration(1);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Metageneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// StoredObject は ObjectStore から取得したオブジェクトのスナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub metadata: Metadata,
    pub metageneration: Metageneration,
    pub size: usize,
    pub updated: DateTime<Utc>,
}
