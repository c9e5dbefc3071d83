//! Errors - エラー型と分類
//!
//! どのエラーも内部で握りつぶしたりリトライしたりせず、`?` でそのまま呼び出し元へ伝播します。
//!
//! # 分類
//! - **ParameterError**: パラメータの parse / serialize / normalize の失敗
//! - **DecodeError**: hex / bzip2 / JSON / envelope の復号失敗
//! - **StoreError**: ObjectStore（Blob ストレージ）からのエラー
//! - **TargetError**: MetadataBlobTarget の操作エラー

use thiserror::Error;

use super::blob::Metageneration;
use super::family::TaskFamily;
use crate::task::registry::RegistryError;

/// DecodeError は layered encoding の符号化・復号エラー
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("bzip2: {0}")]
    Compression(#[from] std::io::Error),

    #[error("bzip2 compression level {0} is outside 1..=9")]
    CompressionLevel(u32),

    #[error("decompressed payload is not valid utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("malformed envelope: {0}")]
    Envelope(String),
}

/// ParameterError はパラメータ codec のエラー
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("{value} is not an instance of {expected}")]
    BoundViolation { value: String, expected: TaskFamily },

    #[error("invalid {kind} value {raw:?}: {reason}")]
    InvalidValue {
        kind: &'static str,
        raw: String,
        reason: String,
    },

    #[error("{kind} parameter requires an explicit value")]
    MissingValue { kind: &'static str },

    #[error("task {family} is missing required parameter '{name}'")]
    MissingRequired { family: TaskFamily, name: String },

    #[error("task {family} has no parameter named '{name}'")]
    UnknownParameter { family: TaskFamily, name: String },

    #[error("{kind} parameter cannot hold a {found} value")]
    TypeMismatch {
        kind: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// StoreError は ObjectStore port のエラー
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(String),

    /// 条件付き書き込みで metageneration が一致しなかった
    #[error("metageneration precondition failed: expected {expected}, found {actual}")]
    PreconditionFailed {
        expected: Metageneration,
        actual: Metageneration,
    },

    #[error("storage backend: {0}")]
    Backend(String),
}

/// TargetError は MetadataBlobTarget のエラー
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("invalid blob uri {uri:?}: {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TargetError {
    /// 楽観的並行性制御の競合かどうか（呼び出し側がリトライを判断するため）
    pub fn is_precondition_failure(&self) -> bool {
        matches!(
            self,
            TargetError::Store(StoreError::PreconditionFailed { .. })
        )
    }
}
