//! Params - パラメータ型の実装
//!
//! # 含まれる実装
//! - **StrParameter / IntParameter / FloatParameter**: プリミティブ
//! - **BoolParameter / ExplicitBoolParameter**: フラグ（値の省略可否が異なる）
//! - **DictParameter**: JSON オブジェクト（構造エンコード）
//! - **TaskReferenceParameter / ListTaskReferenceParameter**: 他タスクへの参照

pub mod dict;
pub mod encoding;
pub mod primitive;
pub mod task_ref;

pub use self::dict::DictParameter;
pub use self::encoding::{Encoded, Fields};
pub use self::primitive::{
    BoolParameter, ExplicitBoolParameter, FloatParameter, IntParameter, StrParameter,
};
pub use self::task_ref::{ListTaskReferenceParameter, TaskReferenceParameter};

use crate::config::UnknownKeyPolicy;
use crate::domain::errors::ParameterError;
use crate::ports::{CliArity, ParameterCodec};
use crate::task::{ParamValue, TaskRegistry};

/// CodecContext は parse 時に必要な外部情報
///
/// - registry: family 名から TaskClass を解決する
/// - unknown_keys: 宣言されていないキーの扱い
#[derive(Debug, Clone, Copy)]
pub struct CodecContext<'a> {
    registry: &'a TaskRegistry,
    unknown_keys: UnknownKeyPolicy,
}

impl<'a> CodecContext<'a> {
    pub fn new(registry: &'a TaskRegistry, unknown_keys: UnknownKeyPolicy) -> Self {
        Self {
            registry,
            unknown_keys,
        }
    }

    pub fn registry(&self) -> &'a TaskRegistry {
        self.registry
    }

    pub fn unknown_keys(&self) -> UnknownKeyPolicy {
        self.unknown_keys
    }
}

/// EncodeOptions は serialize 時の設定
///
/// タスク参照の serialize はネストしたタスクにも同じ値を渡すため、
/// どの深さの圧縮レイヤーも同じ圧縮レベルになります。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    compression_level: u32,
}

impl EncodeOptions {
    /// 範囲外の level は serialize 時に `DecodeError::CompressionLevel` になる
    pub fn new(compression_level: u32) -> Self {
        Self { compression_level }
    }

    pub fn compression_level(&self) -> u32 {
        self.compression_level
    }
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self::new(encoding::DEFAULT_COMPRESSION_LEVEL)
    }
}

/// コマンドライン由来の値を parse（値が省略された場合は arity に従う）
pub fn parse_cli_value(
    codec: &dyn ParameterCodec,
    raw: Option<&str>,
    ctx: &CodecContext<'_>,
) -> Result<ParamValue, ParameterError> {
    match (raw, codec.cli_arity()) {
        (Some(raw), _) => codec.parse(raw, ctx),
        (None, CliArity::Flag) => codec.parse("true", ctx),
        (None, CliArity::Value) => Err(ParameterError::MissingValue { kind: codec.kind() }),
    }
}
