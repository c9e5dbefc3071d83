//! ParameterCodec port - パラメータ値と文字列表現の相互変換
//!
//! # 学習ポイント
//! - Object-safe trait（`Arc<dyn ParameterCodec>` として TaskClass に格納）
//! - デフォルト実装付きメソッド（serialize_with, normalize, cli_arity）

use crate::domain::errors::ParameterError;
use crate::params::{CodecContext, EncodeOptions};
use crate::task::ParamValue;

/// コマンドラインでの値の受け取り方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliArity {
    /// 値を省略できるフラグ（`--flag` だけで true）
    Flag,
    /// 常に値が必要（`--flag true`）
    Value,
}

/// ParameterCodec はパラメータ型ごとの parse / serialize / normalize
///
/// # 使用例
/// ```ignore
/// let codec: Arc<dyn ParameterCodec> = Arc::new(IntParameter);
/// let value = codec.parse("42", &ctx)?;
/// assert_eq!(codec.serialize(&value)?, "42");
/// ```
///
/// # 契約
/// - `parse(serialize(v)) == v`（round-trip 可能な値について）
/// - `normalize` は値を受け入れるか検証エラーを返す（既定は恒等）
pub trait ParameterCodec: Send + Sync {
    /// 診断用の型名（"int", "task" など）
    fn kind(&self) -> &'static str;

    fn parse(&self, raw: &str, ctx: &CodecContext<'_>) -> Result<ParamValue, ParameterError>;

    fn serialize(&self, value: &ParamValue) -> Result<String, ParameterError>;

    /// EncodeOptions を受け取る serialize（既定は options を使わない）
    ///
    /// 圧縮レイヤーを持つ codec（タスク参照）だけが上書きします。
    fn serialize_with(
        &self,
        value: &ParamValue,
        _options: &EncodeOptions,
    ) -> Result<String, ParameterError> {
        self.serialize(value)
    }

    fn normalize(&self, value: ParamValue) -> Result<ParamValue, ParameterError> {
        Ok(value)
    }

    fn cli_arity(&self) -> CliArity {
        CliArity::Value
    }
}
