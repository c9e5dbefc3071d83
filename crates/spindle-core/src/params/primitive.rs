//! Primitive - プリミティブなパラメータ型（str, int, float, bool）
//!
//! # 学習ポイント
//! - unit struct に trait を実装した stateless な codec
//! - 共通処理（parse_bool など）は自由関数に切り出す

use super::CodecContext;
use crate::domain::errors::ParameterError;
use crate::ports::{CliArity, ParameterCodec};
use crate::task::ParamValue;

fn mismatch(kind: &'static str, value: &ParamValue) -> ParameterError {
    ParameterError::TypeMismatch {
        kind,
        found: value.type_name(),
    }
}

fn invalid(kind: &'static str, raw: &str, reason: impl ToString) -> ParameterError {
    ParameterError::InvalidValue {
        kind,
        raw: raw.to_string(),
        reason: reason.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StrParameter;

impl ParameterCodec for StrParameter {
    fn kind(&self) -> &'static str {
        "str"
    }

    fn parse(&self, raw: &str, _ctx: &CodecContext<'_>) -> Result<ParamValue, ParameterError> {
        Ok(ParamValue::Str(raw.to_string()))
    }

    fn serialize(&self, value: &ParamValue) -> Result<String, ParameterError> {
        match value {
            ParamValue::Str(s) => Ok(s.clone()),
            other => Err(mismatch(self.kind(), other)),
        }
    }

    fn normalize(&self, value: ParamValue) -> Result<ParamValue, ParameterError> {
        match value {
            ParamValue::Str(_) => Ok(value),
            other => Err(mismatch(self.kind(), &other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntParameter;

impl ParameterCodec for IntParameter {
    fn kind(&self) -> &'static str {
        "int"
    }

    fn parse(&self, raw: &str, _ctx: &CodecContext<'_>) -> Result<ParamValue, ParameterError> {
        raw.trim()
            .parse::<i64>()
            .map(ParamValue::Int)
            .map_err(|e| invalid(self.kind(), raw, e))
    }

    fn serialize(&self, value: &ParamValue) -> Result<String, ParameterError> {
        match value {
            ParamValue::Int(i) => Ok(i.to_string()),
            other => Err(mismatch(self.kind(), other)),
        }
    }

    fn normalize(&self, value: ParamValue) -> Result<ParamValue, ParameterError> {
        match value {
            ParamValue::Int(_) => Ok(value),
            other => Err(mismatch(self.kind(), &other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FloatParameter;

impl ParameterCodec for FloatParameter {
    fn kind(&self) -> &'static str {
        "float"
    }

    fn parse(&self, raw: &str, _ctx: &CodecContext<'_>) -> Result<ParamValue, ParameterError> {
        raw.trim()
            .parse::<f64>()
            .map(ParamValue::Float)
            .map_err(|e| invalid(self.kind(), raw, e))
    }

    fn serialize(&self, value: &ParamValue) -> Result<String, ParameterError> {
        match value {
            ParamValue::Float(x) => Ok(x.to_string()),
            other => Err(mismatch(self.kind(), other)),
        }
    }

    /// int は float に昇格
    fn normalize(&self, value: ParamValue) -> Result<ParamValue, ParameterError> {
        match value {
            ParamValue::Float(_) => Ok(value),
            ParamValue::Int(i) => Ok(ParamValue::Float(i as f64)),
            other => Err(mismatch(self.kind(), &other)),
        }
    }
}

fn parse_bool(kind: &'static str, raw: &str) -> Result<ParamValue, ParameterError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(ParamValue::Bool(true))
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(ParamValue::Bool(false))
    } else {
        Err(invalid(kind, raw, "expected 'true' or 'false'"))
    }
}

fn serialize_bool(kind: &'static str, value: &ParamValue) -> Result<String, ParameterError> {
    match value {
        ParamValue::Bool(b) => Ok(b.to_string()),
        other => Err(mismatch(kind, other)),
    }
}

fn normalize_bool(kind: &'static str, value: ParamValue) -> Result<ParamValue, ParameterError> {
    match value {
        ParamValue::Bool(_) => Ok(value),
        other => Err(mismatch(kind, &other)),
    }
}

/// BoolParameter はフラグ（`--flag` だけで true）
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolParameter;

impl ParameterCodec for BoolParameter {
    fn kind(&self) -> &'static str {
        "bool"
    }

    fn parse(&self, raw: &str, _ctx: &CodecContext<'_>) -> Result<ParamValue, ParameterError> {
        parse_bool(self.kind(), raw)
    }

    fn serialize(&self, value: &ParamValue) -> Result<String, ParameterError> {
        serialize_bool(self.kind(), value)
    }

    fn normalize(&self, value: ParamValue) -> Result<ParamValue, ParameterError> {
        normalize_bool(self.kind(), value)
    }

    fn cli_arity(&self) -> CliArity {
        CliArity::Flag
    }
}

/// ExplicitBoolParameter は常に値が必要な bool（`--flag false`）
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitBoolParameter;

impl ParameterCodec for ExplicitBoolParameter {
    fn kind(&self) -> &'static str {
        "explicit bool"
    }

    fn parse(&self, raw: &str, _ctx: &CodecContext<'_>) -> Result<ParamValue, ParameterError> {
        parse_bool(self.kind(), raw)
    }

    fn serialize(&self, value: &ParamValue) -> Result<String, ParameterError> {
        serialize_bool(self.kind(), value)
    }

    fn normalize(&self, value: ParamValue) -> Result<ParamValue, ParameterError> {
        normalize_bool(self.kind(), value)
    }
}
