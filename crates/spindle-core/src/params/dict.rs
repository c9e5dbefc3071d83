//! DictParameter - JSON オブジェクトのパラメータ（構造エンコード）
//!
//! キー順に並んだ JSON オブジェクトとして serialize します。
//! タスク参照の outer encoding もこのエンコードを使います。

use serde_json::{Map, Value};

use super::CodecContext;
use crate::domain::errors::{DecodeError, ParameterError};
use crate::ports::ParameterCodec;
use crate::task::ParamValue;

#[derive(Debug, Clone, Copy, Default)]
pub struct DictParameter;

impl DictParameter {
    /// JSON オブジェクトを文字列化（キー順）
    pub fn encode_mapping(mapping: &Map<String, Value>) -> Result<String, DecodeError> {
        Ok(serde_json::to_string(mapping)?)
    }

    /// 文字列を JSON オブジェクトとして読む（オブジェクト以外はエラー）
    pub fn decode_mapping(raw: &str) -> Result<Map<String, Value>, DecodeError> {
        match serde_json::from_str(raw)? {
            Value::Object(mapping) => Ok(mapping),
            other => Err(DecodeError::Envelope(format!(
                "expected a JSON object, got {}",
                json_type(&other)
            ))),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl ParameterCodec for DictParameter {
    fn kind(&self) -> &'static str {
        "dict"
    }

    fn parse(&self, raw: &str, _ctx: &CodecContext<'_>) -> Result<ParamValue, ParameterError> {
        let mapping = Self::decode_mapping(raw)?;
        Ok(ParamValue::Dict(Value::Object(mapping)))
    }

    fn serialize(&self, value: &ParamValue) -> Result<String, ParameterError> {
        match value {
            ParamValue::Dict(Value::Object(mapping)) => Ok(Self::encode_mapping(mapping)?),
            other => Err(ParameterError::TypeMismatch {
                kind: self.kind(),
                found: other.type_name(),
            }),
        }
    }

    fn normalize(&self, value: ParamValue) -> Result<ParamValue, ParameterError> {
        match value {
            ParamValue::Dict(Value::Object(_)) => Ok(value),
            other => Err(ParameterError::TypeMismatch {
                kind: self.kind(),
                found: other.type_name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnknownKeyPolicy;
    use crate::task::TaskRegistry;
    use serde_json::json;

    #[test]
    fn serialize_orders_keys() {
        let value = ParamValue::Dict(json!({ "b": 2, "a": { "z": 1, "y": [1, 2] } }));
        let s = DictParameter.serialize(&value).unwrap();
        assert_eq!(s, r#"{"a":{"y":[1,2],"z":1},"b":2}"#);
    }

    #[test]
    fn parse_then_serialize_is_stable() {
        let registry = TaskRegistry::new();
        let ctx = CodecContext::new(&registry, UnknownKeyPolicy::Lenient);
        let parsed = DictParameter.parse(r#"{ "k": "v", "n": 1 }"#, &ctx).unwrap();
        assert_eq!(parsed, ParamValue::Dict(json!({ "k": "v", "n": 1 })));
        assert_eq!(
            DictParameter.serialize(&parsed).unwrap(),
            r#"{"k":"v","n":1}"#
        );
    }

    #[test]
    fn non_object_is_rejected() {
        let registry = TaskRegistry::new();
        let ctx = CodecContext::new(&registry, UnknownKeyPolicy::Lenient);
        let err = DictParameter.parse("[1]", &ctx).unwrap_err();
        assert!(matches!(err, ParameterError::Decode(DecodeError::Envelope(_))));

        let err = DictParameter.normalize(ParamValue::Dict(json!(3))).unwrap_err();
        assert!(matches!(err, ParameterError::TypeMismatch { kind: "dict", found: "dict" }));
    }
}
