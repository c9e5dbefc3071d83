//! Encoding - タスク参照の layered encoding
//!
//! ```text
//! outer : {"params": "<hex>", "type": "<family>"}      (DictParameter の構造エンコード)
//! <hex> : hex( bzip2( json( {name: serialized_value, ...} ) ) )
//! ```
//!
//! ネストしたタスクの値はそれ自身の outer encoding（文字列）として fields に入るため、
//! 圧縮レイヤーはネストの深さごとにちょうど 1 つずつ重なります。
//!
//! # 学習ポイント
//! - タグ付き enum（`Encoded`）による明示的な再帰
//!   （「`params` キーがあれば展開」という暗黙の構造判定を使わない）

use bzip2::Compression;
use bzip2::read::BzDecoder;
use bzip2::write::BzEncoder;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::{Read, Write};

use super::dict::DictParameter;
use crate::domain::errors::DecodeError;
use crate::domain::family::TaskFamily;

pub(crate) const TYPE_KEY: &str = "type";
pub(crate) const PARAMS_KEY: &str = "params";

/// bzip2 のブロックサイズ（100k 単位）
pub const MIN_COMPRESSION_LEVEL: u32 = 1;
pub const MAX_COMPRESSION_LEVEL: u32 = 9;
pub const DEFAULT_COMPRESSION_LEVEL: u32 = MAX_COMPRESSION_LEVEL;

/// パラメータ名 → serialize 済みの値
pub type Fields = BTreeMap<String, String>;

/// Encoded はデコード途中のタスク参照
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    /// 生のパラメータ値（これ以上展開しない）
    Leaf(Fields),
    /// family と圧縮済みの fields
    TaskRef {
        family: TaskFamily,
        encoded_fields: String,
    },
}

impl Encoded {
    /// fields を圧縮して TaskRef を作る
    pub fn task_ref(family: TaskFamily, fields: &Fields, level: u32) -> Result<Self, DecodeError> {
        Ok(Encoded::TaskRef {
            family,
            encoded_fields: deflate(fields, level)?,
        })
    }

    /// outer encoding（`{"type", "params"}`）を読む
    pub fn from_envelope(raw: &str) -> Result<Self, DecodeError> {
        let mapping = DictParameter::decode_mapping(raw)?;
        let family = match mapping.get(TYPE_KEY) {
            Some(Value::String(s)) => TaskFamily::new(s.as_str()),
            _ => return Err(DecodeError::Envelope(format!("missing string field '{TYPE_KEY}'"))),
        };
        let encoded_fields = match mapping.get(PARAMS_KEY) {
            Some(Value::String(s)) => s.clone(),
            _ => {
                return Err(DecodeError::Envelope(format!(
                    "missing string field '{PARAMS_KEY}'"
                )));
            }
        };
        Ok(Encoded::TaskRef {
            family,
            encoded_fields,
        })
    }

    /// outer encoding として書き出す
    pub fn to_envelope(&self) -> Result<String, DecodeError> {
        match self {
            Encoded::TaskRef {
                family,
                encoded_fields,
            } => {
                let mut mapping = Map::new();
                mapping.insert(TYPE_KEY.to_string(), Value::String(family.to_string()));
                mapping.insert(PARAMS_KEY.to_string(), Value::String(encoded_fields.clone()));
                DictParameter::encode_mapping(&mapping)
            }
            Encoded::Leaf(_) => Err(DecodeError::Envelope(
                "parameter mapping carries no task family".to_string(),
            )),
        }
    }
}

/// json → bzip2 → hex
///
/// level が 1..=9 の外なら `DecodeError::CompressionLevel`
pub fn deflate(fields: &Fields, level: u32) -> Result<String, DecodeError> {
    if !(MIN_COMPRESSION_LEVEL..=MAX_COMPRESSION_LEVEL).contains(&level) {
        return Err(DecodeError::CompressionLevel(level));
    }
    let json = serde_json::to_string(fields)?;
    let mut encoder = BzEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(json.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(hex::encode(compressed))
}

/// hex → bzip2 → json
pub fn inflate(encoded: &str) -> Result<Fields, DecodeError> {
    let compressed = hex::decode(encoded)?;
    let mut bytes = Vec::new();
    BzDecoder::new(compressed.as_slice()).read_to_end(&mut bytes)?;
    let json = String::from_utf8(bytes)?;
    let mapping = DictParameter::decode_mapping(&json)?;
    Ok(stringify_fields(mapping))
}

/// JSON オブジェクトを Fields に変換（文字列以外は JSON 表現のまま文字列化）
pub fn stringify_fields(mapping: Map<String, Value>) -> Fields {
    mapping
        .into_iter()
        .map(|(k, v)| {
            let raw = match v {
                Value::String(s) => s,
                other => other.to_string(),
            };
            (k, raw)
        })
        .collect()
}
