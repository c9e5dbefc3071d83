//! Config - codec の設定
//!
//! 既定値のままで動作し、`SpindleConfig::from_env` で `SPINDLE_*` 環境変数から上書きできます。
//!
//! # 学習ポイント
//! - `#[serde(default)]` による部分的な設定ファイルの読み込み
//! - 環境変数の読み出しを `from_lookup` に切り出してテスト可能にする

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::params::encoding;

pub const ENV_UNKNOWN_KEYS: &str = "SPINDLE_UNKNOWN_KEYS";
pub const ENV_COMPRESSION_LEVEL: &str = "SPINDLE_COMPRESSION_LEVEL";

/// UnknownKeyPolicy は TaskClass が宣言していないキーの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeyPolicy {
    /// キーを捨てて parse を続ける
    #[default]
    Lenient,
    /// `ParameterError::UnknownParameter` で失敗
    Strict,
}

impl FromStr for UnknownKeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(UnknownKeyPolicy::Lenient),
            "strict" => Ok(UnknownKeyPolicy::Strict),
            other => Err(format!("expected 'lenient' or 'strict', got '{other}'")),
        }
    }
}

/// CodecConfig はタスク参照 codec の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub unknown_keys: UnknownKeyPolicy,

    /// bzip2 のブロックサイズ（1..=9）。ネストしたタスク参照にも適用される
    pub compression_level: u32,
}

impl CodecConfig {
    pub const MIN_COMPRESSION_LEVEL: u32 = encoding::MIN_COMPRESSION_LEVEL;
    pub const MAX_COMPRESSION_LEVEL: u32 = encoding::MAX_COMPRESSION_LEVEL;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(Self::MIN_COMPRESSION_LEVEL..=Self::MAX_COMPRESSION_LEVEL)
            .contains(&self.compression_level)
        {
            return Err(ConfigError::Invalid {
                key: "compression_level".to_string(),
                value: self.compression_level.to_string(),
                reason: format!(
                    "must be between {} and {}",
                    Self::MIN_COMPRESSION_LEVEL,
                    Self::MAX_COMPRESSION_LEVEL
                ),
            });
        }
        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            unknown_keys: UnknownKeyPolicy::Lenient,
            compression_level: encoding::DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpindleConfig {
    pub codec: CodecConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

impl SpindleConfig {
    /// プロセスの環境変数から読む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意のキー検索（環境変数相当）から構築
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = SpindleConfig::default();

        if let Some(raw) = lookup(ENV_UNKNOWN_KEYS) {
            config.codec.unknown_keys = raw.parse().map_err(|reason| ConfigError::Invalid {
                key: ENV_UNKNOWN_KEYS.to_string(),
                value: raw.clone(),
                reason,
            })?;
        }

        if let Some(raw) = lookup(ENV_COMPRESSION_LEVEL) {
            config.codec.compression_level =
                raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::Invalid {
                        key: ENV_COMPRESSION_LEVEL.to_string(),
                        value: raw.clone(),
                        reason: e.to_string(),
                    }
                })?;
        }

        config.codec.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_lenient_and_max_compression() {
        let config = SpindleConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.codec.unknown_keys, UnknownKeyPolicy::Lenient);
        assert_eq!(config.codec.compression_level, 9);
    }

    #[test]
    fn env_overrides_are_applied() {
        let config = SpindleConfig::from_lookup(lookup(&[
            (ENV_UNKNOWN_KEYS, "Strict"),
            (ENV_COMPRESSION_LEVEL, " 3 "),
        ]))
        .unwrap();
        assert_eq!(config.codec.unknown_keys, UnknownKeyPolicy::Strict);
        assert_eq!(config.codec.compression_level, 3);
    }

    #[test]
    fn invalid_policy_is_rejected() {
        let err = SpindleConfig::from_lookup(lookup(&[(ENV_UNKNOWN_KEYS, "loose")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == ENV_UNKNOWN_KEYS));
    }

    #[test]
    fn out_of_range_compression_is_rejected() {
        let err =
            SpindleConfig::from_lookup(lookup(&[(ENV_COMPRESSION_LEVEL, "12")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "compression_level"));
    }

    #[test]
    fn deserializes_partial_json() {
        let config: SpindleConfig =
            serde_json::from_str(r#"{ "codec": { "unknown_keys": "strict" } }"#).unwrap();
        assert_eq!(config.codec.unknown_keys, UnknownKeyPolicy::Strict);
        assert_eq!(config.codec.compression_level, 9);
    }
}
