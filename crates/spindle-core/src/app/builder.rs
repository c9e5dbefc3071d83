//! CodecBuilder - TaskRegistry の構築と TaskCodec のワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）
//! - 開発体験の改善（明確なエラーメッセージ）

use std::sync::Arc;

use super::codec::TaskCodec;
use crate::config::{CodecConfig, ConfigError};
use crate::task::{RegistryError, TaskClass, TaskRegistry};

/// CodecBuilder は TaskCodec を構築
///
/// # 使用例
/// ```ignore
/// let codec = CodecBuilder::new()
///     .register(foo_class)?
///     .register(bar_class)?
///     .expect_families(&["Foo", "Bar"])
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - expect_families() で参照される予定の family を宣言
/// - build() 時に「期待集合 ⊆ 登録済み集合」をチェック
/// - 不足があれば BuildError を返す（decode 時の NotFound を起動時に前倒し）
pub struct CodecBuilder {
    registry: TaskRegistry,
    expected_families: Option<Vec<String>>,
    config: CodecConfig,
}

/// BuildError は TaskCodec 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing task families: {0:?}. These families were expected but not registered.")]
    MissingFamilies(Vec<String>),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CodecBuilder {
    pub fn new() -> Self {
        Self {
            registry: TaskRegistry::new(),
            expected_families: None,
            config: CodecConfig::default(),
        }
    }

    /// TaskClass を登録
    pub fn register(mut self, class: Arc<TaskClass>) -> Result<Self, RegistryError> {
        self.registry.register(class)?;
        Ok(self)
    }

    /// 期待される family のリストを設定
    pub fn expect_families(mut self, families: &[&str]) -> Self {
        self.expected_families = Some(families.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    /// 検証して TaskCodec を生成
    ///
    /// # 検証
    /// - 設定値（圧縮レベル）の範囲
    /// - expect_families() の family が全て登録されているか
    pub fn build(self) -> Result<TaskCodec, BuildError> {
        self.config.validate()?;
        if let Some(expected) = &self.expected_families {
            let missing: Vec<String> = expected
                .iter()
                .filter(|f| !self.registry.contains(f))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(BuildError::MissingFamilies(missing));
            }
        }
        Ok(TaskCodec::new(Arc::new(self.registry), self.config))
    }
}

impl Default for CodecBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::fixtures;

    #[test]
    fn test_build_success() {
        let codec = CodecBuilder::new()
            .register(fixtures::foo_class())
            .unwrap()
            .expect_families(&["Foo"])
            .build();
        assert!(codec.is_ok());
    }

    #[test]
    fn test_build_missing_families() {
        let codec = CodecBuilder::new()
            .register(fixtures::foo_class())
            .unwrap()
            .expect_families(&["Foo", "Bar"])
            .build();
        assert!(matches!(
            codec,
            Err(BuildError::MissingFamilies(missing)) if missing == vec!["Bar".to_string()]
        ));
    }

    #[test]
    fn test_build_no_expect_families() {
        let codec = CodecBuilder::new()
            .register(fixtures::foo_class())
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(codec.registry().len(), 1);
    }

    #[test]
    fn test_duplicate_registration() {
        let result = CodecBuilder::new()
            .register(fixtures::foo_class())
            .unwrap()
            .register(fixtures::foo_class());
        assert!(matches!(result, Err(RegistryError::AlreadyRegistered(_))));
    }

    #[test]
    fn test_invalid_config() {
        let result = CodecBuilder::new()
            .config(CodecConfig {
                compression_level: 0,
                ..CodecConfig::default()
            })
            .build();
        assert!(matches!(result, Err(BuildError::Config(_))));
    }
}
