//! TaskRegistry - タスククラスの登録と解決
//!
//! # 学習ポイント
//! - グローバルな登録ではなく、起動時に明示的に構築して codec へ渡す
//! - HashMap での `Arc<TaskClass>` の共有所有
//! - 構築時は mutable、実行時は `Arc<TaskRegistry>` で immutable に共有

use std::collections::HashMap;
use std::sync::Arc;

use super::class::TaskClass;
use crate::domain::family::TaskFamily;

/// TaskRegistry は family 名 → TaskClass の対応表
///
/// # 使用例
/// ```ignore
/// let mut registry = TaskRegistry::new();
/// registry.register(foo_class)?;
///
/// // serialize された `type` から TaskClass を解決
/// let class = registry.get("Foo")?;
/// ```
#[derive(Debug, Default)]
pub struct TaskRegistry {
    classes: HashMap<TaskFamily, Arc<TaskClass>>,
}

/// RegistryError は TaskRegistry の操作エラー
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("task family '{0}' is already registered")]
    AlreadyRegistered(TaskFamily),

    #[error("task family '{0}' is not registered")]
    NotFound(TaskFamily),
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            classes: HashMap::new(),
        }
    }

    pub fn register(&mut self, class: Arc<TaskClass>) -> Result<(), RegistryError> {
        let family = class.family().clone();
        if self.classes.contains_key(&family) {
            return Err(RegistryError::AlreadyRegistered(family));
        }
        self.classes.insert(family, class);
        Ok(())
    }

    pub fn get(&self, family: &str) -> Result<Arc<TaskClass>, RegistryError> {
        let family = TaskFamily::new(family);
        self.classes
            .get(&family)
            .cloned()
            .ok_or(RegistryError::NotFound(family))
    }

    pub fn contains(&self, family: &str) -> bool {
        self.classes.contains_key(&TaskFamily::new(family))
    }

    /// 登録済みの family（名前順）
    pub fn registered_families(&self) -> Vec<TaskFamily> {
        let mut families: Vec<TaskFamily> = self.classes.keys().cloned().collect();
        families.sort();
        families
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
