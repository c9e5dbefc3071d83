//! TaskFamily - タスククラスの登録名

use serde::{Deserialize, Serialize};
use std::fmt;

/// TaskFamily はタスククラスの登録名
///
/// すべてのクラスは暗黙に [`TaskFamily::BASE`] に属するため、
/// bound が `Task` ならどのタスクインスタンスも受け入れます。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskFamily(String);

impl TaskFamily {
    pub const BASE: &'static str = "Task";

    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn base() -> Self {
        Self::new(Self::BASE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_base(&self) -> bool {
        self.0 == Self::BASE
    }
}

impl fmt::Display for TaskFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<&str> for TaskFamily {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TaskFamily {
    fn from(s: String) -> Self {
        Self(s)
    }
}
