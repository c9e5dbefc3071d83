//! TaskInstance - パラメータ値が解決済みのタスク

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::class::TaskClass;
use super::value::ParamValue;
use crate::domain::errors::{DecodeError, ParameterError};
use crate::domain::family::TaskFamily;
use crate::params::EncodeOptions;
use crate::params::encoding::Fields;

const TASK_ID_SUMMARY_PARAMS: usize = 3;
const TASK_ID_SUMMARY_CHARS: usize = 16;
const TASK_ID_HASH_CHARS: usize = 10;

/// TaskInstance はクラスとパラメータ値の組
///
/// 等価性は family と significant なパラメータ値で判定します。
/// insignificant なパラメータは比較・serialize・task_id の対象外です。
#[derive(Clone)]
pub struct TaskInstance {
    class: Arc<TaskClass>,
    values: BTreeMap<String, ParamValue>,
}

impl TaskInstance {
    pub(crate) fn new(class: Arc<TaskClass>, values: BTreeMap<String, ParamValue>) -> Self {
        Self { class, values }
    }

    pub fn class(&self) -> &Arc<TaskClass> {
        &self.class
    }

    pub fn family(&self) -> &TaskFamily {
        self.class.family()
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn values(&self) -> &BTreeMap<String, ParamValue> {
        &self.values
    }

    pub fn is_a(&self, bound: &TaskFamily) -> bool {
        self.class.is_a(bound)
    }

    fn significant_values(&self) -> impl Iterator<Item = (&str, Option<&ParamValue>)> {
        self.class
            .params()
            .iter()
            .filter(|spec| spec.is_significant())
            .map(|spec| (spec.name(), self.values.get(spec.name())))
    }

    /// パラメータ値を各パラメータ型の serialize で文字列化
    pub fn to_str_params(
        &self,
        only_significant: bool,
        options: &EncodeOptions,
    ) -> Result<Fields, ParameterError> {
        let mut fields = Fields::new();
        for spec in self.class.params() {
            if only_significant && !spec.is_significant() {
                continue;
            }
            if let Some(value) = self.values.get(spec.name()) {
                fields.insert(spec.name().to_string(), spec.codec().serialize_with(value, options)?);
            }
        }
        Ok(fields)
    }

    /// `<Family>_<summary>_<hash>` 形式の識別子
    ///
    /// - summary: キー順で先頭 3 つのパラメータ値（各 16 文字まで）を `_` で連結
    /// - hash: significant パラメータのコンパクト JSON の SHA-256 先頭 10 桁
    ///
    /// 圧縮レベルの設定に左右されないよう、常に既定の `EncodeOptions` で serialize します。
    pub fn task_id(&self) -> Result<String, ParameterError> {
        let params = self.to_str_params(true, &EncodeOptions::default())?;
        let compact = serde_json::to_string(&params).map_err(DecodeError::from)?;
        let digest = hex::encode(Sha256::digest(compact.as_bytes()));

        let summary: String = params
            .values()
            .take(TASK_ID_SUMMARY_PARAMS)
            .map(|v| v.chars().take(TASK_ID_SUMMARY_CHARS).collect::<String>())
            .collect::<Vec<_>>()
            .join("_")
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();

        Ok(format!(
            "{}_{}_{}",
            self.family(),
            summary,
            &digest[..TASK_ID_HASH_CHARS]
        ))
    }
}

impl PartialEq for TaskInstance {
    fn eq(&self, other: &Self) -> bool {
        self.family() == other.family()
            && self.significant_values().eq(other.significant_values())
    }
}

impl fmt::Debug for TaskInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskInstance")
            .field("family", self.family())
            .field("values", &self.values)
            .finish()
    }
}

/// `Foo(x=1, y=a)` 形式（significant なパラメータのみ）
impl fmt::Display for TaskInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.family())?;
        let mut first = true;
        for (name, value) in self.significant_values() {
            let Some(value) = value else { continue };
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::fixtures;

    #[test]
    fn equality_ignores_insignificant_params() {
        let a = fixtures::foo_noted(1, "a", "first");
        let b = fixtures::foo_noted(1, "a", "second");
        assert_eq!(a, b);
        assert_ne!(a, fixtures::foo(2, "a"));
    }

    #[test]
    fn equality_requires_same_family() {
        let foo = fixtures::foo(1, "a");
        let special = fixtures::special_foo(1, "a");
        assert_ne!(foo, special);
    }

    #[test]
    fn to_str_params_skips_insignificant() {
        let task = fixtures::foo_noted(1, "a", "ignored");
        let significant = task.to_str_params(true, &EncodeOptions::default()).unwrap();
        assert_eq!(significant.get("x").map(String::as_str), Some("1"));
        assert_eq!(significant.get("y").map(String::as_str), Some("a"));
        assert!(!significant.contains_key("note"));

        let all = task.to_str_params(false, &EncodeOptions::default()).unwrap();
        assert_eq!(all.get("note").map(String::as_str), Some("ignored"));
    }

    #[test]
    fn display_renders_significant_params() {
        assert_eq!(fixtures::foo(1, "a").to_string(), "Foo(x=1, y=a)");
        assert_eq!(
            fixtures::bar(fixtures::foo(1, "a")).to_string(),
            "Bar(inner=Foo(x=1, y=a))"
        );
    }

    #[test]
    fn task_id_has_family_summary_and_hash() {
        let id = fixtures::foo(1, "a b").task_id().unwrap();
        assert!(id.starts_with("Foo_1_a_b_"), "{id}");
        let hash = id.rsplit('_').next().unwrap();
        assert_eq!(hash.len(), 10);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn task_id_is_stable_and_distinguishes_values() {
        let a = fixtures::foo(1, "a").task_id().unwrap();
        assert_eq!(a, fixtures::foo_noted(1, "a", "x").task_id().unwrap());
        assert_ne!(a, fixtures::foo(2, "a").task_id().unwrap());
    }
}
