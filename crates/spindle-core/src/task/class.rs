//! TaskClass - タスククラスの宣言（family、パラメータ、継承関係）
//!
//! # 学習ポイント
//! - Builder パターンでの宣言的な定義
//! - `Arc<dyn ParameterCodec>` による型消去されたパラメータ型
//! - `self: &Arc<Self>` レシーバ（生成したインスタンスがクラスを共有所有する）

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use super::instance::TaskInstance;
use super::value::ParamValue;
use crate::domain::errors::ParameterError;
use crate::domain::family::TaskFamily;
use crate::ports::ParameterCodec;

/// ParamSpec は TaskClass 上のパラメータ宣言
#[derive(Clone)]
pub struct ParamSpec {
    name: String,
    codec: Arc<dyn ParameterCodec>,
    significant: bool,
    default: Option<ParamValue>,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, codec: impl ParameterCodec + 'static) -> Self {
        Self {
            name: name.into(),
            codec: Arc::new(codec),
            significant: true,
            default: None,
        }
    }

    /// タスクの同一性に影響しないパラメータにする（serialize 対象外）
    pub fn insignificant(mut self) -> Self {
        self.significant = false;
        self
    }

    pub fn with_default(mut self, value: impl Into<ParamValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn codec(&self) -> &dyn ParameterCodec {
        self.codec.as_ref()
    }

    pub fn is_significant(&self) -> bool {
        self.significant
    }

    pub fn default_value(&self) -> Option<&ParamValue> {
        self.default.as_ref()
    }
}

impl fmt::Debug for ParamSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamSpec")
            .field("name", &self.name)
            .field("kind", &self.codec.kind())
            .field("significant", &self.significant)
            .field("default", &self.default)
            .finish()
    }
}

/// TaskClass は family 名とパラメータ宣言の集合
///
/// # 使用例
/// ```ignore
/// let foo = TaskClass::builder("Foo")
///     .param(ParamSpec::new("x", IntParameter))
///     .param(ParamSpec::new("y", StrParameter).with_default("a"))
///     .build();
/// let task = foo.instantiate([("x".to_string(), ParamValue::Int(1))])?;
/// ```
#[derive(Debug)]
pub struct TaskClass {
    family: TaskFamily,
    bases: BTreeSet<TaskFamily>,
    params: Vec<ParamSpec>,
}

impl TaskClass {
    pub fn builder(family: impl Into<TaskFamily>) -> TaskClassBuilder {
        TaskClassBuilder {
            family: family.into(),
            bases: BTreeSet::new(),
            params: Vec::new(),
        }
    }

    pub fn family(&self) -> &TaskFamily {
        &self.family
    }

    /// 宣言順のパラメータ
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// bound に対する is-a 判定（自身・基底・`Task` のいずれか）
    pub fn is_a(&self, bound: &TaskFamily) -> bool {
        bound.is_base() || &self.family == bound || self.bases.contains(bound)
    }

    /// パラメータ値からインスタンスを生成
    ///
    /// # 検証
    /// - 未宣言の名前は `UnknownParameter`
    /// - 省略されたパラメータはデフォルト値、なければ `MissingRequired`
    /// - すべての値はパラメータ型の `normalize` を通す
    pub fn instantiate(
        self: &Arc<Self>,
        values: impl IntoIterator<Item = (String, ParamValue)>,
    ) -> Result<TaskInstance, ParameterError> {
        let mut provided: BTreeMap<String, ParamValue> = values.into_iter().collect();
        if let Some(name) = provided.keys().find(|k| self.param(k).is_none()) {
            return Err(ParameterError::UnknownParameter {
                family: self.family.clone(),
                name: name.clone(),
            });
        }

        let mut resolved = BTreeMap::new();
        for spec in &self.params {
            let value = match provided.remove(&spec.name) {
                Some(value) => value,
                None => spec
                    .default
                    .clone()
                    .ok_or_else(|| ParameterError::MissingRequired {
                        family: self.family.clone(),
                        name: spec.name.clone(),
                    })?,
            };
            resolved.insert(spec.name.clone(), spec.codec.normalize(value)?);
        }

        Ok(TaskInstance::new(Arc::clone(self), resolved))
    }
}

pub struct TaskClassBuilder {
    family: TaskFamily,
    bases: BTreeSet<TaskFamily>,
    params: Vec<ParamSpec>,
}

impl TaskClassBuilder {
    /// 基底クラスの family を追加（bound 判定に使う）
    pub fn base(mut self, family: impl Into<TaskFamily>) -> Self {
        self.bases.insert(family.into());
        self
    }

    /// パラメータを宣言。同名の宣言は上書き（サブクラスでの再定義と同じ）
    pub fn param(mut self, spec: ParamSpec) -> Self {
        match self.params.iter_mut().find(|p| p.name == spec.name) {
            Some(existing) => *existing = spec,
            None => self.params.push(spec),
        }
        self
    }

    pub fn build(self) -> Arc<TaskClass> {
        Arc::new(TaskClass {
            family: self.family,
            bases: self.bases,
            params: self.params,
        })
    }
}
