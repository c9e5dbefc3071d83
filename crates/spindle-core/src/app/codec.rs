//! TaskCodec - registry と設定を束ねたタスク参照の encode / decode
//!
//! 起動時に `CodecBuilder` で構築し、以後は immutable に共有します。

use std::sync::Arc;

use serde_json::Value;

use crate::config::CodecConfig;
use crate::domain::errors::ParameterError;
use crate::domain::family::TaskFamily;
use crate::params::{
    CodecContext, EncodeOptions, ListTaskReferenceParameter, TaskReferenceParameter,
};
use crate::task::{TaskInstance, TaskRegistry};

/// TaskCodec はトップレベルのタスク参照の入口
///
/// # 使用例
/// ```ignore
/// let codec = CodecBuilder::new().register(foo_class)?.build()?;
/// let encoded = codec.encode(&task)?;
/// let decoded = codec.decode(&encoded)?;
/// assert_eq!(decoded, task);
/// ```
#[derive(Debug, Clone)]
pub struct TaskCodec {
    registry: Arc<TaskRegistry>,
    config: CodecConfig,
}

impl TaskCodec {
    pub fn new(registry: Arc<TaskRegistry>, config: CodecConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn context(&self) -> CodecContext<'_> {
        CodecContext::new(&self.registry, self.config.unknown_keys)
    }

    /// 設定の圧縮レベル（ネストしたタスク参照にも適用される）
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions::new(self.config.compression_level)
    }

    fn single(&self, bound: TaskFamily) -> TaskReferenceParameter {
        TaskReferenceParameter::bounded(bound)
    }

    pub fn encode(&self, task: &TaskInstance) -> Result<String, ParameterError> {
        self.single(TaskFamily::base())
            .encode(task, &self.encode_options())
    }

    pub fn decode(&self, raw: &str) -> Result<TaskInstance, ParameterError> {
        self.single(TaskFamily::base()).decode(raw, &self.context())
    }

    /// bound を指定して decode（bound 外のタスクは `BoundViolation`）
    pub fn decode_bounded(
        &self,
        raw: &str,
        bound: impl Into<TaskFamily>,
    ) -> Result<TaskInstance, ParameterError> {
        self.single(bound.into()).decode(raw, &self.context())
    }

    pub fn decode_json(&self, value: &Value) -> Result<TaskInstance, ParameterError> {
        self.single(TaskFamily::base())
            .decode_json(value, &self.context())
    }

    pub fn encode_list(&self, tasks: &[TaskInstance]) -> Result<String, ParameterError> {
        ListTaskReferenceParameter::new().encode(tasks, &self.encode_options())
    }

    pub fn decode_list(&self, raw: &str) -> Result<Vec<TaskInstance>, ParameterError> {
        ListTaskReferenceParameter::new().decode(raw, &self.context())
    }
}
