//! TaskReferenceParameter - 他タスクのインスタンスをパラメータ値として埋め込む
//!
//! # serialize
//! 1. significant なパラメータを各パラメータ型で文字列化（ネストしたタスクはここで再帰）
//! 2. JSON → bzip2 → hex（圧縮レベルは `EncodeOptions`。ネストしたタスクにも同じ値を渡す）
//! 3. `{"type": family, "params": hex}` を DictParameter の構造エンコードで包む
//!
//! # parse
//! 1. outer encoding を `Encoded::TaskRef` として読む
//! 2. `encoded_fields` を 1 レイヤー展開して `Fields`（生の文字列値）を得る
//! 3. registry で family を TaskClass に解決
//! 4. 宣言済みのパラメータだけをそのパラメータ型で parse（タスク参照ならここで再帰）
//! 5. 省略されたパラメータはデフォルト値のままインスタンス化

use serde_json::Value;
use tracing::debug;

use super::{CodecContext, EncodeOptions};
use super::encoding::{self, Encoded, Fields, PARAMS_KEY, TYPE_KEY};
use crate::config::UnknownKeyPolicy;
use crate::domain::errors::{DecodeError, ParameterError};
use crate::domain::family::TaskFamily;
use crate::ports::ParameterCodec;
use crate::task::{ParamValue, TaskInstance};

/// TaskReferenceParameter は bound 型のタスクインスタンスを値に取るパラメータ
///
/// # 使用例
/// ```ignore
/// let bar = TaskClass::builder("Bar")
///     .param(ParamSpec::new("inner", TaskReferenceParameter::bounded("Foo")))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct TaskReferenceParameter {
    bound: TaskFamily,
}

impl TaskReferenceParameter {
    /// bound は基底の `Task`（どのタスクでも受け入れる）
    pub fn new() -> Self {
        Self::bounded(TaskFamily::base())
    }

    pub fn bounded(bound: impl Into<TaskFamily>) -> Self {
        Self {
            bound: bound.into(),
        }
    }

    pub fn bound(&self) -> &TaskFamily {
        &self.bound
    }

    pub fn encode(
        &self,
        task: &TaskInstance,
        options: &EncodeOptions,
    ) -> Result<String, ParameterError> {
        let fields = task.to_str_params(true, options)?;
        let encoded =
            Encoded::task_ref(task.family().clone(), &fields, options.compression_level())?;
        let envelope = encoded.to_envelope()?;
        debug!(family = %task.family(), len = envelope.len(), "encoded task reference");
        Ok(envelope)
    }

    pub fn decode(&self, raw: &str, ctx: &CodecContext<'_>) -> Result<TaskInstance, ParameterError> {
        let task = resolve(Encoded::from_envelope(raw)?, ctx)?;
        self.check_bound(&task)?;
        Ok(task)
    }

    /// デコード済みの JSON 値から解決
    ///
    /// - 文字列: outer encoding として `decode`
    /// - オブジェクト: `{"type": .., "params": {..}}`（params は非圧縮のオブジェクト、
    ///   または圧縮済みの hex 文字列）
    pub fn decode_json(
        &self,
        value: &Value,
        ctx: &CodecContext<'_>,
    ) -> Result<TaskInstance, ParameterError> {
        let mapping = match value {
            Value::String(raw) => return self.decode(raw, ctx),
            Value::Object(mapping) => mapping,
            _ => {
                return Err(DecodeError::Envelope(
                    "task reference must be a string or an object".to_string(),
                )
                .into());
            }
        };

        let family = mapping
            .get(TYPE_KEY)
            .and_then(Value::as_str)
            .map(TaskFamily::from)
            .ok_or_else(|| DecodeError::Envelope(format!("missing string field '{TYPE_KEY}'")))?;
        let encoded = match mapping.get(PARAMS_KEY) {
            None => Encoded::Leaf(Fields::new()),
            Some(Value::Object(params)) => Encoded::Leaf(encoding::stringify_fields(params.clone())),
            Some(Value::String(encoded_fields)) => Encoded::TaskRef {
                family: family.clone(),
                encoded_fields: encoded_fields.clone(),
            },
            Some(_) => {
                return Err(DecodeError::Envelope(format!(
                    "'{PARAMS_KEY}' must be an object or a string"
                ))
                .into());
            }
        };

        let task = match encoded {
            Encoded::Leaf(fields) => instantiate(&family, fields, ctx)?,
            task_ref @ Encoded::TaskRef { .. } => resolve(task_ref, ctx)?,
        };
        self.check_bound(&task)?;
        Ok(task)
    }

    fn check_bound(&self, task: &TaskInstance) -> Result<(), ParameterError> {
        if task.is_a(&self.bound) {
            Ok(())
        } else {
            Err(ParameterError::BoundViolation {
                value: task.to_string(),
                expected: self.bound.clone(),
            })
        }
    }
}

impl Default for TaskReferenceParameter {
    fn default() -> Self {
        Self::new()
    }
}

/// TaskRef を 1 レイヤー展開してインスタンス化
fn resolve(encoded: Encoded, ctx: &CodecContext<'_>) -> Result<TaskInstance, ParameterError> {
    match encoded {
        Encoded::TaskRef {
            family,
            encoded_fields,
        } => {
            let fields = encoding::inflate(&encoded_fields)?;
            instantiate(&family, fields, ctx)
        }
        Encoded::Leaf(_) => Err(DecodeError::Envelope(
            "parameter mapping carries no task family".to_string(),
        )
        .into()),
    }
}

fn instantiate(
    family: &TaskFamily,
    fields: Fields,
    ctx: &CodecContext<'_>,
) -> Result<TaskInstance, ParameterError> {
    let class = ctx.registry().get(family.as_str())?;

    let mut values = Vec::with_capacity(fields.len());
    for (name, raw) in fields {
        match class.param(&name) {
            Some(spec) => {
                let value = spec.codec().parse(&raw, ctx)?;
                values.push((name, value));
            }
            None => match ctx.unknown_keys() {
                UnknownKeyPolicy::Lenient => {
                    debug!(family = %family, param = %name, "ignoring undeclared parameter");
                }
                UnknownKeyPolicy::Strict => {
                    return Err(ParameterError::UnknownParameter {
                        family: family.clone(),
                        name,
                    });
                }
            },
        }
    }

    debug!(family = %family, params = values.len(), "resolved task reference");
    class.instantiate(values)
}

impl ParameterCodec for TaskReferenceParameter {
    fn kind(&self) -> &'static str {
        "task"
    }

    fn parse(&self, raw: &str, ctx: &CodecContext<'_>) -> Result<ParamValue, ParameterError> {
        self.decode(raw, ctx).map(ParamValue::Task)
    }

    fn serialize(&self, value: &ParamValue) -> Result<String, ParameterError> {
        self.serialize_with(value, &EncodeOptions::default())
    }

    fn serialize_with(
        &self,
        value: &ParamValue,
        options: &EncodeOptions,
    ) -> Result<String, ParameterError> {
        match value {
            ParamValue::Task(task) => self.encode(task, options),
            other => Err(ParameterError::TypeMismatch {
                kind: self.kind(),
                found: other.type_name(),
            }),
        }
    }

    fn normalize(&self, value: ParamValue) -> Result<ParamValue, ParameterError> {
        match &value {
            ParamValue::Task(task) => self.check_bound(task)?,
            other => {
                return Err(ParameterError::TypeMismatch {
                    kind: self.kind(),
                    found: other.type_name(),
                });
            }
        }
        Ok(value)
    }
}

/// JSON への変換でタスクインスタンスだけを特別扱いする encoder
///
/// タスクは `TaskReferenceParameter::encode` の文字列に、それ以外は素直な JSON 値になります。
pub struct TaskAwareEncoder<'a> {
    tasks: &'a TaskReferenceParameter,
    options: EncodeOptions,
}

impl<'a> TaskAwareEncoder<'a> {
    pub fn new(tasks: &'a TaskReferenceParameter, options: EncodeOptions) -> Self {
        Self { tasks, options }
    }

    pub fn encode_task(&self, task: &TaskInstance) -> Result<Value, ParameterError> {
        self.tasks.encode(task, &self.options).map(Value::String)
    }

    pub fn encode(&self, value: &ParamValue) -> Result<Value, ParameterError> {
        Ok(match value {
            ParamValue::Task(task) => self.encode_task(task)?,
            ParamValue::TaskList(tasks) => Value::Array(
                tasks
                    .iter()
                    .map(|task| self.encode_task(task))
                    .collect::<Result<_, _>>()?,
            ),
            ParamValue::Str(s) => Value::String(s.clone()),
            ParamValue::Int(i) => Value::from(*i),
            ParamValue::Float(x) => Value::from(*x),
            ParamValue::Bool(b) => Value::Bool(*b),
            ParamValue::Dict(v) => v.clone(),
        })
    }
}

/// ListTaskReferenceParameter はタスク参照の JSON 配列
#[derive(Debug, Clone, Default)]
pub struct ListTaskReferenceParameter {
    element: TaskReferenceParameter,
}

impl ListTaskReferenceParameter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounded(bound: impl Into<TaskFamily>) -> Self {
        Self {
            element: TaskReferenceParameter::bounded(bound),
        }
    }

    pub fn bound(&self) -> &TaskFamily {
        self.element.bound()
    }

    pub fn encode(
        &self,
        tasks: &[TaskInstance],
        options: &EncodeOptions,
    ) -> Result<String, ParameterError> {
        let encoder = TaskAwareEncoder::new(&self.element, *options);
        let items = tasks
            .iter()
            .map(|task| encoder.encode_task(task))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(serde_json::to_string(&Value::Array(items)).map_err(DecodeError::from)?)
    }

    pub fn decode(
        &self,
        raw: &str,
        ctx: &CodecContext<'_>,
    ) -> Result<Vec<TaskInstance>, ParameterError> {
        let items = match serde_json::from_str::<Value>(raw).map_err(DecodeError::from)? {
            Value::Array(items) => items,
            _ => {
                return Err(
                    DecodeError::Envelope("task list must be a JSON array".to_string()).into(),
                );
            }
        };
        items
            .iter()
            .map(|item| self.element.decode_json(item, ctx))
            .collect()
    }
}

impl ParameterCodec for ListTaskReferenceParameter {
    fn kind(&self) -> &'static str {
        "task list"
    }

    fn parse(&self, raw: &str, ctx: &CodecContext<'_>) -> Result<ParamValue, ParameterError> {
        self.decode(raw, ctx).map(ParamValue::TaskList)
    }

    fn serialize(&self, value: &ParamValue) -> Result<String, ParameterError> {
        self.serialize_with(value, &EncodeOptions::default())
    }

    fn serialize_with(
        &self,
        value: &ParamValue,
        options: &EncodeOptions,
    ) -> Result<String, ParameterError> {
        match value {
            ParamValue::TaskList(_) => {
                let encoded = TaskAwareEncoder::new(&self.element, *options).encode(value)?;
                Ok(serde_json::to_string(&encoded).map_err(DecodeError::from)?)
            }
            other => Err(ParameterError::TypeMismatch {
                kind: self.kind(),
                found: other.type_name(),
            }),
        }
    }

    fn normalize(&self, value: ParamValue) -> Result<ParamValue, ParameterError> {
        match &value {
            ParamValue::TaskList(tasks) => {
                for task in tasks {
                    self.element.check_bound(task)?;
                }
            }
            other => {
                return Err(ParameterError::TypeMismatch {
                    kind: self.kind(),
                    found: other.type_name(),
                });
            }
        }
        Ok(value)
    }
}
