//! ParamValue - 解決済みのパラメータ値

use std::fmt;

use super::instance::TaskInstance;

/// ParamValue はタスクパラメータ 1 つ分の解決済みの値
///
/// タスク参照は所有される（parse した値はネストしたインスタンスを自身で保持する）
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// dict パラメータの JSON オブジェクト
    Dict(serde_json::Value),
    Task(TaskInstance),
    TaskList(Vec<TaskInstance>),
}

impl ParamValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Str(_) => "str",
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
            ParamValue::Bool(_) => "bool",
            ParamValue::Dict(_) => "dict",
            ParamValue::Task(_) => "task",
            ParamValue::TaskList(_) => "task list",
        }
    }

    pub fn as_task(&self) -> Option<&TaskInstance> {
        match self {
            ParamValue::Task(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_task_list(&self) -> Option<&[TaskInstance]> {
        match self {
            ParamValue::TaskList(ts) => Some(ts),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => fmt::Display::fmt(s, f),
            ParamValue::Int(i) => fmt::Display::fmt(i, f),
            ParamValue::Float(x) => fmt::Display::fmt(x, f),
            ParamValue::Bool(b) => fmt::Display::fmt(b, f),
            ParamValue::Dict(v) => fmt::Display::fmt(v, f),
            ParamValue::Task(t) => fmt::Display::fmt(t, f),
            ParamValue::TaskList(ts) => {
                f.write_str("[")?;
                for (i, t) in ts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(t, f)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        ParamValue::Float(x)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<TaskInstance> for ParamValue {
    fn from(t: TaskInstance) -> Self {
        ParamValue::Task(t)
    }
}

impl From<Vec<TaskInstance>> for ParamValue {
    fn from(ts: Vec<TaskInstance>) -> Self {
        ParamValue::TaskList(ts)
    }
}
