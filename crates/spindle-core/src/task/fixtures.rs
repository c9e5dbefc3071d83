//! テスト用のタスククラス群
//!
//! - `Foo(x: int, y: str = "a", note: str = "" [insignificant])`
//! - `SpecialFoo` is-a `Foo`
//! - `Bar(inner: task)`
//! - `Baz(inner: task<Bar>)`
//! - `Pipeline(steps: list<task<Foo>>, verbose: bool, ratio: float, options: dict)`

use std::sync::Arc;

use super::class::{ParamSpec, TaskClass, TaskClassBuilder};
use super::instance::TaskInstance;
use super::registry::TaskRegistry;
use super::value::ParamValue;
use crate::params::{
    BoolParameter, DictParameter, FloatParameter, IntParameter, ListTaskReferenceParameter,
    StrParameter, TaskReferenceParameter,
};

fn foo_params(builder: TaskClassBuilder) -> TaskClassBuilder {
    builder
        .param(ParamSpec::new("x", IntParameter))
        .param(ParamSpec::new("y", StrParameter).with_default("a"))
        .param(ParamSpec::new("note", StrParameter).with_default("").insignificant())
}

pub fn foo_class() -> Arc<TaskClass> {
    foo_params(TaskClass::builder("Foo")).build()
}

pub fn special_foo_class() -> Arc<TaskClass> {
    foo_params(TaskClass::builder("SpecialFoo").base("Foo")).build()
}

pub fn bar_class() -> Arc<TaskClass> {
    TaskClass::builder("Bar")
        .param(ParamSpec::new("inner", TaskReferenceParameter::new()))
        .build()
}

pub fn baz_class() -> Arc<TaskClass> {
    TaskClass::builder("Baz")
        .param(ParamSpec::new("inner", TaskReferenceParameter::bounded("Bar")))
        .build()
}

pub fn pipeline_class() -> Arc<TaskClass> {
    TaskClass::builder("Pipeline")
        .param(ParamSpec::new("steps", ListTaskReferenceParameter::bounded("Foo")))
        .param(ParamSpec::new("verbose", BoolParameter).with_default(false))
        .param(ParamSpec::new("ratio", FloatParameter).with_default(0.5))
        .param(
            ParamSpec::new("options", DictParameter)
                .with_default(ParamValue::Dict(serde_json::json!({}))),
        )
        .build()
}

pub fn registry() -> TaskRegistry {
    let mut registry = TaskRegistry::new();
    for class in [
        foo_class(),
        special_foo_class(),
        bar_class(),
        baz_class(),
        pipeline_class(),
    ] {
        registry.register(class).unwrap();
    }
    registry
}

pub fn foo(x: i64, y: &str) -> TaskInstance {
    foo_class()
        .instantiate([("x".to_string(), x.into()), ("y".to_string(), y.into())])
        .unwrap()
}

pub fn foo_noted(x: i64, y: &str, note: &str) -> TaskInstance {
    foo_class()
        .instantiate([
            ("x".to_string(), x.into()),
            ("y".to_string(), y.into()),
            ("note".to_string(), note.into()),
        ])
        .unwrap()
}

pub fn special_foo(x: i64, y: &str) -> TaskInstance {
    special_foo_class()
        .instantiate([("x".to_string(), x.into()), ("y".to_string(), y.into())])
        .unwrap()
}

pub fn bar(inner: TaskInstance) -> TaskInstance {
    bar_class()
        .instantiate([("inner".to_string(), inner.into())])
        .unwrap()
}

pub fn baz(inner: TaskInstance) -> TaskInstance {
    baz_class()
        .instantiate([("inner".to_string(), inner.into())])
        .unwrap()
}

pub fn pipeline(steps: Vec<TaskInstance>) -> TaskInstance {
    pipeline_class()
        .instantiate([("steps".to_string(), steps.into())])
        .unwrap()
}
