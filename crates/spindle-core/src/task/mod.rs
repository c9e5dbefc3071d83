//! Task - タスククラス・インスタンス・レジストリ
//!
//! # 二層構造
//! - **宣言（TaskClass）**: family 名とパラメータ宣言（`ParamSpec`）
//! - **値（TaskInstance）**: パラメータ値が解決済みのインスタンス
//!
//! `TaskRegistry` は serialize された family 名から TaskClass を引くための明示的な対応表です。

pub mod class;
pub mod instance;
pub mod registry;
pub mod value;

#[cfg(test)]
pub(crate) mod fixtures;

// 主要な型を再エクスポート
pub use self::class::{ParamSpec, TaskClass, TaskClassBuilder};
pub use self::instance::TaskInstance;
pub use self::registry::{RegistryError, TaskRegistry};
pub use self::value::ParamValue;
