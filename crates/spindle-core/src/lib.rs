//! spindle-core
//!
//! Task-definition building blocks: parameters that embed other task instances,
//! and blob targets with optimistic-concurrency metadata updates.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（TaskFamily, BlobUri, Metageneration, errors）
//! - **ports**: 抽象化レイヤー（ParameterCodec, ObjectStore, Target, MutableMetadataTarget）
//! - **task**: タスククラス・インスタンス・TaskRegistry
//! - **params**: パラメータ型（プリミティブ、Dict、タスク参照）と layered encoding
//! - **app**: CodecBuilder / TaskCodec（起動時のワイヤリング）
//! - **target**: MetadataBlobTarget
//! - **impls**: 実装（InMemoryObjectStore など開発用）
//! - **config**: codec の設定

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod params;
pub mod ports;
pub mod target;
pub mod task;

pub use app::{BuildError, CodecBuilder, TaskCodec};
pub use config::{CodecConfig, SpindleConfig, UnknownKeyPolicy};
pub use target::MetadataBlobTarget;
