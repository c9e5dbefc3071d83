//! Impls - 実装（開発用・テスト用）
//!
//! このモジュールには ports の実装を含めます。
//!
//! # 含まれる実装
//! - **InMemoryObjectStore**: 開発用の Blob ストレージ
//!
//! # 本番用実装
//! GCS / S3 クライアントを包む ObjectStore は利用側のクレートで実装します。

pub mod inmem_store;

// 主要な型を再エクスポート
pub use self::inmem_store::InMemoryObjectStore;
