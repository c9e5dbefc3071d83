//! Domain - ドメインモデル
//!
//! - **family**: タスククラスの登録名（TaskFamily）
//! - **blob**: Blob の参照とメタデータ（BlobUri, Metageneration）
//! - **errors**: エラー型と分類

pub mod blob;
pub mod errors;
pub mod family;

pub use self::blob::{BlobUri, Metadata, Metageneration, StoredObject};
pub use self::errors::{DecodeError, ParameterError, StoreError, TargetError};
pub use self::family::TaskFamily;
