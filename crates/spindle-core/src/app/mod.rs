//! App - アプリケーション層
//!
//! # 主要コンポーネント
//! - **CodecBuilder**: TaskRegistry の構築と起動時検証
//! - **TaskCodec**: トップレベルのタスク参照の encode / decode

pub mod builder;
pub mod codec;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, CodecBuilder};
pub use self::codec::TaskCodec;
