//! Ports - 抽象化レイヤー
//!
//! 各 trait は外部システム（Blob ストレージ、ホスト側のパラメータ機構）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - ObjectStore は Blob ストレージクライアントの最小能力（fetch / conditional patch）
//! - Target / MutableMetadataTarget はタスク出力先の抽象化
//! - ParameterCodec はパラメータ値と文字列表現の相互変換

pub mod metadata_target;
pub mod object_store;
pub mod parameter_codec;

// 主要な trait を再エクスポート
pub use self::metadata_target::{MutableMetadataTarget, Target};
pub use self::object_store::ObjectStore;
pub use self::parameter_codec::{CliArity, ParameterCodec};
