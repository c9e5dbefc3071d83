//! Target port - タスク出力先の抽象化

use async_trait::async_trait;

use crate::domain::blob::Metadata;
use crate::domain::errors::TargetError;

/// Target はタスクの出力先
#[async_trait]
pub trait Target: Send + Sync {
    async fn exists(&self) -> Result<bool, TargetError>;
}

/// MutableMetadataTarget はカスタムメタデータを更新できる Target
///
/// # 保証
/// - 成功: メタデータは `metadata` で完全に置き換わり、版数が進む
/// - 競合: 他の書き込みが先行した場合は precondition エラーを返す（内部リトライなし）
#[async_trait]
pub trait MutableMetadataTarget: Target {
    async fn set_metadata(&self, metadata: Metadata) -> Result<(), TargetError>;
}
