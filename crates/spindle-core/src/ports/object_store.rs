//! ObjectStore port - Blob ストレージ（GCS/S3/InMemory）
//!
//! クライアントの認証やリトライは実装側の責務です。

use async_trait::async_trait;

use crate::domain::blob::{BlobUri, Metadata, Metageneration, StoredObject};
use crate::domain::errors::StoreError;

/// ObjectStore はオブジェクトの取得と条件付きメタデータ更新を提供
///
/// # 設計原則
/// - `patch_metadata` は precondition の検査と書き込みを原子的に行う
/// - precondition 不一致は `StoreError::PreconditionFailed` で返す（リトライしない）
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 現在のオブジェクトを取得（存在しなければ `StoreError::NotFound`）
    async fn fetch(&self, blob: &BlobUri) -> Result<StoredObject, StoreError>;

    async fn exists(&self, blob: &BlobUri) -> Result<bool, StoreError>;

    /// メタデータを丸ごと置き換え、新しい metageneration を返す
    async fn patch_metadata(
        &self,
        blob: &BlobUri,
        metadata: Metadata,
        if_metageneration_match: Metageneration,
    ) -> Result<Metageneration, StoreError>;
}
