//! MetadataBlobTarget - カスタムメタデータを更新できる Blob Target
//!
//! # set_metadata のフロー
//! 1. URI から bucket / object を解決
//! 2. ObjectStore から現在のオブジェクトを取得
//! 3. metageneration を読む
//! 4. メタデータを丸ごと置き換え（マージしない）
//! 5. `if_metageneration_match` 付きで条件付き書き込み
//!
//! 2〜5 の間に他の書き込みが入ると precondition エラーになり、そのまま呼び出し元へ返します。
//! リトライするかどうかは呼び出し側が `TargetError::is_precondition_failure` で判断します。

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::blob::{BlobUri, Metadata};
use crate::domain::errors::{StoreError, TargetError};
use crate::ports::{MutableMetadataTarget, ObjectStore, Target};

pub struct MetadataBlobTarget<S> {
    path: String,
    store: Arc<S>,
}

impl<S: ObjectStore> MetadataBlobTarget<S> {
    pub fn new(path: impl Into<String>, store: Arc<S>) -> Self {
        Self {
            path: path.into(),
            store,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn blob(&self) -> Result<BlobUri, TargetError> {
        BlobUri::parse(&self.path)
    }

    /// 現在のメタデータ
    pub async fn metadata(&self) -> Result<Metadata, TargetError> {
        let blob = self.blob()?;
        Ok(self.store.fetch(&blob).await?.metadata)
    }
}

#[async_trait]
impl<S: ObjectStore> Target for MetadataBlobTarget<S> {
    async fn exists(&self) -> Result<bool, TargetError> {
        let blob = self.blob()?;
        Ok(self.store.exists(&blob).await?)
    }
}

#[async_trait]
impl<S: ObjectStore> MutableMetadataTarget for MetadataBlobTarget<S> {
    async fn set_metadata(&self, metadata: Metadata) -> Result<(), TargetError> {
        let blob = self.blob()?;
        let object = self.store.fetch(&blob).await?;
        let precondition = object.metageneration;
        debug!(
            bucket = blob.bucket(),
            object = blob.object(),
            metageneration = precondition.get(),
            "patching blob metadata"
        );

        let keys = metadata.len();
        let next = match self.store.patch_metadata(&blob, metadata, precondition).await {
            Ok(next) => next,
            Err(err @ StoreError::PreconditionFailed { .. }) => {
                warn!(blob = %blob, error = %err, "concurrent metadata update detected");
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        };
        info!(
            blob = %blob,
            keys,
            metageneration = next.get(),
            "blob metadata updated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blob::{Metageneration, StoredObject};
    use crate::impls::InMemoryObjectStore;

    const URI: &str = "gs://bucket/models/output.pkl";

    fn metadata(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn store_with_object() -> Arc<InMemoryObjectStore> {
        let store = Arc::new(InMemoryObjectStore::new());
        store
            .put_object(&BlobUri::parse(URI).unwrap(), b"model".to_vec())
            .unwrap();
        store
    }

    /// fetch の直後に別の書き手がメタデータを書き換える ObjectStore
    struct RacingStore {
        inner: InMemoryObjectStore,
        rival: Metadata,
    }

    #[async_trait]
    impl ObjectStore for RacingStore {
        async fn fetch(&self, blob: &BlobUri) -> Result<StoredObject, StoreError> {
            let snapshot = self.inner.fetch(blob).await?;
            self.inner
                .patch_metadata(blob, self.rival.clone(), snapshot.metageneration)
                .await?;
            Ok(snapshot)
        }

        async fn exists(&self, blob: &BlobUri) -> Result<bool, StoreError> {
            self.inner.exists(blob).await
        }

        async fn patch_metadata(
            &self,
            blob: &BlobUri,
            metadata: Metadata,
            if_metageneration_match: Metageneration,
        ) -> Result<Metageneration, StoreError> {
            self.inner
                .patch_metadata(blob, metadata, if_metageneration_match)
                .await
        }
    }

    #[tokio::test]
    async fn set_metadata_replaces_and_advances_generation() {
        let store = store_with_object();
        let blob = BlobUri::parse(URI).unwrap();
        let before = store.fetch(&blob).await.unwrap().metageneration;

        let target = MetadataBlobTarget::new(URI, store.clone());
        target
            .set_metadata(metadata(&[("a", "1"), ("b", "2")]))
            .await
            .unwrap();
        target.set_metadata(metadata(&[("c", "3")])).await.unwrap();

        let after = store.fetch(&blob).await.unwrap();
        // replaced, not merged
        assert_eq!(after.metadata, metadata(&[("c", "3")]));
        assert!(after.metageneration > before);
        assert_eq!(target.metadata().await.unwrap(), metadata(&[("c", "3")]));
    }

    #[tokio::test]
    async fn set_metadata_conflict_keeps_concurrent_write() {
        let inner = InMemoryObjectStore::new();
        let blob = BlobUri::parse(URI).unwrap();
        inner.put_object(&blob, b"model".to_vec()).unwrap();
        let store = Arc::new(RacingStore {
            inner,
            rival: metadata(&[("owner", "other-writer")]),
        });

        let target = MetadataBlobTarget::new(URI, store.clone());
        let err = target
            .set_metadata(metadata(&[("owner", "me")]))
            .await
            .unwrap_err();

        assert!(err.is_precondition_failure(), "{err}");
        assert!(matches!(
            err,
            TargetError::Store(StoreError::PreconditionFailed { expected, actual })
                if expected == Metageneration::INITIAL && actual == Metageneration::new(2)
        ));
        let object = store.inner.fetch(&blob).await.unwrap();
        assert_eq!(object.metadata, metadata(&[("owner", "other-writer")]));
    }

    #[tokio::test]
    async fn set_metadata_requires_existing_object() {
        let store = Arc::new(InMemoryObjectStore::new());
        let target = MetadataBlobTarget::new(URI, store);
        let err = target.set_metadata(Metadata::new()).await.unwrap_err();
        assert!(matches!(err, TargetError::Store(StoreError::NotFound(_))));
        assert!(!target.exists().await.unwrap());
    }

    #[tokio::test]
    async fn invalid_uri_is_reported_before_touching_the_store() {
        let target = MetadataBlobTarget::new("gs://bucket-only", store_with_object());
        let err = target.set_metadata(Metadata::new()).await.unwrap_err();
        assert!(matches!(err, TargetError::InvalidUri { .. }));
    }

    #[tokio::test]
    async fn exists_and_blob_resolution() {
        let target = MetadataBlobTarget::new(URI, store_with_object());
        assert!(target.exists().await.unwrap());
        let blob = target.blob().unwrap();
        assert_eq!(blob.bucket(), "bucket");
        assert_eq!(blob.object(), "models/output.pkl");
        assert_eq!(target.path(), URI);
    }
}
