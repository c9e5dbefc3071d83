//! InMemoryObjectStore - 開発・テスト用の Blob ストレージ
//!
//! # 学習ポイント
//! - Mutex による precondition 検査と書き込みの原子化
//! - await を跨いでロックを保持しない（ロックは同期的な区間だけ）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::blob::{BlobUri, Metadata, Metageneration, StoredObject};
use crate::domain::errors::StoreError;
use crate::ports::ObjectStore;

#[derive(Debug, Clone)]
struct ObjectEntry {
    data: Vec<u8>,
    metadata: Metadata,
    metageneration: Metageneration,
    updated: DateTime<Utc>,
}

impl ObjectEntry {
    fn snapshot(&self) -> StoredObject {
        StoredObject {
            metadata: self.metadata.clone(),
            metageneration: self.metageneration,
            size: self.data.len(),
            updated: self.updated,
        }
    }
}

/// InMemoryObjectStore は開発用の ObjectStore
///
/// # 使用例
/// ```ignore
/// let store = InMemoryObjectStore::new();
/// store.put_object(&BlobUri::parse("gs://bucket/out.pkl")?, b"payload".to_vec())?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<BlobUri, ObjectEntry>>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<BlobUri, ObjectEntry>>, StoreError> {
        self.objects
            .lock()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))
    }

    /// オブジェクトを作成または上書き
    ///
    /// 内容を書き換えると新しい世代になるため、metageneration は初期値に戻り
    /// メタデータは空になります。
    pub fn put_object(&self, blob: &BlobUri, data: impl Into<Vec<u8>>) -> Result<(), StoreError> {
        let mut objects = self.lock()?;
        objects.insert(
            blob.clone(),
            ObjectEntry {
                data: data.into(),
                metadata: Metadata::new(),
                metageneration: Metageneration::INITIAL,
                updated: Utc::now(),
            },
        );
        Ok(())
    }

    pub fn delete_object(&self, blob: &BlobUri) -> Result<bool, StoreError> {
        Ok(self.lock()?.remove(blob).is_some())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn fetch(&self, blob: &BlobUri) -> Result<StoredObject, StoreError> {
        self.lock()?
            .get(blob)
            .map(ObjectEntry::snapshot)
            .ok_or_else(|| StoreError::NotFound(blob.to_string()))
    }

    async fn exists(&self, blob: &BlobUri) -> Result<bool, StoreError> {
        Ok(self.lock()?.contains_key(blob))
    }

    async fn patch_metadata(
        &self,
        blob: &BlobUri,
        metadata: Metadata,
        if_metageneration_match: Metageneration,
    ) -> Result<Metageneration, StoreError> {
        let mut objects = self.lock()?;
        let entry = objects
            .get_mut(blob)
            .ok_or_else(|| StoreError::NotFound(blob.to_string()))?;

        if entry.metageneration != if_metageneration_match {
            return Err(StoreError::PreconditionFailed {
                expected: if_metageneration_match,
                actual: entry.metageneration,
            });
        }

        entry.metadata = metadata;
        entry.metageneration = entry.metageneration.next();
        entry.updated = Utc::now();
        Ok(entry.metageneration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob() -> BlobUri {
        BlobUri::parse("gs://bucket/path/object.bin").unwrap()
    }

    fn metadata(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_put_and_fetch() {
        let store = InMemoryObjectStore::new();
        store.put_object(&blob(), b"hello".to_vec()).unwrap();

        let object = store.fetch(&blob()).await.unwrap();
        assert_eq!(object.size, 5);
        assert_eq!(object.metageneration, Metageneration::INITIAL);
        assert!(object.metadata.is_empty());
        assert!(store.exists(&blob()).await.unwrap());
    }

    #[tokio::test]
    async fn test_fetch_missing() {
        let store = InMemoryObjectStore::new();
        let err = store.fetch(&blob()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(!store.exists(&blob()).await.unwrap());
    }

    #[tokio::test]
    async fn test_patch_with_matching_precondition() {
        let store = InMemoryObjectStore::new();
        store.put_object(&blob(), Vec::new()).unwrap();

        let next = store
            .patch_metadata(&blob(), metadata(&[("k", "v")]), Metageneration::INITIAL)
            .await
            .unwrap();
        assert_eq!(next, Metageneration::new(2));

        let object = store.fetch(&blob()).await.unwrap();
        assert_eq!(object.metadata, metadata(&[("k", "v")]));
        assert_eq!(object.metageneration, next);
    }

    #[tokio::test]
    async fn test_patch_with_stale_precondition() {
        let store = InMemoryObjectStore::new();
        store.put_object(&blob(), Vec::new()).unwrap();
        store
            .patch_metadata(&blob(), metadata(&[("first", "1")]), Metageneration::INITIAL)
            .await
            .unwrap();

        let err = store
            .patch_metadata(&blob(), metadata(&[("second", "2")]), Metageneration::INITIAL)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::PreconditionFailed { expected, actual }
                if expected == Metageneration::new(1) && actual == Metageneration::new(2)
        ));

        let object = store.fetch(&blob()).await.unwrap();
        assert_eq!(object.metadata, metadata(&[("first", "1")]));
    }

    #[tokio::test]
    async fn test_overwrite_resets_generation() {
        let store = InMemoryObjectStore::new();
        store.put_object(&blob(), Vec::new()).unwrap();
        store
            .patch_metadata(&blob(), metadata(&[("k", "v")]), Metageneration::INITIAL)
            .await
            .unwrap();

        store.put_object(&blob(), b"new".to_vec()).unwrap();
        let object = store.fetch(&blob()).await.unwrap();
        assert_eq!(object.metageneration, Metageneration::INITIAL);
        assert!(object.metadata.is_empty());
        assert_eq!(store.len().unwrap(), 1);
        assert!(store.delete_object(&blob()).unwrap());
    }
}
