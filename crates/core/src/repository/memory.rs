use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ContentRepository, ImageUpdate, RepositoryError};
use crate::record::{ContentKind, ContentRecord, RecordId};

/// Process-local repository used by tests and database-less development runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    records: Arc<RwLock<HashMap<RecordId, ContentRecord>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    async fn find_all(&self, kind: ContentKind) -> Result<Vec<ContentRecord>, RepositoryError> {
        let records = self.records.read().await;
        let mut found: Vec<ContentRecord> = records
            .values()
            .filter(|r| r.kind == kind)
            .cloned()
            .collect();
        found.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(found)
    }

    async fn find_one(
        &self,
        kind: ContentKind,
        id: RecordId,
    ) -> Result<Option<ContentRecord>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.get(&id).filter(|r| r.kind == kind).cloned())
    }

    async fn create(&self, record: &ContentRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(RepositoryError::Conflict {
                kind: record.kind,
                id: record.id,
            });
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn update(
        &self,
        record: &ContentRecord,
        image: ImageUpdate,
    ) -> Result<Option<ContentRecord>, RepositoryError> {
        let mut records = self.records.write().await;
        let Some(stored) = records
            .get_mut(&record.id)
            .filter(|stored| stored.kind == record.kind)
        else {
            return Ok(None);
        };

        let mut body = record.body.clone();
        if image == ImageUpdate::Keep {
            if let Some(current) = stored.image().cloned() {
                body.attach_image(current).map_err(|e| RepositoryError::Corrupt {
                    kind: record.kind.to_string(),
                    id: record.id.to_string(),
                    reason: e.to_string(),
                })?;
            }
        }
        stored.body = body;
        Ok(Some(stored.clone()))
    }

    async fn delete(
        &self,
        kind: ContentKind,
        id: RecordId,
    ) -> Result<Option<ContentRecord>, RepositoryError> {
        let mut records = self.records.write().await;
        if records.get(&id).is_some_and(|r| r.kind == kind) {
            Ok(records.remove(&id))
        } else {
            Ok(None)
        }
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Locator;
    use crate::record::{Rating, RecordBody, Service, Testimonial};

    fn service(image: &str) -> ContentRecord {
        ContentRecord::new(RecordBody::Service(Service {
            title: "Albums".into(),
            description: "Printed albums".into(),
            image: Locator::new(image),
        }))
    }

    fn testimonial(name: &str) -> ContentRecord {
        ContentRecord::new(RecordBody::Testimonial(Testimonial {
            name: name.into(),
            content: String::new(),
            rating: Rating::parse("5").unwrap(),
        }))
    }

    #[tokio::test]
    async fn find_all_is_newest_first_and_scoped_by_kind() {
        let repo = InMemoryRepository::new();
        let first = testimonial("first");
        let second = testimonial("second");
        repo.create(&first).await.unwrap();
        repo.create(&second).await.unwrap();

        let listed = repo.find_all(ContentKind::Testimonial).await.unwrap();
        assert_eq!(listed, vec![second, first]);
        assert!(repo.find_all(ContentKind::Video).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lookups_respect_kind() {
        let repo = InMemoryRepository::new();
        let record = testimonial("a");
        repo.create(&record).await.unwrap();

        assert!(repo
            .find_one(ContentKind::Video, record.id)
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .delete(ContentKind::Video, record.id)
            .await
            .unwrap()
            .is_none());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn update_keeps_envelope() {
        let repo = InMemoryRepository::new();
        let record = testimonial("before");
        repo.create(&record).await.unwrap();

        let mut changed = testimonial("after");
        changed.id = record.id;
        let returned = repo
            .update(&changed, ImageUpdate::Keep)
            .await
            .unwrap()
            .unwrap();

        let stored = repo
            .find_one(ContentKind::Testimonial, record.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, returned);
        assert_eq!(stored.created_at, record.created_at);
        assert_eq!(stored.body, changed.body);

        let ghost = testimonial("ghost");
        assert!(repo
            .update(&ghost, ImageUpdate::Keep)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn text_update_does_not_resurrect_a_replaced_image() {
        let repo = InMemoryRepository::new();
        let record = service("/uploads/1-first00000.png");
        repo.create(&record).await.unwrap();

        // Read before another writer swaps the image.
        let mut stale = record.clone();
        let mut swapped = record.clone();
        swapped
            .body
            .attach_image(Locator::new("/uploads/2-second0000.png"))
            .unwrap();
        repo.update(&swapped, ImageUpdate::Replace).await.unwrap();

        if let RecordBody::Service(s) = &mut stale.body {
            s.title = "Renamed".into();
        }
        let stored = repo
            .update(&stale, ImageUpdate::Keep)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            stored.image(),
            Some(&Locator::new("/uploads/2-second0000.png"))
        );
        let RecordBody::Service(s) = &stored.body else {
            panic!("expected service");
        };
        assert_eq!(s.title, "Renamed");
    }

    #[tokio::test]
    async fn duplicate_create_conflicts() {
        let repo = InMemoryRepository::new();
        let record = testimonial("a");
        repo.create(&record).await.unwrap();
        assert!(matches!(
            repo.create(&record).await,
            Err(RepositoryError::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn delete_returns_removed_record() {
        let repo = InMemoryRepository::new();
        let record = testimonial("a");
        repo.create(&record).await.unwrap();
        let removed = repo
            .delete(ContentKind::Testimonial, record.id)
            .await
            .unwrap();
        assert_eq!(removed, Some(record));
        assert!(repo.is_empty().await);
    }
}
