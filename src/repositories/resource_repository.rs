use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::AppResult,
    models::domain::{resource::Subject, Resource},
};

#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn create(&self, resource: Resource) -> AppResult<Resource>;
    async fn count_by_subject(&self, subject: Subject) -> AppResult<u64>;
    /// Newest upload first.
    async fn find_by_subject(&self, subject: Subject) -> AppResult<Vec<Resource>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoResourceRepository {
    collection: Collection<Resource>,
}

impl MongoResourceRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::RESOURCES);
        Self { collection }
    }
}

#[async_trait]
impl ResourceRepository for MongoResourceRepository {
    async fn create(&self, resource: Resource) -> AppResult<Resource> {
        self.collection.insert_one(&resource).await?;
        Ok(resource)
    }

    async fn count_by_subject(&self, subject: Subject) -> AppResult<u64> {
        let count = self
            .collection
            .count_documents(doc! { "subject": subject.code() })
            .await?;
        Ok(count)
    }

    async fn find_by_subject(&self, subject: Subject) -> AppResult<Vec<Resource>> {
        let cursor = self
            .collection
            .find(doc! { "subject": subject.code() })
            .sort(doc! { "uploaded_at": -1 })
            .await?;
        let resources: Vec<Resource> = cursor.try_collect().await?;
        Ok(resources)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let subject_index = IndexModel::builder()
            .keys(doc! { "subject": 1, "uploaded_at": -1 })
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(subject_index).await?;
        log::info!("Created indexes for {} collection", collections::RESOURCES);
        Ok(())
    }
}
