use async_trait::async_trait;
use mongodb::{bson::doc, Collection, IndexModel};

use crate::{db::{collections, Database}, errors::AppResult, models::domain::StudyDocument};

#[async_trait]
pub trait StudyDocumentRepository: Send + Sync {
    async fn create(&self, document: StudyDocument) -> AppResult<StudyDocument>;
    /// The most recent upload wins.
    async fn find_latest_for_owner(&self, owner_id: &str) -> AppResult<Option<StudyDocument>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoStudyDocumentRepository {
    collection: Collection<StudyDocument>,
}

impl MongoStudyDocumentRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::STUDY_DOCUMENTS);
        Self { collection }
    }
}

#[async_trait]
impl StudyDocumentRepository for MongoStudyDocumentRepository {
    async fn create(&self, document: StudyDocument) -> AppResult<StudyDocument> {
        self.collection.insert_one(&document).await?;
        Ok(document)
    }

    async fn find_latest_for_owner(&self, owner_id: &str) -> AppResult<Option<StudyDocument>> {
        let document = self
            .collection
            .find_one(doc! { "owner_id": owner_id })
            .sort(doc! { "uploaded_at": -1 })
            .await?;
        Ok(document)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let model = IndexModel::builder()
            .keys(doc! { "owner_id": 1, "uploaded_at": -1 })
            .build();
        self.collection.create_index(model).await?;
        log::info!("Created index on study_documents.(owner_id, uploaded_at)");
        Ok(())
    }
}
