use async_trait::async_trait;
use chrono::NaiveDate;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::{collections, Database}, errors::AppResult, models::domain::LibraryRecord};

#[async_trait]
pub trait LibraryRecordRepository: Send + Sync {
    async fn create(&self, record: LibraryRecord) -> AppResult<LibraryRecord>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<LibraryRecord>>;
    async fn find_by_issuer(&self, faculty_id: &str) -> AppResult<Vec<LibraryRecord>>;
    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<LibraryRecord>>;
    /// Returns false when the record was already returned.
    async fn mark_returned(&self, id: &str, returned_on: NaiveDate) -> AppResult<bool>;
    /// Puts returned records back on loan; returns how many changed.
    async fn unmark_returned(&self, ids: &[String]) -> AppResult<u64>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoLibraryRecordRepository {
    collection: Collection<LibraryRecord>,
}

impl MongoLibraryRecordRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::LIBRARY_RECORDS);
        Self { collection }
    }
}

#[async_trait]
impl LibraryRecordRepository for MongoLibraryRecordRepository {
    async fn create(&self, record: LibraryRecord) -> AppResult<LibraryRecord> {
        self.collection.insert_one(&record).await?;
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<LibraryRecord>> {
        let record = self.collection.find_one(doc! { "id": id }).await?;
        Ok(record)
    }

    async fn find_by_issuer(&self, faculty_id: &str) -> AppResult<Vec<LibraryRecord>> {
        let cursor = self
            .collection
            .find(doc! { "issued_by": faculty_id })
            .sort(doc! { "created_at": -1 })
            .await?;
        let records: Vec<LibraryRecord> = cursor.try_collect().await?;
        Ok(records)
    }

    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<LibraryRecord>> {
        let cursor = self
            .collection
            .find(doc! { "student_id": student_id })
            .sort(doc! { "due_date": 1 })
            .await?;
        let records: Vec<LibraryRecord> = cursor.try_collect().await?;
        Ok(records)
    }

    async fn mark_returned(&self, id: &str, returned_on: NaiveDate) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "id": id, "is_returned": false },
                doc! { "$set": {
                    "is_returned": true,
                    "returned_date": returned_on.format("%Y-%m-%d").to_string(),
                } },
            )
            .await?;
        Ok(result.modified_count > 0)
    }

    async fn unmark_returned(&self, ids: &[String]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = self
            .collection
            .update_many(
                doc! { "id": { "$in": ids }, "is_returned": true },
                doc! { "$set": { "is_returned": false, "returned_date": null } },
            )
            .await?;
        Ok(result.modified_count)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let issuer_index = IndexModel::builder()
            .keys(doc! { "issued_by": 1 })
            .build();
        let student_index = IndexModel::builder()
            .keys(doc! { "student_id": 1 })
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(issuer_index).await?;
        self.collection.create_index(student_index).await?;
        log::info!("Created indexes for library_records collection");
        Ok(())
    }
}
