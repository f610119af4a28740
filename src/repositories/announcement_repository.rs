use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::announcement::{board_order, AnnouncementFilter, TARGET_ALL},
    models::domain::Announcement,
};

#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    async fn create(&self, announcement: Announcement) -> AppResult<Announcement>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Announcement>>;
    /// Matching announcements, pinned first and then newest first.
    async fn find_filtered(&self, filter: &AnnouncementFilter) -> AppResult<Vec<Announcement>>;
    async fn update(&self, announcement: Announcement) -> AppResult<Announcement>;
    async fn delete(&self, id: &str) -> AppResult<bool>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoAnnouncementRepository {
    collection: Collection<Announcement>,
}

impl MongoAnnouncementRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(collections::ANNOUNCEMENTS);
        Self { collection }
    }
}

fn filter_document(filter: &AnnouncementFilter) -> Document {
    let mut clauses: Vec<Document> = Vec::new();

    if let Some(term) = filter.search_term() {
        let pattern = regex::escape(term);
        clauses.push(doc! {
            "$or": [
                { "title": { "$regex": &pattern, "$options": "i" } },
                { "body": { "$regex": &pattern, "$options": "i" } },
            ]
        });
    }
    for (field, value) in [
        ("target_year", filter.year()),
        ("target_stream", filter.stream()),
        ("target_branch", filter.branch()),
    ] {
        if let Some(value) = value {
            clauses.push(doc! { field: { "$in": [TARGET_ALL, value] } });
        }
    }
    if let Some(priority) = filter.priority() {
        clauses.push(doc! { "priority": priority });
    }

    if clauses.is_empty() {
        doc! {}
    } else {
        doc! { "$and": clauses }
    }
}

#[async_trait]
impl AnnouncementRepository for MongoAnnouncementRepository {
    async fn create(&self, announcement: Announcement) -> AppResult<Announcement> {
        self.collection.insert_one(&announcement).await?;
        Ok(announcement)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Announcement>> {
        let announcement = self.collection.find_one(doc! { "id": id }).await?;
        Ok(announcement)
    }

    async fn find_filtered(&self, filter: &AnnouncementFilter) -> AppResult<Vec<Announcement>> {
        let cursor = self
            .collection
            .find(filter_document(filter))
            .sort(doc! { "is_pinned": -1, "created_at": -1 })
            .await?;
        let mut announcements: Vec<Announcement> = cursor.try_collect().await?;
        // created_at is stored as a string; re-sort on the parsed timestamps
        announcements.sort_by(board_order);
        Ok(announcements)
    }

    async fn update(&self, announcement: Announcement) -> AppResult<Announcement> {
        let result = self
            .collection
            .replace_one(doc! { "id": &announcement.id }, &announcement)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::not_found("Announcement", &announcement.id));
        }
        Ok(announcement)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let board_index = IndexModel::builder()
            .keys(doc! { "is_pinned": -1, "created_at": -1 })
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(board_index).await?;
        log::info!("Created indexes for announcements collection");
        Ok(())
    }
}
