use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use log::info;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::AppResult,
    models::domain::RefreshToken,
};

/// Persisted refresh tokens, keyed by the SHA-256 of the raw token.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn create(&self, token: RefreshToken) -> AppResult<RefreshToken>;
    async fn find_by_token_hash(&self, hash: &str) -> AppResult<Option<RefreshToken>>;
    /// Revokes the token if it is still active. Returns false for unknown or
    /// already revoked tokens, so only one of two racing rotations succeeds.
    async fn revoke(&self, hash: &str) -> AppResult<bool>;
    async fn revoke_all_for_user(&self, user_id: &str) -> AppResult<u64>;
    async fn delete_expired(&self) -> AppResult<u64>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoRefreshTokenRepository {
    collection: Collection<RefreshToken>,
}

impl MongoRefreshTokenRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_collection(collections::REFRESH_TOKENS),
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for MongoRefreshTokenRepository {
    async fn create(&self, token: RefreshToken) -> AppResult<RefreshToken> {
        self.collection.insert_one(&token).await?;
        Ok(token)
    }

    async fn find_by_token_hash(&self, hash: &str) -> AppResult<Option<RefreshToken>> {
        Ok(self
            .collection
            .find_one(doc! { "token_hash": hash })
            .await?)
    }

    async fn revoke(&self, hash: &str) -> AppResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! { "token_hash": hash, "revoked": false },
                doc! { "$set": { "revoked": true } },
            )
            .await?;
        Ok(result.modified_count == 1)
    }

    async fn revoke_all_for_user(&self, user_id: &str) -> AppResult<u64> {
        let result = self
            .collection
            .update_many(
                doc! { "user_id": user_id, "revoked": false },
                doc! { "$set": { "revoked": true } },
            )
            .await?;
        Ok(result.modified_count)
    }

    async fn delete_expired(&self) -> AppResult<u64> {
        // expires_at is stored as an RFC 3339 string in UTC, so string order is time order
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::AutoSi, true);
        let result = self
            .collection
            .delete_many(doc! { "expires_at": { "$lt": now } })
            .await?;
        Ok(result.deleted_count)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let by_hash = IndexModel::builder()
            .keys(doc! { "token_hash": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("token_hash_unique".to_string())
                    .build(),
            )
            .build();
        let by_user = IndexModel::builder()
            .keys(doc! { "user_id": 1, "revoked": 1 })
            .build();

        self.collection.create_indexes([by_hash, by_user]).await?;
        info!("Ensured indexes on {}", collections::REFRESH_TOKENS);
        Ok(())
    }
}
