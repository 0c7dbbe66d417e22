use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Post, PostChanges, PostFilter, PostQuery};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity. Unique violations surface as `RepoError::Constraint`.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID. Returns `false` when nothing was removed.
    async fn delete(&self, id: ID) -> Result<bool, RepoError>;
}

/// Post repository.
///
/// `apply_changes`, `toggle_like` and `increment_views` must each be a single
/// atomic store operation; they return `None` when the post does not exist.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// One page of matching posts, sorted on `created_at`.
    async fn find(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError>;

    /// Number of posts matching `filter`, ignoring pagination.
    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError>;

    /// Number of posts created at or after `since`.
    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<u64, RepoError>;

    async fn apply_changes(&self, id: Uuid, changes: PostChanges)
    -> Result<Option<Post>, RepoError>;

    /// Add `user_id` to the likes if absent, remove it otherwise.
    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<Post>, RepoError>;

    async fn increment_views(&self, id: Uuid) -> Result<Option<Post>, RepoError>;
}
