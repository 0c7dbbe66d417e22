//! In-memory post repository - used when no database is configured and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use wayfarer_core::domain::{Post, PostChanges, PostFilter, PostQuery, SortOrder};
use wayfarer_core::error::RepoError;
use wayfarer_core::ports::{BaseRepository, PostRepository};

/// Post store backed by a `HashMap` behind an async `RwLock`.
///
/// Every mutation runs under the write lock, so toggles and view increments
/// are atomic. Note: data is lost on process restart.
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    /// Title and slug must be unique across posts other than `except`.
    fn check_unique(
        store: &HashMap<Uuid, Post>,
        title: &str,
        slug: &str,
        except: Option<Uuid>,
    ) -> Result<(), RepoError> {
        let clash = store
            .values()
            .filter(|p| Some(p.id) != except)
            .find(|p| p.title == title || p.slug == slug);

        match clash {
            Some(existing) if existing.title == title => Err(RepoError::Constraint(format!(
                "duplicate title: {title}"
            ))),
            Some(_) => Err(RepoError::Constraint(format!("duplicate slug: {slug}"))),
            None => Ok(()),
        }
    }

    async fn mutate<F>(&self, id: Uuid, apply: F) -> Result<Option<Post>, RepoError>
    where
        F: FnOnce(&mut Post) + Send,
    {
        let mut store = self.store.write().await;
        Ok(store.get_mut(&id).map(|post| {
            apply(post);
            post.updated_at = Utc::now();
            post.clone()
        }))
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&post.id) {
            return Err(RepoError::Constraint(format!("duplicate id: {}", post.id)));
        }
        Self::check_unique(&store, &post.title, &post.slug, None)?;

        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.store.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut posts: Vec<&Post> = store
            .values()
            .filter(|p| query.filter.matches(p))
            .collect();

        posts.sort_by_key(|p| p.created_at);
        if query.order == SortOrder::Desc {
            posts.reverse();
        }

        Ok(posts
            .into_iter()
            .skip(usize::try_from(query.start_index).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().filter(|p| p.created_at >= since).count() as u64)
    }

    async fn apply_changes(
        &self,
        id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError> {
        let mut store = self.store.write().await;
        let Some(current) = store.get(&id) else {
            return Ok(None);
        };

        if let Some(title) = &changes.title {
            Self::check_unique(&store, title, &current.slug, Some(id))?;
        }

        Ok(store.get_mut(&id).map(|post| {
            changes.apply_to(post);
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<Post>, RepoError> {
        self.mutate(id, |post| {
            post.likes.toggle(user_id);
        })
        .await
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        self.mutate(id, |post| post.number_of_views += 1).await
    }
}
