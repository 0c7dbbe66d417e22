//! Post use cases: create, list, like, view, update and delete.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Caller, NewPost, Post, PostChanges, PostQuery, one_month_ago};
use crate::error::{DomainError, RepoError};
use crate::ports::PostRepository;

/// One page of posts plus the counters shown on dashboards.
#[derive(Debug, Clone)]
pub struct PostListing {
    pub posts: Vec<Post>,
    /// Posts matching the filter, regardless of pagination.
    pub total_posts: u64,
    /// Posts created since one month ago, across the whole store.
    pub last_month_posts: u64,
}

/// Stateless post service. Every call goes straight to the repository.
#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: NewPost) -> Result<Post, DomainError> {
        let post = Post::new(input);
        tracing::debug!(slug = %post.slug, user_id = %post.user_id, "Creating post");

        let saved = self.repo.insert(post).await.map_err(|e| match e {
            RepoError::Constraint(_) => {
                DomainError::Duplicate("A post with this title already exists".to_string())
            }
            other => other.into(),
        })?;

        tracing::info!(post_id = %saved.id, user_id = %saved.user_id, "Post created");
        Ok(saved)
    }

    pub async fn list(&self, query: &PostQuery) -> Result<PostListing, DomainError> {
        self.list_at(query, Utc::now()).await
    }

    /// Listing evaluated against a fixed clock.
    pub async fn list_at(
        &self,
        query: &PostQuery,
        now: DateTime<Utc>,
    ) -> Result<PostListing, DomainError> {
        let posts = self.repo.find(query).await?;
        let total_posts = self.repo.count(&query.filter).await?;
        // Global on purpose: the active filter does not scope this counter.
        let last_month_posts = self.repo.count_created_since(one_month_ago(now)).await?;

        Ok(PostListing {
            posts,
            total_posts,
            last_month_posts,
        })
    }

    pub async fn toggle_like(&self, caller: &Caller, post_id: Uuid) -> Result<Post, DomainError> {
        let post = self
            .repo
            .toggle_like(post_id, caller.user_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))?;

        tracing::debug!(
            post_id = %post_id,
            user_id = %caller.user_id,
            liked = post.likes.contains(&caller.user_id),
            "Like toggled"
        );
        Ok(post)
    }

    /// Bump the view counter. Open to anonymous callers.
    pub async fn record_view(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.repo
            .increment_views(post_id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(post_id))
    }

    pub async fn update(
        &self,
        caller: &Caller,
        post_id: Uuid,
        path_user_id: &str,
        changes: PostChanges,
    ) -> Result<Post, DomainError> {
        if !caller.may_act_for(path_user_id) {
            tracing::warn!(post_id = %post_id, user_id = %caller.user_id, "Update refused");
            return Err(DomainError::Forbidden(
                "You are not allowed to update this post".to_string(),
            ));
        }
        changes.validate()?;

        let updated = if changes.is_empty() {
            self.repo.find_by_id(post_id).await?
        } else {
            self.repo
                .apply_changes(post_id, changes)
                .await
                .map_err(|e| match e {
                    RepoError::Constraint(_) => {
                        DomainError::Duplicate("A post with this title already exists".to_string())
                    }
                    other => other.into(),
                })?
        };

        let post = updated.ok_or_else(|| DomainError::post_not_found(post_id))?;
        tracing::info!(post_id = %post_id, user_id = %caller.user_id, "Post updated");
        Ok(post)
    }

    /// Remove a post. Unknown ids are not an error.
    pub async fn delete(
        &self,
        caller: &Caller,
        post_id: Uuid,
        path_user_id: &str,
    ) -> Result<(), DomainError> {
        if !caller.may_act_for(path_user_id) {
            tracing::warn!(post_id = %post_id, user_id = %caller.user_id, "Delete refused");
            return Err(DomainError::Forbidden(
                "You are not allowed to delete this post".to_string(),
            ));
        }

        let removed = self.repo.delete(post_id).await?;
        tracing::info!(post_id = %post_id, user_id = %caller.user_id, removed, "Post deleted");
        Ok(())
    }
}
