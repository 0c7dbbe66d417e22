//! Data Transfer Objects - request/response types for the post API.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/post/create`.
///
/// `title` and `content` are optional here so that missing fields reach
/// validation instead of failing JSON extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub image_urls: Option<Vec<String>>,
}

/// Body of `PUT /api/post/updatepost/{postId}/{userId}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub image_urls: Option<Vec<String>>,
}

/// Query string of `GET /api/post/getposts`. Values stay raw strings and are
/// parsed leniently by the domain layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsQuery {
    pub start_index: Option<String>,
    pub limit: Option<String>,
    pub order: Option<String>,
    pub search_term: Option<String>,
    pub category: Option<String>,
    pub user_id: Option<String>,
    pub post_id: Option<String>,
    pub slug: Option<String>,
}

/// Listing page plus dashboard counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsResponse<T> {
    pub posts: Vec<T>,
    pub total_posts: u64,
    pub last_month_posts: u64,
}

/// Plain confirmation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
