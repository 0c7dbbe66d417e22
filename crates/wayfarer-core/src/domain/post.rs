use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::LikeSet;
use crate::error::DomainError;

/// Category assigned when a post is created without one.
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// Post entity - a travel or food article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub category: String,
    pub image_urls: Vec<String>,
    /// First entry of `image_urls`, kept for list views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub likes: LikeSet,
    pub number_of_views: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Build a fresh post from validated input. The store keeps the generated id.
    pub fn new(input: NewPost) -> Self {
        let now = Utc::now();
        let image = cover_image(&input.image_urls);
        Self {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            slug: slugify(&input.title),
            title: input.title,
            content: input.content,
            category: input.category,
            image_urls: input.image_urls,
            image,
            likes: LikeSet::default(),
            number_of_views: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated input for creating a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub image_urls: Vec<String>,
}

impl NewPost {
    /// Validate raw create input. `user_id` always comes from the verified caller.
    pub fn new(
        user_id: Uuid,
        title: Option<String>,
        content: Option<String>,
        category: Option<String>,
        image_urls: Option<Vec<String>>,
    ) -> Result<Self, DomainError> {
        let (title, content) = match (title, content) {
            (Some(title), Some(content)) if !title.is_empty() && !content.is_empty() => {
                (title, content)
            }
            _ => {
                return Err(DomainError::Validation(
                    "Please provide all required fields".to_string(),
                ));
            }
        };

        let category = category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        Ok(Self {
            user_id,
            title,
            content,
            category,
            image_urls: image_urls.unwrap_or_default(),
        })
    }
}

/// Partial update of the editable post fields.
///
/// Fields left as `None` are not touched. `likes`, `number_of_views`,
/// `user_id` and `slug` are never part of an update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub image_urls: Option<Vec<String>>,
}

impl PostChanges {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.as_deref() == Some("") {
            return Err(DomainError::Validation("Title cannot be empty".to_string()));
        }
        if self.content.as_deref() == Some("") {
            return Err(DomainError::Validation("Content cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// New value for `image`: `Some(_)` only when `image_urls` is being replaced.
    pub fn image(&self) -> Option<Option<String>> {
        self.image_urls.as_deref().map(cover_image)
    }

    /// Apply the changes in place. Timestamps are the caller's concern.
    pub fn apply_to(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(category) = &self.category {
            post.category = category.clone();
        }
        if let Some(image) = self.image() {
            post.image = image;
        }
        if let Some(urls) = &self.image_urls {
            post.image_urls = urls.clone();
        }
    }
}

/// Derive a URL-safe slug: spaces become hyphens, everything is lower-cased
/// and any character outside `[A-Za-z0-9-]` is dropped.
pub fn slugify(title: &str) -> String {
    title
        .replace(' ', "-")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

fn cover_image(image_urls: &[String]) -> Option<String> {
    image_urls.first().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(title: &str) -> NewPost {
        NewPost::new(
            Uuid::new_v4(),
            Some(title.to_string()),
            Some("Body".to_string()),
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("Paris in Spring!"), "paris-in-spring");
        assert_eq!(slugify("Crème Brûlée & Co."), "crme-brle--co");
        assert_eq!(slugify("  Tokyo  "), "--tokyo--");
        assert_eq!(slugify("Top-10 Street Foods"), "top-10-street-foods");
    }

    #[test]
    fn test_new_post_requires_title_and_content() {
        let user = Uuid::new_v4();
        let missing_title = NewPost::new(user, None, Some("c".into()), None, None);
        let empty_content = NewPost::new(user, Some("t".into()), Some(String::new()), None, None);

        assert!(matches!(missing_title, Err(DomainError::Validation(_))));
        assert!(matches!(empty_content, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_new_post_defaults() {
        let post = Post::new(new_post("Lisbon Tram 28"));

        assert_eq!(post.slug, "lisbon-tram-28");
        assert_eq!(post.category, DEFAULT_CATEGORY);
        assert!(post.image_urls.is_empty());
        assert!(post.image.is_none());
        assert!(post.likes.is_empty());
        assert_eq!(post.number_of_views, 0);
    }

    #[test]
    fn test_image_is_first_url() {
        let input = NewPost::new(
            Uuid::new_v4(),
            Some("Ramen".into()),
            Some("Broth".into()),
            Some("food".into()),
            Some(vec!["a.jpg".into(), "b.jpg".into()]),
        )
        .unwrap();
        let post = Post::new(input);

        assert_eq!(post.image.as_deref(), Some("a.jpg"));
        assert_eq!(post.category, "food");
    }

    #[test]
    fn test_changes_leave_other_fields_alone() {
        let mut post = Post::new(new_post("Original"));
        post.image = Some("keep.jpg".into());
        let changes = PostChanges {
            content: Some("Rewritten".into()),
            ..Default::default()
        };

        changes.apply_to(&mut post);

        assert_eq!(post.title, "Original");
        assert_eq!(post.slug, "original");
        assert_eq!(post.content, "Rewritten");
        assert_eq!(post.image.as_deref(), Some("keep.jpg"));
    }

    #[test]
    fn test_changes_recompute_image() {
        let mut post = Post::new(new_post("Gallery"));
        post.image = Some("old.jpg".into());

        PostChanges {
            image_urls: Some(vec![]),
            ..Default::default()
        }
        .apply_to(&mut post);

        assert!(post.image.is_none());
        assert!(post.image_urls.is_empty());
    }

    #[test]
    fn test_post_serializes_camel_case() {
        let post = Post::new(new_post("Serde"));
        let json = serde_json::to_value(&post).unwrap();

        assert!(json.get("numberOfViews").is_some());
        assert!(json.get("imageUrls").is_some());
        assert!(json.get("userId").is_some());
        assert!(json.get("image").is_none());
    }
}
