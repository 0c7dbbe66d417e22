//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    #[sea_orm(unique)]
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub category: String,
    pub image_urls: Vec<String>,
    pub image: Option<String>,
    pub likes: Vec<Uuid>,
    pub number_of_views: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for wayfarer_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            slug: model.slug,
            content: model.content,
            category: model.category,
            image_urls: model.image_urls,
            image: model.image,
            likes: model.likes.into(),
            number_of_views: model.number_of_views,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<wayfarer_core::domain::Post> for ActiveModel {
    fn from(post: wayfarer_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            user_id: Set(post.user_id),
            title: Set(post.title),
            slug: Set(post.slug),
            content: Set(post.content),
            category: Set(post.category),
            image_urls: Set(post.image_urls),
            image: Set(post.image),
            likes: Set(post.likes.into_vec()),
            number_of_views: Set(post.number_of_views),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
