#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::database::entity::post;
    use crate::database::postgres_repo::PostgresPostRepository;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, RuntimeErr, Value};
    use uuid::Uuid;
    use wayfarer_core::domain::{Post, PostChanges, PostFilter};
    use wayfarer_core::error::RepoError;
    use wayfarer_core::ports::{BaseRepository, PostRepository};

    fn model(id: Uuid, likes: Vec<Uuid>, views: i64) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            user_id: Uuid::new_v4(),
            title: "Test Post".to_owned(),
            slug: "test-post".to_owned(),
            content: "Content".to_owned(),
            category: "uncategorized".to_owned(),
            image_urls: vec!["cover.jpg".to_owned()],
            image: Some("cover.jpg".to_owned()),
            likes,
            number_of_views: views,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let post_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model(post_id, vec![], 3)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let post: Post = repo.find_by_id(post_id).await.unwrap().unwrap();

        assert_eq!(post.id, post_id);
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.image.as_deref(), Some("cover.jpg"));
        assert_eq!(post.number_of_views, 3);
    }

    #[tokio::test]
    async fn test_toggle_like_is_single_update() {
        let post_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model(post_id, vec![user_id], 0)]])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let post = repo.toggle_like(post_id, user_id).await.unwrap().unwrap();

        assert!(post.likes.contains(&user_id));
        let log = format!("{:?}", repo.db.into_transaction_log());
        assert!(log.contains("array_remove"), "{log}");
        assert!(log.contains("array_append"), "{log}");
        assert!(log.contains("RETURNING"), "{log}");
    }

    #[tokio::test]
    async fn test_increment_views_uses_column_arithmetic() {
        let post_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model(post_id, vec![], 8)]])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let post = repo.increment_views(post_id).await.unwrap().unwrap();

        assert_eq!(post.number_of_views, 8);
        let log = format!("{:?}", repo.db.into_transaction_log());
        assert!(log.contains("number_of_views"), "{log}");
        assert!(log.contains("+ $"), "{log}");
    }

    #[tokio::test]
    async fn test_update_missing_post_returns_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let changes = PostChanges {
            content: Some("New".into()),
            ..Default::default()
        };

        assert!(
            repo.apply_changes(Uuid::new_v4(), changes)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_constraint() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors(vec![DbErr::Query(RuntimeErr::Internal(
                "duplicate key value violates unique constraint \"posts_title_key\"".to_owned(),
            ))])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let post: Post = model(Uuid::new_v4(), vec![], 0).into();
        let result = repo.insert(post).await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_count() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![BTreeMap::from([(
                "num_items",
                Value::BigInt(Some(4)),
            )])]])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        assert_eq!(repo.count(&PostFilter::new()).await.unwrap(), 4);
    }
}
