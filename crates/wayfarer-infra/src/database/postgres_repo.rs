//! PostgreSQL post repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use wayfarer_core::domain::{Clause, Post, PostChanges, PostFilter, PostQuery, SortOrder};
use wayfarer_core::error::RepoError;
use wayfarer_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// Flip membership of the bound user id in `likes` within a single UPDATE.
const TOGGLE_LIKE_SQL: &str = r#"CASE WHEN ? = ANY("likes") THEN array_remove("likes", ?) ELSE array_append("likes", ?) END"#;

/// SQL predicate for a listing filter.
pub(crate) fn condition(filter: &PostFilter) -> Condition {
    filter
        .clauses()
        .iter()
        .fold(Condition::all(), |cond, clause| cond.add(clause_condition(clause)))
}

fn clause_condition(clause: &Clause) -> Condition {
    match clause {
        Clause::Search(term) => {
            let pattern = format!("%{}%", escape_like(term));
            Condition::any()
                .add(Expr::col(post::Column::Title).ilike(LikeExpr::new(&pattern).escape('\\')))
                .add(Expr::col(post::Column::Content).ilike(LikeExpr::new(&pattern).escape('\\')))
        }
        Clause::Category(category) => {
            Condition::all().add(post::Column::Category.eq(category.as_str()))
        }
        Clause::UserId(user_id) => Condition::all().add(post::Column::UserId.eq(*user_id)),
        Clause::UnknownUser(_) => Condition::all().add(Expr::value(false)),
        Clause::PostId(id) => Condition::all().add(post::Column::Id.eq(*id)),
        Clause::Slug(slug) => Condition::all().add(post::Column::Slug.eq(slug.as_str())),
    }
}

/// Escape LIKE wildcards so the search term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn now_value() -> SimpleExpr {
    Expr::value(Utc::now().fixed_offset())
}

impl PostgresPostRepository {
    /// Run an UPDATE on a single post and hand back the row as written.
    async fn update_one(
        &self,
        id: Uuid,
        columns: Vec<(post::Column, SimpleExpr)>,
    ) -> Result<Option<Post>, RepoError> {
        let update = columns.into_iter().fold(
            PostEntity::update_many()
                .col_expr(post::Column::UpdatedAt, now_value())
                .filter(post::Column::Id.eq(id)),
            |update, (column, value)| update.col_expr(column, value),
        );

        let rows = update
            .exec_with_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().next().map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let order = match query.order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };

        let result = PostEntity::find()
            .filter(condition(&query.filter))
            .order_by(post::Column::CreatedAt, order)
            .offset(query.start_index)
            .limit(query.limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(condition(filter))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post::Column::CreatedAt.gte(since.fixed_offset()))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn apply_changes(
        &self,
        id: Uuid,
        changes: PostChanges,
    ) -> Result<Option<Post>, RepoError> {
        let mut columns = Vec::new();
        if let Some(image) = changes.image() {
            columns.push((post::Column::Image, Expr::value(image)));
        }
        if let Some(title) = changes.title {
            columns.push((post::Column::Title, Expr::value(title)));
        }
        if let Some(content) = changes.content {
            columns.push((post::Column::Content, Expr::value(content)));
        }
        if let Some(category) = changes.category {
            columns.push((post::Column::Category, Expr::value(category)));
        }
        if let Some(image_urls) = changes.image_urls {
            columns.push((post::Column::ImageUrls, Expr::value(image_urls)));
        }

        self.update_one(id, columns).await
    }

    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<Option<Post>, RepoError> {
        let toggled = Expr::cust_with_values(TOGGLE_LIKE_SQL, [user_id, user_id, user_id]);
        self.update_one(id, vec![(post::Column::Likes, toggled)]).await
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let bumped = Expr::col(post::Column::NumberOfViews).add(1);
        self.update_one(id, vec![(post::Column::NumberOfViews, bumped)]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("pasta"), "pasta");
    }

    #[test]
    fn test_condition_sql() {
        let user = Uuid::nil();
        let filter = PostFilter::new()
            .with(Clause::Search("pasta".into()))
            .with(Clause::Category("food".into()))
            .with(Clause::UserId(user));

        let sql = PostEntity::find()
            .filter(condition(&filter))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""title" ILIKE ('%pasta%' ESCAPE"#), "{sql}");
        assert!(sql.contains(r#""content" ILIKE ('%pasta%' ESCAPE"#), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
        assert!(sql.contains(r#""posts"."category" = 'food'"#), "{sql}");
        assert!(sql.contains(r#""user_id" = '00000000-0000-0000-0000-000000000000'"#), "{sql}");
    }

    #[test]
    fn test_empty_filter_adds_no_predicate() {
        let sql = PostEntity::find()
            .filter(condition(&PostFilter::new()))
            .build(DbBackend::Postgres)
            .to_string();

        let predicate = sql.split(" WHERE ").nth(1);
        assert!(matches!(predicate, None | Some("TRUE")), "{sql}");
    }

    #[test]
    fn test_unknown_user_matches_nothing() {
        let raw = "64f1c2a9e4b0a1b2c3d4e5f6";
        let filter = PostFilter::new().with(Clause::UnknownUser(raw.into()));

        let sql = PostEntity::find()
            .filter(condition(&filter))
            .build(DbBackend::Postgres)
            .to_string();

        let predicate = sql.split(" WHERE ").nth(1).unwrap_or_default();
        assert!(predicate.contains("FALSE"), "{sql}");
        assert!(!sql.contains(raw), "{sql}");
    }
}
