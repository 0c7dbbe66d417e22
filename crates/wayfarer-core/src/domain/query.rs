//! Post listing: filter clauses, sort order and pagination.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeDelta, Utc};
use uuid::Uuid;

use super::{DEFAULT_CATEGORY, Post};
use crate::error::DomainError;

/// Page size used when `limit` is absent or not a positive integer.
pub const DEFAULT_PAGE_LIMIT: u64 = 9;

/// A single listing predicate. Clauses in a [`PostFilter`] are AND-ed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// Case-insensitive substring of the title OR the content.
    Search(String),
    Category(String),
    UserId(Uuid),
    /// A `userId` that is not a valid id. No post can match it.
    UnknownUser(String),
    PostId(Uuid),
    Slug(String),
}

impl Clause {
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            Clause::Search(term) => {
                let needle = term.to_lowercase();
                post.title.to_lowercase().contains(&needle)
                    || post.content.to_lowercase().contains(&needle)
            }
            Clause::Category(category) => post.category == *category,
            Clause::UserId(user_id) => post.user_id == *user_id,
            Clause::UnknownUser(_) => false,
            Clause::PostId(id) => post.id == *id,
            Clause::Slug(slug) => post.slug == *slug,
        }
    }
}

/// Conjunction of clauses. An empty filter matches every post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    clauses: Vec<Clause>,
}

impl PostFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, post: &Post) -> bool {
        self.clauses.iter().all(|clause| clause.matches(post))
    }
}

/// Sort direction on `created_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Only the literal `asc` sorts ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

/// Raw listing parameters as they arrive on the query string.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub start_index: Option<String>,
    pub limit: Option<String>,
    pub order: Option<String>,
    pub search_term: Option<String>,
    pub category: Option<String>,
    pub user_id: Option<String>,
    pub post_id: Option<String>,
    pub slug: Option<String>,
}

/// Fully parsed listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub filter: PostFilter,
    pub order: SortOrder,
    pub start_index: u64,
    pub limit: u64,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            filter: PostFilter::new(),
            order: SortOrder::Desc,
            start_index: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PostQuery {
    /// Build a query from raw parameters.
    ///
    /// `max_limit` clamps the page size when set; without it `limit` is unbounded.
    pub fn from_params(params: &ListParams, max_limit: Option<u64>) -> Result<Self, DomainError> {
        let start_index = non_empty(&params.start_index)
            .and_then(parse_leading_int)
            .filter(|n| *n > 0)
            .map_or(0, |n| n as u64);

        let mut limit = non_empty(&params.limit)
            .and_then(parse_leading_int)
            .filter(|n| *n > 0)
            .map_or(DEFAULT_PAGE_LIMIT, |n| n as u64);
        if let Some(max) = max_limit {
            limit = limit.min(max);
        }

        let mut filter = PostFilter::new();
        if let Some(term) = non_empty(&params.search_term) {
            filter = filter.with(Clause::Search(term.to_string()));
        }
        if let Some(category) = non_empty(&params.category).filter(|c| *c != DEFAULT_CATEGORY) {
            filter = filter.with(Clause::Category(category.to_string()));
        }
        if let Some(user_id) = non_empty(&params.user_id) {
            let clause = match Uuid::parse_str(user_id) {
                Ok(id) => Clause::UserId(id),
                Err(_) => Clause::UnknownUser(user_id.to_string()),
            };
            filter = filter.with(clause);
        }
        if let Some(post_id) = non_empty(&params.post_id) {
            filter = filter.with(Clause::PostId(parse_id("postId", post_id)?));
        }
        if let Some(slug) = non_empty(&params.slug) {
            filter = filter.with(Clause::Slug(slug.to_string()));
        }

        Ok(Self {
            filter,
            order: SortOrder::parse(params.order.as_deref()),
            start_index,
            limit,
        })
    }
}

/// Midnight (UTC) of the same day-of-month one calendar month before `now`.
///
/// Days past the end of the previous month roll forward, so 31 March
/// yields 3 March (or 2 March in a leap year).
pub fn one_month_ago(now: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = match now.month() {
        1 => (now.year() - 1, 12),
        m => (now.year(), m - 1),
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_days(Days::new(u64::from(now.day0()))))
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .unwrap_or_else(|| now - TimeDelta::days(30))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_id(name: &str, raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|_| DomainError::Validation(format!("Invalid {name}: {raw}")))
}

/// Integer prefix of `raw`: optional whitespace and sign, then digits.
/// `"12abc"` gives 12, `"abc"` gives `None`.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let value: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewPost;
    use chrono::TimeZone;

    fn post(title: &str, content: &str, category: &str) -> Post {
        Post::new(
            NewPost::new(
                Uuid::new_v4(),
                Some(title.into()),
                Some(content.into()),
                Some(category.into()),
                None,
            )
            .unwrap(),
        )
    }

    fn params() -> ListParams {
        ListParams::default()
    }

    #[test]
    fn test_defaults() {
        let query = PostQuery::from_params(&params(), None).unwrap();
        assert_eq!(query, PostQuery::default());
    }

    #[test]
    fn test_lenient_integers() {
        let query = PostQuery::from_params(
            &ListParams {
                start_index: Some("5".into()),
                limit: Some("2items".into()),
                ..params()
            },
            None,
        )
        .unwrap();
        assert_eq!((query.start_index, query.limit), (5, 2));

        let query = PostQuery::from_params(
            &ListParams {
                start_index: Some("-4".into()),
                limit: Some("0".into()),
                ..params()
            },
            None,
        )
        .unwrap();
        assert_eq!((query.start_index, query.limit), (0, DEFAULT_PAGE_LIMIT));

        let query = PostQuery::from_params(
            &ListParams {
                limit: Some("abc".into()),
                ..params()
            },
            None,
        )
        .unwrap();
        assert_eq!(query.limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn test_limit_unbounded_unless_configured() {
        let raw = ListParams {
            limit: Some("100000".into()),
            ..params()
        };
        assert_eq!(PostQuery::from_params(&raw, None).unwrap().limit, 100_000);
        assert_eq!(PostQuery::from_params(&raw, Some(50)).unwrap().limit, 50);
    }

    #[test]
    fn test_order() {
        assert_eq!(SortOrder::parse(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("ASC")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(None), SortOrder::Desc);
    }

    #[test]
    fn test_uncategorized_adds_no_clause() {
        let query = PostQuery::from_params(
            &ListParams {
                category: Some(DEFAULT_CATEGORY.into()),
                ..params()
            },
            None,
        )
        .unwrap();
        assert!(query.filter.is_empty());
    }

    #[test]
    fn test_clauses_in_order() {
        let user = Uuid::new_v4();
        let query = PostQuery::from_params(
            &ListParams {
                search_term: Some("pasta".into()),
                category: Some("food".into()),
                user_id: Some(user.to_string()),
                slug: Some("carbonara".into()),
                ..params()
            },
            None,
        )
        .unwrap();

        assert_eq!(
            query.filter.clauses(),
            &[
                Clause::Search("pasta".into()),
                Clause::Category("food".into()),
                Clause::UserId(user),
                Clause::Slug("carbonara".into()),
            ]
        );
    }

    #[test]
    fn test_malformed_post_id_is_rejected() {
        let result = PostQuery::from_params(
            &ListParams {
                post_id: Some("42".into()),
                ..params()
            },
            None,
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_malformed_user_id_matches_nothing() {
        let query = PostQuery::from_params(
            &ListParams {
                user_id: Some("64f1c2a9e4b0a1b2c3d4e5f6".into()),
                ..params()
            },
            None,
        )
        .unwrap();

        assert_eq!(
            query.filter.clauses(),
            &[Clause::UnknownUser("64f1c2a9e4b0a1b2c3d4e5f6".into())]
        );
        assert!(!query.filter.matches(&post("Rome", "Colosseum", "travel")));
    }

    #[test]
    fn test_search_is_case_insensitive_on_either_field() {
        let clause = Clause::Search("PaStA".into());

        assert!(clause.matches(&post("Pasta in Rome", "Trattorias", "food")));
        assert!(clause.matches(&post("Rome", "Fresh pasta everywhere", "food")));
        assert!(!clause.matches(&post("Rome", "Pizza everywhere", "food")));
    }

    #[test]
    fn test_filter_is_conjunctive() {
        let filter = PostFilter::new()
            .with(Clause::Search("rome".into()))
            .with(Clause::Category("travel".into()));

        assert!(filter.matches(&post("Rome", "Colosseum", "travel")));
        assert!(!filter.matches(&post("Rome", "Carbonara", "food")));
        assert!(PostFilter::new().matches(&post("Any", "Thing", "food")));
    }

    #[test]
    fn test_one_month_ago() {
        let at = |y, m, d, h| Utc.with_ymd_and_hms(y, m, d, h, 30, 0).unwrap();
        let midnight = |y, m, d| Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap();

        assert_eq!(one_month_ago(at(2026, 10, 19, 14)), midnight(2026, 9, 19));
        assert_eq!(one_month_ago(at(2026, 1, 15, 8)), midnight(2025, 12, 15));
        assert_eq!(one_month_ago(at(2026, 3, 31, 23)), midnight(2026, 3, 3));
        assert_eq!(one_month_ago(at(2024, 3, 31, 0)), midnight(2024, 3, 2));
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int(" 42"), Some(42));
        assert_eq!(parse_leading_int("3.9"), Some(3));
        assert_eq!(parse_leading_int("-7x"), Some(-7));
        assert_eq!(parse_leading_int("x7"), None);
        assert_eq!(parse_leading_int("-"), None);
    }
}
