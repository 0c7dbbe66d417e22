//! Domain entities - the core business objects.

mod caller;
mod likes;
mod post;
mod query;

pub use caller::Caller;
pub use likes::LikeSet;
pub use post::{DEFAULT_CATEGORY, NewPost, Post, PostChanges, slugify};
pub use query::{
    Clause, DEFAULT_PAGE_LIMIT, ListParams, PostFilter, PostQuery, SortOrder, one_month_ago,
};
