//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use wayfarer_core::domain::{ListParams, NewPost, PostChanges, PostQuery};
use wayfarer_shared::dto::{
    CreatePostRequest, ListPostsQuery, ListPostsResponse, MessageResponse, UpdatePostRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn parse_id(raw: &str, name: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid {}", name)))
}

fn list_params(query: ListPostsQuery) -> ListParams {
    ListParams {
        start_index: query.start_index,
        limit: query.limit,
        order: query.order,
        search_term: query.search_term,
        category: query.category,
        user_id: query.user_id,
        post_id: query.post_id,
        slug: query.slug,
    }
}

/// POST /api/post/create
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let input = NewPost::new(
        identity.user_id,
        req.title,
        req.content,
        req.category,
        req.image_urls,
    )?;

    let post = state.posts.create(input).await?;
    Ok(HttpResponse::Created().json(post))
}

/// GET /api/post/getposts
pub async fn get_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let params = list_params(query.into_inner());
    let query = PostQuery::from_params(&params, state.max_page_limit)?;

    let listing = state.posts.list(&query).await?;
    Ok(HttpResponse::Ok().json(ListPostsResponse {
        posts: listing.posts,
        total_posts: listing.total_posts,
        last_month_posts: listing.last_month_posts,
    }))
}

/// PUT /api/post/likepost/{postId}
pub async fn like_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&path, "postId")?;
    let post = state.posts.toggle_like(&identity.caller(), post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// PUT /api/post/viewpost/{postId} - no authentication required
pub async fn view_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&path, "postId")?;
    state.posts.record_view(post_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("View count increased")))
}

/// DELETE /api/post/deletepost/{postId}/{userId}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (post_id, user_id) = path.into_inner();
    let post_id = parse_id(&post_id, "postId")?;

    state
        .posts
        .delete(&identity.caller(), post_id, &user_id)
        .await?;
    Ok(HttpResponse::Ok().json("The post has been deleted"))
}

/// PUT /api/post/updatepost/{postId}/{userId}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, String)>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, user_id) = path.into_inner();
    let post_id = parse_id(&post_id, "postId")?;

    let req = body.into_inner();
    let changes = PostChanges {
        title: req.title,
        content: req.content,
        category: req.category,
        image_urls: req.image_urls,
    };

    let post = state
        .posts
        .update(&identity.caller(), post_id, &user_id, changes)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}
