//! HTTP handlers and route configuration.

mod health;
mod posts;

use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Malformed bodies and query strings get the same error envelope as every other failure.
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }));
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }));

    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/post")
                    .route("/create", web::post().to(posts::create_post))
                    .route("/getposts", web::get().to(posts::get_posts))
                    // Spelling used by existing web clients.
                    .route("/getPosts", web::get().to(posts::get_posts))
                    .route("/likepost/{postId}", web::put().to(posts::like_post))
                    .route("/viewpost/{postId}", web::put().to(posts::view_post))
                    .route(
                        "/deletepost/{postId}/{userId}",
                        web::delete().to(posts::delete_post),
                    )
                    .route(
                        "/updatepost/{postId}/{userId}",
                        web::put().to(posts::update_post),
                    ),
            ),
    );
}
