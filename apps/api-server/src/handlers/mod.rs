//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod comments;
mod health;
mod posts;
mod profiles;

use actix_web::web;
use serde::Deserialize;

use fabula_core::domain::Account;
use fabula_core::pagination::{DEFAULT_PAGE_SIZE, Page, PageRequest};
use fabula_core::services::FeedEntry;
use fabula_shared::dto::{AccountResponse, PageResponse, PostResponse};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Posts and their comment threads
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/{post_id}", web::get().to(posts::detail))
                    .route("/{post_id}", web::put().to(posts::update))
                    .route("/{post_id}", web::delete().to(posts::delete))
                    .route("/{post_id}/comments", web::post().to(comments::add))
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::put().to(comments::edit),
                    )
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::delete().to(comments::delete),
                    ),
            )
            // Category feeds
            .route(
                "/categories/{slug}/posts",
                web::get().to(categories::posts),
            )
            // Profiles
            .service(
                web::scope("/profiles")
                    .route("/me", web::put().to(profiles::update))
                    .route("/{username}", web::get().to(profiles::show)),
            ),
    );
}

/// Pagination query parameters, defaulting to the first ten-item page.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl PageQuery {
    pub fn to_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

pub(crate) fn post_response(entry: FeedEntry) -> PostResponse {
    PostResponse {
        id: entry.post.id,
        title: entry.post.title,
        text: entry.post.text,
        image_ref: entry.post.image_ref,
        pub_date: entry.post.pub_date,
        is_published: entry.post.is_published,
        author_id: entry.post.author_id,
        category_id: entry.post.category_id,
        location_id: entry.post.location_id,
        created_at: entry.post.created_at,
        comment_count: entry.comment_count,
    }
}

pub(crate) fn page_response(page: Page<FeedEntry>) -> PageResponse<PostResponse> {
    let has_more = page.has_more();
    PageResponse {
        items: page.items.into_iter().map(post_response).collect(),
        page: page.page,
        page_size: page.page_size,
        total: page.total,
        has_more,
    }
}

pub(crate) fn account_response(account: Account) -> AccountResponse {
    AccountResponse {
        id: account.id,
        username: account.username,
        first_name: account.first_name,
        last_name: account.last_name,
        email: account.email,
        created_at: account.created_at,
    }
}
