//! Post endpoints.
//!
//! Every route requires an [`Identity`]; visibility, ownership and role checks
//! happen in [`agora_core::service::PostService`].

use actix_web::{HttpResponse, web};

use agora_core::domain::Post;
use agora_core::locator::AttachmentLocator;
use agora_core::service::{NewPostInput, PostFilter, PostUpdateInput};
use agora_shared::ApiResponse;
use agora_shared::dto::{
    CreatePostRequest, ListPostsQuery, PostResponse, PostSummary, UpdatePostRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

const EXCERPT_CHARS: usize = 200;

fn excerpt(content: &str) -> String {
    match content.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", content[..cut].trim_end()),
        None => content.to_string(),
    }
}

fn post_response(locator: &AttachmentLocator, post: Post) -> PostResponse {
    PostResponse {
        attachment_url: locator.locate(&post),
        id: post.id,
        title: post.title,
        slug: post.slug,
        content: post.content,
        author_id: post.author_id,
        category: post.category_id,
        is_published: post.is_published,
        is_pinned: post.is_pinned,
        created_at: post.created_at,
        updated_at: post.updated_at,
        published_at: post.published_at,
    }
}

fn post_summary(locator: &AttachmentLocator, post: Post) -> PostSummary {
    PostSummary {
        attachment_url: locator.locate(&post),
        excerpt: excerpt(&post.content),
        id: post.id,
        title: post.title,
        slug: post.slug,
        author_id: post.author_id,
        category: post.category_id,
        is_published: post.is_published,
        is_pinned: post.is_pinned,
        created_at: post.created_at,
    }
}

/// GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let filter = PostFilter {
        category_id: query.category,
        limit: query.limit,
        offset: query.offset,
    };

    let posts: Vec<PostSummary> = state
        .posts
        .list(&identity.requester(), filter)
        .await?
        .into_iter()
        .map(|post| post_summary(&state.locator, post))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let input = NewPostInput {
        title: req.title,
        content: req.content,
        category_id: req.category,
        attachment: req.attachment,
        is_published: req.is_published,
        is_pinned: req.is_pinned,
    };

    let post = state.posts.create(&identity.requester(), input).await?;

    Ok(HttpResponse::Created().json(post_response(&state.locator, post)))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .get(&identity.requester(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(&state.locator, post))))
}

/// PATCH /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let input = PostUpdateInput {
        title: req.title,
        content: req.content,
        category_id: req.category,
        is_published: req.is_published,
        is_pinned: req.is_pinned,
    };

    let post = state
        .posts
        .update(&identity.requester(), path.into_inner(), input)
        .await?;

    Ok(HttpResponse::Ok().json(post_response(&state.locator, post)))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(&identity.requester(), path.into_inner())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
