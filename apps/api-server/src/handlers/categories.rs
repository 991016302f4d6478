//! Category endpoints.

use actix_web::{HttpResponse, web};

use agora_core::domain::Category;
use agora_shared::ApiResponse;
use agora_shared::dto::{CategoryResponse, CreateCategoryRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn category_response(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name,
        slug: category.slug,
        description: category.description,
        created_at: category.created_at,
    }
}

/// GET /api/categories
pub async fn list_categories(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories: Vec<CategoryResponse> = state
        .categories
        .list()
        .await?
        .into_iter()
        .map(category_response)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(categories)))
}

/// POST /api/categories - privileged users and administrators only
pub async fn create_category(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let category = state
        .categories
        .create(&identity.requester(), &req.name, req.description)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        category_response(category),
        "Category created",
    )))
}
