//! Product handlers. Reads are public; writes are admin-only.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use techhub_core::{CategoryId, ProductId};
use techhub_core::policy::Operation;

use crate::db::catalog::{CatalogRepository, ProductListQuery, ProductSort};
use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, authorize};
use crate::models::ProductInput;
use crate::state::AppState;

/// Query parameters of the product listing.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub search: Option<String>,
    pub category: Option<CategoryId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl From<ListParams> for ProductListQuery {
    fn from(params: ListParams) -> Self {
        Self {
            page: params.page.unwrap_or(1),
            limit: params.limit.unwrap_or(0),
            sort: ProductSort::parse(params.sort.as_deref().unwrap_or("-createdAt")),
            search: params.search,
            category: params.category,
            min_price: params.min_price,
            max_price: params.max_price,
        }
    }
}

/// Ensure the referenced category exists before a catalog write.
async fn require_category(repo: &CatalogRepository<'_>, id: CategoryId) -> Result<()> {
    if repo.get_category(id).await?.is_none() {
        return Err(AppError::BadRequest("Invalid category".to_string()));
    }
    Ok(())
}

/// Handle `POST /product` (admin).
///
/// The stored selling price is derived from the submitted list price and
/// discount; clients never write `price`/`oldPrice` directly.
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(input): Json<ProductInput>,
) -> Result<impl IntoResponse> {
    authorize(&user, Operation::ManageCatalog)?;

    let repo = CatalogRepository::new(state.pool());
    require_category(&repo, input.category).await?;

    let product = repo.create_product(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Product created successfully",
            "product": product,
        })),
    ))
}

/// Handle `GET /products` (public).
///
/// Supports pagination (12 per page by default), category and price filters,
/// substring search over name/description/brand/model, and an allow-listed
/// sort key.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse> {
    let query = ProductListQuery::from(params);
    let page = query.page.max(1);
    let per_page = if query.limit == 0 {
        crate::db::catalog::DEFAULT_PAGE_SIZE
    } else {
        query.limit
    };

    let result = CatalogRepository::new(state.pool())
        .list_products(&query)
        .await?;

    let total_pages = i64::try_from((result.total_items.max(0) as u64).div_ceil(u64::from(per_page)))
        .unwrap_or(i64::MAX);

    Ok(Json(json!({
        "success": true,
        "data": result.products,
        "pagination": {
            "currentPage": page,
            "totalPages": total_pages,
            "totalItems": result.total_items,
            "itemsPerPage": per_page,
            "hasNextPage": i64::from(page) < total_pages,
            "hasPrevPage": page > 1,
        },
    })))
}

/// Handle `GET /product/{id}` (public).
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let product = CatalogRepository::new(state.pool())
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(json!({ "product": product })))
}

/// Handle `PUT /product/{id}` (admin).
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<ProductId>,
    Json(input): Json<ProductInput>,
) -> Result<impl IntoResponse> {
    authorize(&user, Operation::ManageCatalog)?;

    let repo = CatalogRepository::new(state.pool());
    require_category(&repo, input.category).await?;

    let product = repo
        .update_product(id, &input)
        .await
        .map_err(|e| AppError::not_found_as(e, "Product not found"))?;

    Ok(Json(json!({
        "message": "Product updated successfully",
        "product": product,
    })))
}

/// Handle `DELETE /product/{id}` (admin).
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    authorize(&user, Operation::ManageCatalog)?;

    CatalogRepository::new(state.pool())
        .delete_product(id)
        .await
        .map_err(|e| AppError::not_found_as(e, "Product not found"))?;

    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
