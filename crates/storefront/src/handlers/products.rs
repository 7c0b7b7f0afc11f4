//! Product handlers (`/api/product`).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use storefront_core::commerce::{
    validate_product, ApiResponse, CreateProductRequest, ListProductsQuery, Product, ProductCount,
    ProductSearchQuery, UpdateProductRequest,
};

use super::error::{not_found, AppError};
use crate::state::AppState;

/// POST /api/product
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), AppError> {
    let product = payload.into_product();
    validate_product(&product)?;
    state.products.create_product(&product).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Product created", product)),
    ))
}

/// GET /api/product?type=LAPTOP
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let products = state
        .products
        .list_products_by_type(&query.product_type())
        .await?;
    Ok(Json(ApiResponse::ok("Success", products)))
}

/// GET /api/product/all
pub async fn list_all_products(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let products = state.products.list_products().await?;
    Ok(Json(ApiResponse::ok("Success", products)))
}

/// GET /api/product/search?price_min=&price_max=&sort_by=price_desc&page=1&limit=10
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<ProductSearchQuery>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let search = query.into_search()?;
    let products = state.products.search_products(&search).await?;
    Ok(Json(ApiResponse::ok("Success", products)))
}

/// GET /api/product/count?price_min=&price_max=
pub async fn count_products(
    State(state): State<AppState>,
    Query(query): Query<ProductSearchQuery>,
) -> Result<Json<ApiResponse<ProductCount>>, AppError> {
    let range = query.price_range()?;
    let count = state.products.count_products(&range).await?;
    Ok(Json(ApiResponse::ok("Success", ProductCount { count })))
}

/// GET /api/product/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let product = state
        .products
        .get_product(id)
        .await?
        .ok_or_else(|| not_found("Product", id))?;
    Ok(Json(ApiResponse::ok("Success", product)))
}

/// PUT /api/product/{id}
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let mut product = state
        .products
        .get_product(id)
        .await?
        .ok_or_else(|| not_found("Product", id))?;
    payload.apply_to(&mut product);
    validate_product(&product)?;
    state.products.update_product(&product).await?;
    Ok(Json(ApiResponse::ok("Product updated", product)))
}

/// DELETE /api/product/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.products.delete_product(id).await?;
    Ok(Json(ApiResponse::ok_empty("Product deleted")))
}
