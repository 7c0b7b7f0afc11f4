//! Cart handlers (`/api/cart`).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use storefront_core::commerce::{
    AddCartItemRequest, ApiResponse, Cart, CommerceError, RemoveCartItemsRequest,
    UpdateCartItemRequest,
};
use storefront_core::storage::CartChange;

use super::error::{not_found, AppError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: usize,
}

/// POST /api/cart/items
pub async fn add_item(
    State(state): State<AppState>,
    Json(payload): Json<AddCartItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Cart>>), AppError> {
    let user_id = payload.user_id;
    let (item, client_total) = payload.into_item()?;
    if let Some(client_total) = client_total {
        tracing::warn!(
            user_id = %user_id,
            product_id = %item.product_id,
            client_total,
            server_total = item.total_price,
            "Client cart total disagrees, using server total"
        );
    }
    let cart = state.carts.add_item(user_id, item).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Item added to cart", cart)),
    ))
}

/// GET /api/cart/users/{user_id}
pub async fn get_cart(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Cart>>, AppError> {
    let cart = state
        .carts
        .get_cart(user_id)
        .await?
        .ok_or_else(|| not_found("Cart", user_id))?;
    Ok(Json(ApiResponse::ok("Success", cart)))
}

/// GET /api/cart/users/{user_id}/count
pub async fn count_items(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CartCount>>, AppError> {
    let count = state.carts.count_items(user_id).await?;
    Ok(Json(ApiResponse::ok("Success", CartCount { count })))
}

/// PUT /api/cart/items
pub async fn update_item(
    State(state): State<AppState>,
    Json(payload): Json<UpdateCartItemRequest>,
) -> Result<Json<ApiResponse<Cart>>, AppError> {
    if payload.quantity == 0 {
        return Err(CommerceError::InvalidQuantity.into());
    }
    let cart = state
        .carts
        .update_item_quantity(payload.user_id, payload.product_id, payload.quantity)
        .await?;
    Ok(Json(ApiResponse::ok("Cart updated", cart)))
}

/// DELETE /api/cart/items/{item_id}
pub async fn remove_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CartChange>>, AppError> {
    let change = state.carts.remove_item(item_id).await?;
    Ok(Json(ApiResponse::ok("Item removed from cart", change)))
}

/// DELETE /api/cart/items
pub async fn remove_items(
    State(state): State<AppState>,
    Json(payload): Json<RemoveCartItemsRequest>,
) -> Result<Json<ApiResponse<Vec<CartChange>>>, AppError> {
    if payload.item_ids.is_empty() {
        return Err(CommerceError::MissingField("item_ids").into());
    }
    let changes = state.carts.remove_items(&payload.item_ids).await?;
    if changes.is_empty() {
        return Err(not_found("CartItem", format!("{:?}", payload.item_ids)).into());
    }
    Ok(Json(ApiResponse::ok("Items removed from cart", changes)))
}
