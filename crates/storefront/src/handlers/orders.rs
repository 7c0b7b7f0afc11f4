//! Order handlers (`/api/order`).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use storefront_core::commerce::{
    order_total, ApiResponse, CommerceError, CreateOrderRequest, ListOrdersQuery, Order,
    OrderStatus, UpdateOrderStatusRequest,
};

use super::error::{not_found, AppError};
use crate::state::AppState;

/// POST /api/order
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Order>>), AppError> {
    if payload.lines.is_empty() {
        return Err(CommerceError::EmptyOrder.into());
    }
    if payload.lines.iter().any(|line| line.quantity == 0) {
        return Err(CommerceError::InvalidQuantity.into());
    }

    let now = Utc::now();
    let order = Order {
        id: Uuid::new_v4(),
        user_id: payload.user_id,
        total_price: order_total(&payload.lines),
        lines: payload.lines,
        shipping_address: payload.shipping_address,
        status: OrderStatus::Pending,
        created_at: now,
        updated_at: now,
    };
    state.orders.create_order(&order).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Order created", order)),
    ))
}

/// GET /api/order/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Order>>, AppError> {
    let order = state
        .orders
        .get_order(id)
        .await?
        .ok_or_else(|| not_found("Order", id))?;
    Ok(Json(ApiResponse::ok("Success", order)))
}

/// GET /api/order/users/{user_id}?status=pending
pub async fn list_user_orders(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<ApiResponse<Vec<Order>>>, AppError> {
    let status = query.status()?;
    let orders = state.orders.list_orders_for_user(user_id, status).await?;
    Ok(Json(ApiResponse::ok("Success", orders)))
}

/// PATCH /api/order/{id}/cancel
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Order>>, AppError> {
    let order = state
        .orders
        .update_order_status(id, OrderStatus::Cancelled)
        .await?;
    Ok(Json(ApiResponse::ok("Order cancelled", order)))
}

/// PUT /api/order/status
pub async fn update_status(
    State(state): State<AppState>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<Json<ApiResponse<Order>>, AppError> {
    let order = state
        .orders
        .update_order_status(payload.order_id, payload.status)
        .await?;
    Ok(Json(ApiResponse::ok("Order status updated", order)))
}
