//! Orders API Handlers

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderStatus, OrderStatusUpdate};
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResponse, AppResult};

/// GET /api/orders - the caller's order history, newest first
pub async fn list_my_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.get_db())
        .find_by_user(&user.email)
        .await?;
    Ok(Json(orders))
}

/// GET /api/admin/orders - every order, newest first
pub async fn list_all_orders(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.get_db()).find_all().await?;
    Ok(Json(orders))
}

/// POST /api/admin/orders/update - confirm or cancel a pending order
///
/// Confirmation decrements stock for every line and flips the status in
/// one transaction; a stock shortfall rejects the whole confirmation and
/// leaves the order pending. Terminal orders reject any further change.
pub async fn update_order_status(
    State(state): State<ServerState>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<AppResponse<Order>>> {
    let target: OrderStatus = payload
        .status
        .parse()
        .map_err(|_| AppError::validation(format!("Unknown order status: {}", payload.status)))?;

    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id(&payload.order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", payload.order_id)))?;

    if order.status.is_terminal() {
        return Err(AppError::business_rule(format!(
            "Order {} is already {}",
            order.order_number,
            order.status.as_str()
        )));
    }

    let updated = match target {
        OrderStatus::Fulfilled => repo.fulfill(&payload.order_id, &order.items).await?,
        OrderStatus::Cancelled => repo.cancel(&payload.order_id).await?,
        OrderStatus::Pending => {
            return Err(AppError::validation("Orders cannot be reset to pending"));
        }
    };

    tracing::info!(
        order_number = %updated.order_number,
        status = updated.status.as_str(),
        "Order status updated"
    );
    Ok(Json(AppResponse::success(updated)))
}
