//! Shopping cart route handlers.
//!
//! Request validation happens here, before the engine runs: missing fields
//! and non-positive quantities are `400 Bad Request` at the boundary. The
//! fixed shopper identity comes from configuration - there is no
//! session/auth surface.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use mercado_core::{CartId, ProductId};

use crate::error::{AppError, Result};
use crate::models::CartAggregate;
use crate::state::AppState;

/// Add to cart request body.
///
/// Fields are optional so that missing keys surface as a 400, not a
/// deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: Option<ProductId>,
    pub quantity: Option<i32>,
}

/// Update line quantity request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub quantity: Option<i32>,
}

/// Response body for a successful add.
#[derive(Debug, Serialize)]
pub struct CartCreated {
    pub id: CartId,
}

/// `POST /shopping/cart` - add a product to the shopper's cart.
///
/// Returns `201` with the id of the cart that received the line (the
/// existing active cart for a same-store add, a fresh cart otherwise).
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddToCartRequest>,
) -> Result<impl IntoResponse> {
    let (Some(product_id), Some(quantity)) = (body.product_id, body.quantity) else {
        return Err(AppError::BadRequest(
            "productId and quantity are required".to_string(),
        ));
    };
    if quantity < 1 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_string(),
        ));
    }

    let cart_id = state
        .shopping()
        .add_to_cart(state.config().user_id, product_id, quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(CartCreated { id: cart_id })))
}

/// `GET /shopping/cart` - the shopper's active cart aggregate, or `null`
/// when no cart is active.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<Option<CartAggregate>>> {
    let cart = state.shopping().active_cart(state.config().user_id).await?;
    Ok(Json(cart))
}

/// `PUT /shopping/cart/{cart_id}/items/{product_id}` - set a line's quantity.
///
/// Quantity zero is rejected; removing a line is the DELETE route's job.
/// Updating a line that does not exist succeeds silently.
#[instrument(skip(state))]
pub async fn update_item(
    State(state): State<AppState>,
    Path((cart_id, product_id)): Path<(CartId, ProductId)>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<StatusCode> {
    let Some(quantity) = body.quantity else {
        return Err(AppError::BadRequest("quantity is required".to_string()));
    };
    if quantity < 1 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_string(),
        ));
    }

    state
        .shopping()
        .update_item_quantity(cart_id, product_id, quantity)
        .await?;
    Ok(StatusCode::OK)
}

/// `DELETE /shopping/cart/{cart_id}/items/{product_id}` - remove a line.
///
/// Idempotent: removing a line that does not exist returns `200` as well.
#[instrument(skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    Path((cart_id, product_id)): Path<(CartId, ProductId)>,
) -> Result<StatusCode> {
    state.shopping().remove_item(cart_id, product_id).await?;
    Ok(StatusCode::OK)
}
