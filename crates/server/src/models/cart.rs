//! Cart domain types.
//!
//! Storage rows (`CartRecord`, `CartLine`) are separate from the wire-level
//! [`CartAggregate`], which is reconstructed on every read and never stored.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use mercado_core::{CartId, Price, ProductId, StoreId, UserId};

use super::product::StoreSummary;

/// A cart row (domain type).
///
/// `store_id` is fixed at creation; store exclusivity is enforced by
/// soft-closing carts, never by migrating items between stores. A
/// deactivated cart stays around as historical record.
#[derive(Debug, Clone)]
pub struct CartRecord {
    /// Unique cart ID.
    pub id: CartId,
    /// Shopper who owns this cart.
    pub user_id: UserId,
    /// Store this cart belongs to.
    pub store_id: StoreId,
    /// Whether this is the shopper's current cart. At most one active cart
    /// per shopper exists at any instant.
    pub active: bool,
    /// When the cart was opened.
    pub created_at: DateTime<Utc>,
}

/// A cart line joined against the catalog at read time.
///
/// Name and price are the catalog's current values, not a snapshot taken
/// when the line was added.
#[derive(Debug, Clone)]
pub struct CartLine {
    /// Product on this line.
    pub product_id: ProductId,
    /// Current catalog name.
    pub name: String,
    /// Current catalog unit price.
    pub price: Price,
    /// Units of the product in the cart. Always positive; a line reaching
    /// zero is deleted, not stored.
    pub quantity: i32,
}

/// A cart row with its store descriptor and outer-joined lines.
///
/// `lines` is empty (not absent) for a cart whose items were all removed.
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    pub cart: CartRecord,
    pub store: StoreSummary,
    pub lines: Vec<CartLine>,
}

/// Wire representation of one aggregate line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAggregateItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: i32,
    pub line_total: Decimal,
}

/// The shopper-facing cart aggregate: store descriptor, item list, computed
/// total. Derived per read, never cached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAggregate {
    pub id: CartId,
    pub store: StoreSummary,
    pub items: Vec<CartAggregateItem>,
    pub total: Decimal,
}
