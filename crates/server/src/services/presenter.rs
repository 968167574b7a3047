//! Read-side assembly of cart aggregates.
//!
//! The aggregate is recomputed on every read from the joined snapshot.
//! Nothing here is cached, so there is no invalidation to get wrong.

use rust_decimal::Decimal;

use crate::models::{CartAggregate, CartAggregateItem, CartSnapshot};

/// Assemble the shopper-facing aggregate from a cart snapshot.
///
/// A snapshot with zero lines produces `items: []` and `total: 0` - a
/// legitimately empty cart, distinct from "no active cart".
#[must_use]
pub fn present(snapshot: CartSnapshot) -> CartAggregate {
    let items: Vec<CartAggregateItem> = snapshot
        .lines
        .into_iter()
        .map(|line| CartAggregateItem {
            product_id: line.product_id,
            name: line.name,
            unit_price: line.price,
            quantity: line.quantity,
            line_total: line.price.line_total(line.quantity),
        })
        .collect();

    let total: Decimal = items.iter().map(|item| item.line_total).sum();

    CartAggregate {
        id: snapshot.cart.id,
        store: snapshot.store,
        items,
        total,
    }
}
