//! Domain models for the cart and catalog backend.

pub mod cart;
pub mod product;

pub use cart::{CartAggregate, CartAggregateItem, CartLine, CartRecord, CartSnapshot};
pub use product::{Product, StoreSummary};
