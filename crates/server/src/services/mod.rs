//! Business services for the cart backend.
//!
//! - [`cart`] - The cart consistency engine and its storage contract
//! - [`catalog`] - The catalog collaborator contract
//! - [`presenter`] - Read-side assembly of cart aggregates

pub mod cart;
pub mod catalog;
pub mod presenter;

#[cfg(test)]
pub(crate) mod testing;

pub use cart::{CartService, CartStore, ShoppingError};
pub use catalog::Catalog;
