//! Marketplace core: accounts and credentials, follows, products, likes,
//! categories and hashtags on top of the `model` entities.
//!
//! Every operation takes the connection and, where it matters, the acting
//! account explicitly.

pub mod accounts;
pub mod associations;
pub mod categories;
pub mod error;
pub mod hashtags;
pub mod password;
pub mod products;
pub mod tag_registry;

#[cfg(test)]
mod testing;

pub use error::{MarketError, Result};
