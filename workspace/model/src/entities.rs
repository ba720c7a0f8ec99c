//! Root of the SeaORM entity modules for the marketplace.
//! Accounts list products; follows, likes and product hashtags are explicit
//! join entities so every edge carries its own uniqueness constraint.

pub mod account;
pub mod category;
pub mod follow;
pub mod hashtag;
pub mod product;
pub mod product_hashtag;
pub mod product_like;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::account::Entity as Account;
    pub use super::category::Entity as Category;
    pub use super::follow::Entity as Follow;
    pub use super::hashtag::Entity as HashTag;
    pub use super::product::Entity as Product;
    pub use super::product_hashtag::Entity as ProductHashTag;
    pub use super::product_like::Entity as ProductLike;
}
