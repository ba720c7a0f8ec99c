use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct HashTagDto {
    pub id: i32,
    pub name: String,
}

/// Product listing as returned to clients. The view counter and the liker
/// set are not exposed here; only the number of likes is.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProductDto {
    pub id: i32,
    pub title: String,
    /// Username of the author
    pub author: String,
    pub author_id: i32,
    pub content: String,
    pub product_name: String,
    pub price: i64,
    pub quantity: i64,
    pub image: Option<String>,
    /// Category ID
    pub category: i32,
    pub hashtags: Vec<HashTagDto>,
    pub like_user_counter: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Detail view payload: the product plus the view count after this visit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProductDetailDto {
    pub product: ProductDto,
    pub views: i64,
}
