use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public view of an account, as listed among followers and followings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct AccountSummary {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub profile_image: Option<String>,
}

/// Full profile of an account. Counts are computed from the follow edges on read.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProfileDto {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub profile_image: Option<String>,
    /// Accounts this account follows
    pub followings: Vec<AccountSummary>,
    /// Accounts following this account
    pub followers: Vec<AccountSummary>,
    pub follower_count: u64,
    pub following_count: u64,
}

/// Result of a follow toggle.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FollowDto {
    /// True when the edge exists after the toggle
    pub is_followed: bool,
    pub target: AccountSummary,
}
