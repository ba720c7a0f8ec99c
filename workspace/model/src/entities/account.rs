use sea_orm::entity::prelude::*;

/// Profile image assigned to accounts that never uploaded one.
pub const DEFAULT_PROFILE_IMAGE: &str = "profile/default.png";

/// A marketplace member. The email is the login key; the username is the
/// public display name.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Normalized email address, unique across accounts.
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    /// PHC-formatted password hash. Never the raw password.
    pub password: String,
    pub profile_image: Option<String>,
    #[sea_orm(default_value = "false")]
    pub is_staff: bool,
    #[sea_orm(default_value = "false")]
    pub is_superuser: bool,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    pub date_joined: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Products this account has listed.
    #[sea_orm(has_many = "super::product::Entity")]
    Product,
    /// Likes this account has left on other products.
    #[sea_orm(has_many = "super::product_like::Entity")]
    ProductLike,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::product_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductLike.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
