use super::{account, category, hashtag};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

/// A product listing. `author_id` is fixed at creation; the hashtag set is
/// derived from `content` and rewritten on every save through the market layer.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub product_name: String,
    /// Never negative; the market layer only accepts unsigned input.
    pub price: i64,
    /// Never negative; the market layer only accepts unsigned input.
    pub quantity: i64,
    pub image: Option<String>,
    /// Detail-view counter. Only ever incremented in place.
    #[sea_orm(default_value = 0)]
    pub views: i64,
    pub author_id: i32,
    pub category_id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "account::Entity",
        from = "Column::AuthorId",
        to = "account::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(
        belongs_to = "category::Entity",
        from = "Column::CategoryId",
        to = "category::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(has_many = "super::product_like::Entity")]
    ProductLike,
    #[sea_orm(has_many = "super::product_hashtag::Entity")]
    ProductHashTag,
}

impl Related<account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<hashtag::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_hashtag::Relation::HashTag.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::product_hashtag::Relation::Product.def().rev())
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}
