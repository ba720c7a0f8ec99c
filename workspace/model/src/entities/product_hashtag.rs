use super::{hashtag, product};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product_hashtags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub product_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub hashtag_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "product::Entity",
        from = "Column::ProductId",
        to = "product::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Product,
    #[sea_orm(
        belongs_to = "hashtag::Entity",
        from = "Column::HashtagId",
        to = "hashtag::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    HashTag,
}

impl Related<product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<hashtag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HashTag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
