use super::account;
use sea_orm::entity::prelude::*;

/// Directed follow edge: `follower_id` follows `following_id`.
/// The pair is unique; the reverse edge is an independent row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "follows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub follower_id: i32,
    pub following_id: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "account::Entity",
        from = "Column::FollowerId",
        to = "account::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Follower,
    #[sea_orm(
        belongs_to = "account::Entity",
        from = "Column::FollowingId",
        to = "account::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Following,
}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    /// Selects the single edge `follower -> following`, if present.
    pub fn find_edge(follower_id: i32, following_id: i32) -> Select<Entity> {
        Entity::find()
            .filter(Column::FollowerId.eq(follower_id))
            .filter(Column::FollowingId.eq(following_id))
    }
}
