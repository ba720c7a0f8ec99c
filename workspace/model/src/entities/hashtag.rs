use sea_orm::entity::prelude::*;

/// Longest accepted hashtag name, in characters.
pub const MAX_NAME_LEN: usize = 50;

/// A hashtag shared by any number of products. Stored without the leading `#`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "hashtags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_hashtag::Entity")]
    ProductHashTag,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        super::product_hashtag::Relation::Product.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::product_hashtag::Relation::HashTag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    pub fn find_by_name(name: &str) -> Select<Entity> {
        Entity::find().filter(Column::Name.eq(name))
    }
}

/// Characters allowed in a hashtag: ASCII letters and digits, `_`, and
/// precomposed Hangul syllables (U+AC00 to U+D7A3).
pub fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

/// Returns true when `name` is non-empty, not too long and made only of tag characters.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().count() <= MAX_NAME_LEN && name.chars().all(is_tag_char)
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.name)
    }
}
