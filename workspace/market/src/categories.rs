use common::CategoryDto;
use model::entities::category;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};
use tracing::{info, instrument, warn};

use crate::error::{MarketError, Result};

pub async fn list_categories<C>(db: &C) -> Result<Vec<category::Model>>
where
    C: ConnectionTrait,
{
    Ok(category::Entity::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await?)
}

#[instrument(skip(db))]
pub async fn create_category<C>(db: &C, name: &str) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    let name = name.trim();
    if name.is_empty() {
        warn!("Rejected empty category name");
        return Err(MarketError::Validation(
            "Category name must not be empty".to_string(),
        ));
    }

    let created = category::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|err| MarketError::unique_or_db(err, format!("Category '{}' already exists", name)))?;

    info!("Created category {} '{}'", created.id, created.name);
    Ok(created)
}

pub async fn find_category<C>(db: &C, id: i32) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| MarketError::NotFound(format!("Category {} not found", id)))
}

pub fn category_dto(category: &category::Model) -> CategoryDto {
    CategoryDto {
        id: category.id,
        name: category.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::setup_db;

    #[tokio::test]
    async fn test_create_and_list_sorted() {
        let db = setup_db().await;

        create_category(&db, "Shoes").await.unwrap();
        create_category(&db, " Books ").await.unwrap();

        let names: Vec<String> = list_categories(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Books", "Shoes"]);
    }

    #[tokio::test]
    async fn test_duplicate_category() {
        let db = setup_db().await;

        create_category(&db, "Shoes").await.unwrap();
        let result = create_category(&db, "Shoes").await;
        assert!(matches!(result, Err(MarketError::Uniqueness(_))));
    }

    #[tokio::test]
    async fn test_empty_name_and_missing_id() {
        let db = setup_db().await;

        assert!(matches!(
            create_category(&db, "   ").await,
            Err(MarketError::Validation(_))
        ));
        assert!(matches!(
            find_category(&db, 42).await,
            Err(MarketError::NotFound(_))
        ));
    }
}
