//! Product listings: create, edit, delete, view counting and likes.
//!
//! The hashtag set of a product always mirrors the tags in its `content`;
//! it is re-extracted and fully replaced on every create and update.

use common::{HashTagDto, ProductDto};
use model::entities::{account, product, product_hashtag, product_like};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, warn};

use crate::associations;
use crate::categories::find_category;
use crate::error::{MarketError, Result};
use crate::hashtags::extract_hashtags;

/// Input for a new listing. Price and quantity cannot be negative by construction.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub content: String,
    pub product_name: String,
    pub price: u32,
    pub quantity: u32,
    pub image: Option<String>,
    pub category_id: i32,
}

/// Editable fields of a listing. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub product_name: Option<String>,
    pub price: Option<u32>,
    pub quantity: Option<u32>,
    pub image: Option<String>,
    pub category_id: Option<i32>,
}

fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MarketError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

fn ensure_author(product: &product::Model, actor: &account::Model) -> Result<()> {
    if product.author_id != actor.id {
        warn!(
            "Account {} is not the author of product {}",
            actor.id, product.id
        );
        return Err(MarketError::Authorization(
            "Only the author can modify this product".to_string(),
        ));
    }
    Ok(())
}

pub async fn get_product<C>(db: &C, id: i32) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    product::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| MarketError::NotFound(format!("Product {} not found", id)))
}

/// Creates a listing owned by `author` and links the hashtags found in its content.
#[instrument(skip(db, author, new), fields(author = author.id, category = new.category_id))]
pub async fn create_product<C>(
    db: &C,
    author: &account::Model,
    new: NewProduct,
) -> Result<product::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    let title = require_text("Title", &new.title)?;
    let product_name = require_text("Product name", &new.product_name)?;

    let txn = db.begin().await?;

    find_category(&txn, new.category_id).await?;

    let created = product::ActiveModel {
        title: Set(title),
        content: Set(new.content),
        product_name: Set(product_name),
        price: Set(i64::from(new.price)),
        quantity: Set(i64::from(new.quantity)),
        image: Set(new.image),
        views: Set(0),
        author_id: Set(author.id),
        category_id: Set(new.category_id),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let names = extract_hashtags(&created.content);
    associations::tag_product(&txn, &created, &names).await?;

    txn.commit().await?;

    info!(
        "Account {} listed product {} with {} hashtag(s)",
        author.id,
        created.id,
        names.len()
    );
    Ok(created)
}

/// Edits a listing. Only its author may do so.
#[instrument(skip(db, actor, changes), fields(actor = actor.id))]
pub async fn update_product<C>(
    db: &C,
    actor: &account::Model,
    product_id: i32,
    changes: ProductChanges,
) -> Result<product::Model>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let existing = get_product(&txn, product_id).await?;
    ensure_author(&existing, actor)?;

    let mut active = existing.into_active_model();
    if let Some(title) = changes.title {
        active.title = Set(require_text("Title", &title)?);
    }
    if let Some(content) = changes.content {
        active.content = Set(content);
    }
    if let Some(product_name) = changes.product_name {
        active.product_name = Set(require_text("Product name", &product_name)?);
    }
    if let Some(price) = changes.price {
        active.price = Set(i64::from(price));
    }
    if let Some(quantity) = changes.quantity {
        active.quantity = Set(i64::from(quantity));
    }
    if let Some(image) = changes.image {
        active.image = Set(Some(image));
    }
    if let Some(category_id) = changes.category_id {
        find_category(&txn, category_id).await?;
        active.category_id = Set(category_id);
    }

    let updated = active.update(&txn).await?;

    let names = extract_hashtags(&updated.content);
    associations::tag_product(&txn, &updated, &names).await?;

    txn.commit().await?;

    info!("Account {} updated product {}", actor.id, updated.id);
    Ok(updated)
}

/// Removes a listing with its likes and hashtag links. Only its author may do so.
#[instrument(skip(db, actor), fields(actor = actor.id))]
pub async fn delete_product<C>(db: &C, actor: &account::Model, product_id: i32) -> Result<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let existing = get_product(&txn, product_id).await?;
    ensure_author(&existing, actor)?;

    product_like::Entity::delete_many()
        .filter(product_like::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?;
    product_hashtag::Entity::delete_many()
        .filter(product_hashtag::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?;
    product::Entity::delete_by_id(product_id).exec(&txn).await?;

    txn.commit().await?;

    info!("Account {} deleted product {}", actor.id, product_id);
    Ok(())
}

/// Increments the view counter in place and returns the count this call
/// produced, read from the same statement via `RETURNING`.
#[instrument(skip(db))]
pub async fn record_view<C>(db: &C, product_id: i32) -> Result<i64>
where
    C: ConnectionTrait,
{
    let updated = product::Entity::update_many()
        .col_expr(
            product::Column::Views,
            Expr::col(product::Column::Views).add(1),
        )
        .filter(product::Column::Id.eq(product_id))
        .exec_with_returning(db)
        .await?;

    let views = updated.first().map(|row| row.views).ok_or_else(|| {
        MarketError::NotFound(format!("Product {} not found", product_id))
    })?;
    debug!("Product {} now has {} view(s)", product_id, views);
    Ok(views)
}

/// One page of listings, newest first. Pages start at 1.
pub async fn list_products<C>(db: &C, page: u64, per_page: u64) -> Result<Vec<product::Model>>
where
    C: ConnectionTrait,
{
    let paginator = product::Entity::find()
        .order_by_desc(product::Column::CreatedAt)
        .order_by_desc(product::Column::Id)
        .paginate(db, per_page.max(1));

    Ok(paginator.fetch_page(page.saturating_sub(1)).await?)
}

/// Likes a listing on behalf of `actor`.
pub async fn like_product<C>(db: &C, actor: &account::Model, product_id: i32) -> Result<u64>
where
    C: ConnectionTrait,
{
    let target = get_product(db, product_id).await?;
    associations::add_like(db, &target, actor).await?;
    associations::like_count(db, product_id).await
}

/// Withdraws the like of `actor` from a listing.
pub async fn unlike_product<C>(db: &C, actor: &account::Model, product_id: i32) -> Result<u64>
where
    C: ConnectionTrait,
{
    let target = get_product(db, product_id).await?;
    associations::remove_like(db, &target, actor).await?;
    associations::like_count(db, product_id).await
}

/// Client-facing representation with author name, hashtags and like count.
pub async fn product_dto<C>(db: &C, product: &product::Model) -> Result<ProductDto>
where
    C: ConnectionTrait,
{
    let author = account::Entity::find_by_id(product.author_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            MarketError::NotFound(format!("Author {} not found", product.author_id))
        })?;
    let hashtags = associations::hashtags_of(db, product.id).await?;
    let like_user_counter = associations::like_count(db, product.id).await?;

    Ok(ProductDto {
        id: product.id,
        title: product.title.clone(),
        author: author.username,
        author_id: product.author_id,
        content: product.content.clone(),
        product_name: product.product_name.clone(),
        price: product.price,
        quantity: product.quantity,
        image: product.image.clone(),
        category: product.category_id,
        hashtags: hashtags
            .into_iter()
            .map(|tag| HashTagDto {
                id: tag.id,
                name: tag.name,
            })
            .collect(),
        like_user_counter,
        created_at: product.created_at,
        updated_at: product.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::associations::{hashtags_of, like_count};
    use crate::testing::{create_category, create_member, insert_product, setup_db, setup_pooled_db};
    use model::entities::category;

    fn listing(category: &category::Model, content: &str) -> NewProduct {
        NewProduct {
            title: "Running shoes".to_string(),
            content: content.to_string(),
            product_name: "Sneaker X".to_string(),
            price: 45000,
            quantity: 2,
            image: None,
            category_id: category.id,
        }
    }

    fn tag_names(tags: Vec<model::entities::hashtag::Model>) -> Vec<String> {
        tags.into_iter().map(|t| t.name).collect()
    }

    #[tokio::test]
    async fn test_create_links_hashtags() {
        let db = setup_db().await;
        let seller = create_member(&db, "seller").await;
        let shoes = create_category(&db, "Shoes").await;

        let created = create_product(&db, &seller, listing(&shoes, "nice #shoes item"))
            .await
            .unwrap();

        assert_eq!(created.views, 0);
        assert_eq!(created.author_id, seller.id);
        assert_eq!(created.price, 45000);
        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(tag_names(hashtags_of(&db, created.id).await.unwrap()), vec!["shoes"]);
    }

    #[tokio::test]
    async fn test_overlong_hashtag_does_not_block_listing() {
        let db = setup_db().await;
        let seller = create_member(&db, "seller").await;
        let shoes = create_category(&db, "Shoes").await;

        let content = format!("great #{} deal #sale", "a".repeat(51));
        let created = create_product(&db, &seller, listing(&shoes, &content))
            .await
            .unwrap();

        assert_eq!(tag_names(hashtags_of(&db, created.id).await.unwrap()), vec!["sale"]);

        let changes = ProductChanges {
            content: Some(format!("#{}", "b".repeat(51))),
            ..Default::default()
        };
        update_product(&db, &seller, created.id, changes).await.unwrap();
        assert!(hashtags_of(&db, created.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_requires_existing_category() {
        let db = setup_db().await;
        let seller = create_member(&db, "seller").await;
        let shoes = create_category(&db, "Shoes").await;

        let mut new = listing(&shoes, "#orphan");
        new.category_id = shoes.id + 100;

        let result = create_product(&db, &seller, new).await;
        assert!(matches!(result, Err(MarketError::NotFound(_))));
        assert_eq!(product::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(
            model::entities::hashtag::Entity::find().count(&db).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_update_replaces_hashtags() {
        let db = setup_db().await;
        let seller = create_member(&db, "seller").await;
        let shoes = create_category(&db, "Shoes").await;
        let created = create_product(&db, &seller, listing(&shoes, "nice #shoes item"))
            .await
            .unwrap();

        let updated = update_product(
            &db,
            &seller,
            created.id,
            ProductChanges {
                content: Some("no tags here".to_string()),
                price: Some(39000),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.price, 39000);
        assert_eq!(updated.title, created.title);
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
        assert!(hashtags_of(&db, created.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_only_author_may_modify() {
        let db = setup_db().await;
        let seller = create_member(&db, "seller").await;
        let other = create_member(&db, "other").await;
        let shoes = create_category(&db, "Shoes").await;
        let created = create_product(&db, &seller, listing(&shoes, "#shoes"))
            .await
            .unwrap();

        let edit = update_product(
            &db,
            &other,
            created.id,
            ProductChanges {
                title: Some("Mine now".to_string()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(edit, Err(MarketError::Authorization(_))));

        let removal = delete_product(&db, &other, created.id).await;
        assert!(matches!(removal, Err(MarketError::Authorization(_))));

        assert_eq!(get_product(&db, created.id).await.unwrap().title, "Running shoes");
    }

    #[tokio::test]
    async fn test_delete_product() {
        let db = setup_db().await;
        let seller = create_member(&db, "seller").await;
        let buyer = create_member(&db, "buyer").await;
        let shoes = create_category(&db, "Shoes").await;
        let created = create_product(&db, &seller, listing(&shoes, "#shoes"))
            .await
            .unwrap();
        like_product(&db, &buyer, created.id).await.unwrap();

        delete_product(&db, &seller, created.id).await.unwrap();

        assert!(matches!(
            get_product(&db, created.id).await,
            Err(MarketError::NotFound(_))
        ));
        assert_eq!(like_count(&db, created.id).await.unwrap(), 0);
        assert!(matches!(
            delete_product(&db, &seller, created.id).await,
            Err(MarketError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_record_view_counts_up() {
        let db = setup_db().await;
        let seller = create_member(&db, "seller").await;
        let shoes = create_category(&db, "Shoes").await;
        let created = create_product(&db, &seller, listing(&shoes, "plain"))
            .await
            .unwrap();

        assert_eq!(record_view(&db, created.id).await.unwrap(), 1);
        assert_eq!(record_view(&db, created.id).await.unwrap(), 2);

        assert!(matches!(
            record_view(&db, created.id + 1).await,
            Err(MarketError::NotFound(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_views_each_see_their_own_count() {
        let (_dir, db) = setup_pooled_db().await;
        let seller = create_member(&db, "seller").await;
        let shoes = create_category(&db, "Shoes").await;
        let product_id = insert_product(&db, &seller, &shoes, "Running shoes").await.id;

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let db = db.clone();
                tokio::spawn(async move { record_view(&db, product_id).await })
            })
            .collect();

        let mut seen = Vec::new();
        for task in tasks {
            seen.push(task.await.unwrap().unwrap());
        }
        seen.sort_unstable();

        assert_eq!(seen, (1..=8).collect::<Vec<i64>>());
        assert_eq!(get_product(&db, product_id).await.unwrap().views, 8);
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let db = setup_db().await;
        let seller = create_member(&db, "seller").await;
        let shoes = create_category(&db, "Shoes").await;

        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(
                create_product(&db, &seller, listing(&shoes, "plain"))
                    .await
                    .unwrap()
                    .id,
            );
        }

        let first_page: Vec<i32> = list_products(&db, 1, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(first_page, vec![ids[2], ids[1]]);

        let second_page = list_products(&db, 2, 2).await.unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].id, ids[0]);

        assert!(list_products(&db, 3, 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_likes_through_products_and_dto() {
        let db = setup_db().await;
        let seller = create_member(&db, "seller").await;
        let buyer = create_member(&db, "buyer").await;
        let shoes = create_category(&db, "Shoes").await;
        let created = create_product(&db, &seller, listing(&shoes, "#shoes #sale"))
            .await
            .unwrap();

        assert_eq!(like_product(&db, &buyer, created.id).await.unwrap(), 1);
        assert_eq!(like_product(&db, &buyer, created.id).await.unwrap(), 1);
        assert!(matches!(
            like_product(&db, &seller, created.id).await,
            Err(MarketError::Authorization(_))
        ));

        let dto = product_dto(&db, &created).await.unwrap();
        assert_eq!(dto.author, "seller");
        assert_eq!(dto.like_user_counter, 1);
        assert_eq!(dto.category, shoes.id);
        let names: Vec<&str> = dto.hashtags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["shoes", "sale"]);

        assert_eq!(unlike_product(&db, &buyer, created.id).await.unwrap(), 0);
    }
}
