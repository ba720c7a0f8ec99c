//! Many-to-many bookkeeping: follow edges between accounts, likes on
//! products and the hashtag set of a product. Every mutation is written
//! immediately; counts are always computed from the rows on read.

use chrono::Utc;
use model::entities::{account, follow, hashtag, product, product_hashtag, product_like};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{MarketError, Result};
use crate::tag_registry;

/// What a follow toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowOutcome {
    Followed,
    Unfollowed,
}

impl FollowOutcome {
    pub fn is_followed(self) -> bool {
        matches!(self, FollowOutcome::Followed)
    }
}

/// Follows `target` if `follower` does not follow it yet, otherwise unfollows.
///
/// Following yourself is refused regardless of the caller.
#[instrument(skip(db, follower, target), fields(follower = follower.id, target = target.id))]
pub async fn toggle_follow<C>(
    db: &C,
    follower: &account::Model,
    target: &account::Model,
) -> Result<FollowOutcome>
where
    C: ConnectionTrait,
{
    if follower.id == target.id {
        warn!("Account {} tried to follow itself", follower.id);
        return Err(MarketError::Authorization(
            "You cannot follow yourself".to_string(),
        ));
    }

    let removed = follow::Entity::delete_many()
        .filter(follow::Column::FollowerId.eq(follower.id))
        .filter(follow::Column::FollowingId.eq(target.id))
        .exec(db)
        .await?;

    if removed.rows_affected > 0 {
        info!("Account {} unfollowed {}", follower.id, target.id);
        return Ok(FollowOutcome::Unfollowed);
    }

    follow::ActiveModel {
        follower_id: Set(follower.id),
        following_id: Set(target.id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|err| {
        MarketError::unique_or_db(
            err,
            format!("Account {} already follows {}", follower.id, target.id),
        )
    })?;

    info!("Account {} followed {}", follower.id, target.id);
    Ok(FollowOutcome::Followed)
}

/// True when the edge `follower_id -> following_id` exists.
pub async fn is_following<C>(db: &C, follower_id: i32, following_id: i32) -> Result<bool>
where
    C: ConnectionTrait,
{
    let count = follow::Entity::find_edge(follower_id, following_id)
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Accounts following `account_id`, oldest edge first.
pub async fn followers<C>(db: &C, account_id: i32) -> Result<Vec<account::Model>>
where
    C: ConnectionTrait,
{
    Ok(account::Entity::find()
        .join(JoinType::InnerJoin, follow::Relation::Follower.def().rev())
        .filter(follow::Column::FollowingId.eq(account_id))
        .order_by_asc(follow::Column::CreatedAt)
        .all(db)
        .await?)
}

/// Accounts `account_id` follows, oldest edge first.
pub async fn followings<C>(db: &C, account_id: i32) -> Result<Vec<account::Model>>
where
    C: ConnectionTrait,
{
    Ok(account::Entity::find()
        .join(JoinType::InnerJoin, follow::Relation::Following.def().rev())
        .filter(follow::Column::FollowerId.eq(account_id))
        .order_by_asc(follow::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn follower_count<C>(db: &C, account_id: i32) -> Result<u64>
where
    C: ConnectionTrait,
{
    Ok(follow::Entity::find()
        .filter(follow::Column::FollowingId.eq(account_id))
        .count(db)
        .await?)
}

pub async fn following_count<C>(db: &C, account_id: i32) -> Result<u64>
where
    C: ConnectionTrait,
{
    Ok(follow::Entity::find()
        .filter(follow::Column::FollowerId.eq(account_id))
        .count(db)
        .await?)
}

fn ensure_not_author(product: &product::Model, account: &account::Model) -> Result<()> {
    if product.author_id == account.id {
        warn!(
            "Account {} tried to change likes on own product {}",
            account.id, product.id
        );
        return Err(MarketError::Authorization(
            "You cannot like or unlike your own product".to_string(),
        ));
    }
    Ok(())
}

/// Adds `account` to the like set of `product`. Liking twice is a no-op.
#[instrument(skip(db, product, account), fields(product = product.id, account = account.id))]
pub async fn add_like<C>(db: &C, product: &product::Model, account: &account::Model) -> Result<()>
where
    C: ConnectionTrait,
{
    ensure_not_author(product, account)?;

    let insert = product_like::Entity::insert(product_like::ActiveModel {
        product_id: Set(product.id),
        account_id: Set(account.id),
        created_at: Set(Utc::now()),
    })
    .on_conflict(
        OnConflict::columns([
            product_like::Column::ProductId,
            product_like::Column::AccountId,
        ])
        .do_nothing()
        .to_owned(),
    )
    .exec_without_returning(db)
    .await;

    match insert {
        Ok(0) | Err(DbErr::RecordNotInserted) => {
            debug!("Product {} already liked by {}", product.id, account.id)
        }
        Ok(_) => info!("Account {} liked product {}", account.id, product.id),
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

/// Removes `account` from the like set of `product`. Removing a missing like is a no-op.
#[instrument(skip(db, product, account), fields(product = product.id, account = account.id))]
pub async fn remove_like<C>(
    db: &C,
    product: &product::Model,
    account: &account::Model,
) -> Result<()>
where
    C: ConnectionTrait,
{
    ensure_not_author(product, account)?;

    let removed = product_like::Entity::delete_many()
        .filter(product_like::Column::ProductId.eq(product.id))
        .filter(product_like::Column::AccountId.eq(account.id))
        .exec(db)
        .await?;
    debug!(
        "Removed {} like row(s) of account {} on product {}",
        removed.rows_affected, account.id, product.id
    );
    Ok(())
}

pub async fn like_count<C>(db: &C, product_id: i32) -> Result<u64>
where
    C: ConnectionTrait,
{
    Ok(product_like::Entity::find()
        .filter(product_like::Column::ProductId.eq(product_id))
        .count(db)
        .await?)
}

/// Accounts that like `product_id`.
pub async fn likers<C>(db: &C, product_id: i32) -> Result<Vec<account::Model>>
where
    C: ConnectionTrait,
{
    Ok(account::Entity::find()
        .join(JoinType::InnerJoin, product_like::Relation::Account.def().rev())
        .filter(product_like::Column::ProductId.eq(product_id))
        .order_by_asc(product_like::Column::CreatedAt)
        .all(db)
        .await?)
}

/// Replaces the whole hashtag set of `product` with the tags named in `names`.
///
/// Tags that are no longer named are unlinked; the tag rows themselves stay.
#[instrument(skip(db, product), fields(product = product.id))]
pub async fn tag_product<C>(
    db: &C,
    product: &product::Model,
    names: &[String],
) -> Result<Vec<hashtag::Model>>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let tags = tag_registry::resolve_all(&txn, names).await?;

    product_hashtag::Entity::delete_many()
        .filter(product_hashtag::Column::ProductId.eq(product.id))
        .exec(&txn)
        .await?;

    if !tags.is_empty() {
        product_hashtag::Entity::insert_many(tags.iter().map(|tag| product_hashtag::ActiveModel {
            product_id: Set(product.id),
            hashtag_id: Set(tag.id),
        }))
        .exec_without_returning(&txn)
        .await?;
    }

    txn.commit().await?;
    debug!("Product {} now has {} hashtag(s)", product.id, tags.len());
    Ok(tags)
}

/// Hashtags currently linked to `product_id`.
pub async fn hashtags_of<C>(db: &C, product_id: i32) -> Result<Vec<hashtag::Model>>
where
    C: ConnectionTrait,
{
    Ok(hashtag::Entity::find()
        .join(JoinType::InnerJoin, product_hashtag::Relation::HashTag.def().rev())
        .filter(product_hashtag::Column::ProductId.eq(product_id))
        .order_by_asc(hashtag::Column::Id)
        .all(db)
        .await?)
}
