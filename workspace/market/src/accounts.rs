//! Account lifecycle and credentials.

use chrono::Utc;
use common::{AccountSummary, ProfileDto};
use model::entities::{account, follow, product, product_hashtag, product_like};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info, instrument, warn};

use crate::associations;
use crate::error::{MarketError, Result};
use crate::password;

/// Longest accepted username, in characters.
pub const MAX_USERNAME_LEN: usize = 150;

/// Input for a new account. `password` is the raw password.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub username: String,
    pub password: String,
    pub profile_image: Option<String>,
}

/// Fields a member may change on their own profile. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub profile_image: Option<String>,
}

/// Trims the address and lower-cases the domain part. The local part keeps its case.
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim();
    if email.is_empty() {
        return Err(MarketError::Validation("Email is required".to_string()));
    }

    match email.rsplit_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            Ok(format!("{}@{}", local, domain.to_lowercase()))
        }
        _ => Err(MarketError::Validation(format!(
            "'{}' is not a valid email address",
            email
        ))),
    }
}

fn validate_username(username: &str) -> Result<String> {
    let username = username.trim();
    if username.is_empty() {
        return Err(MarketError::Validation("Username is required".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(MarketError::Validation(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_LEN
        )));
    }
    Ok(username.to_string())
}

async fn ensure_available<C>(db: &C, email: &str, username: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let email_taken = account::Entity::find()
        .filter(account::Column::Email.eq(email))
        .count(db)
        .await?
        > 0;
    if email_taken {
        return Err(MarketError::Uniqueness(format!(
            "An account with email '{}' already exists",
            email
        )));
    }

    let username_taken = account::Entity::find()
        .filter(account::Column::Username.eq(username))
        .count(db)
        .await?
        > 0;
    if username_taken {
        return Err(MarketError::Uniqueness(format!(
            "Username '{}' is already taken",
            username
        )));
    }
    Ok(())
}

/// Blank or missing images fall back to the default avatar.
fn profile_image_or_default(image: Option<String>) -> String {
    image
        .filter(|image| !image.trim().is_empty())
        .unwrap_or_else(|| account::DEFAULT_PROFILE_IMAGE.to_string())
}

async fn insert_account<C>(db: &C, new: NewAccount, privileged: bool) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    let email = normalize_email(&new.email)?;
    let username = validate_username(&new.username)?;
    password::validate_password(&new.password, &[&username, &email])?;

    ensure_available(db, &email, &username).await?;

    let hashed = password::hash_password(&new.password)?;
    let profile_image = profile_image_or_default(new.profile_image);

    let created = account::ActiveModel {
        email: Set(email.clone()),
        username: Set(username),
        password: Set(hashed),
        profile_image: Set(Some(profile_image)),
        is_staff: Set(privileged),
        is_superuser: Set(privileged),
        is_active: Set(true),
        date_joined: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    // The pre-check above can still lose a race against a concurrent signup
    .map_err(|err| MarketError::unique_or_db(err, "Email or username already in use"))?;

    info!("Created account {} ({})", created.id, email);
    Ok(created)
}

/// Registers a regular member.
#[instrument(skip(db, new), fields(email = %new.email, username = %new.username))]
pub async fn create_account<C>(db: &C, new: NewAccount) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    insert_account(db, new, false).await
}

/// Registers an account with the staff and superuser flags set.
#[instrument(skip(db, new), fields(email = %new.email, username = %new.username))]
pub async fn create_superuser<C>(db: &C, new: NewAccount) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    insert_account(db, new, true).await
}

pub fn verify_password(account: &account::Model, raw: &str) -> Result<bool> {
    password::verify_password(raw, &account.password)
}

/// Looks up an active account by email and checks its password.
#[instrument(skip(db, raw))]
pub async fn authenticate<C>(db: &C, email: &str, raw: &str) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    let rejected = || MarketError::Authentication("Invalid email or password".to_string());

    let email = normalize_email(email).map_err(|_| rejected())?;
    let Some(found) = account::Entity::find()
        .filter(account::Column::Email.eq(email.as_str()))
        .one(db)
        .await?
    else {
        debug!("No account for {}", email);
        return Err(rejected());
    };

    if !found.is_active {
        warn!("Login attempt on inactive account {}", found.id);
        return Err(rejected());
    }

    if !verify_password(&found, raw)? {
        warn!("Wrong password for account {}", found.id);
        return Err(rejected());
    }

    debug!("Authenticated account {}", found.id);
    Ok(found)
}

/// Replaces the password after checking the old one.
#[instrument(skip(db, account, old, new), fields(account = account.id))]
pub async fn change_password<C>(
    db: &C,
    account: &account::Model,
    old: &str,
    new: &str,
) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    if !verify_password(account, old)? {
        warn!("Password change with wrong current password on {}", account.id);
        return Err(MarketError::Authentication(
            "Current password is incorrect".to_string(),
        ));
    }

    if verify_password(account, new)? {
        return Err(MarketError::Policy(
            "New password must differ from the current password".to_string(),
        ));
    }

    password::validate_password(new, &[&account.username, &account.email])?;

    let mut active = account.clone().into_active_model();
    active.password = Set(password::hash_password(new)?);
    let updated = active.update(db).await?;

    info!("Changed password of account {}", updated.id);
    Ok(updated)
}

/// Applies username and profile image changes.
#[instrument(skip(db, account), fields(account = account.id))]
pub async fn update_profile<C>(
    db: &C,
    account: &account::Model,
    changes: ProfileChanges,
) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    let mut active = account.clone().into_active_model();

    if let Some(username) = changes.username {
        let username = validate_username(&username)?;
        if username != account.username {
            let taken = account::Entity::find()
                .filter(account::Column::Username.eq(username.as_str()))
                .count(db)
                .await?
                > 0;
            if taken {
                return Err(MarketError::Uniqueness(format!(
                    "Username '{}' is already taken",
                    username
                )));
            }
            active.username = Set(username);
        }
    }

    if let Some(image) = changes.profile_image {
        active.profile_image = Set(Some(profile_image_or_default(Some(image))));
    }

    if !active.is_changed() {
        debug!("Profile of account {} unchanged", account.id);
        return Ok(account.clone());
    }

    let updated = active
        .update(db)
        .await
        .map_err(|err| MarketError::unique_or_db(err, "Username is already taken"))?;
    info!("Updated profile of account {}", updated.id);
    Ok(updated)
}

/// Deletes the account with its follow edges, its likes and its products
/// (together with the likes and hashtag links on those products).
#[instrument(skip(db, account), fields(account = account.id))]
pub async fn delete_account<C>(db: &C, account: &account::Model) -> Result<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let product_ids: Vec<i32> = product::Entity::find()
        .select_only()
        .column(product::Column::Id)
        .filter(product::Column::AuthorId.eq(account.id))
        .into_tuple()
        .all(&txn)
        .await?;

    let likes = product_like::Entity::delete_many()
        .filter(
            Condition::any()
                .add(product_like::Column::AccountId.eq(account.id))
                .add(product_like::Column::ProductId.is_in(product_ids.clone())),
        )
        .exec(&txn)
        .await?;

    product_hashtag::Entity::delete_many()
        .filter(product_hashtag::Column::ProductId.is_in(product_ids.clone()))
        .exec(&txn)
        .await?;

    product::Entity::delete_many()
        .filter(product::Column::AuthorId.eq(account.id))
        .exec(&txn)
        .await?;

    let follows = follow::Entity::delete_many()
        .filter(
            Condition::any()
                .add(follow::Column::FollowerId.eq(account.id))
                .add(follow::Column::FollowingId.eq(account.id)),
        )
        .exec(&txn)
        .await?;

    account::Entity::delete_by_id(account.id).exec(&txn).await?;

    txn.commit().await?;

    info!(
        products = product_ids.len(),
        likes = likes.rows_affected,
        follows = follows.rows_affected,
        "Deleted account {}",
        account.id
    );
    Ok(())
}

/// Self-service deletion: the password must verify first.
#[instrument(skip(db, account, raw), fields(account = account.id))]
pub async fn resign<C>(db: &C, account: &account::Model, raw: &str) -> Result<()>
where
    C: ConnectionTrait + TransactionTrait,
{
    if !verify_password(account, raw)? {
        warn!("Resign with wrong password on account {}", account.id);
        return Err(MarketError::Authentication(
            "Password does not match".to_string(),
        ));
    }
    delete_account(db, account).await
}

pub async fn find_account<C>(db: &C, id: i32) -> Result<account::Model>
where
    C: ConnectionTrait,
{
    account::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| MarketError::NotFound(format!("Account {} not found", id)))
}

pub fn summary(account: &account::Model) -> AccountSummary {
    AccountSummary {
        id: account.id,
        email: account.email.clone(),
        username: account.username.clone(),
        profile_image: account.profile_image.clone(),
    }
}

/// Profile with follow lists and counts read from the follow edges.
pub async fn profile<C>(db: &C, account: &account::Model) -> Result<ProfileDto>
where
    C: ConnectionTrait,
{
    let followings = associations::followings(db, account.id).await?;
    let followers = associations::followers(db, account.id).await?;

    Ok(ProfileDto {
        id: account.id,
        email: account.email.clone(),
        username: account.username.clone(),
        profile_image: account.profile_image.clone(),
        follower_count: followers.len() as u64,
        following_count: followings.len() as u64,
        followings: followings.iter().map(summary).collect(),
        followers: followers.iter().map(summary).collect(),
    })
}
