use model::entities::hashtag;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Set};
use tracing::{debug, instrument, trace, warn};

use crate::error::{MarketError, Result, is_unique_violation};

/// How many times the insert-then-read cycle runs before giving up.
const RESOLVE_ATTEMPTS: usize = 2;

/// Returns the hashtag row named `name`, creating it on first use.
///
/// The row is inserted with `ON CONFLICT (name) DO NOTHING` and then read back
/// by name, so two callers racing on the same new name both end up with the
/// single stored row. A unique violation from a backend that ignores the
/// conflict clause is treated the same way. If the row cannot be read after
/// the insert, the cycle is retried once.
#[instrument(skip(db))]
pub async fn resolve<C>(db: &C, name: &str) -> Result<hashtag::Model>
where
    C: ConnectionTrait,
{
    if name.chars().count() > hashtag::MAX_NAME_LEN {
        warn!("Rejected overlong hashtag name '{}'", name);
        return Err(MarketError::Validation(format!(
            "Hashtag '{}' is longer than {} characters",
            name,
            hashtag::MAX_NAME_LEN
        )));
    }

    if !hashtag::is_valid_name(name) {
        warn!("Rejected hashtag name '{}'", name);
        return Err(MarketError::Validation(format!(
            "Invalid hashtag '{}': only letters, digits, Hangul and '_' are allowed",
            name
        )));
    }

    for attempt in 1..=RESOLVE_ATTEMPTS {
        let insert = hashtag::Entity::insert(hashtag::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(hashtag::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

        match insert {
            Ok(rows) => trace!("Inserted {} hashtag row(s) for '{}'", rows, name),
            Err(DbErr::RecordNotInserted) => trace!("Hashtag '{}' already exists", name),
            Err(err) if is_unique_violation(&err) => {
                debug!("Lost insert race for hashtag '{}', reading winner", name)
            }
            Err(err) => return Err(err.into()),
        }

        if let Some(tag) = hashtag::Entity::find_by_name(name).one(db).await? {
            return Ok(tag);
        }

        warn!(attempt, "Hashtag '{}' missing right after insert", name);
    }

    Err(MarketError::NotFound(format!(
        "Hashtag '{}' could not be resolved",
        name
    )))
}

/// Resolves every name in order, skipping repeats.
pub async fn resolve_all<C>(db: &C, names: &[String]) -> Result<Vec<hashtag::Model>>
where
    C: ConnectionTrait,
{
    let mut tags: Vec<hashtag::Model> = Vec::with_capacity(names.len());
    for name in names {
        if tags.iter().any(|t| &t.name == name) {
            continue;
        }
        tags.push(resolve(db, name).await?);
    }
    Ok(tags)
}
