//! Payloads accepted by the admin add and change forms.
//!
//! Each form deserializes from the JSON object an admin UI submits. Field
//! names follow the model columns; many-to-many sets travel as id lists.
//! Users are added with `NewUser` and changed with `UserChanges`; the
//! password has its own operation and is not part of the change form.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use models::artist_profile::ProfileInput;
use models::collective::CollectiveInput;
use models::errors::ModelError;
use models::gallery::ImageInput;
use models::limits::check_genre_count;
use models::social::SocialPlatform;

use crate::errors::ServiceError;

/// Malformed payloads are form errors, not serialization failures.
pub(crate) fn parse_form<T: DeserializeOwned>(value: Value) -> Result<T, ServiceError> {
    serde_json::from_value(value).map_err(|e| ModelError::Validation(format!("invalid form: {e}")).into())
}

#[derive(Debug, Deserialize)]
pub(crate) struct LineForm {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenreForm {
    pub name: String,
    pub line_id: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileAddForm {
    pub user_id: i32,
    #[serde(flatten)]
    pub profile: ProfileInput,
    pub genre_ids: Option<Vec<i32>>,
}

/// The owning user is fixed once a profile exists.
#[derive(Debug, Deserialize)]
pub(crate) struct ProfileChangeForm {
    #[serde(flatten)]
    pub profile: ProfileInput,
    pub genre_ids: Option<Vec<i32>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CollectiveForm {
    #[serde(flatten)]
    pub collective: CollectiveInput,
    pub genre_ids: Option<Vec<i32>>,
    pub member_ids: Option<Vec<i32>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistImageForm {
    pub artist_id: i32,
    #[serde(flatten)]
    pub image: ImageInput,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupImageForm {
    pub collective_id: i32,
    #[serde(flatten)]
    pub image: ImageInput,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArtistSocialForm {
    pub artist_id: i32,
    pub platform: Option<String>,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GroupSocialForm {
    pub collective_id: i32,
    pub platform: Option<String>,
    pub url: String,
}

/// The owner of a link is fixed once it exists.
#[derive(Debug, Deserialize)]
pub(crate) struct SocialChangeForm {
    pub platform: Option<String>,
    pub url: String,
}

/// Platform names are matched case-insensitively; a missing one is `other`.
pub(crate) fn platform(raw: Option<&str>) -> Result<SocialPlatform, ServiceError> {
    match raw.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) => Ok(p.parse()?),
        None => Ok(SocialPlatform::default()),
    }
}

/// Rejects a genre selection before any row is written: too many distinct
/// genres, or ids that do not exist.
pub(crate) async fn check_genre_ids(db: &DatabaseConnection, ids: &[i32], owner: &str) -> Result<(), ServiceError> {
    let mut wanted = ids.to_vec();
    wanted.sort_unstable();
    wanted.dedup();
    check_genre_count(wanted.len() as u64, owner)?;
    let found = models::genre::Entity::find()
        .filter(models::genre::Column::Id.is_in(wanted.clone()))
        .count(db)
        .await
        .map_err(ModelError::from)?;
    if found != wanted.len() as u64 {
        return Err(ModelError::not_found("genre").into());
    }
    Ok(())
}

/// Every member id must name an existing artist profile.
pub(crate) async fn check_member_ids(db: &DatabaseConnection, ids: &[i32]) -> Result<(), ServiceError> {
    let mut wanted = ids.to_vec();
    wanted.sort_unstable();
    wanted.dedup();
    let found = models::artist_profile::Entity::find()
        .filter(models::artist_profile::Column::Id.is_in(wanted.clone()))
        .count(db)
        .await
        .map_err(ModelError::from)?;
    if found != wanted.len() as u64 {
        return Err(ModelError::not_found("artist profile").into());
    }
    Ok(())
}
