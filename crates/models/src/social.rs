//! Social-media platforms and link validation shared by artist and group
//! socials.

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ModelError;

const MAX_URL_LEN: usize = 200;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(30))")]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    #[sea_orm(string_value = "facebook")]
    Facebook,
    #[sea_orm(string_value = "instagram")]
    Instagram,
    #[sea_orm(string_value = "twitter")]
    Twitter,
    #[sea_orm(string_value = "youtube")]
    Youtube,
    #[sea_orm(string_value = "tiktok")]
    Tiktok,
    #[sea_orm(string_value = "spotify")]
    Spotify,
    #[default]
    #[sea_orm(string_value = "other")]
    Other,
}

impl SocialPlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            SocialPlatform::Facebook => "facebook",
            SocialPlatform::Instagram => "instagram",
            SocialPlatform::Twitter => "twitter",
            SocialPlatform::Youtube => "youtube",
            SocialPlatform::Tiktok => "tiktok",
            SocialPlatform::Spotify => "spotify",
            SocialPlatform::Other => "other",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            SocialPlatform::Facebook => "Facebook",
            SocialPlatform::Instagram => "Instagram",
            SocialPlatform::Twitter => "Twitter",
            SocialPlatform::Youtube => "YouTube",
            SocialPlatform::Tiktok => "TikTok",
            SocialPlatform::Spotify => "Spotify",
            SocialPlatform::Other => "Other",
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

impl FromStr for SocialPlatform {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "facebook" => Ok(SocialPlatform::Facebook),
            "instagram" => Ok(SocialPlatform::Instagram),
            "twitter" => Ok(SocialPlatform::Twitter),
            "youtube" => Ok(SocialPlatform::Youtube),
            "tiktok" => Ok(SocialPlatform::Tiktok),
            "spotify" => Ok(SocialPlatform::Spotify),
            "other" => Ok(SocialPlatform::Other),
            other => Err(ModelError::Validation(format!("unknown social platform '{other}'"))),
        }
    }
}

/// Absolute http(s) URL with a host, at most 200 characters.
pub fn validate_url(raw: &str) -> Result<String, ModelError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ModelError::Validation("url required".into()));
    }
    if raw.len() > MAX_URL_LEN {
        return Err(ModelError::Validation(format!("url longer than {MAX_URL_LEN}")));
    }
    let parsed = Url::parse(raw).map_err(|e| ModelError::Validation(format!("invalid url: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ModelError::Validation("url must use http or https".into()));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ModelError::Validation("url must have a host".into()));
    }
    Ok(raw.to_string())
}

/// CRUD for a social-link entity owned through `$field`. Expanded inside
/// the entity module, next to its `Model` and `Relation`.
macro_rules! social_ops {
    (
        owner: $owner:ident,
        field: $field:ident,
        column: $column:ident,
        owner_label: $owner_label:literal,
        label: $label:literal,
        created: $created:literal $(,)?
    ) => {
        impl ::sea_orm::ActiveModelBehavior for ActiveModel {}

        pub async fn create(
            db: &::sea_orm::DatabaseConnection,
            owner_id: i32,
            platform: $crate::social::SocialPlatform,
            url: &str,
        ) -> Result<Model, $crate::errors::ModelError> {
            use ::sea_orm::{ActiveModelTrait, EntityTrait, Set};

            let url = $crate::social::validate_url(url)?;
            if $crate::$owner::Entity::find_by_id(owner_id).one(db).await?.is_none() {
                return Err($crate::errors::ModelError::not_found($owner_label));
            }
            let am = ActiveModel {
                $field: Set(owner_id),
                platform: Set(platform),
                url: Set(url),
                created_at: Set(::chrono::Utc::now().into()),
                ..Default::default()
            };
            let social = am.insert(db).await?;
            tracing::info!(social_id = social.id, owner_id, platform = platform.as_str(), $created);
            Ok(social)
        }

        pub async fn update(
            db: &::sea_orm::DatabaseConnection,
            id: i32,
            platform: $crate::social::SocialPlatform,
            url: &str,
        ) -> Result<Model, $crate::errors::ModelError> {
            use ::sea_orm::{ActiveModelTrait, EntityTrait, Set};

            let url = $crate::social::validate_url(url)?;
            let mut am: ActiveModel = Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| $crate::errors::ModelError::not_found($label))?
                .into();
            am.platform = Set(platform);
            am.url = Set(url);
            Ok(am.update(db).await?)
        }

        pub async fn get(db: &::sea_orm::DatabaseConnection, id: i32) -> Result<Option<Model>, $crate::errors::ModelError> {
            use ::sea_orm::EntityTrait;
            Ok(Entity::find_by_id(id).one(db).await?)
        }

        pub async fn list(
            db: &::sea_orm::DatabaseConnection,
            pagination: ::common::pagination::Pagination,
        ) -> Result<Vec<Model>, $crate::errors::ModelError> {
            use ::sea_orm::{EntityTrait, PaginatorTrait, QueryOrder};
            let (page, per_page) = pagination.normalize();
            Ok(Entity::find().order_by_asc(Column::Id).paginate(db, per_page).fetch_page(page).await?)
        }

        pub async fn list_for_owner(db: &::sea_orm::DatabaseConnection, owner_id: i32) -> Result<Vec<Model>, $crate::errors::ModelError> {
            use ::sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
            Ok(Entity::find().filter(Column::$column.eq(owner_id)).order_by_asc(Column::Id).all(db).await?)
        }

        pub async fn delete(db: &::sea_orm::DatabaseConnection, id: i32) -> Result<bool, $crate::errors::ModelError> {
            use ::sea_orm::EntityTrait;
            let res = Entity::delete_by_id(id).exec(db).await?;
            Ok(res.rows_affected > 0)
        }
    };
}

pub(crate) use social_ops;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parses_case_insensitively() {
        assert_eq!("Instagram".parse::<SocialPlatform>().unwrap(), SocialPlatform::Instagram);
        assert_eq!(" SPOTIFY ".parse::<SocialPlatform>().unwrap(), SocialPlatform::Spotify);
        assert!("myspace".parse::<SocialPlatform>().is_err());
        assert_eq!(SocialPlatform::default(), SocialPlatform::Other);
    }

    #[test]
    fn url_rules() {
        assert!(validate_url("https://instagram.com/trovadores").is_ok());
        assert!(validate_url("http://example.org").is_ok());
        assert!(validate_url("ftp://example.org/file").is_err());
        assert!(validate_url("instagram.com/trovadores").is_err());
        assert!(validate_url("   ").is_err());
        let long = format!("https://example.org/{}", "a".repeat(200));
        assert!(validate_url(&long).is_err());
    }
}
