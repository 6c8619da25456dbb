use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::artist_profile;
use crate::errors::ModelError;
use crate::social::SocialPlatform;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artist_social")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub artist_id: i32,
    pub platform: SocialPlatform,
    pub url: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { ArtistProfile }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ArtistProfile => Entity::belongs_to(artist_profile::Entity)
                .from(Column::ArtistId)
                .to(artist_profile::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<artist_profile::Entity> for Entity {
    fn to() -> RelationDef { Relation::ArtistProfile.def() }
}

crate::social::social_ops! {
    owner: artist_profile,
    field: artist_id,
    column: ArtistId,
    owner_label: "artist profile",
    label: "artist social",
    created: "artist_social_created",
}

/// `"{artist} - {platform}"`.
pub async fn display<C: ConnectionTrait>(conn: &C, social: &Model) -> Result<String, ModelError> {
    let owner = artist_profile::Entity::find_by_id(social.artist_id)
        .one(conn)
        .await?
        .ok_or_else(|| ModelError::not_found("artist profile"))?;
    Ok(format!("{} - {}", artist_profile::display(conn, &owner).await?, social.platform.as_str()))
}
