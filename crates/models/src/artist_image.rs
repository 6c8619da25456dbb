use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::artist_profile;
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artist_image")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub artist_id: i32,
    pub image: String,
    pub title: Option<String>,
    pub position: i16,
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

crate::gallery::gallery_ops! {
    owner: artist_profile,
    field: artist_id,
    column: ArtistId,
    owner_label: "artist profile",
    label: "artist image",
    prefix: ArtistImages,
    created: "artist_image_created",
}

/// `"Image {id} - {artist}"`.
pub async fn display<C: ConnectionTrait>(conn: &C, image: &Model) -> Result<String, ModelError> {
    let owner = artist_profile::Entity::find_by_id(image.artist_id)
        .one(conn)
        .await?
        .ok_or_else(|| ModelError::not_found("artist profile"))?;
    Ok(format!("Image {} - {}", image.id, artist_profile::display(conn, &owner).await?))
}
