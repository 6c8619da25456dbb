//! Genre associations of artist profiles.

use sea_orm::{entity::prelude::*, ActiveValue};
use serde::{Deserialize, Serialize};

use crate::errors::hook_rejection;
use crate::limits::check_genre_count;
use crate::{artist_profile, genre};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artist_profile_genre")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub artist_profile_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub genre_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { ArtistProfile, Genre }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ArtistProfile => Entity::belongs_to(artist_profile::Entity)
                .from(Column::ArtistProfileId)
                .to(artist_profile::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::Genre => Entity::belongs_to(genre::Entity)
                .from(Column::GenreId)
                .to(genre::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<artist_profile::Entity> for Entity {
    fn to() -> RelationDef { Relation::ArtistProfile.def() }
}

impl Related<genre::Entity> for Entity {
    fn to() -> RelationDef { Relation::Genre.def() }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            if let ActiveValue::Set(profile_id) | ActiveValue::Unchanged(profile_id) = self.artist_profile_id {
                let existing = Entity::find()
                    .filter(Column::ArtistProfileId.eq(profile_id))
                    .count(db)
                    .await?;
                check_genre_count(existing + 1, "artist profile").map_err(hook_rejection)?;
            }
        }
        Ok(self)
    }
}
