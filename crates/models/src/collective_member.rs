//! Membership of artist profiles in collectives. No size limit.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{artist_profile, collective};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collective_member")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub collective_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub artist_profile_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Collective, ArtistProfile }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Collective => Entity::belongs_to(collective::Entity)
                .from(Column::CollectiveId)
                .to(collective::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::ArtistProfile => Entity::belongs_to(artist_profile::Entity)
                .from(Column::ArtistProfileId)
                .to(artist_profile::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<collective::Entity> for Entity {
    fn to() -> RelationDef { Relation::Collective.def() }
}

impl Related<artist_profile::Entity> for Entity {
    fn to() -> RelationDef { Relation::ArtistProfile.def() }
}

impl ActiveModelBehavior for ActiveModel {}
