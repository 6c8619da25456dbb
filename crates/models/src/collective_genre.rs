//! Genre associations of collectives.

use sea_orm::{entity::prelude::*, ActiveValue};
use serde::{Deserialize, Serialize};

use crate::errors::hook_rejection;
use crate::limits::check_genre_count;
use crate::{collective, genre};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collective_genre")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub collective_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub genre_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Collective, Genre }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Collective => Entity::belongs_to(collective::Entity)
                .from(Column::CollectiveId)
                .to(collective::Column::Id)
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

impl Related<collective::Entity> for Entity {
    fn to() -> RelationDef { Relation::Collective.def() }
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
            if let ActiveValue::Set(collective_id) | ActiveValue::Unchanged(collective_id) = self.collective_id {
                let existing = Entity::find()
                    .filter(Column::CollectiveId.eq(collective_id))
                    .count(db)
                    .await?;
                check_genre_count(existing + 1, "collective").map_err(hook_rejection)?;
            }
        }
        Ok(self)
    }
}
