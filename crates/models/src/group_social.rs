use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collective;
use crate::errors::ModelError;
use crate::social::SocialPlatform;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group_social")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub collective_id: i32,
    pub platform: SocialPlatform,
    pub url: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Collective }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Collective => Entity::belongs_to(collective::Entity)
                .from(Column::CollectiveId)
                .to(collective::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<collective::Entity> for Entity {
    fn to() -> RelationDef { Relation::Collective.def() }
}

crate::social::social_ops! {
    owner: collective,
    field: collective_id,
    column: CollectiveId,
    owner_label: "collective",
    label: "group social",
    created: "group_social_created",
}

/// `"{collective} - {platform}"`.
pub async fn display<C: ConnectionTrait>(conn: &C, social: &Model) -> Result<String, ModelError> {
    let owner = collective::Entity::find_by_id(social.collective_id)
        .one(conn)
        .await?
        .ok_or_else(|| ModelError::not_found("collective"))?;
    Ok(format!("{} - {}", owner.name, social.platform.as_str()))
}
