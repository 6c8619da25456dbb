use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collective;
use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group_image")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub collective_id: i32,
    pub image: String,
    pub title: Option<String>,
    pub position: i16,
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

crate::gallery::gallery_ops! {
    owner: collective,
    field: collective_id,
    column: CollectiveId,
    owner_label: "collective",
    label: "group image",
    prefix: GroupImages,
    created: "group_image_created",
}

/// `"Image {id} - {collective}"`.
pub async fn display<C: ConnectionTrait>(conn: &C, image: &Model) -> Result<String, ModelError> {
    let owner = collective::Entity::find_by_id(image.collective_id)
        .one(conn)
        .await?
        .ok_or_else(|| ModelError::not_found("collective"))?;
    Ok(format!("Image {} - {}", image.id, owner.name))
}
