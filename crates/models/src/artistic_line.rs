use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use common::pagination::Pagination;

use crate::errors::ModelError;
use crate::genre;

const MAX_NAME_LEN: usize = 100;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artistic_line")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Genre }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Genre => Entity::has_many(genre::Entity).into(),
        }
    }
}

impl Related<genre::Entity> for Entity {
    fn to() -> RelationDef { Relation::Genre.def() }
}

impl ActiveModelBehavior for ActiveModel {}

fn clean_name(name: &str) -> Result<String, ModelError> {
    let name = name.trim();
    if name.is_empty() { return Err(ModelError::Validation("name required".into())); }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ModelError::Validation(format!("name longer than {MAX_NAME_LEN}")));
    }
    Ok(name.to_string())
}

fn clean_description(description: Option<&str>) -> Option<String> {
    description.map(str::trim).filter(|d| !d.is_empty()).map(str::to_string)
}

async fn ensure_name_free(db: &DatabaseConnection, name: &str, exclude: Option<i32>) -> Result<(), ModelError> {
    let mut q = Entity::find().filter(Column::Name.eq(name));
    if let Some(id) = exclude { q = q.filter(Column::Id.ne(id)); }
    if q.count(db).await? > 0 {
        return Err(ModelError::Uniqueness(format!("artistic line '{name}' already exists")));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, name: &str, description: Option<&str>) -> Result<Model, ModelError> {
    let name = clean_name(name)?;
    ensure_name_free(db, &name, None).await?;
    let am = ActiveModel {
        name: Set(name),
        description: Set(clean_description(description)),
        ..Default::default()
    };
    let line = am.insert(db).await?;
    info!(line_id = line.id, "artistic_line_created");
    Ok(line)
}

pub async fn update(db: &DatabaseConnection, id: i32, name: &str, description: Option<&str>) -> Result<Model, ModelError> {
    let name = clean_name(name)?;
    ensure_name_free(db, &name, Some(id)).await?;
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::not_found("artistic line"))?
        .into();
    am.name = Set(name);
    am.description = Set(clean_description(description));
    Ok(am.update(db).await?)
}

pub async fn get(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn list(db: &DatabaseConnection, pagination: Pagination) -> Result<Vec<Model>, ModelError> {
    let (page, per_page) = pagination.normalize();
    Ok(Entity::find().order_by_asc(Column::Name).paginate(db, per_page).fetch_page(page).await?)
}

/// Delete a line. Lines that still group genres are protected; the
/// RESTRICT foreign key backs this up at the storage level.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, ModelError> {
    let genres = genre::Entity::find().filter(genre::Column::LineId.eq(id)).count(db).await?;
    if genres > 0 {
        warn!(line_id = id, genres, "artistic_line_delete_blocked");
        return Err(ModelError::ReferentialIntegrity(format!(
            "artistic line {id} is still referenced by {genres} genre(s)"
        )));
    }
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

pub fn display(line: &Model) -> String { line.name.clone() }
