use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::info;

use common::pagination::Pagination;

use crate::errors::ModelError;
use crate::{artist_profile, artist_profile_genre, artistic_line, collective, collective_genre};

const MAX_NAME_LEN: usize = 100;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "genre")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub line_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { ArtisticLine, ArtistProfileGenre, CollectiveGenre }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ArtisticLine => Entity::belongs_to(artistic_line::Entity)
                .from(Column::LineId)
                .to(artistic_line::Column::Id)
                .on_delete(ForeignKeyAction::Restrict)
                .into(),
            Relation::ArtistProfileGenre => Entity::has_many(artist_profile_genre::Entity).into(),
            Relation::CollectiveGenre => Entity::has_many(collective_genre::Entity).into(),
        }
    }
}

impl Related<artistic_line::Entity> for Entity {
    fn to() -> RelationDef { Relation::ArtisticLine.def() }
}

impl Related<artist_profile::Entity> for Entity {
    fn to() -> RelationDef { artist_profile_genre::Relation::ArtistProfile.def() }
    fn via() -> Option<RelationDef> { Some(artist_profile_genre::Relation::Genre.def().rev()) }
}

impl Related<collective::Entity> for Entity {
    fn to() -> RelationDef { collective_genre::Relation::Collective.def() }
    fn via() -> Option<RelationDef> { Some(collective_genre::Relation::Genre.def().rev()) }
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

/// Checks the line exists and that no other genre of that line carries
/// the same name.
async fn check_pair(db: &DatabaseConnection, name: &str, line_id: i32, exclude: Option<i32>) -> Result<(), ModelError> {
    if artistic_line::Entity::find_by_id(line_id).one(db).await?.is_none() {
        return Err(ModelError::not_found("artistic line"));
    }
    let mut q = Entity::find().filter(Column::Name.eq(name)).filter(Column::LineId.eq(line_id));
    if let Some(id) = exclude { q = q.filter(Column::Id.ne(id)); }
    if q.count(db).await? > 0 {
        return Err(ModelError::Uniqueness(format!("genre '{name}' already exists in line {line_id}")));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, name: &str, line_id: i32) -> Result<Model, ModelError> {
    let name = clean_name(name)?;
    check_pair(db, &name, line_id, None).await?;
    let am = ActiveModel { name: Set(name), line_id: Set(line_id), ..Default::default() };
    let genre = am.insert(db).await?;
    info!(genre_id = genre.id, line_id, "genre_created");
    Ok(genre)
}

pub async fn update(db: &DatabaseConnection, id: i32, name: &str, line_id: i32) -> Result<Model, ModelError> {
    let name = clean_name(name)?;
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::not_found("genre"))?
        .into();
    check_pair(db, &name, line_id, Some(id)).await?;
    am.name = Set(name);
    am.line_id = Set(line_id);
    Ok(am.update(db).await?)
}

pub async fn get(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn list(db: &DatabaseConnection, pagination: Pagination) -> Result<Vec<Model>, ModelError> {
    let (page, per_page) = pagination.normalize();
    Ok(Entity::find()
        .order_by_asc(Column::LineId)
        .order_by_asc(Column::Name)
        .paginate(db, per_page)
        .fetch_page(page)
        .await?)
}

pub async fn list_by_line(db: &DatabaseConnection, line_id: i32) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::LineId.eq(line_id))
        .order_by_asc(Column::Name)
        .all(db)
        .await?)
}

/// Delete a genre. Association rows go with it; profiles and collectives
/// that referenced it stay.
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected > 0 {
        info!(genre_id = id, "genre_deleted");
    }
    Ok(res.rows_affected > 0)
}

/// `"{name} ({line})"`.
pub async fn display<C: ConnectionTrait>(conn: &C, genre: &Model) -> Result<String, ModelError> {
    let line = artistic_line::Entity::find_by_id(genre.line_id)
        .one(conn)
        .await?
        .ok_or_else(|| ModelError::not_found("artistic line"))?;
    Ok(format!("{} ({})", genre.name, line.name))
}
