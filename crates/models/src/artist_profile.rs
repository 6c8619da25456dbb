use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue, DatabaseConnection, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use common::pagination::Pagination;

use crate::errors::ModelError;
use crate::limits::check_genre_count;
use crate::lock::lock_owner;
use crate::media::{optional_asset_path, MediaPrefix};
use crate::{artist_image, artist_profile_genre, artist_social, collective, collective_member, genre, user};

const MAX_STAGE_NAME_LEN: usize = 150;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artist_profile")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub stage_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User, ArtistImage, ArtistSocial, ArtistProfileGenre, CollectiveMember }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::ArtistImage => Entity::has_many(artist_image::Entity).into(),
            Relation::ArtistSocial => Entity::has_many(artist_social::Entity).into(),
            Relation::ArtistProfileGenre => Entity::has_many(artist_profile_genre::Entity).into(),
            Relation::CollectiveMember => Entity::has_many(collective_member::Entity).into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<artist_image::Entity> for Entity {
    fn to() -> RelationDef { Relation::ArtistImage.def() }
}

impl Related<artist_social::Entity> for Entity {
    fn to() -> RelationDef { Relation::ArtistSocial.def() }
}

impl Related<genre::Entity> for Entity {
    fn to() -> RelationDef { artist_profile_genre::Relation::Genre.def() }
    fn via() -> Option<RelationDef> { Some(artist_profile_genre::Relation::ArtistProfile.def().rev()) }
}

impl Related<collective::Entity> for Entity {
    fn to() -> RelationDef { collective_member::Relation::Collective.def() }
    fn via() -> Option<RelationDef> { Some(collective_member::Relation::ArtistProfile.def().rev()) }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now: DateTimeWithTimeZone = Utc::now().into();
        if insert && matches!(self.created_at, ActiveValue::NotSet) {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

impl ActiveModel {
    /// Full clean of an in-memory profile: unsaved profiles have no genre
    /// rows yet, saved ones are checked like [`validate`].
    pub async fn clean(&self, db: &DatabaseConnection) -> Result<(), ModelError> {
        match self.id {
            ActiveValue::Set(id) | ActiveValue::Unchanged(id) => validate(db, id).await,
            ActiveValue::NotSet => Ok(()),
        }
    }
}

/// Editable profile fields. Blank strings are stored as `NULL`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProfileInput {
    pub stage_name: Option<String>,
    pub description: Option<String>,
    pub profile_image: Option<String>,
}

struct CleanProfile {
    stage_name: Option<String>,
    description: Option<String>,
    profile_image: Option<String>,
}

fn clean_input(input: &ProfileInput) -> Result<CleanProfile, ModelError> {
    let stage_name = input.stage_name.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
    if let Some(name) = &stage_name {
        if name.chars().count() > MAX_STAGE_NAME_LEN {
            return Err(ModelError::Validation(format!("stage_name longer than {MAX_STAGE_NAME_LEN}")));
        }
    }
    Ok(CleanProfile {
        stage_name,
        description: input.description.as_deref().map(str::trim).filter(|d| !d.is_empty()).map(str::to_string),
        profile_image: optional_asset_path(MediaPrefix::ArtistProfile, input.profile_image.as_deref())?,
    })
}

#[instrument(skip(db, input))]
pub async fn create(db: &DatabaseConnection, user_id: i32, input: ProfileInput) -> Result<Model, ModelError> {
    let clean = clean_input(&input)?;
    if user::Entity::find_by_id(user_id).one(db).await?.is_none() {
        return Err(ModelError::not_found("user"));
    }
    if Entity::find().filter(Column::UserId.eq(user_id)).count(db).await? > 0 {
        return Err(ModelError::Uniqueness(format!("user {user_id} already has an artist profile")));
    }
    let am = ActiveModel {
        user_id: Set(user_id),
        stage_name: Set(clean.stage_name),
        description: Set(clean.description),
        profile_image: Set(clean.profile_image),
        ..Default::default()
    };
    let profile = am.insert(db).await?;
    info!(profile_id = profile.id, user_id, "artist_profile_created");
    Ok(profile)
}

pub async fn update(db: &DatabaseConnection, id: i32, input: ProfileInput) -> Result<Model, ModelError> {
    let clean = clean_input(&input)?;
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::not_found("artist profile"))?
        .into();
    am.stage_name = Set(clean.stage_name);
    am.description = Set(clean.description);
    am.profile_image = Set(clean.profile_image);
    Ok(am.update(db).await?)
}

pub async fn get(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn get_by_user(db: &DatabaseConnection, user_id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::UserId.eq(user_id)).one(db).await?)
}

pub async fn list(db: &DatabaseConnection, pagination: Pagination) -> Result<Vec<Model>, ModelError> {
    let (page, per_page) = pagination.normalize();
    Ok(Entity::find().order_by_asc(Column::Id).paginate(db, per_page).fetch_page(page).await?)
}

/// Replace the genre set of a profile.
#[instrument(skip(db))]
pub async fn set_genres(db: &DatabaseConnection, id: i32, genre_ids: &[i32]) -> Result<Vec<genre::Model>, ModelError> {
    let mut wanted = genre_ids.to_vec();
    wanted.sort_unstable();
    wanted.dedup();
    check_genre_count(wanted.len() as u64, "artist profile")?;

    let ids = wanted.clone();
    db.transaction::<_, (), ModelError>(|txn| {
        Box::pin(async move {
            lock_owner::<Entity, _>(txn, id, "artist profile").await?;
            let found = genre::Entity::find().filter(genre::Column::Id.is_in(ids.clone())).count(txn).await?;
            if found != ids.len() as u64 {
                return Err(ModelError::not_found("genre"));
            }
            artist_profile_genre::Entity::delete_many()
                .filter(artist_profile_genre::Column::ArtistProfileId.eq(id))
                .exec(txn)
                .await?;
            for genre_id in ids {
                artist_profile_genre::ActiveModel { artist_profile_id: Set(id), genre_id: Set(genre_id) }
                    .insert(txn)
                    .await?;
            }
            Ok(())
        })
    })
    .await?;

    info!(profile_id = id, genres = ?wanted, "artist_profile_genres_set");
    genres(db, id).await
}

/// Associate one genre. Adding an already associated genre is a no-op.
pub async fn add_genre(db: &DatabaseConnection, id: i32, genre_id: i32) -> Result<(), ModelError> {
    db.transaction::<_, (), ModelError>(|txn| {
        Box::pin(async move {
            lock_owner::<Entity, _>(txn, id, "artist profile").await?;
            if genre::Entity::find_by_id(genre_id).one(txn).await?.is_none() {
                return Err(ModelError::not_found("genre"));
            }
            let linked = artist_profile_genre::Entity::find_by_id((id, genre_id)).one(txn).await?;
            if linked.is_none() {
                artist_profile_genre::ActiveModel { artist_profile_id: Set(id), genre_id: Set(genre_id) }
                    .insert(txn)
                    .await?;
            }
            Ok(())
        })
    })
    .await?;
    Ok(())
}

pub async fn remove_genre(db: &DatabaseConnection, id: i32, genre_id: i32) -> Result<bool, ModelError> {
    let res = artist_profile_genre::Entity::delete_many()
        .filter(artist_profile_genre::Column::ArtistProfileId.eq(id))
        .filter(artist_profile_genre::Column::GenreId.eq(genre_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

pub async fn genres(db: &DatabaseConnection, id: i32) -> Result<Vec<genre::Model>, ModelError> {
    let profile = Entity::find_by_id(id).one(db).await?.ok_or_else(|| ModelError::not_found("artist profile"))?;
    Ok(profile.find_related(genre::Entity).order_by_asc(genre::Column::Name).all(db).await?)
}

/// Collectives this profile is a member of.
pub async fn collectives(db: &DatabaseConnection, id: i32) -> Result<Vec<collective::Model>, ModelError> {
    let profile = Entity::find_by_id(id).one(db).await?.ok_or_else(|| ModelError::not_found("artist profile"))?;
    Ok(profile.find_related(collective::Entity).order_by_asc(collective::Column::Name).all(db).await?)
}

/// Explicit full validation of the persisted genre associations. Rows
/// written around [`set_genres`]/[`add_genre`] are only caught here.
pub async fn validate(db: &DatabaseConnection, id: i32) -> Result<(), ModelError> {
    if Entity::find_by_id(id).one(db).await?.is_none() {
        return Ok(());
    }
    let count = artist_profile_genre::Entity::find()
        .filter(artist_profile_genre::Column::ArtistProfileId.eq(id))
        .count(db)
        .await?;
    check_genre_count(count, "artist profile")
}

/// Delete a profile along with its images, socials, genre rows and
/// memberships.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected > 0 {
        info!(profile_id = id, "artist_profile_deleted");
    }
    Ok(res.rows_affected > 0)
}

/// Stage name, else the owner's full name, else the username.
pub async fn display<C: ConnectionTrait>(conn: &C, profile: &Model) -> Result<String, ModelError> {
    if let Some(stage) = profile.stage_name.as_deref().filter(|s| !s.is_empty()) {
        return Ok(stage.to_string());
    }
    let owner = user::Entity::find_by_id(profile.user_id)
        .one(conn)
        .await?
        .ok_or_else(|| ModelError::not_found("user"))?;
    let full = owner.full_name();
    Ok(if full.is_empty() { owner.username } else { full })
}
