use chrono::Utc;
use sea_orm::{entity::prelude::*, ActiveValue, DatabaseConnection, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use common::pagination::Pagination;

use crate::errors::{hook_rejection, ModelError};
use crate::limits::check_genre_count;
use crate::lock::lock_owner;
use crate::media::{optional_asset_path, MediaPrefix};
use crate::slug::{base_slug, slug_taken, slugify, unique_slug, MAX_SLUG_LEN};
use crate::{artist_profile, collective_genre, collective_member, genre, group_image, group_social, user};

const MAX_NAME_LEN: usize = 200;
/// Inserts retried after losing a slug race to a concurrent writer.
const SLUG_ATTEMPTS: u32 = 3;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collective")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub admin_id: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Admin, GroupImage, GroupSocial, CollectiveGenre, CollectiveMember }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Admin => Entity::belongs_to(user::Entity)
                .from(Column::AdminId)
                .to(user::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::GroupImage => Entity::has_many(group_image::Entity).into(),
            Relation::GroupSocial => Entity::has_many(group_social::Entity).into(),
            Relation::CollectiveGenre => Entity::has_many(collective_genre::Entity).into(),
            Relation::CollectiveMember => Entity::has_many(collective_member::Entity).into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::Admin.def() }
}

impl Related<group_image::Entity> for Entity {
    fn to() -> RelationDef { Relation::GroupImage.def() }
}

impl Related<group_social::Entity> for Entity {
    fn to() -> RelationDef { Relation::GroupSocial.def() }
}

impl Related<collective_genre::Entity> for Entity {
    fn to() -> RelationDef { Relation::CollectiveGenre.def() }
}

impl Related<collective_member::Entity> for Entity {
    fn to() -> RelationDef { Relation::CollectiveMember.def() }
}

impl Related<genre::Entity> for Entity {
    fn to() -> RelationDef { collective_genre::Relation::Genre.def() }
    fn via() -> Option<RelationDef> { Some(collective_genre::Relation::Collective.def().rev()) }
}

impl Related<artist_profile::Entity> for Entity {
    fn to() -> RelationDef { collective_member::Relation::ArtistProfile.def() }
    fn via() -> Option<RelationDef> { Some(collective_member::Relation::Collective.def().rev()) }
}

/// Fills in timestamps and, when the slug is missing or blank, derives a
/// free one from the name.
#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now: DateTimeWithTimeZone = Utc::now().into();
        if insert && matches!(self.created_at, ActiveValue::NotSet) {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);

        let needs_slug = match &self.slug {
            ActiveValue::Set(s) | ActiveValue::Unchanged(s) => s.is_empty(),
            ActiveValue::NotSet => insert,
        };
        if needs_slug {
            let name = match &self.name {
                ActiveValue::Set(n) | ActiveValue::Unchanged(n) => n.clone(),
                ActiveValue::NotSet => String::new(),
            };
            let exclude = match self.id {
                ActiveValue::Set(id) | ActiveValue::Unchanged(id) => Some(id),
                ActiveValue::NotSet => None,
            };
            let slug = unique_slug(db, &base_slug(&name), exclude).await.map_err(hook_rejection)?;
            self.slug = Set(slug);
        }
        Ok(self)
    }
}

impl ActiveModel {
    /// Full clean: unsaved collectives pass, saved ones are checked like
    /// [`validate`].
    pub async fn clean(&self, db: &DatabaseConnection) -> Result<(), ModelError> {
        match self.id {
            ActiveValue::Set(id) | ActiveValue::Unchanged(id) => validate(db, id).await,
            ActiveValue::NotSet => Ok(()),
        }
    }
}

/// Editable collective fields.
///
/// `slug`: `None` keeps the current slug (or generates one on create), a
/// blank string regenerates it from the name, anything else is slugified
/// and must be free.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CollectiveInput {
    pub name: String,
    pub slug: Option<String>,
    pub admin_id: i32,
    pub description: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Clone)]
struct CleanCollective {
    name: String,
    slug: SlugChoice,
    admin_id: i32,
    description: Option<String>,
    profile_image: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
enum SlugChoice {
    Keep,
    Generate,
    Explicit(String),
}

fn clean_input(input: &CollectiveInput) -> Result<CleanCollective, ModelError> {
    let name = input.name.trim();
    if name.is_empty() { return Err(ModelError::Validation("name required".into())); }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ModelError::Validation(format!("name longer than {MAX_NAME_LEN}")));
    }
    let slug = match input.slug.as_deref().map(str::trim) {
        None => SlugChoice::Keep,
        Some("") => SlugChoice::Generate,
        Some(raw) => {
            let slug = slugify(raw);
            if slug.is_empty() {
                return Err(ModelError::Validation(format!("slug '{raw}' has no usable characters")));
            }
            if slug.len() > MAX_SLUG_LEN {
                return Err(ModelError::Validation(format!("slug longer than {MAX_SLUG_LEN}")));
            }
            SlugChoice::Explicit(slug)
        }
    };
    Ok(CleanCollective {
        name: name.to_string(),
        slug,
        admin_id: input.admin_id,
        description: input.description.as_deref().map(str::trim).filter(|d| !d.is_empty()).map(str::to_string),
        profile_image: optional_asset_path(MediaPrefix::GroupProfile, input.profile_image.as_deref())?,
    })
}

async fn ensure_admin(db: &DatabaseConnection, admin_id: i32) -> Result<(), ModelError> {
    if user::Entity::find_by_id(admin_id).one(db).await?.is_none() {
        return Err(ModelError::not_found("user"));
    }
    Ok(())
}

/// Create a collective. Slug probing and the insert share one
/// transaction; a generated slug that loses a race to a concurrent writer
/// is probed again, up to [`SLUG_ATTEMPTS`] times.
#[instrument(skip(db, input), fields(name = %input.name))]
pub async fn create(db: &DatabaseConnection, input: CollectiveInput) -> Result<Model, ModelError> {
    let clean = clean_input(&input)?;
    ensure_admin(db, clean.admin_id).await?;

    let mut attempt = 1;
    loop {
        let fields = clean.clone();
        let res = db
            .transaction::<_, Model, ModelError>(|txn| {
                Box::pin(async move {
                    let slug = match fields.slug {
                        SlugChoice::Explicit(slug) => {
                            if slug_taken(txn, &slug, None).await? {
                                return Err(ModelError::Uniqueness(format!("slug '{slug}' already in use")));
                            }
                            Set(slug)
                        }
                        SlugChoice::Keep | SlugChoice::Generate => ActiveValue::NotSet,
                    };
                    let am = ActiveModel {
                        name: Set(fields.name),
                        slug,
                        admin_id: Set(fields.admin_id),
                        description: Set(fields.description),
                        profile_image: Set(fields.profile_image),
                        ..Default::default()
                    };
                    Ok(am.insert(txn).await?)
                })
            })
            .await
            .map_err(ModelError::from);

        match res {
            Ok(created) => {
                info!(entity = "collective", id = created.id, slug = %created.slug, "collective_created");
                return Ok(created);
            }
            Err(ModelError::Uniqueness(msg)) if !matches!(clean.slug, SlugChoice::Explicit(_)) && attempt < SLUG_ATTEMPTS => {
                warn!(attempt, error = %msg, "collective_slug_conflict_retry");
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[instrument(skip(db, input))]
pub async fn update(db: &DatabaseConnection, id: i32, input: CollectiveInput) -> Result<Model, ModelError> {
    let clean = clean_input(&input)?;
    ensure_admin(db, clean.admin_id).await?;

    let updated = db
        .transaction::<_, Model, ModelError>(|txn| {
            Box::pin(async move {
                let mut am: ActiveModel = lock_owner::<Entity, _>(txn, id, "collective").await?.into();
                match clean.slug {
                    SlugChoice::Keep => {}
                    SlugChoice::Generate => am.slug = Set(String::new()),
                    SlugChoice::Explicit(slug) => {
                        if slug_taken(txn, &slug, Some(id)).await? {
                            return Err(ModelError::Uniqueness(format!("slug '{slug}' already in use")));
                        }
                        am.slug = Set(slug);
                    }
                }
                am.name = Set(clean.name);
                am.admin_id = Set(clean.admin_id);
                am.description = Set(clean.description);
                am.profile_image = Set(clean.profile_image);
                Ok(am.update(txn).await?)
            })
        })
        .await?;
    Ok(updated)
}

pub async fn get(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn get_by_slug(db: &DatabaseConnection, slug: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Slug.eq(slug)).one(db).await?)
}

pub async fn list(db: &DatabaseConnection, pagination: Pagination) -> Result<Vec<Model>, ModelError> {
    let (page, per_page) = pagination.normalize();
    Ok(Entity::find().order_by_asc(Column::Name).paginate(db, per_page).fetch_page(page).await?)
}

pub async fn list_by_admin(db: &DatabaseConnection, admin_id: i32) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::AdminId.eq(admin_id))
        .order_by_asc(Column::Name)
        .all(db)
        .await?)
}

/// Replace the genre set of a collective.
#[instrument(skip(db))]
pub async fn set_genres(db: &DatabaseConnection, id: i32, genre_ids: &[i32]) -> Result<Vec<genre::Model>, ModelError> {
    let mut wanted = genre_ids.to_vec();
    wanted.sort_unstable();
    wanted.dedup();
    check_genre_count(wanted.len() as u64, "collective")?;

    let ids = wanted.clone();
    db.transaction::<_, (), ModelError>(|txn| {
        Box::pin(async move {
            lock_owner::<Entity, _>(txn, id, "collective").await?;
            let found = genre::Entity::find().filter(genre::Column::Id.is_in(ids.clone())).count(txn).await?;
            if found != ids.len() as u64 {
                return Err(ModelError::not_found("genre"));
            }
            collective_genre::Entity::delete_many()
                .filter(collective_genre::Column::CollectiveId.eq(id))
                .exec(txn)
                .await?;
            for genre_id in ids {
                collective_genre::ActiveModel { collective_id: Set(id), genre_id: Set(genre_id) }
                    .insert(txn)
                    .await?;
            }
            Ok(())
        })
    })
    .await?;

    info!(collective_id = id, genres = ?wanted, "collective_genres_set");
    genres(db, id).await
}

/// Associate one genre; idempotent.
pub async fn add_genre(db: &DatabaseConnection, id: i32, genre_id: i32) -> Result<(), ModelError> {
    db.transaction::<_, (), ModelError>(|txn| {
        Box::pin(async move {
            lock_owner::<Entity, _>(txn, id, "collective").await?;
            if genre::Entity::find_by_id(genre_id).one(txn).await?.is_none() {
                return Err(ModelError::not_found("genre"));
            }
            if collective_genre::Entity::find_by_id((id, genre_id)).one(txn).await?.is_none() {
                collective_genre::ActiveModel { collective_id: Set(id), genre_id: Set(genre_id) }
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
    let res = collective_genre::Entity::delete_many()
        .filter(collective_genre::Column::CollectiveId.eq(id))
        .filter(collective_genre::Column::GenreId.eq(genre_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

pub async fn genres(db: &DatabaseConnection, id: i32) -> Result<Vec<genre::Model>, ModelError> {
    let collective = Entity::find_by_id(id).one(db).await?.ok_or_else(|| ModelError::not_found("collective"))?;
    Ok(collective.find_related(genre::Entity).order_by_asc(genre::Column::Name).all(db).await?)
}

/// Explicit full validation of the persisted genre associations.
pub async fn validate(db: &DatabaseConnection, id: i32) -> Result<(), ModelError> {
    if Entity::find_by_id(id).one(db).await?.is_none() {
        return Ok(());
    }
    let count = collective_genre::Entity::find()
        .filter(collective_genre::Column::CollectiveId.eq(id))
        .count(db)
        .await?;
    check_genre_count(count, "collective")
}

/// Add an artist profile to the collective. Already a member is a no-op.
pub async fn add_member(db: &DatabaseConnection, id: i32, profile_id: i32) -> Result<(), ModelError> {
    if Entity::find_by_id(id).one(db).await?.is_none() {
        return Err(ModelError::not_found("collective"));
    }
    if artist_profile::Entity::find_by_id(profile_id).one(db).await?.is_none() {
        return Err(ModelError::not_found("artist profile"));
    }
    if collective_member::Entity::find_by_id((id, profile_id)).one(db).await?.is_some() {
        return Ok(());
    }
    collective_member::ActiveModel { collective_id: Set(id), artist_profile_id: Set(profile_id) }
        .insert(db)
        .await?;
    info!(collective_id = id, profile_id, "collective_member_added");
    Ok(())
}

/// Replace the member set. Membership is unbounded; every profile must exist.
#[instrument(skip(db))]
pub async fn set_members(db: &DatabaseConnection, id: i32, profile_ids: &[i32]) -> Result<Vec<artist_profile::Model>, ModelError> {
    let mut wanted = profile_ids.to_vec();
    wanted.sort_unstable();
    wanted.dedup();

    let ids = wanted.clone();
    db.transaction::<_, (), ModelError>(|txn| {
        Box::pin(async move {
            lock_owner::<Entity, _>(txn, id, "collective").await?;
            let found = artist_profile::Entity::find()
                .filter(artist_profile::Column::Id.is_in(ids.clone()))
                .count(txn)
                .await?;
            if found != ids.len() as u64 {
                return Err(ModelError::not_found("artist profile"));
            }
            collective_member::Entity::delete_many()
                .filter(collective_member::Column::CollectiveId.eq(id))
                .exec(txn)
                .await?;
            for profile_id in ids {
                collective_member::ActiveModel { collective_id: Set(id), artist_profile_id: Set(profile_id) }
                    .insert(txn)
                    .await?;
            }
            Ok(())
        })
    })
    .await?;

    info!(collective_id = id, members = ?wanted, "collective_members_set");
    members(db, id).await
}

pub async fn remove_member(db: &DatabaseConnection, id: i32, profile_id: i32) -> Result<bool, ModelError> {
    let res = collective_member::Entity::delete_by_id((id, profile_id)).exec(db).await?;
    Ok(res.rows_affected > 0)
}

pub async fn members(db: &DatabaseConnection, id: i32) -> Result<Vec<artist_profile::Model>, ModelError> {
    let collective = Entity::find_by_id(id).one(db).await?.ok_or_else(|| ModelError::not_found("collective"))?;
    Ok(collective
        .find_related(artist_profile::Entity)
        .order_by_asc(artist_profile::Column::Id)
        .all(db)
        .await?)
}

/// Delete a collective with its images, socials, genre rows and
/// memberships. Member profiles stay.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected > 0 {
        info!(collective_id = id, "collective_deleted");
    }
    Ok(res.rows_affected > 0)
}

pub fn display(collective: &Model) -> String { collective.name.clone() }
