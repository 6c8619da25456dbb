use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rand::rngs::OsRng;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use common::pagination::Pagination;

use crate::errors::ModelError;
use crate::{artist_profile, collective};

const MAX_USERNAME_LEN: usize = 150;
const MAX_EMAIL_LEN: usize = 254;
const MAX_NAME_LEN: usize = 150;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    /// argon2 PHC string; empty when the account has no usable password.
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub is_superuser: bool,
    pub last_login: Option<DateTimeWithTimeZone>,
    pub date_joined: DateTimeWithTimeZone,
}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn has_usable_password(&self) -> bool { !self.password.is_empty() }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    ArtistProfile,
    Collective,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::ArtistProfile => Entity::has_one(artist_profile::Entity).into(),
            Relation::Collective => Entity::has_many(collective::Entity).into(),
        }
    }
}

impl Related<artist_profile::Entity> for Entity {
    fn to() -> RelationDef { Relation::ArtistProfile.def() }
}

impl Related<collective::Entity> for Entity {
    fn to() -> RelationDef { Relation::Collective.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Registration input.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    /// `None` creates an account without a usable password.
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

pub fn validate_username(username: &str) -> Result<(), ModelError> {
    if username.is_empty() {
        return Err(ModelError::Validation("username required".into()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(ModelError::Validation(format!("username longer than {MAX_USERNAME_LEN}")));
    }
    if !username.chars().all(|c| c.is_alphanumeric() || "@.+-_".contains(c)) {
        return Err(ModelError::Validation("username may only contain letters, digits and @/./+/-/_".into()));
    }
    Ok(())
}

/// Validate and normalize an email (domain part lowercased).
pub fn normalize_email(email: &str) -> Result<String, ModelError> {
    let email = email.trim();
    let (local, domain) = email
        .rsplit_once('@')
        .ok_or_else(|| ModelError::Validation("invalid email".into()))?;
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || email.chars().any(char::is_whitespace) {
        return Err(ModelError::Validation("invalid email".into()));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(ModelError::Validation(format!("email longer than {MAX_EMAIL_LEN}")));
    }
    Ok(format!("{}@{}", local, domain.to_lowercase()))
}

fn validate_person_name(field: &str, value: &str) -> Result<String, ModelError> {
    let value = value.trim();
    if value.chars().count() > MAX_NAME_LEN {
        return Err(ModelError::Validation(format!("{field} longer than {MAX_NAME_LEN}")));
    }
    Ok(value.to_string())
}

pub fn hash_password(raw: &str) -> Result<String, ModelError> {
    if raw.chars().count() < MIN_PASSWORD_LEN {
        return Err(ModelError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
    }
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map_err(|e| ModelError::Hash(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Verify `raw` against the stored hash. Accounts without a usable
/// password never match.
pub fn check_password(user: &Model, raw: &str) -> bool {
    if !user.has_usable_password() {
        return false;
    }
    match PasswordHash::new(&user.password) {
        Ok(parsed) => Argon2::default().verify_password(raw.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

async fn ensure_unique<C: ConnectionTrait>(
    conn: &C,
    username: Option<&str>,
    email: Option<&str>,
    exclude: Option<i32>,
) -> Result<(), ModelError> {
    if let Some(username) = username {
        let mut q = Entity::find().filter(Column::Username.eq(username));
        if let Some(id) = exclude { q = q.filter(Column::Id.ne(id)); }
        if q.count(conn).await? > 0 {
            return Err(ModelError::Uniqueness(format!("username '{username}' already taken")));
        }
    }
    if let Some(email) = email {
        let mut q = Entity::find().filter(Column::Email.eq(email));
        if let Some(id) = exclude { q = q.filter(Column::Id.ne(id)); }
        if q.count(conn).await? > 0 {
            return Err(ModelError::Uniqueness(format!("email '{email}' already registered")));
        }
    }
    Ok(())
}

#[instrument(skip(db, input), fields(username = %input.username))]
pub async fn create(db: &DatabaseConnection, input: NewUser) -> Result<Model, ModelError> {
    let username = input.username.trim().to_string();
    validate_username(&username)?;
    let email = normalize_email(&input.email)?;
    let first_name = validate_person_name("first_name", &input.first_name)?;
    let last_name = validate_person_name("last_name", &input.last_name)?;
    let password = match input.password.as_deref() {
        Some(raw) => hash_password(raw)?,
        None => String::new(),
    };

    ensure_unique(db, Some(&username), Some(&email), None).await?;

    let am = ActiveModel {
        username: Set(username),
        email: Set(email),
        password: Set(password),
        first_name: Set(first_name),
        last_name: Set(last_name),
        is_staff: Set(input.is_staff),
        is_active: Set(true),
        is_superuser: Set(input.is_superuser),
        last_login: Set(None),
        date_joined: Set(Utc::now().into()),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    info!(user_id = created.id, "user_created");
    Ok(created)
}

pub async fn get(db: &DatabaseConnection, id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_username(db: &DatabaseConnection, username: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Username.eq(username)).one(db).await?)
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    let email = normalize_email(email)?;
    Ok(Entity::find().filter(Column::Email.eq(email)).one(db).await?)
}

pub async fn list(db: &DatabaseConnection, pagination: Pagination) -> Result<Vec<Model>, ModelError> {
    let (page_idx, per_page) = pagination.normalize();
    let rows = Entity::find()
        .order_by_asc(Column::Username)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await?;
    Ok(rows)
}

#[instrument(skip(db, changes))]
pub async fn update_profile(db: &DatabaseConnection, id: i32, changes: UserChanges) -> Result<Model, ModelError> {
    let username = match changes.username.as_deref().map(str::trim) {
        Some(u) => { validate_username(u)?; Some(u.to_string()) }
        None => None,
    };
    let email = changes.email.as_deref().map(normalize_email).transpose()?;
    ensure_unique(db, username.as_deref(), email.as_deref(), Some(id)).await?;

    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::not_found("user"))?
        .into();
    if let Some(username) = username { am.username = Set(username); }
    if let Some(email) = email { am.email = Set(email); }
    if let Some(first) = changes.first_name.as_deref() { am.first_name = Set(validate_person_name("first_name", first)?); }
    if let Some(last) = changes.last_name.as_deref() { am.last_name = Set(validate_person_name("last_name", last)?); }
    if let Some(active) = changes.is_active { am.is_active = Set(active); }
    if let Some(staff) = changes.is_staff { am.is_staff = Set(staff); }
    if let Some(superuser) = changes.is_superuser { am.is_superuser = Set(superuser); }
    Ok(am.update(db).await?)
}

pub async fn set_password(db: &DatabaseConnection, id: i32, raw: &str) -> Result<(), ModelError> {
    let hash = hash_password(raw)?;
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::not_found("user"))?
        .into();
    am.password = Set(hash);
    am.update(db).await?;
    info!(user_id = id, "user_password_changed");
    Ok(())
}

pub async fn record_login(db: &DatabaseConnection, id: i32) -> Result<Model, ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::not_found("user"))?
        .into();
    am.last_login = Set(Some(Utc::now().into()));
    Ok(am.update(db).await?)
}

/// Delete a user. The storage layer cascades to the artist profile and
/// every collective the user administers.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected > 0 {
        info!(user_id = id, "user_deleted");
    }
    Ok(res.rows_affected > 0)
}

pub fn display(user: &Model) -> String { user.username.clone() }
