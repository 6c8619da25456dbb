use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::Value;

use common::pagination::Pagination;
use models::errors::ModelError;
use models::user::{NewUser, UserChanges};

use super::forms::{
    check_genre_ids, check_member_ids, parse_form, platform, ArtistImageForm, ArtistSocialForm, CollectiveForm,
    GenreForm, GroupImageForm, GroupSocialForm, LineForm, ProfileAddForm, ProfileChangeForm, SocialChangeForm,
};
use super::{AdminEntity, AdminRecord};
use crate::errors::ServiceError;

/// Declares a unit adapter for a model module.
///
/// `display` receives the connection and the model and returns
/// `Result<String, ModelError>`. `extra` adds `(name, value)` pairs to the
/// record fields. `create` and `update` receive the parsed form and return
/// the saved model.
macro_rules! admin_entity {
    (
        $adapter:ident, $module:ident,
        key: $key:literal,
        label: $label:literal,
        fields: [$($field:literal),* $(,)?],
        display: |$db:ident, $row:ident| $display:expr,
        $(extra: $extra:expr,)?
        create: |$cdb:ident, $cform:ident: $cty:ty| $create:expr,
        update: |$udb:ident, $uid:ident, $uform:ident: $uty:ty| $update:expr $(,)?
    ) => {
        pub struct $adapter;

        impl $adapter {
            async fn render(
                $db: &DatabaseConnection,
                $row: models::$module::Model,
            ) -> Result<AdminRecord, ServiceError> {
                let display: Result<String, ModelError> = $display;
                #[allow(unused_mut)]
                let mut fields = serde_json::to_value(&$row)?;
                $(
                    let extra: Vec<(&'static str, Value)> = $extra;
                    if let Value::Object(map) = &mut fields {
                        for (name, value) in extra {
                            map.insert(name.to_string(), value);
                        }
                    }
                )?
                Ok(AdminRecord { id: $row.id, display: display?, fields })
            }
        }

        #[async_trait]
        impl AdminEntity for $adapter {
            fn key(&self) -> &'static str { $key }
            fn label(&self) -> &'static str { $label }
            fn list_fields(&self) -> &'static [&'static str] { &[$($field),*] }

            async fn count(&self, db: &DatabaseConnection) -> Result<u64, ServiceError> {
                Ok(models::$module::Entity::find().count(db).await.map_err(ModelError::from)?)
            }

            async fn list(&self, db: &DatabaseConnection, page: Pagination) -> Result<Vec<AdminRecord>, ServiceError> {
                let rows = models::$module::list(db, page).await?;
                let mut out = Vec::with_capacity(rows.len());
                for row in rows {
                    out.push(Self::render(db, row).await?);
                }
                Ok(out)
            }

            async fn get(&self, db: &DatabaseConnection, id: i32) -> Result<Option<AdminRecord>, ServiceError> {
                match models::$module::get(db, id).await? {
                    Some(row) => Ok(Some(Self::render(db, row).await?)),
                    None => Ok(None),
                }
            }

            async fn create(&self, $cdb: &DatabaseConnection, form: Value) -> Result<AdminRecord, ServiceError> {
                let $cform: $cty = parse_form(form)?;
                let row: models::$module::Model = $create;
                Self::render($cdb, row).await
            }

            async fn update(&self, $udb: &DatabaseConnection, $uid: i32, form: Value) -> Result<AdminRecord, ServiceError> {
                let $uform: $uty = parse_form(form)?;
                let row: models::$module::Model = $update;
                Self::render($udb, row).await
            }

            async fn delete(&self, db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
                Ok(models::$module::delete(db, id).await?)
            }
        }
    };
}

fn id_list(ids: impl IntoIterator<Item = i32>) -> Value {
    Value::from(ids.into_iter().collect::<Vec<_>>())
}

admin_entity!(UserAdmin, user,
    key: "users",
    label: "Users",
    fields: ["username", "email", "first_name", "last_name", "is_staff"],
    display: |_db, row| Ok(models::user::display(&row)),
    create: |db, form: NewUser| models::user::create(db, form).await?,
    update: |db, id, form: UserChanges| models::user::update_profile(db, id, form).await?,
);

admin_entity!(ArtisticLineAdmin, artistic_line,
    key: "artistic_lines",
    label: "Artistic lines",
    fields: ["name", "description"],
    display: |_db, row| Ok(models::artistic_line::display(&row)),
    create: |db, form: LineForm| models::artistic_line::create(db, &form.name, form.description.as_deref()).await?,
    update: |db, id, form: LineForm| {
        models::artistic_line::update(db, id, &form.name, form.description.as_deref()).await?
    },
);

admin_entity!(GenreAdmin, genre,
    key: "genres",
    label: "Genres",
    fields: ["name", "line_id"],
    display: |db, row| models::genre::display(db, &row).await,
    create: |db, form: GenreForm| models::genre::create(db, &form.name, form.line_id).await?,
    update: |db, id, form: GenreForm| models::genre::update(db, id, &form.name, form.line_id).await?,
);

admin_entity!(ArtistProfileAdmin, artist_profile,
    key: "artist_profiles",
    label: "Artist profiles",
    fields: ["user_id", "stage_name", "created_at", "updated_at"],
    display: |db, row| models::artist_profile::display(db, &row).await,
    extra: vec![("genre_ids", id_list(models::artist_profile::genres(db, row.id).await?.iter().map(|g| g.id)))],
    create: |db, form: ProfileAddForm| {
        if let Some(genre_ids) = &form.genre_ids {
            check_genre_ids(db, genre_ids, "artist profile").await?;
        }
        let profile = models::artist_profile::create(db, form.user_id, form.profile).await?;
        if let Some(genre_ids) = &form.genre_ids {
            models::artist_profile::set_genres(db, profile.id, genre_ids).await?;
        }
        profile
    },
    update: |db, id, form: ProfileChangeForm| {
        if let Some(genre_ids) = &form.genre_ids {
            check_genre_ids(db, genre_ids, "artist profile").await?;
        }
        let profile = models::artist_profile::update(db, id, form.profile).await?;
        if let Some(genre_ids) = &form.genre_ids {
            models::artist_profile::set_genres(db, id, genre_ids).await?;
        }
        profile
    },
);

admin_entity!(CollectiveAdmin, collective,
    key: "collectives",
    label: "Collectives",
    fields: ["name", "slug", "admin_id", "created_at"],
    display: |db, row| Ok(models::collective::display(&row)),
    extra: vec![
        ("genre_ids", id_list(models::collective::genres(db, row.id).await?.iter().map(|g| g.id))),
        ("member_ids", id_list(models::collective::members(db, row.id).await?.iter().map(|m| m.id))),
    ],
    create: |db, form: CollectiveForm| {
        if let Some(genre_ids) = &form.genre_ids {
            check_genre_ids(db, genre_ids, "collective").await?;
        }
        if let Some(member_ids) = &form.member_ids {
            check_member_ids(db, member_ids).await?;
        }
        let collective = models::collective::create(db, form.collective).await?;
        if let Some(genre_ids) = &form.genre_ids {
            models::collective::set_genres(db, collective.id, genre_ids).await?;
        }
        if let Some(member_ids) = &form.member_ids {
            models::collective::set_members(db, collective.id, member_ids).await?;
        }
        collective
    },
    update: |db, id, form: CollectiveForm| {
        if let Some(genre_ids) = &form.genre_ids {
            check_genre_ids(db, genre_ids, "collective").await?;
        }
        if let Some(member_ids) = &form.member_ids {
            check_member_ids(db, member_ids).await?;
        }
        let collective = models::collective::update(db, id, form.collective).await?;
        if let Some(genre_ids) = &form.genre_ids {
            models::collective::set_genres(db, id, genre_ids).await?;
        }
        if let Some(member_ids) = &form.member_ids {
            models::collective::set_members(db, id, member_ids).await?;
        }
        collective
    },
);

admin_entity!(ArtistImageAdmin, artist_image,
    key: "artist_images",
    label: "Artist images",
    fields: ["artist_id", "image", "title", "position"],
    display: |db, row| models::artist_image::display(db, &row).await,
    create: |db, form: ArtistImageForm| models::artist_image::create(db, form.artist_id, form.image).await?,
    update: |db, id, form: ArtistImageForm| models::artist_image::update(db, id, form.artist_id, form.image).await?,
);

admin_entity!(GroupImageAdmin, group_image,
    key: "group_images",
    label: "Group images",
    fields: ["collective_id", "image", "title", "position"],
    display: |db, row| models::group_image::display(db, &row).await,
    create: |db, form: GroupImageForm| models::group_image::create(db, form.collective_id, form.image).await?,
    update: |db, id, form: GroupImageForm| {
        models::group_image::update(db, id, form.collective_id, form.image).await?
    },
);

admin_entity!(ArtistSocialAdmin, artist_social,
    key: "artist_socials",
    label: "Artist socials",
    fields: ["artist_id", "platform", "url"],
    display: |db, row| models::artist_social::display(db, &row).await,
    create: |db, form: ArtistSocialForm| {
        let platform = platform(form.platform.as_deref())?;
        models::artist_social::create(db, form.artist_id, platform, &form.url).await?
    },
    update: |db, id, form: SocialChangeForm| {
        let platform = platform(form.platform.as_deref())?;
        models::artist_social::update(db, id, platform, &form.url).await?
    },
);

admin_entity!(GroupSocialAdmin, group_social,
    key: "group_socials",
    label: "Group socials",
    fields: ["collective_id", "platform", "url"],
    display: |db, row| models::group_social::display(db, &row).await,
    create: |db, form: GroupSocialForm| {
        let platform = platform(form.platform.as_deref())?;
        models::group_social::create(db, form.collective_id, platform, &form.url).await?
    },
    update: |db, id, form: SocialChangeForm| {
        let platform = platform(form.platform.as_deref())?;
        models::group_social::update(db, id, platform, &form.url).await?
    },
);
