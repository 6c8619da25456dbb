//! Input shared by artist and group galleries.

use serde::Deserialize;

use crate::errors::ModelError;
use crate::media::{asset_path, MediaPrefix};

const MAX_TITLE_LEN: usize = 150;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ImageInput {
    /// Asset reference; a bare file name is placed under the gallery prefix.
    pub image: String,
    pub title: Option<String>,
    #[serde(default)]
    pub position: i16,
}

impl ImageInput {
    pub fn new(image: impl Into<String>) -> Self {
        Self { image: image.into(), ..Default::default() }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn at(mut self, position: i16) -> Self {
        self.position = position;
        self
    }
}

pub(crate) struct CleanImage {
    pub image: String,
    pub title: Option<String>,
    pub position: i16,
}

pub(crate) fn clean_image(prefix: MediaPrefix, input: &ImageInput) -> Result<CleanImage, ModelError> {
    if input.position < 0 {
        return Err(ModelError::Validation("position must be >= 0".into()));
    }
    let title = input.title.as_deref().map(str::trim).filter(|t| !t.is_empty()).map(str::to_string);
    if let Some(t) = &title {
        if t.chars().count() > MAX_TITLE_LEN {
            return Err(ModelError::Validation(format!("title longer than {MAX_TITLE_LEN}")));
        }
    }
    Ok(CleanImage { image: asset_path(prefix, &input.image)?, title, position: input.position })
}

/// Capacity hook and CRUD for a gallery entity owned through `$field`.
/// Expanded inside the entity module, next to its `Model` and `Relation`.
macro_rules! gallery_ops {
    (
        owner: $owner:ident,
        field: $field:ident,
        column: $column:ident,
        owner_label: $owner_label:literal,
        label: $label:literal,
        prefix: $prefix:ident,
        created: $created:literal $(,)?
    ) => {
        /// Every save counts the other images of the same owner; a full
        /// gallery rejects the write.
        #[async_trait::async_trait]
        impl ::sea_orm::ActiveModelBehavior for ActiveModel {
            async fn before_save<C>(self, db: &C, _insert: bool) -> Result<Self, ::sea_orm::DbErr>
            where
                C: ::sea_orm::ConnectionTrait,
            {
                use ::sea_orm::{ActiveValue, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

                let owner_id = match self.$field {
                    ActiveValue::Set(v) | ActiveValue::Unchanged(v) => v,
                    ActiveValue::NotSet => return Ok(self),
                };
                let mut siblings = Entity::find().filter(Column::$column.eq(owner_id));
                if let ActiveValue::Set(id) | ActiveValue::Unchanged(id) = self.id {
                    siblings = siblings.filter(Column::Id.ne(id));
                }
                let existing = siblings.count(db).await?;
                $crate::limits::check_image_capacity(existing, $owner_label).map_err($crate::errors::hook_rejection)?;
                Ok(self)
            }
        }

        #[tracing::instrument(skip(db, input))]
        pub async fn create(
            db: &::sea_orm::DatabaseConnection,
            owner_id: i32,
            input: $crate::gallery::ImageInput,
        ) -> Result<Model, $crate::errors::ModelError> {
            use ::sea_orm::{ActiveModelTrait, Set, TransactionTrait};

            let clean = $crate::gallery::clean_image($crate::media::MediaPrefix::$prefix, &input)?;
            let image = db
                .transaction::<_, Model, $crate::errors::ModelError>(|txn| {
                    Box::pin(async move {
                        $crate::lock::lock_owner::<$crate::$owner::Entity, _>(txn, owner_id, $owner_label).await?;
                        let am = ActiveModel {
                            $field: Set(owner_id),
                            image: Set(clean.image),
                            title: Set(clean.title),
                            position: Set(clean.position),
                            created_at: Set(::chrono::Utc::now().into()),
                            ..Default::default()
                        };
                        Ok(am.insert(txn).await?)
                    })
                })
                .await?;
            tracing::info!(image_id = image.id, owner_id, $created);
            Ok(image)
        }

        /// Update an image; moving it to another owner is subject to that
        /// owner's capacity.
        pub async fn update(
            db: &::sea_orm::DatabaseConnection,
            id: i32,
            owner_id: i32,
            input: $crate::gallery::ImageInput,
        ) -> Result<Model, $crate::errors::ModelError> {
            use ::sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};

            let clean = $crate::gallery::clean_image($crate::media::MediaPrefix::$prefix, &input)?;
            let image = db
                .transaction::<_, Model, $crate::errors::ModelError>(|txn| {
                    Box::pin(async move {
                        $crate::lock::lock_owner::<$crate::$owner::Entity, _>(txn, owner_id, $owner_label).await?;
                        let mut am: ActiveModel = Entity::find_by_id(id)
                            .one(txn)
                            .await?
                            .ok_or_else(|| $crate::errors::ModelError::not_found($label))?
                            .into();
                        am.$field = Set(owner_id);
                        am.image = Set(clean.image);
                        am.title = Set(clean.title);
                        am.position = Set(clean.position);
                        Ok(am.update(txn).await?)
                    })
                })
                .await?;
            Ok(image)
        }

        pub async fn get(db: &::sea_orm::DatabaseConnection, id: i32) -> Result<Option<Model>, $crate::errors::ModelError> {
            use ::sea_orm::EntityTrait;
            Ok(Entity::find_by_id(id).one(db).await?)
        }

        pub async fn list(
            db: &::sea_orm::DatabaseConnection,
            pagination: ::common::pagination::Pagination,
        ) -> Result<Vec<Model>, $crate::errors::ModelError> {
            use ::sea_orm::{EntityTrait, PaginatorTrait, QueryOrder};
            let (page, per_page) = pagination.normalize();
            Ok(Entity::find().order_by_asc(Column::Id).paginate(db, per_page).fetch_page(page).await?)
        }

        /// Gallery of one owner, ordered by position then id.
        pub async fn list_for_owner(db: &::sea_orm::DatabaseConnection, owner_id: i32) -> Result<Vec<Model>, $crate::errors::ModelError> {
            use ::sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
            Ok(Entity::find()
                .filter(Column::$column.eq(owner_id))
                .order_by_asc(Column::Position)
                .order_by_asc(Column::Id)
                .all(db)
                .await?)
        }

        pub async fn delete(db: &::sea_orm::DatabaseConnection, id: i32) -> Result<bool, $crate::errors::ModelError> {
            use ::sea_orm::EntityTrait;
            let res = Entity::delete_by_id(id).exec(db).await?;
            Ok(res.rows_affected > 0)
        }
    };
}

pub(crate) use gallery_ops;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_position_is_rejected() {
        let err = clean_image(MediaPrefix::ArtistImages, &ImageInput::new("a.jpg").at(-1)).err().unwrap();
        assert!(err.is_validation());
    }

    #[test]
    fn blank_title_becomes_none() {
        let clean = clean_image(MediaPrefix::GroupImages, &ImageInput::new("a.jpg").with_title("  ")).unwrap();
        assert_eq!(clean.title, None);
        assert_eq!(clean.image, "groups/images/a.jpg");
    }
}
