use anyhow::Result;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

use super::{make_genres, make_profile, make_user, setup_test_db};
use crate::collective::{self, CollectiveInput};
use crate::collective_genre;
use crate::errors::ModelError;

fn input(name: &str, admin_id: i32) -> CollectiveInput {
    CollectiveInput { name: name.to_string(), admin_id, ..Default::default() }
}

#[tokio::test]
async fn test_slug_is_generated_with_suffixes() -> Result<()> {
    let db = setup_test_db().await?;
    let admin = make_user(&db, "admin").await?;

    let first = collective::create(&db, input("Los Trovadores", admin.id)).await?;
    assert_eq!(first.slug, "los-trovadores");

    let second = collective::create(&db, input("Los Trovadores", admin.id)).await?;
    assert_eq!(second.slug, "los-trovadores-1");

    let third = collective::create(&db, input("los   trovadores!", admin.id)).await?;
    assert_eq!(third.slug, "los-trovadores-2");

    let accented = collective::create(&db, input("Música Andina", admin.id)).await?;
    assert_eq!(accented.slug, "musica-andina");

    let found = collective::get_by_slug(&db, "los-trovadores-1").await?.unwrap();
    assert_eq!(found.id, second.id);
    Ok(())
}

#[tokio::test]
async fn test_long_names_truncate_the_base() -> Result<()> {
    let db = setup_test_db().await?;
    let admin = make_user(&db, "admin").await?;
    let name = "x".repeat(200);

    let a = collective::create(&db, input(&name, admin.id)).await?;
    let b = collective::create(&db, input(&name, admin.id)).await?;
    assert_eq!(a.slug.len(), 180);
    assert_eq!(b.slug, format!("{}-1", "x".repeat(180)));
    Ok(())
}

#[tokio::test]
async fn test_explicit_slug_must_be_free() -> Result<()> {
    let db = setup_test_db().await?;
    let admin = make_user(&db, "admin").await?;

    let custom = collective::create(
        &db,
        CollectiveInput { slug: Some("Mi Banda".into()), ..input("Cualquier nombre", admin.id) },
    )
    .await?;
    assert_eq!(custom.slug, "mi-banda");

    let err = collective::create(
        &db,
        CollectiveInput { slug: Some("mi-banda".into()), ..input("Otra", admin.id) },
    )
    .await
    .unwrap_err();
    assert!(err.is_uniqueness());

    let unknown_admin = collective::create(&db, input("Sin admin", 9999)).await.unwrap_err();
    assert!(matches!(unknown_admin, ModelError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn test_update_slug_rules() -> Result<()> {
    let db = setup_test_db().await?;
    let admin = make_user(&db, "admin").await?;
    let original = collective::create(&db, input("Los Trovadores", admin.id)).await?;
    let other = collective::create(&db, input("Otra Banda", admin.id)).await?;

    // No slug given: renaming keeps it.
    let renamed = collective::update(&db, original.id, input("Nuevos Trovadores", admin.id)).await?;
    assert_eq!(renamed.slug, "los-trovadores");
    assert_eq!(renamed.name, "Nuevos Trovadores");
    assert_eq!(renamed.created_at, original.created_at);

    // Blank slug regenerates from the current name.
    let regenerated = collective::update(
        &db,
        original.id,
        CollectiveInput { slug: Some(String::new()), ..input("Nuevos Trovadores", admin.id) },
    )
    .await?;
    assert_eq!(regenerated.slug, "nuevos-trovadores");

    // Regenerating does not collide with itself.
    let again = collective::update(
        &db,
        original.id,
        CollectiveInput { slug: Some(" ".into()), ..input("Nuevos Trovadores", admin.id) },
    )
    .await?;
    assert_eq!(again.slug, "nuevos-trovadores");

    let err = collective::update(
        &db,
        original.id,
        CollectiveInput { slug: Some(other.slug.clone()), ..input("Nuevos Trovadores", admin.id) },
    )
    .await
    .unwrap_err();
    assert!(err.is_uniqueness());
    Ok(())
}

#[tokio::test]
async fn test_genres_and_validation() -> Result<()> {
    let db = setup_test_db().await?;
    let admin = make_user(&db, "admin").await?;
    let band = collective::create(&db, input("Banda", admin.id)).await?;
    let genres = make_genres(&db, "Música", 4).await?;
    let ids: Vec<i32> = genres.iter().map(|g| g.id).collect();

    assert!(collective::set_genres(&db, band.id, &ids).await.unwrap_err().is_validation());
    collective::set_genres(&db, band.id, &ids[..3]).await?;
    assert!(collective::add_genre(&db, band.id, ids[3]).await.unwrap_err().is_validation());
    collective::validate(&db, band.id).await?;

    collective_genre::Entity::insert(collective_genre::ActiveModel {
        collective_id: Set(band.id),
        genre_id: Set(ids[3]),
    })
    .exec_without_returning(&db)
    .await?;
    let err = collective::validate(&db, band.id).await.unwrap_err();
    assert!(err.to_string().contains("maximum 3 genres"));
    Ok(())
}

#[tokio::test]
async fn test_membership_is_idempotent_and_unbounded() -> Result<()> {
    let db = setup_test_db().await?;
    let admin = make_user(&db, "admin").await?;
    let band = collective::create(&db, input("Banda", admin.id)).await?;

    let mut profile_ids = Vec::new();
    for i in 0..6 {
        let p = make_profile(&db, &format!("member{i}")).await?;
        collective::add_member(&db, band.id, p.id).await?;
        profile_ids.push(p.id);
    }
    collective::add_member(&db, band.id, profile_ids[0]).await?;
    assert_eq!(collective::members(&db, band.id).await?.len(), 6);

    let joined = crate::artist_profile::collectives(&db, profile_ids[0]).await?;
    assert_eq!(joined.len(), 1);

    assert!(collective::remove_member(&db, band.id, profile_ids[0]).await?);
    assert!(!collective::remove_member(&db, band.id, profile_ids[0]).await?);
    assert_eq!(collective::members(&db, band.id).await?.len(), 5);
    Ok(())
}

#[tokio::test]
async fn test_direct_insert_gets_slug_from_save_hook() -> Result<()> {
    let db = setup_test_db().await?;
    let admin = make_user(&db, "admin").await?;

    let saved = collective::ActiveModel {
        name: Set("Peña Folclórica".into()),
        admin_id: Set(admin.id),
        ..Default::default()
    }
    .insert(&db)
    .await?;
    assert_eq!(saved.slug, "pena-folclorica");
    assert_eq!(collective::list_by_admin(&db, admin.id).await?.len(), 1);
    assert_eq!(collective::display(&saved), "Peña Folclórica");
    Ok(())
}

#[tokio::test]
async fn test_set_members_replaces_the_whole_set() -> Result<()> {
    let db = setup_test_db().await?;
    let admin = make_user(&db, "admin").await?;
    let band = collective::create(&db, input("Banda", admin.id)).await?;
    let a = make_profile(&db, "ana").await?;
    let b = make_profile(&db, "beto").await?;
    let c = make_profile(&db, "caro").await?;

    collective::add_member(&db, band.id, a.id).await?;
    let members = collective::set_members(&db, band.id, &[c.id, b.id, c.id]).await?;
    assert_eq!(members.iter().map(|m| m.id).collect::<Vec<_>>(), vec![b.id, c.id]);

    let err = collective::set_members(&db, band.id, &[a.id, 9999]).await.unwrap_err();
    assert!(matches!(err, ModelError::NotFound(_)));
    assert_eq!(collective::members(&db, band.id).await?.len(), 2);

    assert!(collective::set_members(&db, band.id, &[]).await?.is_empty());
    Ok(())
}
