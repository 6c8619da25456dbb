use anyhow::Result;

use super::{make_user, setup_test_db};
use crate::errors::ModelError;
use crate::user::{self, NewUser, UserChanges};

#[tokio::test]
async fn test_user_create_and_lookup() -> Result<()> {
    let db = setup_test_db().await?;

    let created = user::create(
        &db,
        NewUser {
            username: "ana".into(),
            email: "Ana@Example.COM".into(),
            first_name: " Ana ".into(),
            last_name: "Pérez".into(),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(created.email, "Ana@example.com");
    assert_eq!(created.first_name, "Ana");
    assert!(created.is_active);
    assert!(!created.has_usable_password());
    assert_eq!(created.full_name(), "Ana Pérez");
    assert_eq!(user::display(&created), "ana");

    let by_name = user::find_by_username(&db, "ana").await?.unwrap();
    assert_eq!(by_name.id, created.id);
    let by_email = user::find_by_email(&db, "Ana@EXAMPLE.com").await?.unwrap();
    assert_eq!(by_email.id, created.id);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_email_is_rejected_regardless_of_username() -> Result<()> {
    let db = setup_test_db().await?;
    make_user(&db, "first").await?;

    let err = user::create(
        &db,
        NewUser { username: "second".into(), email: "first@example.com".into(), ..Default::default() },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ModelError::Uniqueness(_)), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() -> Result<()> {
    let db = setup_test_db().await?;
    make_user(&db, "dup").await?;

    let err = user::create(
        &db,
        NewUser { username: "dup".into(), email: "other@example.com".into(), ..Default::default() },
    )
    .await
    .unwrap_err();
    assert!(err.is_uniqueness());
    Ok(())
}

#[tokio::test]
async fn test_update_profile_excludes_self_from_uniqueness() -> Result<()> {
    let db = setup_test_db().await?;
    let ana = make_user(&db, "ana").await?;
    make_user(&db, "beto").await?;

    let same = user::update_profile(
        &db,
        ana.id,
        UserChanges { email: Some("ana@example.com".into()), last_name: Some("Gómez".into()), ..Default::default() },
    )
    .await?;
    assert_eq!(same.last_name, "Gómez");

    let err = user::update_profile(
        &db,
        ana.id,
        UserChanges { email: Some("beto@example.com".into()), ..Default::default() },
    )
    .await
    .unwrap_err();
    assert!(err.is_uniqueness());

    let missing = user::update_profile(&db, 9999, UserChanges::default()).await.unwrap_err();
    assert!(matches!(missing, ModelError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn test_password_and_login() -> Result<()> {
    let db = setup_test_db().await?;
    let ana = make_user(&db, "ana").await?;

    user::set_password(&db, ana.id, "Sup3rSecreta").await?;
    let ana = user::get(&db, ana.id).await?.unwrap();
    assert!(ana.has_usable_password());
    assert!(user::check_password(&ana, "Sup3rSecreta"));
    assert!(!user::check_password(&ana, "wrong-password"));

    assert!(user::set_password(&db, ana.id, "short").await.unwrap_err().is_validation());

    assert!(ana.last_login.is_none());
    let logged = user::record_login(&db, ana.id).await?;
    assert!(logged.last_login.is_some());
    Ok(())
}

#[tokio::test]
async fn test_invalid_username_and_email() -> Result<()> {
    let db = setup_test_db().await?;
    let bad_name = user::create(
        &db,
        NewUser { username: "has space".into(), email: "x@example.com".into(), ..Default::default() },
    )
    .await
    .unwrap_err();
    assert!(bad_name.is_validation());

    let bad_email = user::create(
        &db,
        NewUser { username: "valid".into(), email: "not-an-email".into(), ..Default::default() },
    )
    .await
    .unwrap_err();
    assert!(bad_email.is_validation());
    Ok(())
}

#[tokio::test]
async fn test_user_list_is_paginated() -> Result<()> {
    let db = setup_test_db().await?;
    for name in ["carla", "ana", "beto"] {
        make_user(&db, name).await?;
    }
    let first = user::list(&db, common::pagination::Pagination::new(1, 2)).await?;
    let names: Vec<_> = first.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, ["ana", "beto"]);
    let second = user::list(&db, common::pagination::Pagination::new(2, 2)).await?;
    assert_eq!(second.len(), 1);
    assert!(user::delete(&db, second[0].id).await?);
    assert!(!user::delete(&db, second[0].id).await?);
    Ok(())
}
