use anyhow::Result;
use serde_json::{json, Value};

use common::pagination::Pagination;
use models::collective::{self, CollectiveInput};
use models::gallery::ImageInput;
use models::social::SocialPlatform;
use models::{artist_image, artist_profile, artist_social, artistic_line, genre, user};

use super::ADMIN_SITE;
use crate::errors::ServiceError;
use crate::test_support::get_db;

async fn seed(db: &sea_orm::DatabaseConnection) -> Result<(artist_profile::Model, collective::Model)> {
    let ana = user::create(
        db,
        user::NewUser { username: "ana".into(), email: "ana@example.com".into(), ..Default::default() },
    )
    .await?;
    let profile = artist_profile::create(
        db,
        ana.id,
        artist_profile::ProfileInput { stage_name: Some("La Ana".into()), ..Default::default() },
    )
    .await?;
    let band = collective::create(
        db,
        CollectiveInput { name: "Los Trovadores".into(), admin_id: ana.id, ..Default::default() },
    )
    .await?;
    Ok((profile, band))
}

#[test]
fn registry_lists_every_entity_once() {
    let keys: Vec<&str> = ADMIN_SITE.entries().iter().map(|e| e.key()).collect();
    assert_eq!(
        keys,
        [
            "users",
            "artistic_lines",
            "genres",
            "artist_profiles",
            "collectives",
            "artist_images",
            "group_images",
            "artist_socials",
            "group_socials",
        ]
    );
    assert!(ADMIN_SITE.lookup("collectives").is_some());
    assert!(ADMIN_SITE.lookup("tenants").is_none());
    assert!(matches!(ADMIN_SITE.require("tenants"), Err(ServiceError::UnknownEntity(_))));
    assert!(ADMIN_SITE.entries().iter().all(|e| !e.list_fields().is_empty()));
}

#[tokio::test]
async fn records_carry_display_strings() -> Result<()> {
    let db = get_db().await?;
    let (profile, band) = seed(&db).await?;
    let line = artistic_line::create(&db, "Música", None).await?;
    let folk = genre::create(&db, "Folclore", line.id).await?;
    let image = artist_image::create(&db, profile.id, ImageInput::new("ana.jpg")).await?;
    artist_social::create(&db, profile.id, SocialPlatform::Instagram, "https://instagram.com/ana").await?;

    let genres = ADMIN_SITE.require("genres")?;
    let rec = genres.get(&db, folk.id).await?.unwrap();
    assert_eq!(rec.display, "Folclore (Música)");

    let collectives = ADMIN_SITE.require("collectives")?;
    let rec = collectives.get(&db, band.id).await?.unwrap();
    assert_eq!(rec.display, "Los Trovadores");
    assert_eq!(rec.field("slug").and_then(|v| v.as_str()), Some("los-trovadores"));

    let images = ADMIN_SITE.require("artist_images")?.list(&db, Pagination::default()).await?;
    assert_eq!(images[0].display, format!("Image {} - La Ana", image.id));

    let socials = ADMIN_SITE.require("artist_socials")?.list(&db, Pagination::default()).await?;
    assert_eq!(socials[0].display, "La Ana - instagram");

    let users = ADMIN_SITE.require("users")?.list(&db, Pagination::default()).await?;
    assert_eq!(users.len(), 1);
    assert!(users[0].field("password").is_none());
    Ok(())
}

#[tokio::test]
async fn summary_counts_rows() -> Result<()> {
    let db = get_db().await?;
    seed(&db).await?;

    let summary = ADMIN_SITE.summary(&db).await?;
    let count = |key: &str| summary.iter().find(|s| s.key == key).map(|s| s.count);
    assert_eq!(count("users"), Some(1));
    assert_eq!(count("artist_profiles"), Some(1));
    assert_eq!(count("collectives"), Some(1));
    assert_eq!(count("genres"), Some(0));
    Ok(())
}

#[tokio::test]
async fn admin_delete_respects_protection() -> Result<()> {
    let db = get_db().await?;
    let line = artistic_line::create(&db, "Teatro", None).await?;
    let g = genre::create(&db, "Comedia", line.id).await?;

    let err = ADMIN_SITE.delete(&db, "artistic_lines", line.id).await.unwrap_err();
    assert_eq!(err.code(), 1003);
    assert!(err.form_message().contains("cannot be deleted"));

    assert!(ADMIN_SITE.delete(&db, "genres", g.id).await?);
    assert!(ADMIN_SITE.delete(&db, "artistic_lines", line.id).await?);
    assert!(!ADMIN_SITE.delete(&db, "artistic_lines", line.id).await?);
    Ok(())
}

#[tokio::test]
async fn admin_delete_of_user_cascades() -> Result<()> {
    let db = get_db().await?;
    let (profile, band) = seed(&db).await?;

    assert!(ADMIN_SITE.delete(&db, "users", profile.user_id).await?);
    assert!(ADMIN_SITE.require("artist_profiles")?.get(&db, profile.id).await?.is_none());
    assert!(ADMIN_SITE.require("collectives")?.get(&db, band.id).await?.is_none());
    Ok(())
}

fn ids(record: &super::AdminRecord, name: &str) -> Vec<i64> {
    let mut out: Vec<i64> = record
        .field(name)
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default();
    out.sort_unstable();
    out
}

#[tokio::test]
async fn admin_create_goes_through_image_cap() -> Result<()> {
    let db = get_db().await?;
    let (profile, _) = seed(&db).await?;

    for i in 0..5 {
        let rec = ADMIN_SITE
            .create(&db, "artist_images", json!({ "artist_id": profile.id, "image": format!("a{i}.jpg"), "position": i }))
            .await?;
        assert_eq!(rec.field("image").and_then(Value::as_str), Some(format!("artists/images/a{i}.jpg").as_str()));
    }
    let err = ADMIN_SITE
        .create(&db, "artist_images", json!({ "artist_id": profile.id, "image": "extra.jpg" }))
        .await
        .unwrap_err();
    assert_eq!(err.code(), 1001);
    assert!(err.form_message().contains("maximum 5 images"), "got {}", err.form_message());
    assert_eq!(ADMIN_SITE.require("artist_images")?.count(&db).await?, 5);
    Ok(())
}

#[tokio::test]
async fn admin_create_generates_free_slugs() -> Result<()> {
    let db = get_db().await?;
    let (profile, band) = seed(&db).await?;
    let admin_id = band.admin_id;

    let copy = ADMIN_SITE
        .create(&db, "collectives", json!({ "name": "Los Trovadores", "admin_id": admin_id }))
        .await?;
    assert_eq!(copy.field("slug").and_then(Value::as_str), Some("los-trovadores-1"));

    let err = ADMIN_SITE
        .create(&db, "collectives", json!({ "name": "Otro", "slug": "los-trovadores", "admin_id": admin_id }))
        .await
        .unwrap_err();
    assert_eq!(err.code(), 1002);

    let renamed = ADMIN_SITE
        .update(&db, "collectives", copy.id, json!({ "name": "Trovadores del Sur", "admin_id": admin_id }))
        .await?;
    assert_eq!(renamed.display, "Trovadores del Sur");
    assert_eq!(renamed.field("slug").and_then(Value::as_str), Some("los-trovadores-1"));
    assert!(ids(&renamed, "member_ids").is_empty());

    let joined = ADMIN_SITE
        .update(&db, "collectives", copy.id, json!({ "name": "Trovadores del Sur", "admin_id": admin_id, "member_ids": [profile.id] }))
        .await?;
    assert_eq!(ids(&joined, "member_ids"), vec![i64::from(profile.id)]);
    Ok(())
}

#[tokio::test]
async fn admin_genre_selection_is_capped_without_partial_writes() -> Result<()> {
    let db = get_db().await?;
    let (profile, band) = seed(&db).await?;
    let line = ADMIN_SITE.create(&db, "artistic_lines", json!({ "name": "Música" })).await?;
    let mut genre_ids = Vec::new();
    for name in ["Folclore", "Salsa", "Tango", "Cumbia"] {
        let g = ADMIN_SITE.create(&db, "genres", json!({ "name": name, "line_id": line.id })).await?;
        assert_eq!(g.display, format!("{name} (Música)"));
        genre_ids.push(g.id);
    }

    let rec = ADMIN_SITE
        .update(&db, "artist_profiles", profile.id, json!({ "stage_name": "La Ana", "genre_ids": &genre_ids[..3] }))
        .await?;
    assert_eq!(ids(&rec, "genre_ids").len(), 3);

    let err = ADMIN_SITE
        .update(&db, "artist_profiles", profile.id, json!({ "stage_name": "Ana Nueva", "genre_ids": genre_ids }))
        .await
        .unwrap_err();
    assert_eq!(err.code(), 1001);
    let unchanged = ADMIN_SITE.require("artist_profiles")?.get(&db, profile.id).await?.unwrap();
    assert_eq!(unchanged.display, "La Ana");
    assert_eq!(ids(&unchanged, "genre_ids").len(), 3);

    let err = ADMIN_SITE
        .create(&db, "collectives", json!({ "name": "Cuarteto", "admin_id": band.admin_id, "genre_ids": genre_ids }))
        .await
        .unwrap_err();
    assert_eq!(err.code(), 1001);
    assert!(collective::get_by_slug(&db, "cuarteto").await?.is_none());

    let err = ADMIN_SITE
        .create(&db, "collectives", json!({ "name": "Cuarteto", "admin_id": band.admin_id, "member_ids": [9999] }))
        .await
        .unwrap_err();
    assert_eq!(err.code(), 1004);
    assert!(collective::get_by_slug(&db, "cuarteto").await?.is_none());
    Ok(())
}

#[tokio::test]
async fn admin_user_and_profile_forms() -> Result<()> {
    let db = get_db().await?;
    let beto = ADMIN_SITE
        .create(&db, "users", json!({ "username": "beto", "email": "beto@Example.COM" }))
        .await?;
    assert_eq!(beto.display, "beto");
    assert_eq!(beto.field("email").and_then(Value::as_str), Some("beto@example.com"));
    assert!(beto.field("password").is_none());

    let profile = ADMIN_SITE
        .create(&db, "artist_profiles", json!({ "user_id": beto.id, "stage_name": "Beto" }))
        .await?;
    assert_eq!(profile.display, "Beto");
    let err = ADMIN_SITE
        .create(&db, "artist_profiles", json!({ "user_id": beto.id }))
        .await
        .unwrap_err();
    assert_eq!(err.code(), 1002);

    ADMIN_SITE.update(&db, "users", beto.id, json!({ "first_name": "Alberto", "last_name": "Ruiz" })).await?;
    let cleared = ADMIN_SITE.update(&db, "artist_profiles", profile.id, json!({ "stage_name": "" })).await?;
    assert_eq!(cleared.display, "Alberto Ruiz");

    let social = ADMIN_SITE
        .create(&db, "artist_socials", json!({ "artist_id": profile.id, "platform": "Instagram", "url": "https://instagram.com/beto" }))
        .await?;
    assert_eq!(social.display, "Alberto Ruiz - instagram");
    let social = ADMIN_SITE
        .update(&db, "artist_socials", social.id, json!({ "url": "https://beto.example" }))
        .await?;
    assert_eq!(social.field("platform").and_then(Value::as_str), Some("other"));
    Ok(())
}

#[tokio::test]
async fn admin_form_errors_map_to_codes() -> Result<()> {
    let db = get_db().await?;
    let err = ADMIN_SITE.create(&db, "genres", json!({ "name": "Salsa" })).await.unwrap_err();
    assert_eq!(err.code(), 1001);
    let err = ADMIN_SITE.create(&db, "genres", json!({ "name": "Salsa", "line_id": 9999 })).await.unwrap_err();
    assert_eq!(err.code(), 1004);
    let err = ADMIN_SITE.update(&db, "artistic_lines", 9999, json!({ "name": "Danza" })).await.unwrap_err();
    assert_eq!(err.code(), 1004);
    let err = ADMIN_SITE.create(&db, "tenants", json!({})).await.unwrap_err();
    assert_eq!(err.code(), 1005);
    Ok(())
}
