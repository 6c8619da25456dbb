use anyhow::Result;

use super::{make_profile, make_user, setup_test_db};
use crate::collective::{self, CollectiveInput};
use crate::social::SocialPlatform;
use crate::{artist_social, group_social};

#[tokio::test]
async fn test_artist_socials() -> Result<()> {
    let db = setup_test_db().await?;
    let profile = make_profile(&db, "ana").await?;

    let ig = artist_social::create(&db, profile.id, SocialPlatform::Instagram, "https://instagram.com/ana").await?;
    assert_eq!(ig.platform, SocialPlatform::Instagram);
    assert_eq!(artist_social::display(&db, &ig).await?, "ana - instagram");

    let other = artist_social::create(&db, profile.id, SocialPlatform::default(), "http://ana.example.org").await?;
    assert_eq!(other.platform, SocialPlatform::Other);

    let bad = artist_social::create(&db, profile.id, SocialPlatform::Tiktok, "tiktok.com/@ana").await.unwrap_err();
    assert!(bad.is_validation());

    let moved = artist_social::update(&db, ig.id, SocialPlatform::Youtube, "https://youtube.com/@ana").await?;
    assert_eq!(moved.platform, SocialPlatform::Youtube);
    let reloaded = artist_social::get(&db, ig.id).await?.unwrap();
    assert_eq!(reloaded.url, "https://youtube.com/@ana");

    assert_eq!(artist_social::list_for_owner(&db, profile.id).await?.len(), 2);
    assert!(artist_social::delete(&db, other.id).await?);
    Ok(())
}

#[tokio::test]
async fn test_group_socials() -> Result<()> {
    let db = setup_test_db().await?;
    let admin = make_user(&db, "admin").await?;
    let band = collective::create(
        &db,
        CollectiveInput { name: "Los Trovadores".into(), admin_id: admin.id, ..Default::default() },
    )
    .await?;

    let platform: SocialPlatform = "Spotify".parse()?;
    let link = group_social::create(&db, band.id, platform, "https://open.spotify.com/artist/x").await?;
    assert_eq!(group_social::display(&db, &link).await?, "Los Trovadores - spotify");

    assert!(group_social::create(&db, 9999, platform, "https://open.spotify.com").await.is_err());
    assert_eq!(group_social::list_for_owner(&db, band.id).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_group_social_update_and_delete() -> Result<()> {
    let db = setup_test_db().await?;
    let admin = make_user(&db, "admin").await?;
    let band = collective::create(
        &db,
        CollectiveInput { name: "Los Trovadores".into(), admin_id: admin.id, ..Default::default() },
    )
    .await?;

    let link = group_social::create(&db, band.id, SocialPlatform::Other, "https://trovadores.example").await?;
    let moved = group_social::update(&db, link.id, SocialPlatform::Youtube, "https://youtube.com/@trovadores").await?;
    assert_eq!(moved.collective_id, band.id);
    assert_eq!(group_social::display(&db, &moved).await?, "Los Trovadores - youtube");
    assert!(group_social::update(&db, link.id, SocialPlatform::Youtube, "ftp://nope").await.unwrap_err().is_validation());

    let missing = group_social::update(&db, 9999, SocialPlatform::Other, "https://x.example").await.unwrap_err();
    assert_eq!(missing.to_string(), crate::errors::ModelError::not_found("group social").to_string());

    assert!(group_social::delete(&db, link.id).await?);
    assert!(!group_social::delete(&db, link.id).await?);
    Ok(())
}
