//! Database-backed tests. Every test gets its own migrated in-memory
//! SQLite database.

use anyhow::Result;
use sea_orm::DatabaseConnection;

use crate::{artist_profile, artistic_line, genre, user};

mod users_tests;
mod collective_tests;
mod social_tests;

pub(crate) async fn setup_test_db() -> Result<DatabaseConnection> {
    crate::db::connect_in_memory().await
}

pub(crate) async fn make_user(db: &DatabaseConnection, username: &str) -> Result<user::Model> {
    let new = user::NewUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        ..Default::default()
    };
    Ok(user::create(db, new).await?)
}

pub(crate) async fn make_profile(db: &DatabaseConnection, username: &str) -> Result<artist_profile::Model> {
    let owner = make_user(db, username).await?;
    Ok(artist_profile::create(db, owner.id, artist_profile::ProfileInput::default()).await?)
}

/// `n` genres spread over a single fresh line.
pub(crate) async fn make_genres(db: &DatabaseConnection, line: &str, n: usize) -> Result<Vec<genre::Model>> {
    let line = artistic_line::create(db, line, None).await?;
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        out.push(genre::create(db, &format!("Genre {i}"), line.id).await?);
    }
    Ok(out)
}
