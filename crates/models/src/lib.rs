//! Domain model of the arts directory: users, artist profiles, collectives,
//! the genre taxonomy, image galleries and social links.
//!
//! Each entity module holds the sea-orm entity plus the operations that
//! enforce its invariants. Count limits live in [`limits`].

pub mod errors;
pub mod db;
pub mod limits;
pub mod lock;
pub mod media;
pub mod slug;

pub mod user;
pub mod artistic_line;
pub mod genre;
pub mod artist_profile;
pub mod artist_profile_genre;
pub mod collective;
pub mod collective_member;
pub mod collective_genre;
pub mod gallery;
pub mod artist_image;
pub mod group_image;
pub mod social;
pub mod artist_social;
pub mod group_social;

#[cfg(test)]
mod tests;
