//! Count limits shared by artist profiles and collectives.

use crate::errors::ModelError;

/// Genres an artist profile or collective may reference.
pub const MAX_GENRES: u64 = 3;
/// Images an artist profile or collective may own.
pub const MAX_IMAGES: u64 = 5;

/// Fails when an owner references more than [`MAX_GENRES`] genres.
pub fn check_genre_count(count: u64, owner: &str) -> Result<(), ModelError> {
    if count > MAX_GENRES {
        return Err(ModelError::Validation(format!(
            "maximum {MAX_GENRES} genres: {owner} references {count}"
        )));
    }
    Ok(())
}

/// Fails when `existing` sibling images already fill the gallery.
pub fn check_image_capacity(existing: u64, owner: &str) -> Result<(), ModelError> {
    if existing >= MAX_IMAGES {
        return Err(ModelError::Validation(format!(
            "maximum {MAX_IMAGES} images: {owner} already has {existing}"
        )));
    }
    Ok(())
}
