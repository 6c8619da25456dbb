//! References to externally stored image assets.
//!
//! Storage itself is somebody else's job; the model only keeps relative
//! asset paths under a fixed prefix per image kind.

use crate::errors::ModelError;

const MAX_ASSET_LEN: usize = 255;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaPrefix {
    ArtistProfile,
    ArtistImages,
    GroupProfile,
    GroupImages,
}

impl MediaPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaPrefix::ArtistProfile => "artists/profile/",
            MediaPrefix::ArtistImages => "artists/images/",
            MediaPrefix::GroupProfile => "groups/profile/",
            MediaPrefix::GroupImages => "groups/images/",
        }
    }
}

/// Normalize an asset reference to a path under `prefix`.
///
/// A bare file name is placed under the prefix; a path must already start
/// with it. Absolute paths and `..` segments are rejected.
pub fn asset_path(prefix: MediaPrefix, reference: &str) -> Result<String, ModelError> {
    let reference = reference.trim();
    if reference.is_empty() {
        return Err(ModelError::Validation("image reference required".into()));
    }
    if reference.starts_with('/') || reference.contains('\\') {
        return Err(ModelError::Validation("image reference must be a relative path".into()));
    }
    if reference.split('/').any(|seg| seg == ".." || seg == ".") {
        return Err(ModelError::Validation("image reference must not contain dot segments".into()));
    }

    let path = if reference.starts_with(prefix.as_str()) {
        reference.to_string()
    } else if reference.contains('/') {
        return Err(ModelError::Validation(format!("image must live under {}", prefix.as_str())));
    } else {
        format!("{}{}", prefix.as_str(), reference)
    };

    if path.len() <= prefix.as_str().len() {
        return Err(ModelError::Validation("image file name required".into()));
    }
    if path.len() > MAX_ASSET_LEN {
        return Err(ModelError::Validation(format!("image reference longer than {MAX_ASSET_LEN}")));
    }
    Ok(path)
}

/// Same as [`asset_path`] for optional fields: blank means "no image".
pub fn optional_asset_path(prefix: MediaPrefix, reference: Option<&str>) -> Result<Option<String>, ModelError> {
    match reference.map(str::trim) {
        None | Some("") => Ok(None),
        Some(r) => asset_path(prefix, r).map(Some),
    }
}
