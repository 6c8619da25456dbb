//! URL slugs for collectives.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use unicode_normalization::UnicodeNormalization;

use crate::collective;
use crate::errors::ModelError;

/// Slugs derived from a name are cut to this many characters before any
/// `-N` suffix is appended.
pub const BASE_SLUG_LEN: usize = 180;
pub const MAX_SLUG_LEN: usize = 220;

const FALLBACK_SLUG: &str = "collective";

/// ASCII slug: accents folded, lowercase, runs of whitespace/hyphens
/// collapsed to one hyphen, other punctuation dropped.
///
/// ```
/// assert_eq!(models::slug::slugify("Los Trovadores"), "los-trovadores");
/// assert_eq!(models::slug::slugify("  Música   Andina!! "), "musica-andina");
/// ```
pub fn slugify(value: &str) -> String {
    let folded: String = value.nfkd().filter(char::is_ascii).collect::<String>().to_lowercase();

    let mut out = String::with_capacity(folded.len());
    let mut pending_sep = false;
    for c in folded.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_sep && !out.is_empty() {
                out.push('-');
            }
            pending_sep = false;
            out.push(c);
        } else if c == '-' || c.is_ascii_whitespace() {
            pending_sep = true;
        }
    }
    out.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Slug base for a collective name, bounded to [`BASE_SLUG_LEN`].
pub fn base_slug(name: &str) -> String {
    let mut slug = slugify(name);
    if slug.len() > BASE_SLUG_LEN {
        slug.truncate(BASE_SLUG_LEN);
        // No dangling separator before the `-N` suffix.
        let trimmed = slug.trim_end_matches(|c| c == '-' || c == '_').len();
        slug.truncate(trimmed);
    }
    if slug.is_empty() {
        slug = FALLBACK_SLUG.to_string();
    }
    slug
}

pub async fn slug_taken<C: ConnectionTrait>(conn: &C, slug: &str, exclude: Option<i32>) -> Result<bool, ModelError> {
    let mut query = collective::Entity::find().filter(collective::Column::Slug.eq(slug));
    if let Some(id) = exclude {
        query = query.filter(collective::Column::Id.ne(id));
    }
    Ok(query.count(conn).await? > 0)
}

/// First free slug among `base`, `base-1`, `base-2`, ...
pub async fn unique_slug<C: ConnectionTrait>(conn: &C, base: &str, exclude: Option<i32>) -> Result<String, ModelError> {
    let mut candidate = base.to_string();
    let mut counter = 1u32;
    while slug_taken(conn, &candidate, exclude).await? {
        candidate = format!("{base}-{counter}");
        counter += 1;
    }
    Ok(candidate)
}
