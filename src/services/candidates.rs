//! Candidate pool assembly: multi-page catalog fetch, dedup and favorite exclusion.

use std::collections::{HashMap, HashSet};

use crate::{
    models::{CandidateItem, FavoriteEntry, ItemKey, MediaKind},
    services::metadata::MetadataClient,
};

/// Fetches `page_count` catalog pages for every kind and merges them
///
/// Pages are requested in order (kind by kind, page 1 upwards). A page that
/// cannot be fetched is skipped; the rest are still used.
pub async fn assemble_pool(
    metadata: &MetadataClient,
    media_kinds: &[MediaKind],
    page_count: u32,
) -> Vec<CandidateItem> {
    let mut listings = Vec::new();

    for &media_kind in media_kinds {
        for page in 1..=page_count {
            listings.extend(metadata.catalog_page(media_kind, page).await);
        }
    }

    let fetched = listings.len();
    let pool = dedup_last_wins(listings);

    tracing::debug!(
        fetched = fetched,
        unique = pool.len(),
        "Candidate pool assembled"
    );

    pool
}

/// Collapses records sharing `(item id, media kind)`
///
/// The last-seen record replaces earlier ones; the item keeps the position
/// of its first appearance.
pub fn dedup_last_wins(items: Vec<CandidateItem>) -> Vec<CandidateItem> {
    let mut positions: HashMap<ItemKey, usize> = HashMap::with_capacity(items.len());
    let mut unique: Vec<CandidateItem> = Vec::with_capacity(items.len());

    for item in items {
        match positions.get(&item.key()) {
            Some(&index) => unique[index] = item,
            None => {
                positions.insert(item.key(), unique.len());
                unique.push(item);
            }
        }
    }

    unique
}

/// Drops every candidate the user already has as a favorite
pub fn exclude_favorites(
    pool: Vec<CandidateItem>,
    favorites: &[FavoriteEntry],
) -> Vec<CandidateItem> {
    let favorite_keys: HashSet<ItemKey> = favorites.iter().map(FavoriteEntry::key).collect();

    pool.into_iter()
        .filter(|item| !favorite_keys.contains(&item.key()))
        .collect()
}
