use std::collections::HashMap;

use crate::{
    models::{FavoriteEntry, ItemDetail, TOP_CAST},
    services::metadata::MetadataClient,
};

pub const GENRE_WEIGHT: u32 = 5;
pub const ACTOR_WEIGHT: u32 = 3;
pub const DIRECTOR_WEIGHT: u32 = 2;

/// Weighted taste vectors derived from a user's favorites
///
/// Weights accumulate additively: a genre present on k favorites weighs
/// `k * GENRE_WEIGHT`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceProfile {
    pub genre_weight: HashMap<u32, u32>,
    pub actor_weight: HashMap<u64, u32>,
    pub director_weight: HashMap<u64, u32>,
}

impl PreferenceProfile {
    /// Folds one favorite's detail into the profile
    pub fn add_item(&mut self, detail: &ItemDetail) {
        for &genre in &detail.genres {
            bump(&mut self.genre_weight, genre, GENRE_WEIGHT);
        }
        for &actor in detail.cast.iter().take(TOP_CAST) {
            bump(&mut self.actor_weight, actor, ACTOR_WEIGHT);
        }
        for director in detail.directors() {
            bump(&mut self.director_weight, director, DIRECTOR_WEIGHT);
        }
    }

    pub fn genre(&self, genre_id: u32) -> u32 {
        self.genre_weight.get(&genre_id).copied().unwrap_or(0)
    }

    pub fn actor(&self, person_id: u64) -> u32 {
        self.actor_weight.get(&person_id).copied().unwrap_or(0)
    }

    pub fn director(&self, person_id: u64) -> u32 {
        self.director_weight.get(&person_id).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.genre_weight.is_empty()
            && self.actor_weight.is_empty()
            && self.director_weight.is_empty()
    }
}

fn bump<K: std::hash::Hash + Eq>(weights: &mut HashMap<K, u32>, key: K, weight: u32) {
    let entry = weights.entry(key).or_insert(0);
    *entry = entry.saturating_add(weight);
}

/// Builds the taste profile for a set of favorites
///
/// Favorites whose detail cannot be retrieved contribute nothing.
pub async fn build_profile(
    favorites: &[FavoriteEntry],
    metadata: &MetadataClient,
) -> PreferenceProfile {
    let mut profile = PreferenceProfile::default();
    let mut skipped = 0;

    for favorite in favorites {
        let detail = metadata.detail(favorite.key()).await;
        if detail.is_empty() {
            skipped += 1;
            continue;
        }
        profile.add_item(&detail);
    }

    tracing::debug!(
        favorites = favorites.len(),
        skipped = skipped,
        genres = profile.genre_weight.len(),
        actors = profile.actor_weight.len(),
        directors = profile.director_weight.len(),
        "Preference profile built"
    );

    profile
}
