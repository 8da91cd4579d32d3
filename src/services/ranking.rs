//! Candidate scoring, ordering and page slicing.
//!
//! A candidate's *affinity* is how much of the user's profile it matches. Its
//! *score* is what the list is ordered by; under the lightweight policy it
//! adds a popularity base to the affinity. Candidates with positive affinity
//! form the ranked head of the list, the rest is popularity backfill.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::{
    error::{AppError, AppResult},
    models::{CandidateItem, TOP_CAST},
    services::{metadata::MetadataClient, profile::PreferenceProfile},
};

/// Items per page handed to the serving layer
pub const PAGE_SIZE: usize = 20;

/// How candidates are matched against the profile. Exactly one applies per engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// Genres from the catalog listing plus `floor(popularity / 10)`; no extra fetch
    #[default]
    Lightweight,
    /// Genres, top cast and directors from a detail fetch per candidate
    FullDetail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Score {
    affinity: u32,
    total: u32,
}

fn checked_sum(weights: impl IntoIterator<Item = u32>) -> AppResult<u32> {
    weights
        .into_iter()
        .try_fold(0u32, |acc, w| acc.checked_add(w))
        .ok_or_else(|| AppError::Internal("score overflow".to_string()))
}

/// `floor(popularity / 10)`; negative or NaN popularity gives 0
pub fn popularity_bonus(popularity: f64) -> u32 {
    (popularity / 10.0).floor() as u32
}

async fn score_candidate(
    item: &CandidateItem,
    profile: &PreferenceProfile,
    policy: ScoringPolicy,
    metadata: &MetadataClient,
) -> AppResult<Score> {
    match policy {
        ScoringPolicy::Lightweight => {
            let affinity = checked_sum(item.genre_ids.iter().map(|&g| profile.genre(g)))?;
            // The popularity base only orders; it never drops a candidate
            let total = affinity.saturating_add(popularity_bonus(item.popularity));
            Ok(Score { affinity, total })
        }
        ScoringPolicy::FullDetail => {
            let detail = metadata.detail(item.key()).await;
            let affinity = checked_sum(
                detail
                    .genres
                    .iter()
                    .map(|&g| profile.genre(g))
                    .chain(detail.cast.iter().take(TOP_CAST).map(|&a| profile.actor(a)))
                    .chain(detail.directors().map(|d| profile.director(d))),
            )?;
            Ok(Score {
                affinity,
                total: affinity,
            })
        }
    }
}

/// Highest popularity first, then lowest id, movies before series
fn by_popularity(a: &CandidateItem, b: &CandidateItem) -> Ordering {
    b.popularity
        .total_cmp(&a.popularity)
        .then_with(|| a.item_id.cmp(&b.item_id))
        .then_with(|| a.media_kind.cmp(&b.media_kind))
}

fn by_score(a: &CandidateItem, b: &CandidateItem) -> Ordering {
    b.score.cmp(&a.score).then_with(|| by_popularity(a, b))
}

/// Scores `candidates` and returns at most `limit` of them in final order
///
/// Candidates must already be deduplicated and free of favorites. A candidate
/// whose scoring fails is logged and left out; the others are unaffected.
pub async fn rank(
    candidates: Vec<CandidateItem>,
    profile: &PreferenceProfile,
    policy: ScoringPolicy,
    metadata: &MetadataClient,
    limit: usize,
) -> Vec<CandidateItem> {
    let mut ranked = Vec::new();
    let mut backfill = Vec::new();
    let mut dropped = 0;

    for mut item in candidates {
        match score_candidate(&item, profile, policy, metadata).await {
            Ok(score) => {
                item.score = score.total;
                if score.affinity > 0 {
                    ranked.push(item);
                } else {
                    backfill.push(item);
                }
            }
            Err(e) => {
                dropped += 1;
                tracing::warn!(
                    item = %item.key(),
                    error = %e,
                    "Failed to score candidate, dropping"
                );
            }
        }
    }

    ranked.sort_by(by_score);
    ranked.truncate(limit);

    let missing = limit.saturating_sub(ranked.len());
    if missing > 0 {
        backfill.sort_by(by_popularity);
        ranked.extend(backfill.into_iter().take(missing));
    }

    tracing::debug!(
        policy = ?policy,
        returned = ranked.len(),
        dropped = dropped,
        "Candidates ranked"
    );

    ranked
}

/// The `page`-th (1-based) slice of [`PAGE_SIZE`] items; empty past the end
pub fn page(items: &[CandidateItem], page: usize) -> &[CandidateItem] {
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(PAGE_SIZE);
    if start >= items.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DetailCache;
    use crate::error::AppError;
    use crate::models::{ItemDetail, ItemKey, MediaKind};
    use crate::services::providers::MockMetadataProvider;
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use std::time::Duration;

    fn candidate(item_id: u64, genres: &[u32], popularity: f64) -> CandidateItem {
        CandidateItem {
            item_id,
            media_kind: MediaKind::Movie,
            genre_ids: genres.iter().copied().collect::<BTreeSet<_>>(),
            popularity,
            score: 0,
            title: None,
            overview: None,
            poster_path: None,
            release_date: None,
            vote_average: None,
        }
    }

    fn drama_profile() -> PreferenceProfile {
        let mut profile = PreferenceProfile::default();
        profile.genre_weight.insert(18, 5);
        profile
    }

    fn unused_metadata() -> MetadataClient {
        MetadataClient::new(
            Arc::new(MockMetadataProvider::new()),
            DetailCache::new(100, Duration::from_secs(60)),
        )
    }

    fn ids(items: &[CandidateItem]) -> Vec<u64> {
        items.iter().map(|c| c.item_id).collect()
    }

    #[test]
    fn test_popularity_bonus() {
        assert_eq!(popularity_bonus(50.0), 5);
        assert_eq!(popularity_bonus(59.9), 5);
        assert_eq!(popularity_bonus(9.99), 0);
        assert_eq!(popularity_bonus(-3.0), 0);
        assert_eq!(popularity_bonus(f64::NAN), 0);
    }

    #[tokio::test]
    async fn test_lightweight_adds_genre_weight_and_popularity() {
        let ranked = rank(
            vec![candidate(200, &[18], 50.0)],
            &drama_profile(),
            ScoringPolicy::Lightweight,
            &unused_metadata(),
            20,
        )
        .await;

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score, 10);
    }

    #[tokio::test]
    async fn test_ties_break_by_popularity_then_id() {
        let candidates = vec![
            candidate(30, &[18], 15.0),
            candidate(10, &[18], 19.0),
            candidate(20, &[18], 19.0),
            candidate(5, &[18], 25.0),
        ];

        let ranked = rank(
            candidates,
            &drama_profile(),
            ScoringPolicy::Lightweight,
            &unused_metadata(),
            20,
        )
        .await;

        // 5 scores 7, the rest score 6; 10 and 20 also tie on popularity
        assert_eq!(ids(&ranked), vec![5, 10, 20, 30]);
    }

    #[tokio::test]
    async fn test_ranking_is_deterministic() {
        let candidates: Vec<CandidateItem> = (1..=40)
            .map(|id| {
                let genres: &[u32] = if id % 3 == 0 { &[18] } else { &[35] };
                candidate(id, genres, (id % 7) as f64 * 10.0)
            })
            .collect();
        let mut reversed = candidates.clone();
        reversed.reverse();

        let metadata = unused_metadata();
        let profile = drama_profile();
        let first = rank(candidates, &profile, ScoringPolicy::Lightweight, &metadata, 20).await;
        let second = rank(reversed, &profile, ScoringPolicy::Lightweight, &metadata, 20).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_backfill_by_popularity_without_duplicates() {
        let mut candidates = vec![candidate(1, &[18], 1.0), candidate(2, &[18], 2.0)];
        candidates.extend((10..40).map(|id| candidate(id, &[35], id as f64)));

        let ranked = rank(
            candidates,
            &drama_profile(),
            ScoringPolicy::Lightweight,
            &unused_metadata(),
            20,
        )
        .await;

        assert_eq!(ranked.len(), 20);
        assert_eq!(ids(&ranked[..3]), vec![2, 1, 39]);
        assert_eq!(ranked[19].item_id, 22);

        let unique: BTreeSet<u64> = ids(&ranked).into_iter().collect();
        assert_eq!(unique.len(), 20);
    }

    #[tokio::test]
    async fn test_empty_profile_is_popularity_only() {
        let candidates = vec![
            candidate(1, &[18], 10.0),
            candidate(2, &[35], 90.0),
            candidate(3, &[], 40.0),
        ];

        let ranked = rank(
            candidates,
            &PreferenceProfile::default(),
            ScoringPolicy::Lightweight,
            &unused_metadata(),
            20,
        )
        .await;

        assert_eq!(ids(&ranked), vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_overflowing_candidate_is_dropped() {
        let mut profile = PreferenceProfile::default();
        profile.genre_weight.insert(1, u32::MAX);
        profile.genre_weight.insert(2, u32::MAX);

        let ranked = rank(
            vec![candidate(1, &[1, 2], 1.0), candidate(2, &[1], 1.0)],
            &profile,
            ScoringPolicy::Lightweight,
            &unused_metadata(),
            20,
        )
        .await;

        assert_eq!(ids(&ranked), vec![2]);
    }

    #[tokio::test]
    async fn test_huge_popularity_saturates_instead_of_dropping() {
        let mut profile = PreferenceProfile::default();
        profile.genre_weight.insert(18, 5);

        let ranked = rank(
            vec![candidate(1, &[18], 1e12), candidate(2, &[18], 10.0)],
            &profile,
            ScoringPolicy::Lightweight,
            &unused_metadata(),
            20,
        )
        .await;

        assert_eq!(ids(&ranked), vec![1, 2]);
        assert_eq!(ranked[0].score, u32::MAX);
        assert_eq!(ranked[1].score, 6);
    }

    #[tokio::test]
    async fn test_full_detail_uses_cast_and_directors() {
        let mut mock = MockMetadataProvider::new();
        mock.expect_fetch_detail().returning(|key: ItemKey| match key.item_id {
            1 => {
                let mut detail = ItemDetail::empty(key);
                detail.cast = vec![7];
                Ok(detail)
            }
            2 => Err(AppError::UpstreamUnavailable("timeout".to_string())),
            _ => {
                let mut detail = ItemDetail::empty(key);
                detail.genres.insert(18);
                Ok(detail)
            }
        });
        mock.expect_name().return_const("mock");

        let metadata = MetadataClient::new(
            Arc::new(mock),
            DetailCache::new(100, Duration::from_secs(60)),
        );
        let mut profile = drama_profile();
        profile.actor_weight.insert(7, 3);

        // Listing genres are ignored under full detail
        let ranked = rank(
            vec![
                candidate(1, &[], 10.0),
                candidate(2, &[18], 99.0),
                candidate(3, &[], 5.0),
            ],
            &profile,
            ScoringPolicy::FullDetail,
            &metadata,
            20,
        )
        .await;

        assert_eq!(ids(&ranked), vec![3, 1, 2]);
        assert_eq!(ranked[0].score, 5);
        assert_eq!(ranked[1].score, 3);
        assert_eq!(ranked[2].score, 0);
    }

    #[test]
    fn test_page_slicing() {
        let items: Vec<CandidateItem> = (1..=45).map(|id| candidate(id, &[], 0.0)).collect();

        assert_eq!(ids(page(&items, 1)), (1..=20).collect::<Vec<_>>());
        assert_eq!(ids(page(&items, 3)), (41..=45).collect::<Vec<_>>());
        assert!(page(&items, 4).is_empty());
        assert!(page(&items, 0).is_empty());
        assert!(page(&items, usize::MAX).is_empty());
    }
}
