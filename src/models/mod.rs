use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

mod media;

pub use media::{ItemKey, MediaKind};

/// Only the first cast members of an item carry taste signal
pub const TOP_CAST: usize = 5;

/// Crew job that marks a director
pub const DIRECTOR_JOB: &str = "Director";

/// An item the user has saved, as returned by the favorites service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    #[serde(rename = "tmdbId")]
    pub item_id: u64,
    #[serde(rename = "type")]
    pub media_kind: MediaKind,
}

impl FavoriteEntry {
    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.item_id, self.media_kind)
    }
}

/// Genres and credits of a single item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetail {
    pub item_id: u64,
    pub media_kind: MediaKind,
    pub genres: BTreeSet<u32>,
    /// Top-billed cast, at most [`TOP_CAST`] entries
    pub cast: Vec<u64>,
    pub crew: Vec<CrewMember>,
}

impl ItemDetail {
    /// Detail with no genres or credits; contributes zero weight wherever it is used
    pub fn empty(key: ItemKey) -> Self {
        Self {
            item_id: key.item_id,
            media_kind: key.media_kind,
            genres: BTreeSet::new(),
            cast: Vec::new(),
            crew: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty() && self.cast.is_empty() && self.crew.is_empty()
    }

    pub fn directors(&self) -> impl Iterator<Item = u64> + '_ {
        self.crew
            .iter()
            .filter(|member| member.role == DIRECTOR_JOB)
            .map(|member| member.person_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewMember {
    pub person_id: u64,
    pub role: String,
}

/// A catalog item eligible for recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateItem {
    pub item_id: u64,
    pub media_kind: MediaKind,
    pub genre_ids: BTreeSet<u32>,
    pub popularity: f64,
    /// Computed by the ranker, zero until then
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl CandidateItem {
    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.item_id, self.media_kind)
    }
}

// ============================================================================
// TMDb API Types
// ============================================================================

/// Response from GET /{movie|tv}/{id}?append_to_response=credits
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiItemDetails {
    #[serde(default)]
    pub genres: Vec<ApiGenre>,
    #[serde(default)]
    pub credits: ApiCredits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiGenre {
    pub id: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiCredits {
    #[serde(default)]
    pub cast: Vec<ApiCastMember>,
    #[serde(default)]
    pub crew: Vec<ApiCrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCastMember {
    pub id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCrewMember {
    pub id: u64,
    #[serde(default)]
    pub job: String,
}

impl ApiItemDetails {
    pub fn into_detail(self, key: ItemKey) -> ItemDetail {
        ItemDetail {
            item_id: key.item_id,
            media_kind: key.media_kind,
            genres: self.genres.into_iter().map(|g| g.id).collect(),
            cast: self
                .credits
                .cast
                .into_iter()
                .take(TOP_CAST)
                .map(|c| c.id)
                .collect(),
            crew: self
                .credits
                .crew
                .into_iter()
                .map(|c| CrewMember {
                    person_id: c.id,
                    role: c.job,
                })
                .collect(),
        }
    }
}

/// One record of a GET /discover/{movie|tv} page
#[derive(Debug, Clone, Deserialize)]
pub struct ApiListing {
    pub id: u64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub popularity: f64,
    /// Movies carry `title`, series carry `name`
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl ApiListing {
    /// Tags the listing with the catalog it was fetched from
    pub fn into_candidate(self, media_kind: MediaKind) -> CandidateItem {
        CandidateItem {
            item_id: self.id,
            media_kind,
            genre_ids: self.genre_ids.into_iter().collect(),
            popularity: self.popularity,
            score: 0,
            title: self.title.or(self.name),
            overview: self.overview,
            poster_path: self.poster_path,
            release_date: self.release_date.or(self.first_air_date),
            vote_average: self.vote_average,
        }
    }
}
