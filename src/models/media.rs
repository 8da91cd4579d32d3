use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Catalog an item belongs to. Numeric ids are only unique within one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    #[serde(rename = "movie")]
    Movie,
    /// Stored as "serial" by the favorites service, "tv" by TMDb
    #[serde(rename = "serial", alias = "series", alias = "tv")]
    Series,
}

impl MediaKind {
    pub const ALL: [MediaKind; 2] = [MediaKind::Movie, MediaKind::Series];

    /// Path segment TMDb uses for this kind
    pub fn tmdb_segment(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "movie"),
            MediaKind::Series => write!(f, "serial"),
        }
    }
}

/// Identity of a catalog item across both catalogs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub item_id: u64,
    pub media_kind: MediaKind,
}

impl ItemKey {
    pub fn new(item_id: u64, media_kind: MediaKind) -> Self {
        Self {
            item_id,
            media_kind,
        }
    }
}

impl Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.media_kind, self.item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_serializes_like_favorites_store() {
        assert_eq!(serde_json::to_string(&MediaKind::Movie).unwrap(), "\"movie\"");
        assert_eq!(serde_json::to_string(&MediaKind::Series).unwrap(), "\"serial\"");
    }

    #[test]
    fn test_media_kind_accepts_aliases() {
        for raw in ["\"serial\"", "\"series\"", "\"tv\""] {
            let kind: MediaKind = serde_json::from_str(raw).unwrap();
            assert_eq!(kind, MediaKind::Series);
        }
    }

    #[test]
    fn test_tmdb_segment() {
        assert_eq!(MediaKind::Movie.tmdb_segment(), "movie");
        assert_eq!(MediaKind::Series.tmdb_segment(), "tv");
    }

    #[test]
    fn test_item_key_display() {
        assert_eq!(format!("{}", ItemKey::new(550, MediaKind::Movie)), "movie:550");
        assert_eq!(format!("{}", ItemKey::new(1399, MediaKind::Series)), "serial:1399");
    }
}
