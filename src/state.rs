// Shared data model for lists, drafts and pinned reviews.
// Kept free of I/O so every module (and its tests) can build these directly.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::insights::ReviewCategory;

/// One movie inside a ranked list. Rank is the entry's position in
/// [`RankedList::entries`], not a stored field.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl RankedEntry {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
        }
    }
}

/// 1-based rank shown to users for a 0-based position.
pub fn display_rank(index: usize) -> usize {
    index + 1
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RankedList {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub entries: Vec<RankedEntry>,
    pub owner_id: String,
}

impl RankedList {
    pub fn entry_ids(&self) -> Vec<i64> {
        self.entries.iter().map(|e| e.id).collect()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Appends an entry at the bottom of the ranking.
    /// Returns false (and leaves the list alone) if the id is already present.
    pub fn insert_entry(&mut self, entry: RankedEntry) -> bool {
        if self.contains(entry.id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn remove_entry(&mut self, id: i64) -> Option<RankedEntry> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(pos))
    }

    /// Payload for a wholesale replace of the remote copy.
    pub fn to_update(&self) -> ListUpdate {
        ListUpdate {
            title: self.title.clone(),
            description: self.description.clone(),
            public: self.is_public,
            tags: self.tags.iter().cloned().collect(),
            movies: self
                .entries
                .iter()
                .enumerate()
                .map(|(order, e)| MovieOrder {
                    order: order as u32,
                    tmdb_id: e.id,
                })
                .collect(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct MovieOrder {
    pub order: u32,
    #[serde(rename = "tmdbID")]
    pub tmdb_id: i64,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ListUpdate {
    pub title: String,
    pub description: String,
    pub public: bool,
    pub tags: Vec<String>,
    pub movies: Vec<MovieOrder>,
}

/// A locally cached, unsaved edit of a list.
#[derive(Clone, Debug, PartialEq)]
pub struct Draft {
    pub list_id: String,
    pub snapshot: RankedList,
    pub saved_at: DateTime<Utc>,
}

/// On-disk shape of a draft: `{"data": <list>, "date": <rfc3339>}`.
#[derive(Serialize, Deserialize, Debug)]
pub struct StoredDraft {
    pub data: RankedList,
    pub date: DateTime<Utc>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    pub id: String,
    pub movie_id: i64,
    #[serde(default)]
    pub movie_title: String,
    pub public: bool,
    #[serde(default)]
    pub ratings: BTreeMap<ReviewCategory, u8>,
}

impl ReviewEntry {
    pub fn new(id: impl Into<String>, movie_id: i64, public: bool) -> Self {
        Self {
            id: id.into(),
            movie_id,
            movie_title: String::new(),
            public,
            ratings: BTreeMap::new(),
        }
    }
}

/// The identity supplied by the auth provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub uid: String,
}

impl CurrentUser {
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }

    pub fn is_current_user(&self, owner_id: &str) -> bool {
        self.uid == owner_id
    }
}

#[cfg(test)]
pub(crate) fn sample_list(ids: &[i64]) -> RankedList {
    RankedList {
        id: "list-1".to_string(),
        title: "X".to_string(),
        description: String::new(),
        is_public: true,
        tags: BTreeSet::new(),
        entries: ids
            .iter()
            .map(|id| RankedEntry::new(*id, format!("Movie {}", id)))
            .collect(),
        owner_id: "user-1".to_string(),
    }
}
