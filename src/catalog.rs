//! Song catalog: the durable record of every imported song.
//!
//! A [`SongMeta`] ties a song id to its source file, the user's view settings and the
//! cached parse. The cache fields only exist together ([`CacheEntry`]); a stored
//! record with one or two of them missing loads as "no cache".
//!
//! [`Catalog`] is the storage seam. [`SqliteCatalog`](crate::db::SqliteCatalog) is the
//! on-disk implementation, [`MemoryCatalog`] keeps everything in a `HashMap` for
//! tests and short-lived tools.

use crate::ast::Song;
use crate::error::Result;
use crate::hash::Fingerprint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A parse result stored alongside the fingerprint of the content it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub ast: Song,
    pub file_hash: Fingerprint,
    pub last_parsed: DateTime<Utc>,
}

impl CacheEntry {
    /// Assemble from separately stored columns. Anything short of all three is `None`.
    pub fn from_parts(
        id: &str,
        ast: Option<Song>,
        file_hash: Option<Fingerprint>,
        last_parsed: Option<DateTime<Utc>>,
    ) -> Option<Self> {
        match (ast, file_hash, last_parsed) {
            (Some(ast), Some(file_hash), Some(last_parsed)) => Some(Self {
                ast,
                file_hash,
                last_parsed,
            }),
            (None, None, None) => None,
            _ => {
                warn!(song_id = id, "partial cache state in catalog, treating as empty");
                None
            }
        }
    }
}

/// Catalog record for one song.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongMeta {
    pub id: String,
    pub title: String,
    pub artist: String,
    /// Source file; unique across the catalog.
    pub path: PathBuf,
    /// Transposition (in semitones) the song was last viewed with.
    pub last_key: i32,
    pub capo: i32,
    pub tags: Vec<String>,
    pub last_opened: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheEntry>,
}

impl SongMeta {
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query) || self.artist.to_lowercase().contains(&query)
    }
}

/// Storage for song records.
///
/// Mutating methods take `&mut self`: one writer at a time. Implementations do no
/// locking of their own.
pub trait Catalog {
    fn get_by_id(&self, id: &str) -> Result<Option<SongMeta>>;

    fn get_by_path(&self, path: &Path) -> Result<Option<SongMeta>>;

    /// Insert or replace by id. A different record holding the same path is replaced.
    fn upsert(&mut self, record: &SongMeta) -> Result<()>;

    /// Remove a record. The source file is left alone. Unknown ids are ignored.
    fn delete(&mut self, id: &str) -> Result<()>;

    /// All records, most recently opened first.
    fn list_all(&self) -> Result<Vec<SongMeta>>;

    /// Records whose title or artist contains `query`, most recently opened first.
    fn search(&self, query: &str) -> Result<Vec<SongMeta>>;

    /// Drop the cache fields of every record.
    fn clear_all_caches(&mut self) -> Result<()>;

    fn has_song(&self, id: &str) -> Result<bool> {
        Ok(self.get_by_id(id)?.is_some())
    }

    fn has_song_by_path(&self, path: &Path) -> Result<bool> {
        Ok(self.get_by_path(path)?.is_some())
    }
}

fn sort_recent_first(records: &mut [SongMeta]) {
    records.sort_by(|a, b| {
        b.last_opened
            .cmp(&a.last_opened)
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// In-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    records: HashMap<String, SongMeta>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Catalog for MemoryCatalog {
    fn get_by_id(&self, id: &str) -> Result<Option<SongMeta>> {
        Ok(self.records.get(id).cloned())
    }

    fn get_by_path(&self, path: &Path) -> Result<Option<SongMeta>> {
        Ok(self.records.values().find(|r| r.path == path).cloned())
    }

    fn upsert(&mut self, record: &SongMeta) -> Result<()> {
        self.records
            .retain(|id, existing| id == &record.id || existing.path != record.path);
        self.records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.records.remove(id);
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<SongMeta>> {
        let mut records: Vec<SongMeta> = self.records.values().cloned().collect();
        sort_recent_first(&mut records);
        Ok(records)
    }

    fn search(&self, query: &str) -> Result<Vec<SongMeta>> {
        let mut records: Vec<SongMeta> = self
            .records
            .values()
            .filter(|r| r.matches(query))
            .cloned()
            .collect();
        sort_recent_first(&mut records);
        Ok(records)
    }

    fn clear_all_caches(&mut self) -> Result<()> {
        for record in self.records.values_mut() {
            record.cache = None;
        }
        Ok(())
    }
}
