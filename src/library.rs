//! # Song Library
//!
//! The operations a viewer or editor performs on the catalog: importing a file,
//! opening a song (through the cache), editing and saving its source, adjusting view
//! settings, and housekeeping.
//!
//! ## Identity
//! A song id is derived from the name of the folder holding the file plus the song's
//! title and artist, each normalized (lowercased, accents removed, anything but
//! `a-z0-9` dropped), joined with `_`, hashed with SHA-256 and cut to 16 hex chars.
//! Importing the same song from the same folder twice gives the same id.
//!
//! ## Duplicates
//! Import checks the path first, then the id. Either hit is reported as an
//! [`ImportOutcome`] variant, not an error.

use crate::ast::Song;
use crate::cache::SongCache;
use crate::catalog::{CacheEntry, Catalog, SongMeta};
use crate::error::{ChordbookError, Result};
use crate::hash::{short_sha256, Fingerprint};
use crate::parser::parse;
use crate::semantic::{unrecognized_chords, validate};
use crate::transpose::transpose;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use unicode_normalization::UnicodeNormalization;

const DEFAULT_TITLE: &str = "Untitled";
const DEFAULT_ARTIST: &str = "Unknown Artist";

/// Lowercase, strip diacritics, keep only `a-z0-9`.
pub fn normalize_name(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Deterministic song id from location and identity. Empty title or artist count as
/// missing.
pub fn generate_song_id(path: &Path, title: Option<&str>, artist: Option<&str>) -> String {
    let folder = path
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let key = format!(
        "{}_{}_{}",
        normalize_name(&folder),
        normalize_name(non_empty(title).unwrap_or("untitled")),
        normalize_name(non_empty(artist).unwrap_or("unknown")),
    );
    short_sha256(key.as_bytes())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Result of [`Library::import`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImportOutcome {
    Imported { meta: SongMeta, song: Song },
    /// The file is already in the catalog.
    DuplicatePath { existing: SongMeta },
    /// Another file with the same folder, title and artist is already in the catalog.
    DuplicateId { id: String },
}

/// User-editable fields of a record. `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct SongUpdate {
    pub last_key: Option<i32>,
    pub capo: Option<i32>,
    pub tags: Option<Vec<String>>,
}

/// Catalog plus parse cache.
pub struct Library<C> {
    cache: SongCache<C>,
}

impl<C: Catalog> Library<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            cache: SongCache::new(catalog),
        }
    }

    pub fn catalog(&self) -> &C {
        self.cache.catalog()
    }

    pub fn cache_mut(&mut self) -> &mut SongCache<C> {
        &mut self.cache
    }

    fn record(&self, id: &str) -> Result<SongMeta> {
        self.catalog()
            .get_by_id(id)?
            .ok_or_else(|| ChordbookError::NotFound { id: id.to_string() })
    }

    /// Add a song sheet file to the catalog. The path is stored canonicalized.
    pub fn import(&mut self, path: &Path) -> Result<ImportOutcome> {
        let path = &fs::canonicalize(path).map_err(|e| ChordbookError::io(path, e))?;
        if let Some(existing) = self.catalog().get_by_path(path)? {
            info!(path = %path.display(), id = %existing.id, "already in library");
            return Ok(ImportOutcome::DuplicatePath { existing });
        }

        let content = fs::read_to_string(path).map_err(|e| ChordbookError::io(path, e))?;
        let song = parse(&content);
        validate(&song)?;

        let id = generate_song_id(path, song.title(), song.artist());
        if self.catalog().has_song(&id)? {
            info!(path = %path.display(), id = %id, "same song already in library");
            return Ok(ImportOutcome::DuplicateId { id });
        }

        let odd = unrecognized_chords(&song);
        if !odd.is_empty() {
            warn!(path = %path.display(), chords = ?odd, "chords without a recognized root");
        }

        let now = Utc::now();
        let meta = SongMeta {
            id,
            title: non_empty(song.title()).unwrap_or(DEFAULT_TITLE).to_string(),
            artist: non_empty(song.artist()).unwrap_or(DEFAULT_ARTIST).to_string(),
            path: path.to_path_buf(),
            last_key: 0,
            capo: song.capo().unwrap_or(0),
            tags: Vec::new(),
            last_opened: now,
            cache: Some(CacheEntry {
                ast: song.clone(),
                file_hash: Fingerprint::of(&content),
                last_parsed: now,
            }),
        };
        self.cache.catalog_mut().upsert(&meta)?;
        info!(id = %meta.id, title = %meta.title, "imported song");
        Ok(ImportOutcome::Imported { meta, song })
    }

    /// Load a song for viewing and record that it was opened.
    pub fn open(&mut self, id: &str) -> Result<(SongMeta, Song)> {
        let song = self.cache.load(id)?;
        let mut meta = self.record(id)?;
        meta.last_opened = Utc::now();
        self.cache.catalog_mut().upsert(&meta)?;
        Ok((meta, song))
    }

    /// Open a song transposed by `steps` semitones. The catalog keeps the untransposed AST.
    pub fn view(&mut self, id: &str, steps: i32) -> Result<(SongMeta, Song)> {
        let (meta, song) = self.open(id)?;
        Ok((meta, transpose(&song, steps)))
    }

    /// Source text of a song, for editing.
    pub fn raw_content(&self, id: &str) -> Result<String> {
        let meta = self.record(id)?;
        fs::read_to_string(&meta.path).map_err(|e| ChordbookError::io(&meta.path, e))
    }

    /// Write new source text and drop the cached parse.
    pub fn save(&mut self, id: &str, content: &str) -> Result<()> {
        let meta = self.record(id)?;
        fs::write(&meta.path, content).map_err(|e| ChordbookError::io(&meta.path, e))?;
        self.cache.invalidate(id)
    }

    pub fn update(&mut self, id: &str, update: SongUpdate) -> Result<SongMeta> {
        let mut meta = self.record(id)?;
        if let Some(last_key) = update.last_key {
            meta.last_key = last_key;
        }
        if let Some(capo) = update.capo {
            meta.capo = capo;
        }
        if let Some(tags) = update.tags {
            meta.tags = tags;
        }
        self.cache.catalog_mut().upsert(&meta)?;
        Ok(meta)
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        self.cache.catalog_mut().delete(id)?;
        info!(id, "removed from library");
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<SongMeta>> {
        self.catalog().list_all()
    }

    pub fn search(&self, query: &str) -> Result<Vec<SongMeta>> {
        self.catalog().search(query)
    }

    pub fn rebuild(&mut self, id: &str) -> Result<Song> {
        self.cache.rebuild(id)
    }

    pub fn clear_all_caches(&mut self) -> Result<()> {
        self.cache.clear_all_caches()
    }
}
