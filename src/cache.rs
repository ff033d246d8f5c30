//! # Song Cache
//!
//! Decides whether a song needs parsing. The catalog record of every song can hold the
//! AST from its last parse together with the [`Fingerprint`] of the content that was
//! parsed. Loading a song reads the source file, fingerprints it, and reuses the stored
//! AST only when:
//!
//! - a cached AST is present,
//! - its fingerprint equals the fingerprint of the current content, and
//! - it has a last-parsed timestamp.
//!
//! Otherwise the file is parsed again and the new entry is written back before the
//! AST is returned. Validity depends on content only, so a touched or copied file
//! does not cause a re-parse and an edit always does.
//!
//! ## Failure behavior
//! - Unknown id: [`ChordbookError::NotFound`], nothing is read
//! - Unreadable file: [`ChordbookError::Io`], the catalog is not modified
//!
//! Nothing is retried. [`SongCache::rebuild`] is the explicit "parse it again" action.
//!
//! ## Example
//! ```rust
//! use chordbook::{Catalog, MemoryCatalog, SongCache, SongMeta};
//! # let dir = tempfile::tempdir().unwrap();
//! # let path = dir.path().join("grace.cho");
//! # std::fs::write(&path, "[G]Amazing [C]grace").unwrap();
//! # let record = SongMeta {
//! #     id: "grace".to_string(), title: "Grace".to_string(), artist: "Newton".to_string(),
//! #     path, last_key: 0, capo: 0, tags: vec![], last_opened: chrono::Utc::now(), cache: None,
//! # };
//! let mut catalog = MemoryCatalog::new();
//! catalog.upsert(&record)?;
//!
//! let mut cache = SongCache::new(catalog);
//! let song = cache.load("grace")?;   // parses and stores
//! let again = cache.load("grace")?;  // served from the catalog
//! assert_eq!(song, again);
//! # Ok::<(), chordbook::ChordbookError>(())
//! ```

use crate::ast::Song;
use crate::catalog::{CacheEntry, Catalog, SongMeta};
use crate::error::{ChordbookError, Result};
use crate::hash::Fingerprint;
use crate::parser::parse;
use chrono::Utc;
use std::fs;
use tracing::{debug, info};

/// Parser signature used by the cache.
pub type ParseFn = fn(&str) -> Song;

/// Content-addressed parse cache over a [`Catalog`].
pub struct SongCache<C, P = ParseFn> {
    catalog: C,
    parser: P,
}

impl<C: Catalog> SongCache<C> {
    /// Cache using the crate's song sheet parser.
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            parser: parse as ParseFn,
        }
    }
}

impl<C, P> SongCache<C, P>
where
    C: Catalog,
    P: Fn(&str) -> Song,
{
    /// Cache with a custom parser.
    pub fn with_parser(catalog: C, parser: P) -> Self {
        Self { catalog, parser }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut C {
        &mut self.catalog
    }

    pub fn into_catalog(self) -> C {
        self.catalog
    }

    fn record(&self, id: &str) -> Result<SongMeta> {
        self.catalog
            .get_by_id(id)?
            .ok_or_else(|| ChordbookError::NotFound { id: id.to_string() })
    }

    /// Load the AST of a song, parsing only if the stored parse is stale or missing.
    pub fn load(&mut self, id: &str) -> Result<Song> {
        let mut meta = self.record(id)?;
        let content =
            fs::read_to_string(&meta.path).map_err(|e| ChordbookError::io(&meta.path, e))?;
        let current = Fingerprint::of(&content);

        if let Some(entry) = meta.cache.as_ref().filter(|e| e.file_hash == current) {
            debug!(song_id = id, title = %meta.title, "cache hit");
            return Ok(entry.ast.clone());
        }

        info!(song_id = id, title = %meta.title, hash = %current, "cache miss, parsing");
        let song = (self.parser)(&content);
        meta.cache = Some(CacheEntry {
            ast: song.clone(),
            file_hash: current,
            last_parsed: Utc::now(),
        });
        self.catalog.upsert(&meta)?;
        Ok(song)
    }

    /// Drop the stored parse so the next [`load`](Self::load) parses again.
    pub fn invalidate(&mut self, id: &str) -> Result<()> {
        let mut meta = self.record(id)?;
        meta.cache = None;
        self.catalog.upsert(&meta)?;
        info!(song_id = id, "cache invalidated");
        Ok(())
    }

    /// Invalidate then load.
    pub fn rebuild(&mut self, id: &str) -> Result<Song> {
        self.invalidate(id)?;
        self.load(id)
    }

    /// Invalidate every song in the catalog, e.g. after a parser change.
    pub fn clear_all_caches(&mut self) -> Result<()> {
        self.catalog.clear_all_caches()?;
        info!("all song caches cleared");
        Ok(())
    }
}
