//! # chordbook
//!
//! Song sheet library: parses chord-annotated song sheets (`{directive: value}` lines,
//! inline `[chord]` tokens) into a typed AST, transposes them, renders them, and keeps
//! a catalog of imported songs whose parses are cached by content hash.
//!
//! ## Pipeline
//! ```text
//! source ─► lexer ─► parser ─► Song ─► transpose ─► render / html
//!                                │
//!                                └─► SongCache ◄─► Catalog (SQLite / memory)
//! ```

pub mod api;
pub mod ast;
pub mod cache;
pub mod catalog;
pub mod chord;
pub mod config;
pub mod db;
pub mod error;
pub mod hash;
pub mod html;
pub mod lexer;
pub mod library;
pub mod parser;
pub mod render;
pub mod semantic;
pub mod transpose;

pub use api::{render_song, render_source, render_source_unchecked, Format};
pub use ast::*;
pub use cache::SongCache;
pub use catalog::{CacheEntry, Catalog, MemoryCatalog, SongMeta};
pub use chord::{steps_between, Chord, PitchClass};
pub use config::Config;
pub use db::SqliteCatalog;
pub use error::{ChordbookError, Result};
pub use hash::Fingerprint;
pub use html::to_html;
pub use library::{generate_song_id, ImportOutcome, Library, SongUpdate};
pub use parser::parse;
pub use render::to_text;
pub use semantic::validate;
pub use transpose::transpose;
