use crate::ast::Song;
use crate::catalog::{CacheEntry, Catalog, SongMeta};
use crate::error::{ChordbookError, Result};
use crate::hash::Fingerprint;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS songs (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    artist TEXT NOT NULL,
    path TEXT NOT NULL UNIQUE,
    lastKey INTEGER DEFAULT 0,
    capo INTEGER DEFAULT 0,
    tags TEXT DEFAULT '[]',
    lastOpened TEXT,
    cachedAst TEXT,
    fileHash TEXT,
    lastParsed TEXT
);
"#;

const COLUMNS: &str =
    "id, title, artist, path, lastKey, capo, tags, lastOpened, cachedAst, fileHash, lastParsed";

/// SQLite-backed catalog using the `songs` table layout of existing library files.
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Open (or create) a catalog file. Parent directories are created as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ChordbookError::io(parent, e))?;
        }
        debug!(path = %path.display(), "opening catalog");
        Self::init(Connection::open(path)?)
    }

    /// A catalog that lives only as long as this value.
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn query(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<SongMeta>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(args, SongRow::from_row)?;
        let rows = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows.into_iter().map(SongRow::into_meta).collect())
    }

    fn query_one(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Option<SongMeta>> {
        Ok(self.query(sql, args)?.into_iter().next())
    }
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Raw column values, decoded into a [`SongMeta`] outside the rusqlite callback.
struct SongRow {
    id: String,
    title: String,
    artist: String,
    path: String,
    last_key: Option<i32>,
    capo: Option<i32>,
    tags: Option<String>,
    last_opened: Option<String>,
    cached_ast: Option<String>,
    file_hash: Option<String>,
    last_parsed: Option<String>,
}

impl SongRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            artist: row.get(2)?,
            path: row.get(3)?,
            last_key: row.get(4)?,
            capo: row.get(5)?,
            tags: row.get(6)?,
            last_opened: row.get(7)?,
            cached_ast: row.get(8)?,
            file_hash: row.get(9)?,
            last_parsed: row.get(10)?,
        })
    }

    /// Undecodable cache columns degrade to a cache miss rather than an error.
    fn into_meta(self) -> SongMeta {
        let id = self.id;
        let ast = self.cached_ast.and_then(|json| {
            serde_json::from_str::<Song>(&json)
                .map_err(|e| warn!(song_id = %id, error = %e, "discarding undecodable cached AST"))
                .ok()
        });
        let file_hash = self.file_hash.and_then(|h| {
            Fingerprint::from_str_checked(&h)
                .map_err(|e| warn!(song_id = %id, error = %e, "discarding malformed file hash"))
                .ok()
        });
        let last_parsed = self.last_parsed.as_deref().and_then(parse_time);
        let cache = CacheEntry::from_parts(&id, ast, file_hash, last_parsed);

        SongMeta {
            title: self.title,
            artist: self.artist,
            path: PathBuf::from(self.path),
            last_key: self.last_key.unwrap_or(0),
            capo: self.capo.unwrap_or(0),
            tags: self
                .tags
                .and_then(|t| serde_json::from_str(&t).ok())
                .unwrap_or_default(),
            last_opened: self
                .last_opened
                .as_deref()
                .and_then(parse_time)
                .unwrap_or_default(),
            cache,
            id,
        }
    }
}

impl Catalog for SqliteCatalog {
    fn get_by_id(&self, id: &str) -> Result<Option<SongMeta>> {
        self.query_one(
            &format!("SELECT {} FROM songs WHERE id = ?1", COLUMNS),
            params![id],
        )
    }

    fn get_by_path(&self, path: &Path) -> Result<Option<SongMeta>> {
        let path = path.to_string_lossy().into_owned();
        self.query_one(
            &format!("SELECT {} FROM songs WHERE path = ?1", COLUMNS),
            params![path],
        )
    }

    fn upsert(&mut self, record: &SongMeta) -> Result<()> {
        let (cached_ast, file_hash, last_parsed) = match &record.cache {
            Some(entry) => (
                Some(serde_json::to_string(&entry.ast)?),
                Some(entry.file_hash.to_string()),
                Some(format_time(&entry.last_parsed)),
            ),
            None => (None, None, None),
        };
        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO songs ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                COLUMNS
            ),
            params![
                record.id,
                record.title,
                record.artist,
                record.path.to_string_lossy().into_owned(),
                record.last_key,
                record.capo,
                serde_json::to_string(&record.tags)?,
                format_time(&record.last_opened),
                cached_ast,
                file_hash,
                last_parsed,
            ],
        )?;
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        self.conn.execute("DELETE FROM songs WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<SongMeta>> {
        self.query(
            &format!("SELECT {} FROM songs ORDER BY lastOpened DESC, id ASC", COLUMNS),
            params![],
        )
    }

    fn search(&self, query: &str) -> Result<Vec<SongMeta>> {
        let pattern = format!("%{}%", escape_like(query));
        self.query(
            &format!(
                "SELECT {} FROM songs WHERE title LIKE ?1 ESCAPE '\\' OR artist LIKE ?1 ESCAPE '\\' \
                 ORDER BY lastOpened DESC, id ASC",
                COLUMNS
            ),
            params![pattern],
        )
    }

    fn clear_all_caches(&mut self) -> Result<()> {
        let cleared = self
            .conn
            .execute("UPDATE songs SET cachedAst = NULL, fileHash = NULL, lastParsed = NULL", [])?;
        debug!(records = cleared, "cleared cache columns");
        Ok(())
    }
}

/// Query text as a literal inside a `LIKE ... ESCAPE '\'` pattern.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
