//! chordbook - song sheet parser, transposer and library CLI
//!
//! Subcommands:
//! - `chordbook parse <file>` - Render a song sheet without touching the catalog
//! - `chordbook import <file>` - Add a song sheet to the catalog
//! - `chordbook list` / `search <query>` - Browse the catalog
//! - `chordbook show <id>` - Render a catalogued song (parse cached by content hash)
//! - `chordbook set <id>` - Change the stored key, capo or tags
//! - `chordbook rebuild <id>` / `clear-cache` / `delete <id>` - Housekeeping

use anyhow::{bail, Context, Result};
use chordbook::chord::split_chord;
use chordbook::{
    render_song, render_source, steps_between, Catalog, Config, Format, ImportOutcome, Library,
    PitchClass, SongMeta, SongUpdate, SqliteCatalog,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "chordbook")]
#[command(about = "Chord sheet parser, transposer and song library")]
#[command(version)]
struct Cli {
    /// YAML config file (overrides CHORDBOOK_* environment variables)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog database, overriding the configured one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a song sheet file
    Parse {
        file: PathBuf,

        /// Semitones to shift chords by (negative goes down)
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        transpose: i32,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a song sheet file to the catalog
    Import { file: PathBuf },

    /// List catalogued songs, most recently opened first
    List,

    /// Find songs by title or artist
    Search { query: String },

    /// Render a catalogued song
    Show {
        id: String,

        /// Semitones to shift by (defaults to the song's stored key)
        #[arg(short, long, allow_hyphen_values = true)]
        transpose: Option<i32>,

        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Change stored view settings of a song
    Set {
        id: String,

        /// Stored transposition: semitones (e.g. -2) or a target key (e.g. A)
        #[arg(short, long, allow_hyphen_values = true)]
        key: Option<String>,

        #[arg(short, long)]
        capo: Option<i32>,

        /// Replace the tags (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },

    /// Parse a song again, ignoring its cached parse
    Rebuild { id: String },

    /// Drop the cached parse of every song
    ClearCache,

    /// Remove a song from the catalog (the file is kept)
    Delete { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Html,
    Json,
    Yaml,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Format::Text,
            OutputFormat::Html => Format::Html,
            OutputFormat::Json => Format::Json,
            OutputFormat::Yaml => Format::Yaml,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(catalog) = cli.catalog {
        config.catalog_path = catalog;
    }

    // RUST_LOG wins over the configured level; logs go to stderr
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Parse {
        file,
        transpose,
        format,
    } = &cli.command
    {
        let source = fs::read_to_string(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        print!("{}", render_source(&source, *transpose, (*format).into())?);
        return Ok(());
    }

    debug!(catalog = %config.catalog_path.display(), "opening catalog");
    let catalog = SqliteCatalog::open(&config.catalog_path).with_context(|| {
        format!("failed to open catalog {}", config.catalog_path.display())
    })?;
    let mut library = Library::new(catalog);

    match cli.command {
        Commands::Parse { .. } => {}
        Commands::Import { file } => match library.import(&file)? {
            ImportOutcome::Imported { meta, .. } => {
                println!("Imported {} ({})", meta.title, meta.id);
            }
            ImportOutcome::DuplicatePath { existing } => {
                println!("Already in library: {} ({})", existing.title, existing.id);
            }
            ImportOutcome::DuplicateId { id } => {
                println!("A song with the same title and artist is already in this folder ({})", id);
            }
        },
        Commands::List => print_records(&library.list()?),
        Commands::Search { query } => print_records(&library.search(&query)?),
        Commands::Show {
            id,
            transpose,
            format,
        } => {
            let steps = match transpose {
                Some(steps) => steps,
                None => library
                    .catalog()
                    .get_by_id(&id)?
                    .map(|meta| meta.last_key)
                    .unwrap_or(0),
            };
            let (_, song) = library.view(&id, steps)?;
            print!("{}", render_song(&song, format.into())?);
        }
        Commands::Set {
            id,
            key,
            capo,
            tags,
        } => {
            let last_key = match key {
                Some(key) => Some(resolve_key(&mut library, &id, &key)?),
                None => None,
            };
            let update = SongUpdate {
                last_key,
                capo,
                tags: if tags.is_empty() { None } else { Some(tags) },
            };
            let meta = library.update(&id, update)?;
            println!(
                "{}: key {:+}, capo {}, tags [{}]",
                meta.title,
                meta.last_key,
                meta.capo,
                meta.tags.join(", ")
            );
        }
        Commands::Rebuild { id } => {
            let song = library.rebuild(&id)?;
            println!("Rebuilt {} ({} sections)", id, song.sections.len());
        }
        Commands::ClearCache => {
            library.clear_all_caches()?;
            println!("Cleared all cached parses");
        }
        Commands::Delete { id } => {
            library.delete(&id)?;
            println!("Deleted {}", id);
        }
    }

    Ok(())
}

/// A number is taken as semitones; a key name as the key to play in, measured from
/// the song's `{key}`.
fn resolve_key<C: Catalog>(library: &mut Library<C>, id: &str, key: &str) -> Result<i32> {
    if let Ok(steps) = key.parse::<i32>() {
        return Ok(steps);
    }
    let target = split_chord(key).0;
    if PitchClass::from_spelling(target).is_none() {
        bail!("'{}' is neither a number of semitones nor a key", key);
    }
    let (_, song) = library.open(id)?;
    let from = song
        .key()
        .map(|k| split_chord(k).0)
        .context("song has no {key} directive; give the transposition in semitones")?;
    let steps = steps_between(from, target);
    debug!(from, to = target, steps, "resolved key");
    Ok(steps)
}

fn print_records(records: &[SongMeta]) {
    for meta in records {
        let tags = if meta.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", meta.tags.join(", "))
        };
        println!("{}  {} - {}{}", meta.id, meta.title, meta.artist, tags);
    }
}
