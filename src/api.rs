//! # Public API
//!
//! One-call entry points for turning song sheet source into something to show.
//!
//! - [`render_source()`] - parse, validate, transpose and render
//! - [`render_source_unchecked()`] - same without validation (empty output for empty input)
//! - [`render_song()`] - render an already parsed song
//!
//! ## Typical Usage
//!
//! ```rust
//! use chordbook::{render_source, Format};
//!
//! let source = "{title: Amazing Grace}\n[G]Amazing [C]grace";
//!
//! let text = render_source(source, 2, Format::Text)?;
//! assert!(text.contains("A       D\nAmazing grace"));
//! # Ok::<(), chordbook::ChordbookError>(())
//! ```
//!
//! Anything that needs the catalog (ids, caching, edits) goes through
//! [`Library`](crate::Library) instead.

use crate::error::{ChordbookError, Result};
use crate::{html, parse, render, transpose, validate, Song};
use std::fmt;
use std::str::FromStr;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Chords above lyrics, plain text.
    #[default]
    Text,
    Html,
    /// The song AST, as stored in the catalog.
    Json,
    Yaml,
}

impl FromStr for Format {
    type Err = ChordbookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Format::Text),
            "html" => Ok(Format::Html),
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(ChordbookError::Config(format!("unknown output format '{}'", other))),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Text => "text",
            Format::Html => "html",
            Format::Json => "json",
            Format::Yaml => "yaml",
        })
    }
}

/// Render a parsed song.
///
/// # Errors
/// Only the JSON and YAML formats can fail, on serializer errors.
pub fn render_song(song: &Song, format: Format) -> Result<String> {
    Ok(match format {
        Format::Text => render::to_text(song),
        Format::Html => html::to_html(song),
        Format::Json => serde_json::to_string_pretty(song)?,
        Format::Yaml => serde_yaml::to_string(song)?,
    })
}

/// Parse, validate, transpose by `steps` semitones and render.
///
/// # Errors
/// [`ChordbookError::Validation`] if the source holds no sections.
pub fn render_source(source: &str, steps: i32, format: Format) -> Result<String> {
    let song = parse(source);
    validate(&song)?;
    render_song(&transpose(&song, steps), format)
}

/// Like [`render_source`] but accepts sources with no sections.
pub fn render_source_unchecked(source: &str, steps: i32, format: Format) -> Result<String> {
    render_song(&transpose(&parse(source), steps), format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("TEXT".parse::<Format>().unwrap(), Format::Text);
        assert_eq!("yml".parse::<Format>().unwrap(), Format::Yaml);
        assert_eq!("html".parse::<Format>().unwrap(), Format::Html);
        assert!(matches!("pdf".parse::<Format>(), Err(ChordbookError::Config(_))));
        assert_eq!(Format::Json.to_string(), "json");
    }

    #[test]
    fn test_render_source_rejects_empty() {
        let err = render_source("{title: Nothing}\n# just a comment", 0, Format::Text).unwrap_err();
        assert!(matches!(err, ChordbookError::Validation(_)));
        assert_eq!(
            render_source_unchecked("{title: Nothing}", 0, Format::Text).unwrap(),
            "Nothing\n"
        );
    }

    #[test]
    fn test_json_is_catalog_shape() {
        let json = render_source("[Dm7]la", 0, Format::Json).unwrap();
        let song: Song = serde_json::from_str(&json).unwrap();
        assert_eq!(song, parse("[Dm7]la"));
        assert!(json.contains("\"type\": \"chord\""));
        assert!(json.contains("\"value\": \"Dm7\""));
    }

    #[test]
    fn test_yaml_output() {
        let yaml = render_source("{key: G}\n[G]la", 5, Format::Yaml).unwrap();
        assert!(yaml.contains("key: G"));
        assert!(yaml.contains("value: C"));
    }

    #[test]
    fn test_html_transposed() {
        let html = render_source("[Bb]la", 2, Format::Html).unwrap();
        assert!(html.contains("<span class=\"chord\">C</span>la"));
    }
}
