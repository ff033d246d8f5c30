//! # Abstract Syntax Tree (AST) Types
//!
//! This module defines the song structure produced by the parser and consumed by the
//! transposer, the renderers and the cache.
//!
//! ## Type Hierarchy
//! ```text
//! Song
//!   ├── SongMetadata (lowercase directive name → raw value)
//!   └── Vec<Section>
//!         ├── kind: SectionType (verse, chorus, bridge, intro, outro, instrumental, comment)
//!         └── Vec<Line>
//!               └── Vec<LinePart> (Chord | Lyric | Annotation)
//! ```
//!
//! ## Key Concepts
//!
//! ### Metadata
//! Every `{name: value}` directive that is not a section marker lands in the metadata
//! map, including names nobody knows about yet. The usual keys are listed in
//! [`KNOWN_METADATA_KEYS`] but they are not given fields of their own.
//!
//! ### Line parts
//! Parts are stored in reading order. There are no coordinates: a renderer puts a
//! chord above the character where the lyric that follows it begins.
//!
//! ### Immutability
//! A `Song` is a value. Transposition builds a new one; nothing in the crate mutates
//! a parsed song in place.
//!
//! ## Serialized form
//! The JSON shape matches what existing catalogs store:
//! ```text
//! {"metadata": {"title": "..."},
//!  "sections": [{"type": "verse",
//!                "lines": [{"parts": [{"type": "chord", "value": "G7"},
//!                                     {"type": "lyric", "text": "grace"}]}]}]}
//! ```

use crate::chord::Chord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Metadata keys with a conventional meaning. Other keys are kept too.
pub const KNOWN_METADATA_KEYS: &[&str] = &[
    "title", "subtitle", "artist", "composer", "lyricist", "key", "capo", "tempo", "time",
];

/// Directive name → raw value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongMetadata(BTreeMap<String, String>);

impl SongMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Later directives with the same name overwrite earlier ones.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Section kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    #[default]
    Verse,
    Chorus,
    Bridge,
    Intro,
    Outro,
    Instrumental,
    Comment,
}

impl SectionType {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionType::Verse => "verse",
            SectionType::Chorus => "chorus",
            SectionType::Bridge => "bridge",
            SectionType::Intro => "intro",
            SectionType::Outro => "outro",
            SectionType::Instrumental => "instrumental",
            SectionType::Comment => "comment",
        }
    }

    /// Human label used by the renderers ("Chorus", "Bridge", ...).
    pub fn label(self) -> &'static str {
        match self {
            SectionType::Verse => "Verse",
            SectionType::Chorus => "Chorus",
            SectionType::Bridge => "Bridge",
            SectionType::Intro => "Intro",
            SectionType::Outro => "Outro",
            SectionType::Instrumental => "Instrumental",
            SectionType::Comment => "Comment",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One token of a content line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPart", into = "RawPart")]
pub enum LinePart {
    Chord(Chord),
    Lyric(String),
    Annotation(String),
}

impl LinePart {
    pub fn chord(text: &str) -> Self {
        LinePart::Chord(Chord::parse(text))
    }

    pub fn lyric(text: impl Into<String>) -> Self {
        LinePart::Lyric(text.into())
    }

    pub fn annotation(text: impl Into<String>) -> Self {
        LinePart::Annotation(text.into())
    }
}

/// Wire shape of a [`LinePart`].
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawPart {
    Chord { value: String },
    Lyric { text: String },
    Annotation { text: String },
}

impl From<RawPart> for LinePart {
    fn from(raw: RawPart) -> Self {
        match raw {
            RawPart::Chord { value } => LinePart::Chord(Chord::from(value)),
            RawPart::Lyric { text } => LinePart::Lyric(text),
            RawPart::Annotation { text } => LinePart::Annotation(text),
        }
    }
}

impl From<LinePart> for RawPart {
    fn from(part: LinePart) -> Self {
        match part {
            LinePart::Chord(chord) => RawPart::Chord {
                value: chord.into(),
            },
            LinePart::Lyric(text) => RawPart::Lyric { text },
            LinePart::Annotation(text) => RawPart::Annotation { text },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub parts: Vec<LinePart>,
}

impl Line {
    pub fn new(parts: Vec<LinePart>) -> Self {
        Self { parts }
    }

    pub fn chords(&self) -> impl Iterator<Item = &Chord> {
        self.parts.iter().filter_map(|part| match part {
            LinePart::Chord(chord) => Some(chord),
            _ => None,
        })
    }

    /// Lyric text of the line with the chords removed.
    pub fn lyrics(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                LinePart::Lyric(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "type")]
    pub kind: SectionType,
    pub lines: Vec<Line>,
}

impl Section {
    pub fn new(kind: SectionType) -> Self {
        Self {
            kind,
            lines: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A parsed song.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub metadata: SongMetadata,
    pub sections: Vec<Section>,
}

impl Song {
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title")
    }

    pub fn artist(&self) -> Option<&str> {
        self.metadata.get("artist")
    }

    pub fn key(&self) -> Option<&str> {
        self.metadata.get("key")
    }

    /// Capo fret from the leading integer of the `capo` directive, so `2 (optional)`
    /// gives 2.
    pub fn capo(&self) -> Option<i32> {
        leading_int(self.metadata.get("capo")?)
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.sections.iter().flat_map(|section| section.lines.iter())
    }
}

/// Optional sign and the digits after it, ignoring leading whitespace and anything
/// after the digits.
fn leading_int(value: &str) -> Option<i32> {
    let value = value.trim_start();
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    let sign_len = value.len() - unsigned.len();
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return None;
    }
    value[..sign_len + digits].parse().ok()
}
