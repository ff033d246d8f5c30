//! # Parser Module
//!
//! Builds a [`Song`] from song sheet source.
//!
//! ## Purpose
//! The parser walks the classified lines from the [`lexer`](crate::lexer), applies
//! directives to the metadata or to section boundaries, and turns content lines into
//! chord / lyric / annotation parts.
//!
//! ## Error policy
//! Parsing never fails. Unknown directives become metadata, unrecognized chord roots
//! are kept as opaque chords, unmatched brackets stay in the lyrics. The source files
//! this reads are loosely standardized and a best-effort song is more useful than an
//! error.
//!
//! ## Sections
//! Content goes into the *open* section, which starts out as an empty verse.
//! - `start_of_*` closes the open section and opens an empty one of the new type
//! - `end_of_*` closes the open section and opens an empty one of the *same* type
//! - `comment` appends a one-line comment section and leaves the open section alone
//!
//! Closing appends the section only if it holds at least one line. The open section
//! is moved into the song on close and replaced by a fresh value, so nothing appended
//! can change afterwards.
//!
//! ## Directive reference
//! | Directive | Effect |
//! |-----------|--------|
//! | `start_of_verse`, `sov` | open verse |
//! | `start_of_chorus`, `soc`, `chorus` | open chorus |
//! | `start_of_bridge`, `sob` | open bridge |
//! | `start_of_intro`, `start_of_outro`, `start_of_instrumental` | open that type |
//! | `end_of_verse`, `eov`, `end_of_chorus`, `eoc`, `end_of_bridge`, `eob`, `end_of_intro`, `end_of_outro`, `end_of_instrumental` | close |
//! | `comment` | standalone comment section |
//! | anything else | `metadata[name] = value` |
//!
//! ## Example
//! ```rust
//! use chordbook::{parse, LinePart, SectionType};
//!
//! let source = "{title: Amazing Grace}\n{soc}\n[C]Amazing [G]grace\n{eoc}\n";
//!
//! let song = parse(source);
//! assert_eq!(song.metadata.get("title"), Some("Amazing Grace"));
//! assert_eq!(song.sections.len(), 1);
//! assert_eq!(song.sections[0].kind, SectionType::Chorus);
//! assert_eq!(song.sections[0].lines[0].parts[1], LinePart::lyric("Amazing "));
//! ```

use crate::ast::*;
use crate::chord::Chord;
use crate::lexer::{tokenize_content, ContentToken, Lexer, LineKind};
use std::mem;

/// What a directive does to the song.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Directive {
    Start(SectionType),
    End,
    Comment,
    Metadata,
}

fn classify_directive(name: &str) -> Directive {
    match name {
        "start_of_verse" | "sov" => Directive::Start(SectionType::Verse),
        "start_of_chorus" | "soc" | "chorus" => Directive::Start(SectionType::Chorus),
        "start_of_bridge" | "sob" => Directive::Start(SectionType::Bridge),
        "start_of_intro" => Directive::Start(SectionType::Intro),
        "start_of_outro" => Directive::Start(SectionType::Outro),
        "start_of_instrumental" => Directive::Start(SectionType::Instrumental),
        "end_of_verse" | "eov" | "end_of_chorus" | "eoc" | "end_of_bridge" | "eob"
        | "end_of_intro" | "end_of_outro" | "end_of_instrumental" => Directive::End,
        "comment" => Directive::Comment,
        // KNOWN_METADATA_KEYS and anything else
        _ => Directive::Metadata,
    }
}

/// Parse state: the song so far plus the section still receiving lines.
struct SongBuilder {
    metadata: SongMetadata,
    sections: Vec<Section>,
    open: Section,
}

impl SongBuilder {
    fn new() -> Self {
        Self {
            metadata: SongMetadata::new(),
            sections: Vec::new(),
            open: Section::new(SectionType::Verse),
        }
    }

    /// Append the open section if it has lines and start an empty one of `next` type.
    fn close(&mut self, next: SectionType) {
        let closed = mem::replace(&mut self.open, Section::new(next));
        if !closed.is_empty() {
            self.sections.push(closed);
        }
    }

    fn directive(&mut self, name: String, value: &str) {
        match classify_directive(&name) {
            Directive::Start(kind) => self.close(kind),
            Directive::End => {
                let kind = self.open.kind;
                self.close(kind);
            }
            Directive::Comment => self.sections.push(Section {
                kind: SectionType::Comment,
                lines: vec![Line::new(vec![LinePart::lyric(value)])],
            }),
            Directive::Metadata => self.metadata.insert(name, value),
        }
    }

    fn content(&mut self, text: &str) {
        self.open.lines.push(parse_line(text));
    }

    fn finish(mut self) -> Song {
        self.close(SectionType::Verse);
        Song {
            metadata: self.metadata,
            sections: self.sections,
        }
    }
}

/// Turn one content line into parts.
///
/// `[*text]` is an annotation, any other bracket is a chord.
pub fn parse_line(text: &str) -> Line {
    let parts = tokenize_content(text)
        .into_iter()
        .map(|token| match token {
            ContentToken::Text(text) => LinePart::lyric(text),
            ContentToken::Bracket(inner) => {
                let inner = inner.replace('[', "");
                let inner = inner.trim();
                match inner.strip_prefix('*') {
                    Some(annotation) => LinePart::annotation(annotation),
                    None => LinePart::Chord(Chord::parse(inner)),
                }
            }
        })
        .collect();
    Line::new(parts)
}

/// Parse song sheet source into a [`Song`].
pub fn parse(source: &str) -> Song {
    let mut builder = SongBuilder::new();
    for line in Lexer::new(source).tokenize() {
        match line {
            LineKind::Blank | LineKind::Comment => {}
            LineKind::Directive { name, value } => builder.directive(name, value),
            LineKind::Content(text) => builder.content(text),
        }
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(song: &Song) -> Vec<SectionType> {
        song.sections.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_single_lyric_line() {
        let song = parse("Just a plain line");
        assert_eq!(song.sections.len(), 1);
        assert_eq!(song.sections[0].kind, SectionType::Verse);
        assert_eq!(
            song.sections[0].lines,
            vec![Line::new(vec![LinePart::lyric("Just a plain line")])]
        );
    }

    #[test]
    fn test_empty_document() {
        let song = parse("");
        assert!(song.sections.is_empty());
        assert!(song.metadata.is_empty());
    }

    #[test]
    fn test_known_metadata() {
        let song = parse("{title: Hallelujah}\n{artist: Leonard Cohen}\n{key: C}\n{capo: 5}");
        assert_eq!(song.title(), Some("Hallelujah"));
        assert_eq!(song.artist(), Some("Leonard Cohen"));
        assert_eq!(song.key(), Some("C"));
        assert_eq!(song.capo(), Some(5));
        assert!(song.sections.is_empty());
    }

    #[test]
    fn test_every_known_key_is_metadata() {
        for key in KNOWN_METADATA_KEYS {
            assert_eq!(classify_directive(key), Directive::Metadata, "{}", key);
            let song = parse(&format!("{{{}: v}}\nla", key));
            assert_eq!(song.metadata.get(key), Some("v"), "{}", key);
            assert_eq!(song.sections.len(), 1, "{}", key);
        }
    }

    #[test]
    fn test_unknown_directive_catch_all() {
        let song = parse("{foo: bar}");
        assert_eq!(song.metadata.get("foo"), Some("bar"));
    }

    #[test]
    fn test_directive_without_value() {
        let song = parse("{mystery}");
        assert_eq!(song.metadata.get("mystery"), Some(""));
    }

    #[test]
    fn test_repeated_metadata_last_wins() {
        let song = parse("{title: One}\n{TITLE: Two}");
        assert_eq!(song.title(), Some("Two"));
    }

    #[test]
    fn test_chorus_then_default_verse() {
        let song = parse("{start_of_chorus}\nLa la\n{end_of_chorus}\nVerse line");
        assert_eq!(song.sections.len(), 2);
        assert_eq!(song.sections[0].kind, SectionType::Chorus);
        assert_eq!(song.sections[0].lines.len(), 1);
        assert_eq!(song.sections[1].lines.len(), 1);
        assert_eq!(song.sections[1].lines[0].lyrics(), "Verse line");
    }

    #[test]
    fn test_end_keeps_section_type() {
        // Only start directives change the type of the open section
        let song = parse("{soc}\nLa la\n{eoc}\nafter");
        assert_eq!(kinds(&song), vec![SectionType::Chorus, SectionType::Chorus]);
    }

    #[test]
    fn test_empty_sections_suppressed() {
        assert!(parse("{start_of_verse}{end_of_verse}").sections.is_empty());
        assert!(parse("{start_of_verse}\n{end_of_verse}").sections.is_empty());
        assert!(parse("{soc}\n{eoc}\n{sob}\n{eob}").sections.is_empty());
    }

    #[test]
    fn test_start_closes_implicit_verse() {
        let song = parse("first\n{start_of_bridge}\nbridge line\n{start_of_chorus}\nchorus line");
        assert_eq!(
            kinds(&song),
            vec![SectionType::Verse, SectionType::Bridge, SectionType::Chorus]
        );
    }

    #[test]
    fn test_chorus_aliases() {
        for directive in ["{start_of_chorus}", "{soc}", "{chorus}", "{Start_Of_Chorus}"] {
            let song = parse(&format!("{}\nline", directive));
            assert_eq!(kinds(&song), vec![SectionType::Chorus], "{}", directive);
        }
    }

    #[test]
    fn test_extra_section_types() {
        let song = parse(
            "{start_of_intro}\n[G]\n{end_of_intro}\n{start_of_instrumental}\n[C][D]\n{start_of_outro}\nfin",
        );
        assert_eq!(
            kinds(&song),
            vec![SectionType::Intro, SectionType::Instrumental, SectionType::Outro]
        );
    }

    #[test]
    fn test_comment_coexists_with_open_section() {
        let song = parse("{soc}\none\n{comment: Repeat twice}\ntwo\n{eoc}");
        assert_eq!(kinds(&song), vec![SectionType::Comment, SectionType::Chorus]);
        assert_eq!(
            song.sections[0].lines,
            vec![Line::new(vec![LinePart::lyric("Repeat twice")])]
        );
        assert_eq!(song.sections[1].lines.len(), 2);
    }

    #[test]
    fn test_comment_with_empty_value_still_appended() {
        let song = parse("{comment}");
        assert_eq!(kinds(&song), vec![SectionType::Comment]);
        assert_eq!(song.sections[0].lines[0].parts, vec![LinePart::lyric("")]);
    }

    #[test]
    fn test_trailing_section_kept() {
        let song = parse("{sob}\nno end directive");
        assert_eq!(kinds(&song), vec![SectionType::Bridge]);
    }

    #[test]
    fn test_chord_tokenization() {
        let song = parse("[C]Amazing [G]grace");
        assert_eq!(
            song.sections[0].lines[0].parts,
            vec![
                LinePart::chord("C"),
                LinePart::lyric("Amazing "),
                LinePart::chord("G"),
                LinePart::lyric("grace"),
            ]
        );
    }

    #[test]
    fn test_chord_text_trimmed_and_split() {
        let line = parse_line("[ Dm7 ]la");
        match &line.parts[0] {
            LinePart::Chord(chord) => {
                assert_eq!(chord.root, "D");
                assert_eq!(chord.suffix, "m7");
            }
            other => panic!("expected chord, got {:?}", other),
        }
    }

    #[test]
    fn test_unrecognized_chord_kept() {
        let line = parse_line("[N.C.]silence");
        assert_eq!(line.parts[0], LinePart::Chord(Chord::parse("N.C.")));
        assert_eq!(line.parts[0], LinePart::chord("N.C."));
    }

    #[test]
    fn test_annotation_part() {
        let line = parse_line("[*Coda]end [C]");
        assert_eq!(
            line.parts,
            vec![LinePart::annotation("Coda"), LinePart::lyric("end "), LinePart::chord("C")]
        );
    }

    #[test]
    fn test_blank_and_comment_lines_skipped() {
        let song = parse("# header\n\nline one\n   \n  # indented\nline two\n");
        assert_eq!(song.sections.len(), 1);
        assert_eq!(song.sections[0].lines.len(), 2);
    }

    #[test]
    fn test_continuation_backslash_removed() {
        let song = parse("first half \\\nsecond half");
        let lyrics: Vec<String> = song.lines().map(|l| l.lyrics()).collect();
        assert_eq!(lyrics, vec!["first half ", "second half"]);
    }

    #[test]
    fn test_crlf_input() {
        let song = parse("{title: Win}\r\n[A]line\r\n");
        assert_eq!(song.title(), Some("Win"));
        assert_eq!(song.sections[0].lines[0].lyrics(), "line");
    }

    #[test]
    fn test_closed_sections_unaffected_by_later_lines() {
        let song = parse("{sov}\na\n{eov}\nb\n{eov}\nc");
        let lyrics: Vec<Vec<String>> = song
            .sections
            .iter()
            .map(|s| s.lines.iter().map(Line::lyrics).collect())
            .collect();
        assert_eq!(lyrics, vec![vec!["a"], vec!["b"], vec!["c"]]);
    }
}
