//! Plain-text rendering: chords on their own row above the lyrics.
//!
//! ```text
//! Amazing Grace
//! John Newton
//!
//! G       C
//! Amazing grace
//!
//! Chorus:
//! D
//! How sweet
//! ```
//!
//! A chord sits above the first character of the lyric that follows it. When two
//! chords would touch, the lyric row is padded so that they stay one space apart.

use crate::ast::{Line, LinePart, Section, SectionType, Song};

pub fn to_text(song: &Song) -> String {
    let mut out = String::new();

    let mut header = false;
    for value in [song.title(), song.artist()].into_iter().flatten() {
        out.push_str(value);
        out.push('\n');
        header = true;
    }

    for (i, section) in song.sections.iter().enumerate() {
        if header || i > 0 {
            out.push('\n');
        }
        out.push_str(&section_to_text(section));
    }

    out
}

fn section_to_text(section: &Section) -> String {
    let mut text = String::new();
    match section.kind {
        SectionType::Comment => {
            for line in &section.lines {
                text.push_str(&format!("({})\n", line.lyrics()));
            }
            return text;
        }
        SectionType::Verse => {}
        kind => text.push_str(&format!("{}:\n", kind.label())),
    }
    for line in &section.lines {
        text.push_str(&line_to_text(line));
    }
    text
}

/// Render one line as up to two rows.
pub fn line_to_text(line: &Line) -> String {
    let mut chords = String::new();
    let mut lyrics = String::new();
    // widths in chars, not bytes
    let mut chord_w = 0;
    let mut lyric_w = 0;

    for part in &line.parts {
        let label = match part {
            LinePart::Lyric(text) => {
                lyric_w += text.chars().count();
                lyrics.push_str(text);
                continue;
            }
            LinePart::Chord(chord) => chord.to_string(),
            LinePart::Annotation(text) => text.clone(),
        };
        let col = if chord_w == 0 {
            lyric_w
        } else {
            lyric_w.max(chord_w + 1)
        };
        pad(&mut lyrics, &mut lyric_w, col);
        pad(&mut chords, &mut chord_w, col);
        chord_w += label.chars().count();
        chords.push_str(&label);
    }

    let mut text = String::new();
    for row in [chords.trim_end(), lyrics.trim_end()] {
        if !row.is_empty() {
            text.push_str(row);
            text.push('\n');
        }
    }
    text
}

fn pad(row: &mut String, width: &mut usize, col: usize) {
    while *width < col {
        row.push(' ');
        *width += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, parse_line};
    use crate::transpose::transpose;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chord_over_lyric() {
        assert_eq!(
            line_to_text(&parse_line("[G]Amazing [C]grace")),
            "G       C\nAmazing grace\n"
        );
    }

    #[test]
    fn test_lyric_only_and_chord_only() {
        assert_eq!(line_to_text(&parse_line("just words")), "just words\n");
        assert_eq!(line_to_text(&parse_line("[Am] [F]")), "Am F\n");
    }

    #[test]
    fn test_adjacent_chords_stay_apart() {
        assert_eq!(line_to_text(&parse_line("[Cmaj7][G]la")), "Cmaj7 G\n      la\n");
        assert_eq!(line_to_text(&parse_line("[Dsus4]a[G]b")), "Dsus4 G\na     b\n");
    }

    #[test]
    fn test_multibyte_lyrics_align_by_char() {
        assert_eq!(line_to_text(&parse_line("[D]Ça va [A]bien")), "D     A\nÇa va bien\n");
    }

    #[test]
    fn test_annotation_in_chord_row() {
        assert_eq!(line_to_text(&parse_line("[*Riff]play")), "Riff\nplay\n");
    }

    #[test]
    fn test_full_song() {
        let song = parse(
            "{title: Amazing Grace}\n{artist: John Newton}\n{comment: Slowly}\n\
             [G]Amazing [C]grace\n{soc}\n[D]How sweet\n{eoc}",
        );
        let expected = "Amazing Grace\nJohn Newton\n\n\
                        (Slowly)\n\n\
                        G       C\nAmazing grace\n\n\
                        Chorus:\nD\nHow sweet\n";
        assert_eq!(to_text(&song), expected);
    }

    #[test]
    fn test_no_header() {
        let song = parse("{soc}\nla\n{eoc}\n\nlo");
        // the line after {eoc} lands in a fresh chorus
        assert_eq!(to_text(&song), "Chorus:\nla\n\nChorus:\nlo\n");
    }

    #[test]
    fn test_renders_transposed() {
        let song = transpose(&parse("[A]la [E7]lo"), 2);
        assert_eq!(to_text(&song), "B  F#7\nla lo\n");
    }
}
