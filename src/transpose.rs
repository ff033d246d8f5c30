use crate::ast::{Line, LinePart, Section, Song};
use crate::chord::Chord;

/// Transpose a single chord by `steps` semitones.
///
/// Recognized roots are respelled with sharps (`Bb` up 2 is `C`, `Eb` up 0 is still
/// `Eb`). The suffix is kept verbatim, including any slash bass. Chords without a
/// recognized root come back unchanged.
pub fn transpose_chord(chord: &Chord, steps: i32) -> Chord {
    match chord.pitch_class() {
        Some(pitch) if steps.rem_euclid(12) != 0 => Chord {
            root: pitch.shift(steps).name().to_string(),
            suffix: chord.suffix.clone(),
        },
        _ => chord.clone(),
    }
}

pub fn transpose_line(line: &Line, steps: i32) -> Line {
    Line {
        parts: line
            .parts
            .iter()
            .map(|part| match part {
                LinePart::Chord(chord) => LinePart::Chord(transpose_chord(chord, steps)),
                // Lyrics and annotations are never touched
                LinePart::Lyric(_) | LinePart::Annotation(_) => part.clone(),
            })
            .collect(),
    }
}

pub fn transpose_section(section: &Section, steps: i32) -> Section {
    Section {
        kind: section.kind,
        lines: section
            .lines
            .iter()
            .map(|line| transpose_line(line, steps))
            .collect(),
    }
}

/// Transpose a whole song by `steps` semitones (negative goes down).
///
/// Returns a new song; metadata, section types and all non-chord text are copied
/// as-is. A whole number of octaves returns an identical copy.
pub fn transpose(song: &Song, steps: i32) -> Song {
    Song {
        metadata: song.metadata.clone(),
        sections: song
            .sections
            .iter()
            .map(|section| transpose_section(section, steps))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "{title: Test}\n{key: G}\n[G]Amazing [D/F#]grace, how [Em7]sweet\n{soc}\n[*Slowly][Bb]the [N.C.]sound [Ebmaj7]\n{eoc}\n{comment: x2}\n";

    fn chord_texts(song: &Song) -> Vec<String> {
        song.lines()
            .flat_map(|line| line.chords().map(|c| c.to_string()))
            .collect()
    }

    fn root_classes(song: &Song) -> Vec<Option<u8>> {
        song.lines()
            .flat_map(|line| line.chords().map(|c| c.pitch_class().map(|p| p.index())))
            .collect()
    }

    /// Everything except chord parts
    fn non_chord_parts(song: &Song) -> Vec<LinePart> {
        song.lines()
            .flat_map(|line| line.parts.iter())
            .filter(|part| !matches!(part, LinePart::Chord(_)))
            .cloned()
            .collect()
    }

    fn suffixes(song: &Song) -> Vec<String> {
        song.lines()
            .flat_map(|line| line.chords().map(|c| c.suffix.clone()))
            .collect()
    }

    #[test]
    fn test_transpose_up_two() {
        let song = parse(SAMPLE);
        let up = transpose(&song, 2);
        assert_eq!(
            chord_texts(&up),
            vec!["A", "E/F#", "F#m7", "C", "N.C.", "Fmaj7"]
        );
    }

    #[test]
    fn test_transpose_down_wraps() {
        let song = parse("[C]a [Db]b [A]c");
        assert_eq!(chord_texts(&transpose(&song, -1)), vec!["B", "C", "G#"]);
        assert_eq!(chord_texts(&transpose(&song, -13)), vec!["B", "C", "G#"]);
        assert_eq!(chord_texts(&transpose(&song, 11)), vec!["B", "C", "G#"]);
    }

    #[test]
    fn test_zero_is_identity() {
        let song = parse(SAMPLE);
        assert_eq!(transpose(&song, 0), song);
        assert_eq!(transpose(&song, 12), song);
        assert_eq!(transpose(&song, -24), song);
    }

    #[test]
    fn test_composition() {
        let song = parse(SAMPLE);
        for a in -14..14 {
            for b in -14..14 {
                let twice = transpose(&transpose(&song, a), b);
                let once = transpose(&song, a + b);
                assert_eq!(root_classes(&twice), root_classes(&once), "a={} b={}", a, b);
                assert_eq!(suffixes(&twice), suffixes(&song));
                assert_eq!(non_chord_parts(&twice), non_chord_parts(&song));
            }
        }
    }

    #[test]
    fn test_extreme_steps_do_not_overflow() {
        let song = parse("[B]la [Eb7]lo");
        // i32::MAX ≡ 7 and i32::MIN ≡ 4 (mod 12)
        assert_eq!(root_classes(&transpose(&song, i32::MAX)), vec![Some(6), Some(10)]);
        assert_eq!(root_classes(&transpose(&song, i32::MIN)), vec![Some(3), Some(7)]);
    }

    #[test]
    fn test_unrecognized_root_stable() {
        let chord = Chord::parse("N.C.");
        for steps in -30..30 {
            assert_eq!(transpose_chord(&chord, steps), chord);
        }
        let odd = Chord::parse("Cbmaj7");
        assert_eq!(transpose_chord(&odd, 3), odd);
    }

    #[test]
    fn test_metadata_and_structure_untouched() {
        let song = parse(SAMPLE);
        let moved = transpose(&song, 5);
        assert_eq!(moved.metadata, song.metadata);
        assert_eq!(moved.metadata.get("key"), Some("G"));
        let kinds = |s: &Song| s.sections.iter().map(|x| x.kind).collect::<Vec<_>>();
        assert_eq!(kinds(&moved), kinds(&song));
        assert_eq!(non_chord_parts(&moved), non_chord_parts(&song));
    }

    #[test]
    fn test_source_song_not_mutated() {
        let song = parse(SAMPLE);
        let before = song.clone();
        let _ = transpose(&song, 7);
        assert_eq!(song, before);
    }
}
