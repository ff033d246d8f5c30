//! Chord symbol grammar.
//!
//! Splits a chord token (`Cm7`, `Bb/D`, `F#sus4`) into a root spelling and a free-form
//! suffix, and maps root spellings to one of the twelve pitch classes for
//! transposition. Recognition is deliberately loose: anything starting with `A`-`G`
//! and an optional `b`/`#` is a chord, whatever follows. Text that does not start
//! with a root (`N.C.`, `x2`) is kept whole and never shifted.

use std::fmt;

/// Sharp spellings indexed by pitch class, C = 0.
const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// One of the twelve pitch classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PitchClass(u8);

impl PitchClass {
    /// Look up a root spelling. Only naturals, the five sharps of the table and the
    /// five flats `Db Eb Gb Ab Bb` are known; `E#`, `B#`, `Cb` and `Fb` are not.
    pub fn from_spelling(spelling: &str) -> Option<Self> {
        let sharp = match spelling {
            "Db" => "C#",
            "Eb" => "D#",
            "Gb" => "F#",
            "Ab" => "G#",
            "Bb" => "A#",
            other => other,
        };
        SHARP_NAMES
            .iter()
            .position(|name| *name == sharp)
            .map(|idx| Self(idx as u8))
    }

    /// Pitch class for any integer, wrapping modulo 12.
    pub fn from_index(index: i32) -> Self {
        Self(index.rem_euclid(12) as u8)
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Sharp spelling of this pitch class.
    pub fn name(self) -> &'static str {
        SHARP_NAMES[self.0 as usize]
    }

    /// Move by `steps` semitones (negative moves down).
    pub fn shift(self, steps: i32) -> Self {
        Self::from_index(self.0 as i32 + steps.rem_euclid(12))
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Semitones to go up from `from` to reach `to`, in `0..12`.
///
/// Returns 0 when either spelling is not a recognized root.
pub fn steps_between(from: &str, to: &str) -> i32 {
    match (PitchClass::from_spelling(from), PitchClass::from_spelling(to)) {
        (Some(from), Some(to)) => (to.index() as i32 - from.index() as i32).rem_euclid(12),
        _ => 0,
    }
}

/// Split a chord token into `(root, suffix)`.
///
/// ```
/// use chordbook::chord::split_chord;
///
/// assert_eq!(split_chord("Cm7"), ("C", "m7"));
/// assert_eq!(split_chord("Bb/D"), ("Bb", "/D"));
/// assert_eq!(split_chord("N.C."), ("N.C.", ""));
/// ```
pub fn split_chord(text: &str) -> (&str, &str) {
    let mut chars = text.char_indices();
    match chars.next() {
        Some((_, 'A'..='G')) => {}
        _ => return (text, ""),
    }
    let root_end = match chars.next() {
        Some((idx, 'b' | '#')) => idx + 1,
        Some((idx, _)) => idx,
        None => text.len(),
    };
    text.split_at(root_end)
}

/// A chord symbol as written in the source.
///
/// `root` keeps the original spelling (`Bb` stays `Bb`). When the token has no
/// recognizable root, `root` holds the whole token and `suffix` is empty, so
/// `to_string()` always gives back the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    pub root: String,
    pub suffix: String,
}

impl Chord {
    pub fn parse(text: &str) -> Self {
        let (root, suffix) = split_chord(text);
        Self {
            root: root.to_string(),
            suffix: suffix.to_string(),
        }
    }

    /// Pitch class of the root, if the spelling is one of the known twelve.
    pub fn pitch_class(&self) -> Option<PitchClass> {
        PitchClass::from_spelling(&self.root)
    }

    pub fn is_recognized(&self) -> bool {
        self.pitch_class().is_some()
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.suffix)
    }
}

impl From<String> for Chord {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Chord> for String {
    fn from(chord: Chord) -> Self {
        chord.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_roots() {
        assert_eq!(split_chord("C"), ("C", ""));
        assert_eq!(split_chord("G7"), ("G", "7"));
        assert_eq!(split_chord("F#m7b5"), ("F#", "m7b5"));
        assert_eq!(split_chord("Ebmaj7"), ("Eb", "maj7"));
    }

    #[test]
    fn test_split_keeps_slash_bass_in_suffix() {
        assert_eq!(split_chord("D/F#"), ("D", "/F#"));
        assert_eq!(split_chord("Asus4"), ("A", "sus4"));
    }

    #[test]
    fn test_split_unrecognized_is_opaque() {
        assert_eq!(split_chord("N.C."), ("N.C.", ""));
        assert_eq!(split_chord("x2"), ("x2", ""));
        assert_eq!(split_chord("cm"), ("cm", ""));
        assert_eq!(split_chord(""), ("", ""));
    }

    #[test]
    fn test_split_multibyte_suffix() {
        assert_eq!(split_chord("C°"), ("C", "°"));
        assert_eq!(split_chord("Bbø7"), ("Bb", "ø7"));
    }

    #[test]
    fn test_flats_normalize_to_sharps() {
        for (flat, sharp) in [("Db", "C#"), ("Eb", "D#"), ("Gb", "F#"), ("Ab", "G#"), ("Bb", "A#")] {
            assert_eq!(
                PitchClass::from_spelling(flat),
                PitchClass::from_spelling(sharp),
                "{} should equal {}",
                flat,
                sharp
            );
        }
    }

    #[test]
    fn test_unknown_spellings() {
        assert_eq!(PitchClass::from_spelling("E#"), None);
        assert_eq!(PitchClass::from_spelling("Cb"), None);
        assert_eq!(PitchClass::from_spelling("Fb"), None);
        assert_eq!(PitchClass::from_spelling("B#"), None);
        assert_eq!(PitchClass::from_spelling("H"), None);
    }

    #[test]
    fn test_shift_wraps_both_ways() {
        let b = PitchClass::from_spelling("B").unwrap();
        assert_eq!(b.shift(1).name(), "C");
        assert_eq!(b.shift(-11).name(), "C");
        assert_eq!(b.shift(-25).name(), "A#");
        assert_eq!(b.shift(24), b);
    }

    #[test]
    fn test_shift_extreme_steps() {
        let b = PitchClass::from_spelling("B").unwrap();
        // i32::MAX = 12 * 178956970 + 7, i32::MIN = 12 * -178956971 + 4
        assert_eq!(b.shift(i32::MAX).name(), "F#");
        assert_eq!(b.shift(i32::MIN).name(), "D#");
        assert_eq!(PitchClass::from_index(0).shift(i32::MAX - 7).name(), "C");
    }

    #[test]
    fn test_steps_between() {
        assert_eq!(steps_between("C", "D"), 2);
        assert_eq!(steps_between("A", "C"), 3);
        assert_eq!(steps_between("D", "C"), 10);
        assert_eq!(steps_between("Bb", "A#"), 0);
        assert_eq!(steps_between("C", "H"), 0);
    }

    #[test]
    fn test_chord_display_round_trips_source() {
        for text in ["Cmaj7", "Bb/D", "N.C.", "Cb", "E#m"] {
            assert_eq!(Chord::parse(text).to_string(), text);
        }
    }

    #[test]
    fn test_chord_recognition() {
        assert!(Chord::parse("Am").is_recognized());
        assert!(!Chord::parse("N.C.").is_recognized());
        assert!(!Chord::parse("Cb").is_recognized());
    }
}
