//! # Semantic Validation Module
//!
//! Checks run on a freshly parsed song before it is accepted into the catalog.
//!
//! Parsing itself never fails, so a file that is not a song sheet at all (an empty
//! file, a file of only directives or comments) still parses. The importer uses
//! [`validate`] to reject those.
//!
//! ## Validation Rules
//! - A song must have at least one section
//!
//! Unrecognized chord roots are not an error. [`unrecognized_chords`] lists them for
//! callers that want to warn about them.

use crate::ast::Song;
use crate::error::{ChordbookError, Result};

/// Validate a parsed song for import.
pub fn validate(song: &Song) -> Result<()> {
    if song.sections.is_empty() {
        return Err(ChordbookError::Validation(
            "File does not contain a valid song".to_string(),
        ));
    }
    Ok(())
}

/// Chord tokens whose root is not one of the twelve known spellings, in order.
pub fn unrecognized_chords(song: &Song) -> Vec<String> {
    song.lines()
        .flat_map(|line| line.chords())
        .filter(|chord| !chord.is_recognized())
        .map(|chord| chord.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_song_with_lines_is_valid() {
        assert!(validate(&parse("[C]hello")).is_ok());
    }

    #[test]
    fn test_metadata_only_is_invalid() {
        let err = validate(&parse("{title: Nothing}\n{artist: Nobody}")).unwrap_err();
        assert!(matches!(err, ChordbookError::Validation(_)));
    }

    #[test]
    fn test_comment_section_counts() {
        assert!(validate(&parse("{comment: only this}")).is_ok());
    }

    #[test]
    fn test_unrecognized_chords_listed() {
        let song = parse("[C]a [N.C.]b [Fb]c [Bb]d");
        assert_eq!(unrecognized_chords(&song), vec!["N.C.", "Fb"]);
    }
}
