//! HTML output for the viewer.
//!
//! Chords are emitted inline as `<span class="chord">` right before the lyric they
//! belong to; the stylesheet lifts them above the text. Section `<div>`s carry the
//! section type as a class.

use crate::ast::{Line, LinePart, Section, SectionType, Song};

/// Convert a song to an HTML fragment.
pub fn to_html(song: &Song) -> String {
    let mut html = String::new();

    html.push_str("<div class=\"song\">\n");

    if let Some(title) = song.title() {
        html.push_str(&format!("  <h1>{}</h1>\n", escape_html(title)));
    }
    if let Some(artist) = song.artist() {
        html.push_str(&format!("  <h2>{}</h2>\n", escape_html(artist)));
    }

    for section in &song.sections {
        html.push_str(&section_to_html(section));
    }

    html.push_str("</div>\n");
    html
}

fn section_to_html(section: &Section) -> String {
    let mut html = String::new();

    html.push_str(&format!("  <div class=\"section {}\">\n", section.kind));
    match section.kind {
        SectionType::Verse | SectionType::Comment => {}
        kind => html.push_str(&format!("    <div class=\"label\">{}</div>\n", kind.label())),
    }
    for line in &section.lines {
        html.push_str(&line_to_html(line));
    }
    html.push_str("  </div>\n");

    html
}

fn line_to_html(line: &Line) -> String {
    let mut html = String::from("    <div class=\"line\">");
    for part in &line.parts {
        match part {
            LinePart::Chord(chord) => html.push_str(&format!(
                "<span class=\"chord\">{}</span>",
                escape_html(&chord.to_string())
            )),
            LinePart::Annotation(text) => html.push_str(&format!(
                "<span class=\"annotation\">{}</span>",
                escape_html(text)
            )),
            LinePart::Lyric(text) => html.push_str(&escape_html(text)),
        }
    }
    html.push_str("</div>\n");
    html
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
