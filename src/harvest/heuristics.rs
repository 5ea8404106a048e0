// src/harvest/heuristics.rs
//! Shared text-selection rules used across source adapters: flattened
//! container text, `<br>`-aware text assembly, authority-citation trimming,
//! marker slicing and section-heading scans.

use once_cell::sync::OnceCell;
use regex::Regex;
use scraper::ElementRef;

/// Collapse all whitespace runs to single spaces and trim.
pub fn collapse_ws(s: &str) -> String {
    static RE_WS: OnceCell<Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());
    re_ws.replace_all(s, " ").trim().to_string()
}

/// All text inside an element, whitespace-collapsed into one line.
pub fn flat_text(el: ElementRef<'_>) -> String {
    collapse_ws(&el.text().collect::<Vec<_>>().join(" "))
}

/// All text inside an element with `<br>` elements rendered as newlines.
/// Other markup contributes its text verbatim.
pub fn text_with_breaks(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in el.descendants() {
        if let Some(text) = node.value().as_text() {
            out.push_str(text);
        } else if let Some(e) = node.value().as_element() {
            if e.name() == "br" {
                out.push('\n');
            }
        }
    }
    out
}

/// Drop everything up to and including the first `)`, then left-trim.
/// Strips the leading taxonomic-authority citation, e.g.
/// `"Genus species (Author, 1900) The wings..."` -> `"The wings..."`.
/// Text without a `)` passes through unchanged.
pub fn strip_through_paren(text: &str) -> &str {
    match text.find(')') {
        Some(idx) => text[idx + 1..].trim_start(),
        None => text,
    }
}

/// Slice from `start_key` up to but not including `end_key`, trimmed.
/// Returns None when the start marker is absent or the end marker occurs
/// before it; a missing end marker slices to the end of the text.
pub fn slice_between_markers(text: &str, start_key: &str, end_key: &str) -> Option<String> {
    let start = text.find(start_key)?;
    match text.find(end_key) {
        Some(end) if end > start => Some(text[start..end].trim().to_string()),
        Some(_) => None,
        None => Some(text[start..].trim().to_string()),
    }
}

/// Line-scan fallback for pages without marker structure: keep everything
/// from the first line containing both `(` and `)` (the scientific-name
/// line), stopping before a line containing `stop_marker`.
pub fn from_parenthesized_line(text: &str, stop_marker: &str) -> String {
    let mut kept = Vec::new();
    let mut seen_name_line = false;
    for line in text.lines() {
        if !seen_name_line && line.contains('(') && line.contains(')') {
            seen_name_line = true;
        }
        if seen_name_line {
            if line.contains(stop_marker) {
                break;
            }
            kept.push(line.trim());
        }
    }
    kept.join("\n").trim().to_string()
}

/// Scan `"\n=="`-delimited sections for the first one containing any of
/// `keywords` (checked in order, case-insensitively) and longer than
/// `min_len` characters. Returns the section body with its heading line
/// removed. None means: fall back to the full content.
pub fn section_with_keyword(content: &str, keywords: &[&str], min_len: usize) -> Option<String> {
    for section in content.split("\n==") {
        let lowered = section.to_lowercase();
        for kw in keywords {
            if lowered.contains(kw) && section.chars().count() > min_len {
                let body: Vec<&str> = section.lines().skip(1).collect();
                return Some(body.join("\n").trim().to_string());
            }
        }
    }
    None
}
