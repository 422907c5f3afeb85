//! Windowed section scan shared by every resume extractor.
//!
//! A header is any line whose lowercase form contains one of the window's
//! keywords. The lines that follow it (optionally including the header line
//! itself) are offered to a predicate; accepted lines become hits.

use std::collections::BTreeMap;

/// Parameters for one extractor's scan.
#[derive(Debug, Clone, Copy)]
pub struct SectionWindow<'a> {
    pub headers: &'a [String],
    /// Number of lines inspected per header.
    pub size: usize,
    /// When true the window starts at the header line instead of after it.
    pub include_header: bool,
}

/// A line accepted by the predicate, with its position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHit<'l> {
    pub index: usize,
    pub line: &'l str,
}

/// True if `line` contains any of `keywords` (case-insensitive).
pub fn contains_any(line: &str, keywords: &[String]) -> bool {
    let lower = line.to_lowercase();
    keywords.iter().any(|k| lower.contains(k.as_str()))
}

/// Scans every header window and returns the lines accepted by `predicate`,
/// in line order. A line reachable from overlapping windows is reported once.
/// Lines are trimmed before the predicate sees them.
pub fn extract_section<'l, F>(
    lines: &[&'l str],
    window: SectionWindow<'_>,
    mut predicate: F,
) -> Vec<SectionHit<'l>>
where
    F: FnMut(&str) -> bool,
{
    let mut hits = BTreeMap::new();

    for (i, line) in lines.iter().enumerate() {
        if !contains_any(line, window.headers) {
            continue;
        }

        let start = if window.include_header { i } else { i + 1 };
        let end = start.saturating_add(window.size).min(lines.len());

        for (j, &candidate) in lines.iter().enumerate().take(end).skip(start) {
            if hits.contains_key(&j) {
                continue;
            }
            let trimmed = candidate.trim();
            if predicate(trimmed) {
                hits.insert(j, trimmed);
            }
        }
    }

    hits.into_iter()
        .map(|(index, line)| SectionHit { index, line })
        .collect()
}
