//! Text normalizer: strips document-extraction artifacts before structuring.

use regex::Regex;

use crate::parsing::catalog::{compile, CatalogError};

const BLANK_RUN_PATTERN: &str = r"\n{3,}";
const PAGE_FOOTER_PATTERN: &str = r"(?i)page\s+\d+\s+of\s+\d+";

/// Cleans raw extracted text. Never fails on input: empty in, empty out.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    blank_runs: Regex,
    page_footer: Regex,
}

impl TextNormalizer {
    pub fn new() -> Result<Self, CatalogError> {
        Ok(Self {
            blank_runs: compile("blank line run", BLANK_RUN_PATTERN)?,
            page_footer: compile("page footer", PAGE_FOOTER_PATTERN)?,
        })
    }

    /// Unifies line endings, collapses 3+ newlines to 2, drops "Page N of M"
    /// footers and trims the result.
    pub fn normalize(&self, raw: &str) -> String {
        let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
        let collapsed = self.blank_runs.replace_all(&unified, "\n\n");
        let without_footers = self.page_footer.replace_all(&collapsed, "");
        without_footers.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new().unwrap()
    }

    #[test]
    fn test_collapses_blank_line_runs() {
        let out = normalizer().normalize("Skills\n\n\n\n\nPython");
        assert_eq!(out, "Skills\n\nPython");
    }

    #[test]
    fn test_keeps_single_blank_line() {
        let out = normalizer().normalize("a\n\nb");
        assert_eq!(out, "a\n\nb");
    }

    #[test]
    fn test_removes_page_footers_case_insensitively() {
        let out = normalizer().normalize("Experience\nPAGE 1 of 3\nAcme Corp\npage 2 OF 3");
        assert!(!out.to_lowercase().contains("page"));
        assert!(out.starts_with("Experience"));
        assert!(out.ends_with("Acme Corp"));
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(normalizer().normalize("   hello \n\t"), "hello");
    }

    #[test]
    fn test_empty_input_is_empty_output() {
        assert_eq!(normalizer().normalize(""), "");
        assert_eq!(normalizer().normalize("\n\n\n   "), "");
    }

    #[test]
    fn test_windows_line_endings_are_unified() {
        let out = normalizer().normalize("a\r\n\r\n\r\n\r\nb");
        assert_eq!(out, "a\n\nb");
    }
}
