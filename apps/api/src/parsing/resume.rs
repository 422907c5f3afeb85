//! Resume structurer: turns normalized resume text into a `ResumeRecord`.
//!
//! Five independent heuristic scans (skills, education, experience,
//! certifications, projects), each built on `extract_section`. A scan that
//! finds no section yields an empty collection; no input string is an error.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::debug;

use crate::models::resume::{
    EducationEntry, ExperienceEntry, ProjectEntry, ResumeRecord, MAX_PROJECT_DESCRIPTION_CHARS,
};
use crate::parsing::catalog::{compile, CatalogError, KeywordCatalog};
use crate::parsing::section::{contains_any, extract_section, SectionHit, SectionWindow};

const SKILL_WINDOW: usize = 5;
const EDUCATION_WINDOW: usize = 10;
const EXPERIENCE_WINDOW: usize = 20;
const PROJECT_WINDOW: usize = 15;
/// Lines at or above this length are prose, not a certification or title.
const MAX_SHORT_LINE_CHARS: usize = 100;
const MIN_PROJECT_TITLE_CHARS: usize = 10;
const PROJECT_DESCRIPTION_LINES: usize = 3;
const MIN_CERTIFICATION_FRAGMENT_CHARS: usize = 4;

pub struct ResumeStructurer {
    catalog: Arc<KeywordCatalog>,
    degree: Regex,
    year: Regex,
    date_ranges: Vec<Regex>,
}

impl ResumeStructurer {
    pub fn new(catalog: Arc<KeywordCatalog>) -> Result<Self, CatalogError> {
        let degree = compile("degree", &catalog.degree_pattern)?;
        let year = compile("year", &catalog.year_pattern)?;
        let date_ranges = catalog
            .date_range_patterns
            .iter()
            .map(|p| compile("date range", p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            catalog,
            degree,
            year,
            date_ranges,
        })
    }

    /// Structures `text`, stamping the record with the current time.
    pub fn structure(&self, text: &str) -> ResumeRecord {
        self.structure_at(text, Utc::now())
    }

    /// Structures `text` with an explicit `parsed_at` timestamp.
    pub fn structure_at(&self, text: &str, parsed_at: DateTime<Utc>) -> ResumeRecord {
        let lines: Vec<&str> = text.lines().collect();

        let record = ResumeRecord {
            raw_text: text.to_string(),
            skills: self.extract_skills(text, &lines),
            education: self.extract_education(&lines),
            experience: self.extract_experience(&lines),
            certifications: self.extract_certifications(&lines),
            projects: self.extract_projects(&lines),
            parsed_at,
        };

        debug!(
            skills = record.skills.len(),
            education = record.education.len(),
            experience = record.experience.len(),
            certifications = record.certifications.len(),
            projects = record.projects.len(),
            "Structured resume"
        );

        record
    }

    // ────────────────────────────────────────────────────────────────────
    // Skills
    // ────────────────────────────────────────────────────────────────────

    /// Union of fragments found under skill headers and catalog terms found
    /// anywhere in the text.
    pub fn extract_skills(&self, text: &str, lines: &[&str]) -> BTreeSet<String> {
        let headers = &self.catalog.skill_headers;
        let window = SectionWindow {
            headers,
            size: SKILL_WINDOW,
            include_header: true,
        };

        let mut skills = BTreeSet::new();

        for hit in extract_section(lines, window, |line| !line.is_empty()) {
            let lower = hit.line.to_lowercase();
            for fragment in split_fragments(&lower) {
                let fragment = strip_label(fragment);
                if fragment.chars().count() > 1 && !names_a_header(fragment, headers) {
                    skills.insert(fragment.to_string());
                }
            }
        }

        let text_lower = text.to_lowercase();
        for skill in &self.catalog.skills {
            if text_lower.contains(skill.as_str()) {
                skills.insert(skill.clone());
            }
        }

        skills
    }

    // ────────────────────────────────────────────────────────────────────
    // Education
    // ────────────────────────────────────────────────────────────────────

    pub fn extract_education(&self, lines: &[&str]) -> Vec<EducationEntry> {
        let window = SectionWindow {
            headers: &self.catalog.education_headers,
            size: EDUCATION_WINDOW,
            include_header: false,
        };

        extract_section(lines, window, |line| {
            !line.is_empty() && self.degree.is_match(line)
        })
        .into_iter()
        .map(|hit| EducationEntry {
            degree: hit.line.to_string(),
            year: self.first_year(hit.line),
            institution: lines
                .get(hit.index + 1)
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .map(str::to_string),
        })
        .collect()
    }

    fn first_year(&self, line: &str) -> Option<u16> {
        self.year
            .find(line)
            .and_then(|m| m.as_str().parse::<u16>().ok())
    }

    // ────────────────────────────────────────────────────────────────────
    // Experience
    // ────────────────────────────────────────────────────────────────────

    /// Each line carrying a date range is a duration marker; the line above
    /// it (when it is neither a marker nor a section header) names the role.
    pub fn extract_experience(&self, lines: &[&str]) -> Vec<ExperienceEntry> {
        let headers = &self.catalog.experience_headers;
        let window = SectionWindow {
            headers,
            size: EXPERIENCE_WINDOW,
            include_header: false,
        };

        let hits = extract_section(lines, window, |line| {
            !line.is_empty() && self.date_ranges.iter().any(|re| re.is_match(line))
        });
        let markers: HashSet<usize> = hits.iter().map(|h| h.index).collect();

        hits.iter()
            .map(|hit| ExperienceEntry {
                role: preceding_role(lines, hit, &markers, headers),
                company: hit.line.to_string(),
                duration: hit.line.to_string(),
            })
            .collect()
    }

    // ────────────────────────────────────────────────────────────────────
    // Certifications
    // ────────────────────────────────────────────────────────────────────

    pub fn extract_certifications(&self, lines: &[&str]) -> BTreeSet<String> {
        let headers = &self.catalog.certification_headers;
        let mut certifications = BTreeSet::new();

        for line in lines {
            let lower = line.trim().to_lowercase();
            if lower.is_empty() {
                continue;
            }

            if contains_any(&lower, headers) {
                for fragment in split_fragments(&lower) {
                    let fragment = strip_label(fragment);
                    if fragment.chars().count() >= MIN_CERTIFICATION_FRAGMENT_CHARS
                        && !is_bare_header(fragment, headers)
                    {
                        certifications.insert(fragment.to_string());
                    }
                }
            }

            if lower.chars().count() < MAX_SHORT_LINE_CHARS
                && contains_any(&lower, &self.catalog.certification_providers)
            {
                certifications.insert(lower);
            }
        }

        certifications
    }

    // ────────────────────────────────────────────────────────────────────
    // Projects
    // ────────────────────────────────────────────────────────────────────

    /// Short, non-sentence lines under a project header are titles; up to the
    /// next three non-empty lines form the description.
    pub fn extract_projects(&self, lines: &[&str]) -> Vec<ProjectEntry> {
        let window = SectionWindow {
            headers: &self.catalog.project_headers,
            size: PROJECT_WINDOW,
            include_header: false,
        };

        let hits = extract_section(lines, window, is_project_title);
        let mut consumed: HashSet<usize> = HashSet::new();
        let mut projects = Vec::new();

        for hit in hits {
            if consumed.contains(&hit.index) {
                continue;
            }

            let end = (hit.index + 1 + PROJECT_DESCRIPTION_LINES).min(lines.len());
            let mut description_lines = Vec::new();
            for (k, line) in lines.iter().enumerate().take(end).skip(hit.index + 1) {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    consumed.insert(k);
                    description_lines.push(trimmed);
                }
            }

            projects.push(ProjectEntry {
                title: hit.line.to_string(),
                description: truncate_chars(
                    &description_lines.join(" "),
                    MAX_PROJECT_DESCRIPTION_CHARS,
                ),
            });
        }

        projects
    }
}

fn is_project_title(line: &str) -> bool {
    let len = line.chars().count();
    (MIN_PROJECT_TITLE_CHARS..MAX_SHORT_LINE_CHARS).contains(&len) && !line.ends_with('.')
}

fn preceding_role(
    lines: &[&str],
    hit: &SectionHit<'_>,
    markers: &HashSet<usize>,
    headers: &[String],
) -> Option<String> {
    let (index, line) = lines[..hit.index]
        .iter()
        .enumerate()
        .rev()
        .map(|(i, l)| (i, l.trim()))
        .find(|(_, l)| !l.is_empty())?;

    if markers.contains(&index) || contains_any(line, headers) {
        return None;
    }
    Some(line.to_string())
}

/// Splits a line on the list separators resumes use: `, ; | • -`.
fn split_fragments(line: &str) -> impl Iterator<Item = &str> {
    line.split([',', ';', '|', '•', '-'])
}

/// Drops a leading `Label:` and surrounding whitespace.
fn strip_label(fragment: &str) -> &str {
    let value = match fragment.rfind(':') {
        Some(pos) => &fragment[pos + 1..],
        None => fragment,
    };
    value.trim()
}

/// Words that only qualify a section title, as in "technical skills".
const TITLE_QUALIFIERS: &[&str] = &["technical", "core", "key", "relevant", "professional"];

/// True for fragments that name the section rather than a skill: a bare
/// header ("skills"), a qualified one ("technical skills") or a pair of
/// headers ("tools & technologies"). "build tools" is still a skill.
fn names_a_header(fragment: &str, headers: &[String]) -> bool {
    let is_header = |word: &str| headers.iter().any(|h| h == word);
    let words: Vec<&str> = fragment.split_whitespace().collect();

    match words.as_slice() {
        [only] => is_header(only),
        [first, last] => is_header(last) && (TITLE_QUALIFIERS.contains(first) || is_header(first)),
        [first, "&" | "and", last] => is_header(first) && is_header(last),
        _ => false,
    }
}

/// True for "certification", "certifications", "certified" and friends.
fn is_bare_header(fragment: &str, headers: &[String]) -> bool {
    let singular = fragment.trim_end_matches('s');
    headers.iter().any(|h| h == fragment || h == singular)
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
