use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured view of a single resume, produced once per upload.
///
/// Records are never mutated in place: a re-parse yields a new record that
/// replaces the old one in whatever store the caller owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub raw_text: String,
    pub skills: BTreeSet<String>,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub certifications: BTreeSet<String>,
    pub projects: Vec<ProjectEntry>,
    pub parsed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub year: Option<u16>,
    pub institution: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub role: Option<String>,
    pub company: String,
    pub duration: String,
}

/// `description` never exceeds `MAX_PROJECT_DESCRIPTION_CHARS` characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub title: String,
    pub description: String,
}

pub const MAX_PROJECT_DESCRIPTION_CHARS: usize = 200;
