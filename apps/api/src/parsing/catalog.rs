//! Keyword catalog: the immutable vocabulary every extractor and scorer reads.
//!
//! Nothing here is a process-wide static: a `KeywordCatalog` is built once
//! (usually via `Default`) and handed to the structurers and scorers, so tests
//! can substitute a smaller fixture.

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid {name} pattern: {source}")]
    Pattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// A group of interchangeable skill names, e.g. javascript ↔ js, node.js.
#[derive(Debug, Clone, PartialEq)]
pub struct SynonymGroup {
    pub canonical: String,
    pub variants: Vec<String>,
}

impl SynonymGroup {
    pub fn new(canonical: &str, variants: &[&str]) -> Self {
        Self {
            canonical: canonical.to_string(),
            variants: to_strings(variants),
        }
    }

    /// True if `skill` is the canonical name or one of its variants.
    pub fn contains(&self, skill: &str) -> bool {
        self.canonical == skill || self.variants.iter().any(|v| v == skill)
    }

    /// Every name in the group, variants first, canonical last.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.variants
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.canonical.as_str()))
    }
}

/// Maps skills mentioned in a posting to certifications worth recommending.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificationSuggestion {
    pub skill: String,
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordCatalog {
    /// Known technical skill terms, matched as exact lowercase substrings.
    pub skills: Vec<String>,
    pub skill_headers: Vec<String>,
    pub education_headers: Vec<String>,
    pub experience_headers: Vec<String>,
    pub certification_headers: Vec<String>,
    pub project_headers: Vec<String>,
    /// Keywords that mark a resume line as naming a certification provider.
    pub certification_providers: Vec<String>,
    pub required_indicators: Vec<String>,
    pub preferred_indicators: Vec<String>,
    /// Degree keywords detected anywhere in a job posting.
    pub job_education_keywords: Vec<String>,
    /// (keyword, level) pairs: certificate=1 … doctorate=5.
    pub degree_levels: Vec<(String, u8)>,
    pub synonyms: Vec<SynonymGroup>,
    pub certification_suggestions: Vec<CertificationSuggestion>,
    pub degree_pattern: String,
    pub year_pattern: String,
    pub date_range_patterns: Vec<String>,
    pub experience_range_pattern: String,
    pub experience_single_pattern: String,
    pub default_job_title: String,
    pub default_experience: String,
}

impl Default for KeywordCatalog {
    fn default() -> Self {
        Self {
            skills: to_strings(&[
                "python",
                "java",
                "javascript",
                "react",
                "node.js",
                "sql",
                "mongodb",
                "postgresql",
                "docker",
                "kubernetes",
                "aws",
                "azure",
                "gcp",
                "machine learning",
                "data science",
                "tensorflow",
                "pytorch",
                "pandas",
                "numpy",
                "scikit-learn",
                "flask",
                "django",
                "fastapi",
                "html",
                "css",
                "git",
                "linux",
                "windows",
                "excel",
                "tableau",
                "powerbi",
                "spring boot",
                "microservices",
                "restful api",
                "graphql",
                "redis",
                "elasticsearch",
            ]),
            skill_headers: to_strings(&["skills", "technologies", "tools", "programming"]),
            education_headers: to_strings(&["education", "qualification", "academic"]),
            experience_headers: to_strings(&[
                "experience",
                "work history",
                "employment",
                "career",
                "professional",
            ]),
            certification_headers: to_strings(&["certification", "certificate", "certified"]),
            project_headers: to_strings(&["project", "portfolio", "github", "work sample"]),
            certification_providers: to_strings(&[
                "aws",
                "azure",
                "gcp",
                "google cloud",
                "cisco",
                "microsoft",
                "oracle",
                "pmp",
                "scrum",
                "agile",
                "itil",
                "comptia",
                "cissp",
                "ceh",
                "cisa",
            ]),
            required_indicators: to_strings(&["required", "must have", "essential", "mandatory"]),
            preferred_indicators: to_strings(&[
                "preferred",
                "nice to have",
                "plus",
                "bonus",
                "desirable",
            ]),
            job_education_keywords: to_strings(&[
                "bachelor",
                "master",
                "phd",
                "degree",
                "b.tech",
                "m.tech",
                "computer science",
            ]),
            degree_levels: [
                ("phd", 5),
                ("doctorate", 5),
                ("master", 4),
                ("mtech", 4),
                ("mba", 4),
                ("msc", 4),
                ("mcom", 4),
                ("mca", 4),
                ("ma", 4),
                ("bachelor", 3),
                ("btech", 3),
                ("be", 3),
                ("bsc", 3),
                ("bcom", 3),
                ("ba", 3),
                ("bca", 3),
                ("diploma", 2),
                ("certificate", 1),
            ]
            .iter()
            .map(|(k, l)| (k.to_string(), *l))
            .collect(),
            synonyms: vec![
                SynonymGroup::new("javascript", &["js", "node.js", "nodejs", "ecmascript"]),
                SynonymGroup::new("python", &["py", "python3", "python2"]),
                SynonymGroup::new("machine learning", &["ml", "artificial intelligence", "ai"]),
                SynonymGroup::new(
                    "database",
                    &["db", "sql", "nosql", "mongodb", "postgresql", "mysql"],
                ),
                SynonymGroup::new(
                    "cloud",
                    &["aws", "azure", "gcp", "google cloud", "amazon web services"],
                ),
                SynonymGroup::new(
                    "frontend",
                    &["front end", "ui", "user interface", "react", "angular", "vue"],
                ),
                SynonymGroup::new("backend", &["back end", "server side", "api", "microservices"]),
            ],
            certification_suggestions: vec![
                suggestion(
                    "aws",
                    &["AWS Certified Solutions Architect", "AWS Certified Developer"],
                ),
                suggestion(
                    "azure",
                    &["Microsoft Azure Fundamentals", "Azure Developer Associate"],
                ),
                suggestion("gcp", &["Google Cloud Professional Cloud Architect"]),
                suggestion(
                    "python",
                    &["Python Institute PCAP", "Microsoft Python Certification"],
                ),
                suggestion("java", &["Oracle Java SE Certification", "Spring Professional"]),
                suggestion("javascript", &["Microsoft JavaScript Certification"]),
                suggestion("react", &["Meta React Developer Certificate"]),
                suggestion(
                    "machine learning",
                    &["AWS Machine Learning Specialty", "Google ML Engineer"],
                ),
                suggestion(
                    "data science",
                    &[
                        "IBM Data Science Professional",
                        "Microsoft Data Scientist Associate",
                    ],
                ),
                suggestion(
                    "sql",
                    &[
                        "Microsoft SQL Server Certification",
                        "Oracle Database Certification",
                    ],
                ),
            ],
            degree_pattern: r"(?i)\b(bachelor|master|phd|ph\.d|doctorate|b\.?tech|m\.?tech|b\.?e\b|m\.?e\b|bca\b|mca\b|mba\b|b\.?sc|m\.?sc|b\.?com\b|m\.?com\b|diploma|certificate)".to_string(),
            year_pattern: r"\b(?:19|20)\d{2}\b".to_string(),
            date_range_patterns: to_strings(&[
                r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(?:19|20)\d{2}\b",
                r"\b(?:19|20)\d{2}\s*[-–]\s*(?:19|20)\d{2}\b",
                r"(?i)\b(?:19|20)\d{2}\s*to\s*(?:19|20)\d{2}\b",
                r"(?i)\bpresent\b",
            ]),
            experience_range_pattern: r"(\d+)\s*(?:to|-)\s*(\d+)\s*years?".to_string(),
            experience_single_pattern: r"(\d+)\+?\s*years?".to_string(),
            default_job_title: "Software Engineer".to_string(),
            default_experience: "1-3 years".to_string(),
        }
    }
}

/// Compiles a catalog pattern, naming it in the error.
pub fn compile(name: &'static str, pattern: &str) -> Result<Regex, CatalogError> {
    Regex::new(pattern).map_err(|source| CatalogError::Pattern { name, source })
}

fn suggestion(skill: &str, certifications: &[&str]) -> CertificationSuggestion {
    CertificationSuggestion {
        skill: skill.to_string(),
        certifications: to_strings(certifications),
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
