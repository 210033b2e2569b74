//! Skill vocabulary — the closed set of phrases the engine recognizes.
//!
//! Loaded once at startup (built-in table or a JSON file) and shared read-only
//! behind an `Arc`. Unknown phrases in resumes or job descriptions are ignored,
//! so detection quality is bounded by how complete this table is.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::analysis::recommender::SuggestionCategory;
use crate::analysis::tokenizer::{normalize_phrase, MAX_PHRASE_TOKENS};

pub const BUILTIN_VERSION: &str = "builtin-2024.1";

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("failed to read vocabulary file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse vocabulary: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("vocabulary contains no entries")]
    Empty,

    #[error("invalid vocabulary entry '{name}': {reason}")]
    InvalidEntry { name: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Language,
    Framework,
    Database,
    Cloud,
    Infrastructure,
    Tooling,
    Practice,
    SoftSkill,
    Degree,
    Field,
}

impl SkillCategory {
    /// Hard technical skills. These drive the skills section score.
    pub fn is_technical(self) -> bool {
        matches!(
            self,
            SkillCategory::Language
                | SkillCategory::Framework
                | SkillCategory::Database
                | SkillCategory::Cloud
                | SkillCategory::Infrastructure
                | SkillCategory::Tooling
        )
    }

    pub fn is_education(self) -> bool {
        matches!(self, SkillCategory::Degree | SkillCategory::Field)
    }

    pub fn suggestion_category(self) -> SuggestionCategory {
        if self.is_technical() {
            SuggestionCategory::Skills
        } else if self.is_education() {
            SuggestionCategory::Education
        } else {
            SuggestionCategory::Keywords
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkillCategory::Language => "programming languages",
            SkillCategory::Framework => "frameworks and libraries",
            SkillCategory::Database => "databases",
            SkillCategory::Cloud => "cloud platforms",
            SkillCategory::Infrastructure => "infrastructure",
            SkillCategory::Tooling => "tooling",
            SkillCategory::Practice => "engineering practices",
            SkillCategory::SoftSkill => "soft skills",
            SkillCategory::Degree => "degrees",
            SkillCategory::Field => "fields of study",
        };
        f.write_str(label)
    }
}

/// One recognized skill. `name` is the canonical display form reported back to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub name: String,
    pub category: SkillCategory,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VocabularyFile {
    version: String,
    entries: Vec<VocabularyEntry>,
}

#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    version: String,
    entries: Vec<VocabularyEntry>,
    /// normalized phrase key → index into `entries`
    index: HashMap<String, usize>,
}

impl SkillVocabulary {
    /// Builds the lookup index, validating phrase length and alias ownership.
    pub fn from_entries(
        version: impl Into<String>,
        entries: Vec<VocabularyEntry>,
    ) -> Result<Self, VocabularyError> {
        if entries.is_empty() {
            return Err(VocabularyError::Empty);
        }

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut names: HashMap<String, usize> = HashMap::new();

        for (position, entry) in entries.iter().enumerate() {
            let invalid = |reason: String| VocabularyError::InvalidEntry {
                name: entry.name.clone(),
                reason,
            };

            if names.insert(entry.name.to_lowercase(), position).is_some() {
                return Err(invalid("duplicate name".to_string()));
            }

            for phrase in std::iter::once(&entry.name).chain(entry.aliases.iter()) {
                let (key, len) = normalize_phrase(phrase)
                    .ok_or_else(|| invalid(format!("phrase '{phrase}' has no words")))?;
                if len > MAX_PHRASE_TOKENS {
                    return Err(invalid(format!(
                        "phrase '{phrase}' has {len} words, limit is {MAX_PHRASE_TOKENS}"
                    )));
                }
                if let Some(&owner) = index.get(&key) {
                    if owner != position {
                        return Err(invalid(format!(
                            "phrase '{phrase}' already belongs to '{}'",
                            entries[owner].name
                        )));
                    }
                }
                index.insert(key, position);
            }
        }

        Ok(Self {
            version: version.into(),
            entries,
            index,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, VocabularyError> {
        let file: VocabularyFile = serde_json::from_str(json)?;
        Self::from_entries(file.version, file.entries)
    }

    /// Reads a JSON vocabulary of the form `{"version": "...", "entries": [...]}`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VocabularyError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| VocabularyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let vocabulary = Self::from_json_str(&json)?;
        info!(
            "Loaded vocabulary {} ({} entries) from {}",
            vocabulary.version,
            vocabulary.len(),
            path.display()
        );
        Ok(vocabulary)
    }

    pub fn builtin() -> Self {
        let entries = BUILTIN_ENTRIES
            .iter()
            .map(|(name, category, aliases)| VocabularyEntry {
                name: name.to_string(),
                category: *category,
                aliases: aliases.iter().map(|a| a.to_string()).collect(),
            })
            .collect();

        // The built-in table is covered by tests; an inconsistency there is a programming error.
        Self::from_entries(BUILTIN_VERSION, entries).expect("built-in vocabulary is consistent")
    }

    /// Resolves a normalized phrase key (see `tokenizer::normalize_phrase`).
    pub fn lookup(&self, key: &str) -> Option<&VocabularyEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn entry(&self, name: &str) -> Option<&VocabularyEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

use SkillCategory::*;

const BUILTIN_ENTRIES: &[(&str, SkillCategory, &[&str])] = &[
    // Languages
    ("Rust", Language, &[]),
    ("Python", Language, &[]),
    ("Java", Language, &[]),
    ("JavaScript", Language, &["js", "ecmascript", "es6"]),
    ("TypeScript", Language, &[]),
    ("Golang", Language, &[]),
    ("C++", Language, &["cpp"]),
    ("C#", Language, &["csharp"]),
    ("Ruby", Language, &[]),
    ("PHP", Language, &[]),
    ("Kotlin", Language, &[]),
    ("Swift", Language, &[]),
    ("Scala", Language, &[]),
    ("SQL", Language, &[]),
    ("HTML5", Language, &["html"]),
    ("CSS3", Language, &["css"]),
    ("Bash", Language, &["shell scripting"]),
    // Frameworks and libraries
    ("React", Framework, &["react.js", "reactjs"]),
    ("React Native", Framework, &[]),
    ("Angular", Framework, &["angularjs"]),
    ("Vue.js", Framework, &["vue", "vuejs"]),
    ("Node.js", Framework, &["nodejs"]),
    ("Next.js", Framework, &["nextjs"]),
    ("Django", Framework, &[]),
    ("Flask", Framework, &[]),
    ("Spring Boot", Framework, &[]),
    ("Ruby on Rails", Framework, &["rails"]),
    ("Redux", Framework, &[]),
    ("Zustand", Framework, &[]),
    ("Webpack", Framework, &[]),
    ("Vite", Framework, &[]),
    ("Jest", Framework, &[]),
    ("Cypress", Framework, &[]),
    ("Tailwind CSS", Framework, &["tailwind"]),
    ("GraphQL", Framework, &[]),
    ("REST APIs", Framework, &["rest api", "restful", "restful apis"]),
    ("PyTorch", Framework, &[]),
    ("TensorFlow", Framework, &[]),
    ("Tokio", Framework, &[]),
    // Databases
    ("PostgreSQL", Database, &["postgres"]),
    ("MySQL", Database, &[]),
    ("MongoDB", Database, &["mongo"]),
    ("Redis", Database, &[]),
    ("SQLite", Database, &[]),
    ("Elasticsearch", Database, &[]),
    ("DynamoDB", Database, &[]),
    ("Cassandra", Database, &[]),
    // Cloud
    ("AWS", Cloud, &["amazon web services"]),
    ("Azure", Cloud, &["microsoft azure"]),
    ("GCP", Cloud, &["google cloud", "google cloud platform"]),
    // Infrastructure
    ("Docker", Infrastructure, &[]),
    ("Kubernetes", Infrastructure, &["k8s"]),
    ("Terraform", Infrastructure, &[]),
    ("Ansible", Infrastructure, &[]),
    ("Helm", Infrastructure, &[]),
    ("Linux", Infrastructure, &[]),
    ("Nginx", Infrastructure, &[]),
    ("Kafka", Infrastructure, &["apache kafka"]),
    ("RabbitMQ", Infrastructure, &[]),
    ("Microservices", Infrastructure, &["microservice architecture"]),
    ("Containerization", Infrastructure, &["containers"]),
    // Tooling
    ("Git", Tooling, &["github", "gitlab"]),
    ("GitHub Actions", Tooling, &[]),
    ("Jenkins", Tooling, &[]),
    ("Jira", Tooling, &[]),
    ("Figma", Tooling, &[]),
    // Practices
    (
        "CI/CD",
        Practice,
        &[
            "ci cd pipelines",
            "continuous integration",
            "continuous delivery",
            "continuous deployment",
        ],
    ),
    ("Automated Testing", Practice, &["test automation", "automated tests"]),
    ("Unit Testing", Practice, &["unit tests"]),
    ("Code Review", Practice, &["code reviews"]),
    ("Agile", Practice, &["scrum", "kanban"]),
    ("Performance Optimization", Practice, &["performance tuning"]),
    ("Responsive Design", Practice, &[]),
    ("Accessibility", Practice, &["wcag", "a11y"]),
    ("Cross-Browser Compatibility", Practice, &[]),
    ("State Management", Practice, &[]),
    ("Version Control", Practice, &[]),
    ("System Design", Practice, &[]),
    ("Distributed Systems", Practice, &[]),
    ("Machine Learning", Practice, &["ml"]),
    ("Data Analysis", Practice, &["data analytics"]),
    ("Security", Practice, &["application security"]),
    // Soft skills
    ("Mentoring", SoftSkill, &["mentor", "mentored", "mentorship"]),
    ("Leadership", SoftSkill, &[]),
    ("Communication", SoftSkill, &["communication skills"]),
    ("Collaboration", SoftSkill, &["collaborate", "collaborated"]),
    ("Problem Solving", SoftSkill, &["problem-solving"]),
    ("Project Management", SoftSkill, &[]),
    // Degrees
    ("Bachelor's Degree", Degree, &["bachelor", "bachelors", "b.s.", "bsc", "b.sc."]),
    ("Master's Degree", Degree, &["master's", "masters", "m.s.", "msc", "m.sc."]),
    ("PhD", Degree, &["ph.d.", "doctorate"]),
    ("MBA", Degree, &[]),
    // Fields of study
    ("Computer Science", Field, &[]),
    ("Software Engineering", Field, &[]),
    ("Computer Engineering", Field, &[]),
    ("Electrical Engineering", Field, &[]),
    ("Information Technology", Field, &[]),
    ("Mathematics", Field, &["math"]),
    ("Statistics", Field, &[]),
    ("Data Science", Field, &[]),
    ("Physics", Field, &[]),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn key(phrase: &str) -> String {
        normalize_phrase(phrase).unwrap().0
    }

    #[test]
    fn test_builtin_vocabulary_builds() {
        let vocabulary = SkillVocabulary::builtin();
        assert_eq!(vocabulary.version(), BUILTIN_VERSION);
        assert_eq!(vocabulary.len(), BUILTIN_ENTRIES.len());
    }

    #[test]
    fn test_aliases_resolve_to_canonical_entry() {
        let vocabulary = SkillVocabulary::builtin();
        assert_eq!(vocabulary.lookup(&key("k8s")).unwrap().name, "Kubernetes");
        assert_eq!(vocabulary.lookup(&key("Postgres")).unwrap().name, "PostgreSQL");
        assert_eq!(vocabulary.lookup(&key("node.js")).unwrap().name, "Node.js");
        assert_eq!(
            vocabulary.lookup(&key("bachelor's degree")).unwrap().name,
            "Bachelor's Degree"
        );
    }

    #[test]
    fn test_cpp_and_csharp_are_distinct() {
        let vocabulary = SkillVocabulary::builtin();
        assert_eq!(vocabulary.lookup(&key("C++")).unwrap().name, "C++");
        assert_eq!(vocabulary.lookup(&key("C#")).unwrap().name, "C#");
        assert!(vocabulary.lookup("c").is_none());
    }

    #[test]
    fn test_category_mapping() {
        assert!(SkillCategory::Infrastructure.is_technical());
        assert!(!SkillCategory::Practice.is_technical());
        assert_eq!(
            SkillCategory::Degree.suggestion_category(),
            SuggestionCategory::Education
        );
        assert_eq!(
            SkillCategory::SoftSkill.suggestion_category(),
            SuggestionCategory::Keywords
        );
        assert_eq!(
            SkillCategory::Cloud.suggestion_category(),
            SuggestionCategory::Skills
        );
    }

    #[test]
    fn test_empty_vocabulary_is_rejected() {
        let err = SkillVocabulary::from_entries("v1", vec![]).unwrap_err();
        assert!(matches!(err, VocabularyError::Empty));
    }

    #[test]
    fn test_phrase_longer_than_three_words_is_rejected() {
        let entries = vec![VocabularyEntry {
            name: "Very Long Skill Name".to_string(),
            category: SkillCategory::Practice,
            aliases: vec![],
        }];
        let err = SkillVocabulary::from_entries("v1", entries).unwrap_err();
        assert!(matches!(err, VocabularyError::InvalidEntry { .. }));
    }

    #[test]
    fn test_alias_claimed_twice_is_rejected() {
        let entries = vec![
            VocabularyEntry {
                name: "Kubernetes".to_string(),
                category: SkillCategory::Infrastructure,
                aliases: vec!["k8s".to_string()],
            },
            VocabularyEntry {
                name: "OpenShift".to_string(),
                category: SkillCategory::Infrastructure,
                aliases: vec!["K8s".to_string()],
            },
        ];
        let err = SkillVocabulary::from_entries("v1", entries).unwrap_err();
        assert!(err.to_string().contains("already belongs to 'Kubernetes'"));
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"version": "test-1", "entries": [
                {{"name": "Docker", "category": "infrastructure"}},
                {{"name": "Kubernetes", "category": "infrastructure", "aliases": ["k8s"]}}
            ]}}"#
        )
        .unwrap();

        let vocabulary = SkillVocabulary::load(file.path()).unwrap();
        assert_eq!(vocabulary.version(), "test-1");
        assert_eq!(vocabulary.len(), 2);
        assert!(vocabulary.lookup("k8s").is_some());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = SkillVocabulary::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, VocabularyError::Io { .. }));
    }

    #[test]
    fn test_load_malformed_json_is_parse_error() {
        let err = SkillVocabulary::from_json_str("{\"version\": 1}").unwrap_err();
        assert!(matches!(err, VocabularyError::Parse(_)));
    }
}
