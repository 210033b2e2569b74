//! Keyword Extractor — maps documents onto weighted sets of vocabulary skills.
//!
//! Job descriptions: each match is weighted by the requirement level of the clause it
//! appears in (required > neutral > preferred), plus a small bonus for repetition.
//! Resumes: presence only, weight 1.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::document::Document;
use crate::analysis::tokenizer::{window_key, Token, MAX_PHRASE_TOKENS};
use crate::analysis::vocabulary::{SkillCategory, SkillVocabulary, VocabularyEntry};

/// How strongly a job description asks for something.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementLevel {
    Preferred,
    Neutral,
    Required,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordWeights {
    pub required: f64,
    pub neutral: f64,
    pub preferred: f64,
    /// Added per repeated mention beyond the first.
    pub frequency_bonus: f64,
    pub max_frequency_bonus: f64,
}

impl Default for KeywordWeights {
    fn default() -> Self {
        Self {
            required: 2.0,
            neutral: 1.0,
            preferred: 0.5,
            frequency_bonus: 0.25,
            max_frequency_bonus: 1.0,
        }
    }
}

impl KeywordWeights {
    pub fn tier(&self, level: RequirementLevel) -> f64 {
        match level {
            RequirementLevel::Required => self.required,
            RequirementLevel::Neutral => self.neutral,
            RequirementLevel::Preferred => self.preferred,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    pub name: String,
    pub category: SkillCategory,
    pub weight: f64,
    pub occurrences: u32,
    pub level: RequirementLevel,
}

/// Deduplicated skills keyed by canonical vocabulary name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeywordSet {
    entries: BTreeMap<String, Keyword>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one mention. The strongest requirement level seen wins.
    pub fn record(&mut self, entry: &VocabularyEntry, level: RequirementLevel) {
        self.entries
            .entry(entry.name.clone())
            .and_modify(|k| {
                k.occurrences += 1;
                k.level = k.level.max(level);
            })
            .or_insert_with(|| Keyword {
                name: entry.name.clone(),
                category: entry.category,
                weight: 0.0,
                occurrences: 1,
                level,
            });
    }

    /// Sets each weight from its strongest requirement level plus the repetition bonus.
    pub fn apply_weights(&mut self, weights: &KeywordWeights) {
        for keyword in self.entries.values_mut() {
            let repeats = keyword.occurrences.saturating_sub(1) as f64;
            let bonus = (repeats * weights.frequency_bonus).min(weights.max_frequency_bonus);
            keyword.weight = weights.tier(keyword.level) + bonus;
        }
    }

    fn flatten_weights(&mut self) {
        for keyword in self.entries.values_mut() {
            keyword.weight = 1.0;
        }
    }

    pub fn get(&self, name: &str) -> Option<&Keyword> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.entries.values()
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.values().map(|k| k.weight).sum()
    }

    /// Keywords ordered by weight (heaviest first), then name.
    pub fn ranked(&self) -> Vec<&Keyword> {
        let mut ranked: Vec<&Keyword> = self.entries.values().collect();
        ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.name.cmp(&b.name)));
        ranked
    }
}

/// A vocabulary hit at a byte offset of the source text.
#[derive(Debug, Clone)]
pub struct PhraseMatch<'v> {
    pub entry: &'v VocabularyEntry,
    pub start: usize,
}

/// Leftmost-longest matching of vocabulary phrases over a token sequence.
pub fn match_phrases<'v>(tokens: &[Token], vocabulary: &'v SkillVocabulary) -> Vec<PhraseMatch<'v>> {
    let mut matches = Vec::new();
    let mut i = 0;

    'outer: while i < tokens.len() {
        for len in (1..=MAX_PHRASE_TOKENS).rev() {
            let Some(key) = window_key(tokens, i, len) else {
                continue;
            };
            if let Some(entry) = vocabulary.lookup(&key) {
                matches.push(PhraseMatch {
                    entry,
                    start: tokens[i].start,
                });
                i += len;
                continue 'outer;
            }
        }
        i += 1;
    }

    matches
}

/// Presence-only extraction over an arbitrary token slice (a whole resume or one section).
pub fn extract_from_tokens(tokens: &[Token], vocabulary: &SkillVocabulary) -> KeywordSet {
    let mut set = KeywordSet::new();
    for hit in match_phrases(tokens, vocabulary) {
        set.record(hit.entry, RequirementLevel::Neutral);
    }
    set.flatten_weights();
    set
}

pub fn extract_resume_keywords(document: &Document, vocabulary: &SkillVocabulary) -> KeywordSet {
    let set = extract_from_tokens(document.tokens(), vocabulary);
    debug!("{} mentions {} vocabulary skill(s)", document.kind(), set.len());
    set
}

pub fn extract_job_keywords(
    document: &Document,
    vocabulary: &SkillVocabulary,
    weights: &KeywordWeights,
) -> KeywordSet {
    let clauses = requirement_clauses(document.text());
    let mut set = KeywordSet::new();

    for hit in match_phrases(document.tokens(), vocabulary) {
        let level = clauses
            .iter()
            .find(|(range, _)| range.contains(&hit.start))
            .map(|(_, level)| *level)
            .unwrap_or(RequirementLevel::Neutral);
        set.record(hit.entry, level);
    }
    set.apply_weights(weights);

    debug!(
        "Job description asks for {} vocabulary skill(s), total weight {:.2}",
        set.len(),
        set.total_weight()
    );
    set
}

fn required_triggers() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(required|requires?|requirements?|must|mandatory|essential|minimum|experience (with|in))\b",
        )
        .expect("required trigger pattern compiles")
    })
}

fn preferred_triggers() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(preferred|prefer|nice[ -]to[ -]have|bonus|a plus|desirable|desired|familiarity|optional)\b",
        )
        .expect("preferred trigger pattern compiles")
    })
}

/// Level signalled by the first trigger phrase in `clause`, if any.
fn detect_level(clause: &str) -> Option<RequirementLevel> {
    let required = required_triggers().find(clause).map(|m| m.start());
    let preferred = preferred_triggers().find(clause).map(|m| m.start());
    match (required, preferred) {
        (Some(r), Some(p)) if p < r => Some(RequirementLevel::Preferred),
        (Some(_), _) => Some(RequirementLevel::Required),
        (None, Some(_)) => Some(RequirementLevel::Preferred),
        (None, None) => None,
    }
}

/// Short line ending in a colon ("Required Skills:", "Nice to have:").
fn is_context_header(line: &str) -> bool {
    let trimmed = line.trim().trim_start_matches(['#', '*', '-', '•']).trim();
    trimmed.ends_with(':') && trimmed.split_whitespace().count() <= 5
}

/// Splits a job description into clauses and assigns each a requirement level.
///
/// Lines like "Required Skills:" set the context for the lines that follow, up to the
/// next such header, and that context overrides triggers inside those lines.
/// Outside a header context, a clause takes the level of its first trigger phrase.
fn requirement_clauses(text: &str) -> Vec<(Range<usize>, RequirementLevel)> {
    let mut clauses = Vec::new();
    let mut context: Option<RequirementLevel> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        if is_context_header(line) {
            context = detect_level(line);
            clauses.push((
                line_start..offset,
                context.unwrap_or(RequirementLevel::Neutral),
            ));
            continue;
        }

        for clause in split_clauses(line, line_start) {
            let level = context
                .or_else(|| detect_level(&text[clause.clone()]))
                .unwrap_or(RequirementLevel::Neutral);
            clauses.push((clause, level));
        }
    }

    clauses
}

/// Sentence-level split of one line: `!`, `?`, `;` and `.` followed by whitespace.
fn split_clauses(line: &str, base: usize) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut chars = line.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let ends = match c {
            '!' | '?' | ';' => true,
            '.' => chars.peek().map(|&(_, n)| n.is_whitespace()).unwrap_or(true),
            _ => false,
        };
        if ends {
            let end = i + c.len_utf8();
            ranges.push(base + start..base + end);
            start = end;
        }
    }
    if start < line.len() {
        ranges.push(base + start..base + line.len());
    }

    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::document::{DocumentKind, InputLimits};
    use crate::analysis::tokenizer::tokenize;

    fn doc(kind: DocumentKind, text: &str) -> Document {
        Document::new(kind, text, &InputLimits::default()).unwrap()
    }

    fn job(text: &str) -> KeywordSet {
        extract_job_keywords(
            &doc(DocumentKind::JobDescription, text),
            &SkillVocabulary::builtin(),
            &KeywordWeights::default(),
        )
    }

    #[test]
    fn test_required_outweighs_preferred() {
        let set = job("Required: Docker, Kubernetes. Preferred: Rust.");
        let kubernetes = set.get("Kubernetes").unwrap();
        let rust = set.get("Rust").unwrap();
        assert_eq!(kubernetes.level, RequirementLevel::Required);
        assert_eq!(rust.level, RequirementLevel::Preferred);
        assert!(kubernetes.weight > rust.weight);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_header_context_carries_to_following_lines() {
        let text = "Required Skills:\n• Experience with React\n\nPreferred Qualifications:\n• Experience with Docker\n";
        let set = job(text);
        assert_eq!(set.get("React").unwrap().level, RequirementLevel::Required);
        assert_eq!(set.get("Docker").unwrap().level, RequirementLevel::Preferred);
    }

    #[test]
    fn test_neutral_header_resets_context() {
        let text = "Nice to have:\n- Kafka\nResponsibilities:\n- Operate Linux servers\n";
        let set = job(text);
        assert_eq!(set.get("Kafka").unwrap().level, RequirementLevel::Preferred);
        assert_eq!(set.get("Linux").unwrap().level, RequirementLevel::Neutral);
    }

    #[test]
    fn test_first_trigger_in_clause_wins() {
        assert_eq!(
            detect_level("Nice to have: experience with Kafka"),
            Some(RequirementLevel::Preferred)
        );
        assert_eq!(
            detect_level("Must know SQL, Redis a plus"),
            Some(RequirementLevel::Required)
        );
        assert_eq!(detect_level("Build dashboards"), None);
    }

    #[test]
    fn test_repeated_mentions_add_capped_bonus() {
        let weights = KeywordWeights::default();
        let set = job("Python. Python. Python.");
        assert!((set.get("Python").unwrap().weight - (weights.neutral + 0.5)).abs() < 1e-9);

        let many = "Python. ".repeat(20);
        let set = job(&many);
        assert!(
            (set.get("Python").unwrap().weight - (weights.neutral + weights.max_frequency_bonus))
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn test_longest_phrase_wins() {
        let vocabulary = SkillVocabulary::builtin();
        let resume = doc(DocumentKind::Resume, "Built apps in React Native and React.");
        let set = extract_resume_keywords(&resume, &vocabulary);
        assert!(set.contains("React Native"));
        assert!(set.contains("React"));
        assert_eq!(set.get("React").unwrap().occurrences, 1);
    }

    #[test]
    fn test_every_vocabulary_phrase_matches_in_running_text() {
        let vocabulary = SkillVocabulary::builtin();
        for entry in vocabulary.entries() {
            for phrase in std::iter::once(&entry.name).chain(entry.aliases.iter()) {
                let tokens = tokenize(phrase);
                let hits = match_phrases(&tokens, &vocabulary);
                assert_eq!(hits.len(), 1, "'{phrase}' should match exactly once");
                assert_eq!(
                    hits[0].entry.name, entry.name,
                    "'{phrase}' resolved to the wrong entry"
                );

                let sentence = format!("Daily work with {phrase} in production");
                let set = extract_from_tokens(&tokenize(&sentence), &vocabulary);
                assert!(set.contains(&entry.name), "'{phrase}' not found inside a sentence");
            }
        }
    }

    #[test]
    fn test_slashed_and_versioned_names_are_extracted() {
        let vocabulary = SkillVocabulary::builtin();
        let resume = doc(DocumentKind::Resume, "Built CI/CD pipelines with ES6+ tooling");
        let set = extract_resume_keywords(&resume, &vocabulary);
        assert!(set.contains("CI/CD"));
        assert!(set.contains("JavaScript"));
    }

    #[test]
    fn test_resume_keywords_have_unit_weight() {
        let vocabulary = SkillVocabulary::builtin();
        let resume = doc(DocumentKind::Resume, "Docker docker DOCKER and k8s");
        let set = extract_resume_keywords(&resume, &vocabulary);
        assert_eq!(set.len(), 2);
        assert!(set.iter().all(|k| (k.weight - 1.0).abs() < f64::EPSILON));
        assert_eq!(set.get("Docker").unwrap().occurrences, 3);
        assert!(set.contains("Kubernetes"));
    }

    #[test]
    fn test_unknown_words_are_ignored() {
        let set = job("We value curiosity, grit and excellent coffee.");
        assert!(set.is_empty());
    }

    #[test]
    fn test_phrases_do_not_span_punctuation() {
        let vocabulary = SkillVocabulary::builtin();
        let resume = doc(DocumentKind::Resume, "Spring, Boot camp graduate");
        assert!(extract_resume_keywords(&resume, &vocabulary).is_empty());
    }

    #[test]
    fn test_ranked_orders_by_weight_then_name() {
        let set = job("Required: Kubernetes, Docker. Preferred: Rust.");
        let names: Vec<&str> = set.ranked().iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["Docker", "Kubernetes", "Rust"]);
    }

    #[test]
    fn test_split_clauses_keeps_dotted_names_together() {
        let line = "Node.js required. Rust preferred";
        let ranges = split_clauses(line, 10);
        assert_eq!(ranges, vec![10..27, 27..42]);
    }
}
