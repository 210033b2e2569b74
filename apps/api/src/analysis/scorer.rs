//! Scorer — compares resume sections and keywords against the job's keyword set.
//!
//! overall = round(Σ weightᵢ × scoreᵢ / Σ weightᵢ), clamped to [0, 100], over:
//! keyword coverage (50), skills section (20), experience (20), education (10).
//! All weights and heuristic points are configuration, not fixed constants.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::document::Document;
use crate::analysis::keywords::{extract_from_tokens, KeywordSet, KeywordWeights};
use crate::analysis::recommender::RecommenderConfig;
use crate::analysis::segmenter::{has_headers, Section, SectionKind};
use crate::analysis::tokenizer::Token;
use crate::analysis::vocabulary::{SkillCategory, SkillVocabulary};

#[derive(Debug, Error, PartialEq)]
pub enum ScoringConfigError {
    #[error("section weight '{0}' must be non-negative")]
    NegativeWeight(&'static str),

    #[error("section weights must sum to a positive value")]
    ZeroWeights,

    #[error("{0} must be within 0..=100")]
    OutOfRange(&'static str),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionWeights {
    pub keywords: f64,
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
}

impl Default for SectionWeights {
    fn default() -> Self {
        Self {
            keywords: 0.5,
            skills: 0.2,
            experience: 0.2,
            education: 0.1,
        }
    }
}

impl SectionWeights {
    pub fn sum(&self) -> f64 {
        self.keywords + self.skills + self.experience + self.education
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceHeuristic {
    /// Awarded for a non-empty experience section.
    pub base_points: u32,
    /// Per quantified achievement marker (percentages, amounts, durations, ...).
    pub points_per_marker: u32,
}

impl Default for ExperienceHeuristic {
    fn default() -> Self {
        Self {
            base_points: 40,
            points_per_marker: 12,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationHeuristic {
    pub base_points: u32,
    pub degree_points: u32,
    pub field_points: u32,
}

impl Default for EducationHeuristic {
    fn default() -> Self {
        Self {
            base_points: 30,
            degree_points: 40,
            field_points: 30,
        }
    }
}

/// Every tunable number used by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub section_weights: SectionWeights,
    pub keyword_weights: KeywordWeights,
    /// Used for experience/education when the resume has no recognizable headers.
    pub neutral_section_score: u32,
    pub experience: ExperienceHeuristic,
    pub education: EducationHeuristic,
    pub recommender: RecommenderConfig,
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        let w = &self.section_weights;
        for (name, value) in [
            ("keywords", w.keywords),
            ("skills", w.skills),
            ("experience", w.experience),
            ("education", w.education),
        ] {
            if value < 0.0 || value.is_nan() {
                return Err(ScoringConfigError::NegativeWeight(name));
            }
        }
        if w.sum() <= 0.0 {
            return Err(ScoringConfigError::ZeroWeights);
        }
        if self.neutral_section_score > 100 {
            return Err(ScoringConfigError::OutOfRange("neutral_section_score"));
        }
        if self.recommender.experience_target > 100 {
            return Err(ScoringConfigError::OutOfRange("recommender.experience_target"));
        }
        Ok(())
    }

    /// Reads a JSON scoring config; omitted fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scoring config {}", path.display()))?;
        let config: ScoringConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse scoring config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            section_weights: SectionWeights::default(),
            keyword_weights: KeywordWeights::default(),
            neutral_section_score: 50,
            experience: ExperienceHeuristic::default(),
            education: EducationHeuristic::default(),
            recommender: RecommenderConfig::default(),
        }
    }
}

/// Per-section scores, each in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionScores {
    pub keywords: u32,
    pub skills: u32,
    pub experience: u32,
    pub education: u32,
}

impl SectionScores {
    pub fn to_map(&self) -> BTreeMap<String, u32> {
        BTreeMap::from([
            ("keywords".to_string(), self.keywords),
            ("skills".to_string(), self.skills),
            ("experience".to_string(), self.experience),
            ("education".to_string(), self.education),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Job keywords present in the resume, heaviest first.
    pub found: Vec<String>,
    /// Job keywords absent from the resume, heaviest first.
    pub missing: Vec<String>,
    /// |found| / |job keywords|, or 1.0 when the job names no known skills.
    pub coverage: f64,
    pub section_scores: SectionScores,
    pub overall_score: u32,
}

pub fn score_match(
    resume: &Document,
    sections: &[Section],
    resume_keywords: &KeywordSet,
    job_keywords: &KeywordSet,
    vocabulary: &SkillVocabulary,
    config: &ScoringConfig,
) -> MatchResult {
    let (found, missing): (Vec<_>, Vec<_>) = job_keywords
        .ranked()
        .into_iter()
        .partition(|k| resume_keywords.contains(&k.name));
    let found: Vec<String> = found.into_iter().map(|k| k.name.clone()).collect();
    let missing: Vec<String> = missing.into_iter().map(|k| k.name.clone()).collect();

    let coverage = if job_keywords.is_empty() {
        1.0
    } else {
        found.len() as f64 / job_keywords.len() as f64
    };

    let segmented = has_headers(sections);
    let section_scores = SectionScores {
        keywords: to_points(coverage),
        skills: skills_score(sections, resume_keywords, job_keywords, vocabulary),
        experience: experience_score(resume, sections, segmented, config),
        education: education_score(resume, sections, segmented, vocabulary, config),
    };

    let overall_score = overall(&section_scores, &config.section_weights);

    MatchResult {
        found,
        missing,
        coverage,
        section_scores,
        overall_score,
    }
}

fn overall(scores: &SectionScores, weights: &SectionWeights) -> u32 {
    let total = weights.sum();
    if total <= 0.0 {
        return 0;
    }
    let weighted = weights.keywords * scores.keywords as f64
        + weights.skills * scores.skills as f64
        + weights.experience * scores.experience as f64
        + weights.education * scores.education as f64;
    (weighted / total).round().clamp(0.0, 100.0) as u32
}

fn to_points(ratio: f64) -> u32 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u32
}

fn tokens_of(sections: &[Section], kind: SectionKind) -> Option<Vec<Token>> {
    let matching: Vec<&Section> = sections.iter().filter(|s| s.kind == kind).collect();
    if matching.is_empty() {
        return None;
    }
    Some(matching.iter().flat_map(|s| s.tokens.iter().cloned()).collect())
}

fn text_of(resume: &Document, sections: &[Section], kind: SectionKind) -> Option<String> {
    let matching: Vec<&str> = sections
        .iter()
        .filter(|s| s.kind == kind)
        .map(|s| s.body_text(resume))
        .collect();
    if matching.is_empty() {
        return None;
    }
    Some(matching.join("\n"))
}

/// Share of the job's technical skills found in the resume's skills section,
/// or in the whole resume when there is no skills section.
fn skills_score(
    sections: &[Section],
    resume_keywords: &KeywordSet,
    job_keywords: &KeywordSet,
    vocabulary: &SkillVocabulary,
) -> u32 {
    let required: Vec<&str> = job_keywords
        .iter()
        .filter(|k| k.category.is_technical())
        .map(|k| k.name.as_str())
        .collect();
    if required.is_empty() {
        return 100;
    }

    let section_keywords = tokens_of(sections, SectionKind::Skills)
        .map(|tokens| extract_from_tokens(&tokens, vocabulary));
    let present_in = section_keywords.as_ref().unwrap_or(resume_keywords);

    let present = required.iter().filter(|name| present_in.contains(name)).count();
    to_points(present as f64 / required.len() as f64)
}

fn experience_score(
    resume: &Document,
    sections: &[Section],
    segmented: bool,
    config: &ScoringConfig,
) -> u32 {
    let heuristic = |text: &str| {
        if text.trim().is_empty() {
            return 0;
        }
        let h = &config.experience;
        let points = h.base_points as usize + h.points_per_marker as usize * count_achievement_markers(text);
        points.min(100) as u32
    };

    match text_of(resume, sections, SectionKind::Experience) {
        Some(text) => heuristic(&text),
        None if segmented => heuristic(resume.text()),
        None => heuristic(resume.text()).max(config.neutral_section_score.min(100)),
    }
}

fn education_score(
    resume: &Document,
    sections: &[Section],
    segmented: bool,
    vocabulary: &SkillVocabulary,
    config: &ScoringConfig,
) -> u32 {
    let heuristic = |tokens: &[Token]| {
        if tokens.is_empty() {
            return 0;
        }
        let keywords = extract_from_tokens(tokens, vocabulary);
        let has = |category: SkillCategory| keywords.iter().any(|k| k.category == category);

        let h = &config.education;
        let mut points = h.base_points;
        if has(SkillCategory::Degree) {
            points += h.degree_points;
        }
        if has(SkillCategory::Field) {
            points += h.field_points;
        }
        points.min(100)
    };

    match tokens_of(sections, SectionKind::Education) {
        Some(tokens) => heuristic(&tokens),
        None if segmented => heuristic(resume.tokens()),
        None => heuristic(resume.tokens()).max(config.neutral_section_score.min(100)),
    }
}

fn achievement_markers() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)",
            // percentages
            r"\d+(?:\.\d+)?\s?%",
            // currency amounts
            r"|[$€£]\s?\d[\d,.]*\s?[kmb]?\b",
            // multipliers
            r"|\b\d+(?:\.\d+)?x\b",
            // year ranges
            r"|\b(?:19|20)\d{2}\s*(?:-|–|—|to)\s*(?:(?:19|20)\d{2}|present|current|now)\b",
            // durations
            r"|\b\d+\+?\s+(?:years?|yrs?|months?|weeks?)\b",
            // counted quantities
            r"|\b\d[\d,]*\+?\s+(?:users|customers|clients|engineers|developers|people|requests|services|projects|teams|members|servers|transactions|applications)\b",
        ))
        .expect("achievement marker pattern compiles")
    })
}

/// Counts quantified achievement markers in free text.
pub fn count_achievement_markers(text: &str) -> usize {
    achievement_markers().find_iter(text).count()
}
