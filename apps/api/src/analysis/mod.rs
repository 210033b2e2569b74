// Resume ↔ job description matching engine.
// Pipeline: tokenize → segment (resume) + extract keywords (both) → score → recommend.
// Everything under this module is synchronous, deterministic and I/O free; the
// handlers offload it to the blocking pool.

pub mod document;
pub mod export;
pub mod handlers;
pub mod keywords;
pub mod recommender;
pub mod samples;
pub mod scorer;
pub mod segmenter;
pub mod tokenizer;
pub mod vocabulary;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::document::{Document, DocumentKind, InputLimits, InvalidInputError};
use crate::analysis::keywords::{extract_job_keywords, extract_resume_keywords};
use crate::analysis::recommender::{recommend, Suggestion};
use crate::analysis::scorer::{score_match, ScoringConfig};
use crate::analysis::segmenter::default_segmenter;
use crate::analysis::vocabulary::SkillVocabulary;

/// Found/missing/total counts behind the keyword chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTally {
    pub found: usize,
    pub missing: usize,
    pub total: usize,
}

/// Structured result of one analysis. Identical inputs and vocabulary produce an
/// identical report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub overall_score: u32,
    pub section_scores: BTreeMap<String, u32>,
    pub found_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub keyword_matches: KeywordTally,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    pub limits: InputLimits,
    pub scoring: ScoringConfig,
}

/// Analyzes a resume against a job description with default limits and scoring.
pub fn analyze(
    resume_text: &str,
    job_description: &str,
    vocabulary: &SkillVocabulary,
) -> Result<AnalysisReport, InvalidInputError> {
    analyze_with(resume_text, job_description, vocabulary, &AnalysisOptions::default())
}

pub fn analyze_with(
    resume_text: &str,
    job_description: &str,
    vocabulary: &SkillVocabulary,
    options: &AnalysisOptions,
) -> Result<AnalysisReport, InvalidInputError> {
    let resume = Document::new(DocumentKind::Resume, resume_text, &options.limits)?;
    let job = Document::new(DocumentKind::JobDescription, job_description, &options.limits)?;

    let sections = default_segmenter().segment(&resume);
    let resume_keywords = extract_resume_keywords(&resume, vocabulary);
    let job_keywords = extract_job_keywords(&job, vocabulary, &options.scoring.keyword_weights);

    let result = score_match(
        &resume,
        &sections,
        &resume_keywords,
        &job_keywords,
        vocabulary,
        &options.scoring,
    );
    let suggestions = recommend(&result, &job_keywords, &options.scoring);

    info!(
        "Analysis complete: overall={} found={} missing={} suggestions={}",
        result.overall_score,
        result.found.len(),
        result.missing.len(),
        suggestions.len()
    );

    Ok(AnalysisReport {
        overall_score: result.overall_score,
        section_scores: result.section_scores.to_map(),
        keyword_matches: KeywordTally {
            found: result.found.len(),
            missing: result.missing.len(),
            total: job_keywords.len(),
        },
        found_keywords: result.found,
        missing_keywords: result.missing,
        suggestions,
    })
}

/// The analyzer seam. Handlers only see this trait, so the keyword engine can be
/// swapped without touching routes or callers.
///
/// Carried in `AppState` as `Arc<dyn ResumeAnalyzer>`.
pub trait ResumeAnalyzer: Send + Sync {
    fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisReport, InvalidInputError>;

    fn vocabulary_version(&self) -> &str;

    /// Short label reported to clients, e.g. "keyword".
    fn backend(&self) -> &'static str;
}

/// Default analyzer: vocabulary keyword matching with configurable scoring.
pub struct KeywordAnalyzer {
    vocabulary: Arc<SkillVocabulary>,
    options: AnalysisOptions,
}

impl KeywordAnalyzer {
    pub fn new(vocabulary: Arc<SkillVocabulary>, options: AnalysisOptions) -> Self {
        Self {
            vocabulary,
            options,
        }
    }
}

impl ResumeAnalyzer for KeywordAnalyzer {
    fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisReport, InvalidInputError> {
        analyze_with(resume_text, job_description, &self.vocabulary, &self.options)
    }

    fn vocabulary_version(&self) -> &str {
        self.vocabulary.version()
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}
