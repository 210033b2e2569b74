//! Improvement Recommender — turns scoring gaps into ranked, actionable suggestions.
//!
//! Missing keywords are grouped by vocabulary category; each group whose summed weight
//! clears the threshold becomes one suggestion naming up to three terms. A weak
//! experience section adds a "quantify your achievements" suggestion. Estimated
//! impacts are capped so that together they never exceed `100 - overall_score`.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::keywords::{Keyword, KeywordSet};
use crate::analysis::scorer::{MatchResult, ScoringConfig};
use crate::analysis::vocabulary::SkillCategory;

/// Declaration order is the tie-break order between equal-impact suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    Skills,
    Keywords,
    Experience,
    Education,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub category: SuggestionCategory,
    pub priority: Priority,
    pub rationale: String,
    /// Estimated overall-score points gained by acting on this suggestion.
    pub impact: u32,
    /// Representative missing terms, heaviest first. Empty for non-keyword suggestions.
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub points_per_weight_unit: f64,
    /// A category's missing weight must exceed this to produce a suggestion.
    pub gap_threshold: f64,
    /// Experience scores below this produce a quantification suggestion.
    pub experience_target: u32,
    pub max_terms: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            points_per_weight_unit: 3.0,
            gap_threshold: 0.25,
            experience_target: 70,
            max_terms: 3,
        }
    }
}

/// A scoring gap before priorities and the impact cap are applied.
#[derive(Debug, Clone)]
struct Gap {
    category: SuggestionCategory,
    skill_category: Option<SkillCategory>,
    raw_impact: f64,
    terms: Vec<String>,
    more: usize,
}

pub fn recommend(
    result: &MatchResult,
    job_keywords: &KeywordSet,
    config: &ScoringConfig,
) -> Vec<Suggestion> {
    let rc = &config.recommender;
    let mut gaps = keyword_gaps(result, job_keywords, rc);

    if let Some(gap) = experience_gap(result, config) {
        gaps.push(gap);
    }

    // Order by the integer impact that is reported, so equal impacts fall back to
    // the category order.
    let mut ranked: Vec<(u32, Gap)> = gaps
        .into_iter()
        .map(|gap| (gap.raw_impact.round().max(0.0) as u32, gap))
        .collect();
    ranked.sort_by(|(a_points, a), (b_points, b)| {
        b_points
            .cmp(a_points)
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.skill_category.cmp(&b.skill_category))
    });

    let total = ranked.len();
    let mut budget = 100u32.saturating_sub(result.overall_score);
    let mut suggestions = Vec::with_capacity(total);

    for (rank, (points, gap)) in ranked.into_iter().enumerate() {
        let impact = points.min(budget);
        if impact == 0 {
            continue;
        }
        budget -= impact;

        suggestions.push(Suggestion {
            category: gap.category,
            priority: priority_for_rank(rank, total),
            rationale: rationale(&gap),
            impact,
            terms: gap.terms,
        });
    }

    suggestions
}

fn keyword_gaps(result: &MatchResult, job_keywords: &KeywordSet, rc: &RecommenderConfig) -> Vec<Gap> {
    let mut by_category: BTreeMap<SkillCategory, Vec<&Keyword>> = BTreeMap::new();
    for name in &result.missing {
        if let Some(keyword) = job_keywords.get(name) {
            by_category.entry(keyword.category).or_default().push(keyword);
        }
    }

    by_category
        .into_iter()
        .filter_map(|(skill_category, mut keywords)| {
            let weight: f64 = keywords.iter().map(|k| k.weight).sum();
            if weight <= rc.gap_threshold {
                return None;
            }
            keywords.sort_by(|a, b| {
                b.weight
                    .total_cmp(&a.weight)
                    .then_with(|| a.name.cmp(&b.name))
            });
            let terms: Vec<String> = keywords
                .iter()
                .take(rc.max_terms)
                .map(|k| k.name.clone())
                .collect();
            Some(Gap {
                category: skill_category.suggestion_category(),
                skill_category: Some(skill_category),
                raw_impact: weight * rc.points_per_weight_unit,
                more: keywords.len() - terms.len(),
                terms,
            })
        })
        .collect()
}

/// Points recoverable by lifting the experience score to the target.
fn experience_gap(result: &MatchResult, config: &ScoringConfig) -> Option<Gap> {
    let target = config.recommender.experience_target.min(100);
    let current = result.section_scores.experience;
    let weights = &config.section_weights;
    if current >= target || weights.sum() <= 0.0 {
        return None;
    }

    let share = weights.experience / weights.sum();
    Some(Gap {
        category: SuggestionCategory::Experience,
        skill_category: None,
        raw_impact: (target - current) as f64 * share,
        terms: vec![],
        more: 0,
    })
}

/// Tercile of the gap's rank among all gaps (0 is the largest).
fn priority_for_rank(rank: usize, total: usize) -> Priority {
    match (rank * 3).cmp(&total) {
        Ordering::Less => Priority::High,
        _ if rank * 3 < total * 2 => Priority::Medium,
        _ => Priority::Low,
    }
}

fn rationale(gap: &Gap) -> String {
    let mut listed = join_terms(&gap.terms, gap.category == SuggestionCategory::Keywords);
    if gap.more > 0 {
        listed.push_str(&format!(" (+{} more)", gap.more));
    }
    let area = gap
        .skill_category
        .map(|c| c.to_string())
        .unwrap_or_default();

    match gap.category {
        SuggestionCategory::Skills => format!(
            "Add experience with {listed} to match the job's {area} requirements"
        ),
        SuggestionCategory::Keywords => format!("Include {listed} terminology"),
        SuggestionCategory::Education => format!(
            "Mention {listed} in your education section if it applies to you"
        ),
        SuggestionCategory::Experience => {
            "Quantify your achievements with specific metrics and percentages".to_string()
        }
    }
}

/// "A", "A and B", "A, B and C"; optionally quoted.
fn join_terms(terms: &[String], quoted: bool) -> String {
    let terms: Vec<String> = terms
        .iter()
        .map(|t| if quoted { format!("'{t}'") } else { t.clone() })
        .collect();
    match terms.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}
