//! Section Segmenter — splits a resume into labeled sections by header lines.
//!
//! Header recognition is a rule table (pattern → section kind), checked in order.
//! A line is only considered if it looks like a header: short, and either upper
//! case or title case. Text before the first header becomes an `Other` section;
//! a resume with no recognizable headers is a single `Other` section.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::document::Document;
use crate::analysis::tokenizer::Token;

const MAX_HEADER_CHARS: usize = 40;
const MAX_HEADER_WORDS: usize = 5;

/// Words that stay lowercase in a title-case header ("Skills and Tools").
const HEADER_CONNECTORS: &[&str] = &["and", "&", "of", "the", "for", "in"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Skills,
    Experience,
    Education,
    Other,
}

#[derive(Debug, Clone)]
pub struct HeaderRule {
    pattern: Regex,
    kind: SectionKind,
}

impl HeaderRule {
    /// `pattern` is matched against the lowercased, whitespace-collapsed header text.
    pub fn new(pattern: &str, kind: SectionKind) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            kind,
        })
    }
}

/// A labeled span of a resume. `span` covers the header line (if any) and the body;
/// `body` excludes the header line.
#[derive(Debug, Clone)]
pub struct Section {
    pub kind: SectionKind,
    pub header: Option<String>,
    pub span: Range<usize>,
    pub body: Range<usize>,
    pub tokens: Vec<Token>,
}

impl Section {
    pub fn body_text<'a>(&self, document: &'a Document) -> &'a str {
        &document.text()[self.body.clone()]
    }
}

const DEFAULT_RULES: &[(&str, SectionKind)] = &[
    (
        r"^(professional |career |executive )?(summary|profile|objective)$|^about( me)?$",
        SectionKind::Summary,
    ),
    (
        r"^((technical|core|key|professional) )?(skills|competencies|technologies|expertise)$|^(skills|tools) (and|&) (tools|technologies)$|^tech stack$",
        SectionKind::Skills,
    ),
    (
        r"^((professional|work|relevant) )?experience$|^(work|employment|career) history$|^employment$",
        SectionKind::Experience,
    ),
    (
        r"^(education|academic background|academics)$|^education (and|&) (training|certifications)$",
        SectionKind::Education,
    ),
    (
        r"^((personal|selected|side) )?projects$|^certifications?$|^awards?( (and|&) honors)?$|^publications$|^volunteer( experience| work)?$|^interests$|^languages$|^references$",
        SectionKind::Other,
    ),
];

pub struct SectionSegmenter {
    rules: Vec<HeaderRule>,
}

impl SectionSegmenter {
    pub fn with_rules(rules: Vec<HeaderRule>) -> Self {
        Self { rules }
    }

    pub fn default_rules() -> Result<Vec<HeaderRule>, regex::Error> {
        DEFAULT_RULES
            .iter()
            .map(|(pattern, kind)| HeaderRule::new(pattern, *kind))
            .collect()
    }

    /// Returns the section kind if `line` is a recognized header.
    pub fn classify_header(&self, line: &str) -> Option<SectionKind> {
        let cleaned = clean_header(line)?;
        if !looks_like_header(&cleaned) {
            return None;
        }
        let normalized = cleaned
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(&normalized))
            .map(|rule| rule.kind)
    }

    /// Single pass over the lines of the document.
    pub fn segment(&self, document: &Document) -> Vec<Section> {
        let text = document.text();
        let mut sections = Vec::new();

        // (kind, header, span start, body start)
        let mut open: (SectionKind, Option<String>, usize, usize) = (SectionKind::Other, None, 0, 0);
        let mut offset = 0;

        for line in text.split_inclusive('\n') {
            let line_start = offset;
            offset += line.len();

            let Some(kind) = self.classify_header(line) else {
                continue;
            };

            let (open_kind, open_header, span_start, body_start) = open;
            let is_blank_preamble =
                open_header.is_none() && text[span_start..line_start].trim().is_empty();
            if !is_blank_preamble {
                sections.push(build_section(
                    document,
                    open_kind,
                    open_header,
                    span_start..line_start,
                    body_start..line_start,
                ));
            }

            open = (kind, Some(line.trim().to_string()), line_start, offset);
        }

        let (kind, header, span_start, body_start) = open;
        sections.push(build_section(
            document,
            kind,
            header,
            span_start..text.len(),
            body_start..text.len(),
        ));

        debug!(
            "Segmented resume into {} section(s): {:?}",
            sections.len(),
            sections.iter().map(|s| s.kind).collect::<Vec<_>>()
        );
        sections
    }
}

/// Shared segmenter built from the default rule table.
pub fn default_segmenter() -> &'static SectionSegmenter {
    static SEGMENTER: OnceLock<SectionSegmenter> = OnceLock::new();
    SEGMENTER.get_or_init(|| {
        let rules = SectionSegmenter::default_rules().expect("default header patterns compile");
        SectionSegmenter::with_rules(rules)
    })
}

/// True when at least one section was opened by a recognized header.
pub fn has_headers(sections: &[Section]) -> bool {
    sections.iter().any(|s| s.header.is_some())
}

fn build_section(
    document: &Document,
    kind: SectionKind,
    header: Option<String>,
    span: Range<usize>,
    body: Range<usize>,
) -> Section {
    let tokens = document
        .tokens()
        .iter()
        .filter(|t| t.start >= body.start && t.end <= body.end)
        .cloned()
        .collect();
    Section {
        kind,
        header,
        span,
        body,
        tokens,
    }
}

/// Strips markdown/bullet decoration and a trailing colon.
fn clean_header(line: &str) -> Option<String> {
    let decoration: &[char] = &['#', '*', '-', '=', '_', '•', '|', ':'];
    let cleaned = line.trim().trim_matches(decoration).trim();
    if cleaned.is_empty() || cleaned.chars().count() > MAX_HEADER_CHARS {
        return None;
    }
    Some(cleaned.to_string())
}

fn looks_like_header(cleaned: &str) -> bool {
    let words: Vec<&str> = cleaned.split_whitespace().collect();
    if words.len() > MAX_HEADER_WORDS {
        return false;
    }

    let letters: Vec<char> = cleaned.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.is_empty() {
        return false;
    }
    if letters.iter().all(|c| c.is_uppercase()) {
        return true;
    }

    words.iter().all(|word| {
        HEADER_CONNECTORS.contains(&word.to_lowercase().as_str())
            || word.chars().next().map(char::is_uppercase).unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::document::{DocumentKind, InputLimits};

    fn resume(text: &str) -> Document {
        Document::new(DocumentKind::Resume, text, &InputLimits::default()).unwrap()
    }

    #[test]
    fn test_classify_header_variants() {
        let segmenter = default_segmenter();
        assert_eq!(segmenter.classify_header("EXPERIENCE"), Some(SectionKind::Experience));
        assert_eq!(
            segmenter.classify_header("## Work History:"),
            Some(SectionKind::Experience)
        );
        assert_eq!(
            segmenter.classify_header("Technical Skills"),
            Some(SectionKind::Skills)
        );
        assert_eq!(
            segmenter.classify_header("Skills & Tools"),
            Some(SectionKind::Skills)
        );
        assert_eq!(segmenter.classify_header("Education"), Some(SectionKind::Education));
        assert_eq!(
            segmenter.classify_header("Professional Summary"),
            Some(SectionKind::Summary)
        );
        assert_eq!(segmenter.classify_header("Projects"), Some(SectionKind::Other));
    }

    #[test]
    fn test_sentence_mentioning_skills_is_not_a_header() {
        let segmenter = default_segmenter();
        assert_eq!(segmenter.classify_header("skills"), None);
        assert_eq!(
            segmenter.classify_header("Experience with large Rust codebases"),
            None
        );
        assert_eq!(segmenter.classify_header("Hobbies"), None);
    }

    #[test]
    fn test_segments_sections_in_order() {
        let text = "Jane Doe\njane@example.com\n\nSKILLS\nRust, Docker\n\nExperience\nAcme Corp 2019 - 2023\nShipped things\n\nEducation\nB.S. Computer Science\n";
        let doc = resume(text);
        let sections = default_segmenter().segment(&doc);

        let kinds: Vec<SectionKind> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Other,
                SectionKind::Skills,
                SectionKind::Experience,
                SectionKind::Education
            ]
        );
        assert!(sections[0].header.is_none());
        assert_eq!(sections[1].header.as_deref(), Some("SKILLS"));
        assert_eq!(sections[1].body_text(&doc).trim(), "Rust, Docker");
        assert!(sections[2].body_text(&doc).contains("Shipped things"));
        assert!(!sections[2].body_text(&doc).contains("Experience"));
    }

    #[test]
    fn test_spans_are_contiguous_and_cover_document() {
        let text = "Intro line\nSKILLS\nRust\nEDUCATION\nMSc Physics";
        let doc = resume(text);
        let sections = default_segmenter().segment(&doc);

        assert_eq!(sections.first().unwrap().span.start, 0);
        assert_eq!(sections.last().unwrap().span.end, text.len());
        for pair in sections.windows(2) {
            assert_eq!(pair[0].span.end, pair[1].span.start);
        }
    }

    #[test]
    fn test_no_headers_yields_single_other_section() {
        let doc = resume("Rust developer with Docker and Kubernetes experience.");
        let sections = default_segmenter().segment(&doc);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Other);
        assert!(!has_headers(&sections));
        assert_eq!(sections[0].tokens.len(), doc.tokens().len());
    }

    #[test]
    fn test_blank_preamble_is_dropped() {
        let doc = resume("\n\nSKILLS\nRust\n");
        let sections = default_segmenter().segment(&doc);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Skills);
        assert!(has_headers(&sections));
    }

    #[test]
    fn test_section_tokens_exclude_header() {
        let doc = resume("SKILLS\nRust Docker\n");
        let sections = default_segmenter().segment(&doc);
        let texts: Vec<&str> = sections[0].tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["rust", "docker"]);
    }

    #[test]
    fn test_custom_rule_table() {
        let rules = vec![HeaderRule::new(r"^kompetenzen$", SectionKind::Skills).unwrap()];
        let segmenter = SectionSegmenter::with_rules(rules);
        assert_eq!(segmenter.classify_header("KOMPETENZEN"), Some(SectionKind::Skills));
        assert_eq!(segmenter.classify_header("SKILLS"), None);
    }
}
