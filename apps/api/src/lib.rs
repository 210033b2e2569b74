//! # SkillScore API
//!
//! Scores a resume against a job description and suggests improvements.
//!
//! - **[`analysis`]**: the matching engine (tokenizer, segmenter, keyword
//!   extraction, scorer, recommender) plus its HTTP handlers
//! - **[`routes`]**: the axum router
//! - **[`config`]**, **[`errors`]**, **[`state`]**: service plumbing
//!
//! Library callers can use [`analysis::analyze`] directly.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod routes;
pub mod state;
