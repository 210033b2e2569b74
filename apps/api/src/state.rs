use std::sync::Arc;

use crate::analysis::ResumeAnalyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable analyzer. Default: KeywordAnalyzer over the startup vocabulary.
    pub analyzer: Arc<dyn ResumeAnalyzer>,
}
