use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skillscore_api::analysis::document::InputLimits;
use skillscore_api::analysis::scorer::ScoringConfig;
use skillscore_api::analysis::vocabulary::SkillVocabulary;
use skillscore_api::analysis::{AnalysisOptions, KeywordAnalyzer, ResumeAnalyzer};
use skillscore_api::config::Config;
use skillscore_api::routes::build_router;
use skillscore_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on unparseable env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillScore API v{}", env!("CARGO_PKG_VERSION"));

    // Skill vocabulary: external file if configured, otherwise the built-in table
    let vocabulary = match &config.vocabulary_path {
        Some(path) => SkillVocabulary::load(path)
            .with_context(|| format!("failed to load skill vocabulary from {path}"))?,
        None => SkillVocabulary::builtin(),
    };
    info!(
        "Skill vocabulary {} loaded ({} entries)",
        vocabulary.version(),
        vocabulary.len()
    );

    let scoring = match &config.scoring_config_path {
        Some(path) => ScoringConfig::load(path)?,
        None => ScoringConfig::default(),
    };

    let options = AnalysisOptions {
        limits: InputLimits {
            max_input_chars: config.max_input_chars,
        },
        scoring,
    };

    // Initialize analyzer (KeywordAnalyzer by default; any ResumeAnalyzer fits here)
    let analyzer = Arc::new(KeywordAnalyzer::new(Arc::new(vocabulary), options));
    info!(
        "Analyzer ready (backend: {}, max input: {} chars, timeout: {}s)",
        analyzer.backend(),
        config.max_input_chars,
        config.analysis_timeout_secs
    );

    let state = AppState {
        config: config.clone(),
        analyzer,
    };

    // Build router
    let app = build_router(state)
        .layer(DefaultBodyLimit::max(config.request_body_limit()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
