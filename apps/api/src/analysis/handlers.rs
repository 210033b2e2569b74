//! Axum route handlers for the Analysis API.

use std::time::Duration;

use anyhow::anyhow;
use axum::{
    extract::{Multipart, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::document::{decode_text, DocumentKind};
use crate::analysis::export::{render_text_report, REPORT_FILENAME};
use crate::analysis::samples::SAMPLE_JOB_DESCRIPTION;
use crate::analysis::AnalysisReport;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub vocabulary_version: String,
    pub report: AnalysisReport,
}

#[derive(Debug, Serialize)]
pub struct SampleJobDescriptionResponse {
    pub job_description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Scores a resume against a job description and returns the full report.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    respond(&state, request).await.map(Json)
}

/// POST /api/v1/analyze/upload
///
/// Multipart variant of `/analyze` for plain-text files: fields `resume` and
/// `job_description`, each either a `.txt` file or an inline text value.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut resume_text = None;
    let mut job_description = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let kind = match field.name() {
            Some("resume") => DocumentKind::Resume,
            Some("job_description") => DocumentKind::JobDescription,
            _ => continue,
        };
        if let Some(file_name) = field.file_name() {
            if !file_name.to_lowercase().ends_with(".txt") {
                return Err(AppError::Validation(format!(
                    "Unsupported file type for {kind}: {file_name} (only .txt is accepted)"
                )));
            }
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read {kind} upload: {e}")))?;
        let text = decode_text(kind, &bytes)?.to_string();
        match kind {
            DocumentKind::Resume => resume_text = Some(text),
            DocumentKind::JobDescription => job_description = Some(text),
        }
    }

    let request = AnalyzeRequest {
        resume_text: resume_text
            .ok_or_else(|| AppError::Validation("Missing multipart field `resume`".to_string()))?,
        job_description: job_description.ok_or_else(|| {
            AppError::Validation("Missing multipart field `job_description`".to_string())
        })?,
    };
    respond(&state, request).await.map(Json)
}

/// POST /api/v1/analyze/export
///
/// Same input as `/analyze`; responds with the plain-text report as a download.
pub async fn handle_export(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Response, AppError> {
    let report = run_analysis(&state, request).await?;
    let body = render_text_report(&report);

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILENAME}\""),
            ),
        ],
        body,
    )
        .into_response())
}

/// GET /api/v1/samples/job-description
pub async fn handle_sample_job_description() -> Json<SampleJobDescriptionResponse> {
    Json(SampleJobDescriptionResponse {
        job_description: SAMPLE_JOB_DESCRIPTION.to_string(),
    })
}

async fn respond(state: &AppState, request: AnalyzeRequest) -> Result<AnalyzeResponse, AppError> {
    let report = run_analysis(state, request).await?;
    let analysis_id = Uuid::new_v4();

    info!(
        "Analysis {analysis_id} served (backend: {}, overall: {})",
        state.analyzer.backend(),
        report.overall_score
    );

    Ok(AnalyzeResponse {
        analysis_id,
        generated_at: Utc::now(),
        vocabulary_version: state.analyzer.vocabulary_version().to_string(),
        report,
    })
}

/// Runs the CPU-bound analysis off the async runtime, bounded by the configured timeout.
async fn run_analysis(state: &AppState, request: AnalyzeRequest) -> Result<AnalysisReport, AppError> {
    let analyzer = state.analyzer.clone();
    let timeout_secs = state.config.analysis_timeout_secs;

    let task = tokio::task::spawn_blocking(move || {
        analyzer.analyze(&request.resume_text, &request.job_description)
    });

    let joined = tokio::time::timeout(Duration::from_secs(timeout_secs), task)
        .await
        .map_err(|_| AppError::Timeout(timeout_secs))?;

    let outcome = joined.map_err(|e| AppError::Internal(anyhow!("analysis task failed: {e}")))?;
    Ok(outcome?)
}
