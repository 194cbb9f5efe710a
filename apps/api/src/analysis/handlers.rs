use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::dimensions::weighted_composite;
use crate::analysis::extract::{
    candidate_name_from_filename, extract_resume_text, validate_upload, MAX_FILES_PER_REQUEST,
};
use crate::analysis::scorer::{analyze_resume, resolve_api_key};
use crate::errors::AppError;
use crate::llm_client::ModelParams;
use crate::models::AnalysisRecord;
use crate::report::render_candidate_report;
use crate::state::AppState;

/// A stored record plus the server-computed ranking score.
#[derive(Debug, Serialize)]
pub struct AnalysisView {
    #[serde(flatten)]
    pub record: AnalysisRecord,
    pub composite_score: f64,
}

impl From<AnalysisRecord> for AnalysisView {
    fn from(record: AnalysisRecord) -> Self {
        let composite_score = weighted_composite(&record.analysis.card);
        Self {
            record,
            composite_score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SkippedFile {
    pub filename: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub records: Vec<AnalysisView>,
    pub skipped: Vec<SkippedFile>,
}

/// POST /api/v1/analyses
///
/// Multipart body: one or more PDF file parts, plus optional text parts
/// `model`, `temperature`, `max_tokens`, and `api_key` (a per-request key
/// override). Unreadable files are skipped and reported, not fatal; a
/// scoring failure still yields a record, labeled as a placeholder.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut files: Vec<(String, Bytes)> = Vec::new();
    let mut params = ModelParams::default();
    let mut request_key: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart body: {e}")))?
    {
        if let Some(filename) = field.file_name().map(str::to_string) {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("failed to read '{filename}': {e}")))?;
            files.push((filename, data));
            continue;
        }

        let name = field.name().unwrap_or_default().to_string();
        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read field '{name}': {e}")))?;
        match name.as_str() {
            "model" => {
                if !value.trim().is_empty() {
                    params.model = value.trim().to_string();
                }
            }
            "temperature" => {
                let temperature: f32 = value.trim().parse().map_err(|_| {
                    AppError::Validation(format!("'{value}' is not a valid temperature"))
                })?;
                if !(0.0..=2.0).contains(&temperature) {
                    return Err(AppError::Validation(
                        "temperature must be between 0.0 and 2.0".to_string(),
                    ));
                }
                params.temperature = temperature;
            }
            "max_tokens" => {
                let max_tokens: u32 = value.trim().parse().map_err(|_| {
                    AppError::Validation(format!("'{value}' is not a valid max_tokens"))
                })?;
                if max_tokens == 0 {
                    return Err(AppError::Validation(
                        "max_tokens must be at least 1".to_string(),
                    ));
                }
                params.max_tokens = max_tokens;
            }
            "api_key" => request_key = Some(value),
            other => {
                warn!(field = other, "ignoring unknown multipart field");
            }
        }
    }

    if files.is_empty() {
        return Err(AppError::Validation(
            "no resume files in the request".to_string(),
        ));
    }
    if files.len() > MAX_FILES_PER_REQUEST {
        return Err(AppError::Validation(format!(
            "{} files uploaded; the limit is {MAX_FILES_PER_REQUEST} per request",
            files.len()
        )));
    }

    let settings = state.settings.snapshot();
    let api_key = resolve_api_key(
        request_key.as_deref(),
        &settings.api_key,
        state.config.openrouter_api_key.as_deref(),
    );

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    for (filename, data) in files {
        let text = match validate_upload(&filename, data.len())
            .and_then(|_| extract_resume_text(&data))
        {
            Ok(text) => text,
            Err(e) => {
                warn!(file = %filename, "skipping upload: {e}");
                skipped.push(SkippedFile {
                    filename,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let candidate_name = candidate_name_from_filename(&filename);
        info!(candidate = %candidate_name, model = %params.model, "analyzing resume");
        let record = analyze_resume(
            state.scorer.as_ref(),
            &text,
            &candidate_name,
            &params,
            &settings.job_profile,
            api_key,
        )
        .await;
        if record.source.is_placeholder() {
            warn!(candidate = %candidate_name, "analysis degraded to placeholder scores");
        }
        state.sessions.insert(record.clone());
        records.push(AnalysisView::from(record));
    }

    Ok(Json(AnalyzeResponse { records, skipped }))
}

/// GET /api/v1/analyses — every stored record, best composite first.
pub async fn handle_list_analyses(State(state): State<AppState>) -> Json<Vec<AnalysisView>> {
    Json(sorted_views(state.sessions.list()))
}

/// GET /api/v1/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisView>, AppError> {
    let record = state
        .sessions
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("analysis {id} not found")))?;
    Ok(Json(AnalysisView::from(record)))
}

/// DELETE /api/v1/analyses
pub async fn handle_clear_analyses(State(state): State<AppState>) -> Json<serde_json::Value> {
    let cleared = state.sessions.clear();
    Json(json!({ "cleared": cleared }))
}

/// GET /api/v1/analyses/:id/report — the candidate report as a PDF download.
pub async fn handle_export_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let record = state
        .sessions
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("analysis {id} not found")))?;

    let pdf = render_candidate_report(&record)?;
    let filename = format!(
        "{}_report.pdf",
        sanitize_filename(&record.analysis.candidate_name)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        pdf,
    ))
}

fn sorted_views(records: Vec<AnalysisRecord>) -> Vec<AnalysisView> {
    let mut views: Vec<AnalysisView> = records.into_iter().map(AnalysisView::from).collect();
    views.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
    views
}

/// Keeps report filenames header-safe.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('_').is_empty() {
        "candidate".to_string()
    } else {
        cleaned
    }
}
