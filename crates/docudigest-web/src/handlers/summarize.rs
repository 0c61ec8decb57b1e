use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::multipart::{Multipart, MultipartRejection};

use crate::error::ApiError;
use crate::models::SummaryResponse;
use crate::state::AppState;
use crate::upload;

/// `POST /api/summarize`: one uploaded document in, one summary out.
///
/// The upload lives in a per-request temporary directory that is removed
/// when this handler returns, on success and failure alike.
pub async fn summarize(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let file = upload::parse_multipart(multipart?)
        .await?
        .ok_or(ApiError::NoFile)?;

    let dir = tempfile::tempdir()?;
    let path = file.persist(dir.path()).await?;
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Err(ApiError::FileNotSaved(path));
    }

    let kind = file.kind().ok_or_else(|| {
        docudigest_ingest::IngestError::Unsupported {
            extension: file.extension(),
        }
    })?;
    tracing::info!(
        filename = %file.filename,
        kind = %kind,
        bytes = file.data.len(),
        "summarizing upload"
    );
    drop(file);

    let pdf_backend = Arc::clone(&state.pdf_backend);
    let text = tokio::task::spawn_blocking(move || {
        docudigest_ingest::extract_text_with_backend(&path, kind, pdf_backend.as_ref())
    })
    .await??;

    let cancel = state.shutdown.child_token();
    let result = docudigest_core::summarize_text(
        &text,
        state.summarizer.as_ref(),
        &state.client,
        state.config.summarizer_timeout(),
        &cancel,
    )
    .await?;

    tracing::info!(
        input_chars = result.input_chars,
        truncated = result.truncated,
        fallback = result.fallback,
        "summary ready"
    );

    Ok(Json(SummaryResponse {
        summary: result.summary,
    }))
}

/// Any non-POST method on the summarize route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
