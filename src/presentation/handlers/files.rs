use axum::Json;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::{AnalysisEngine, ArtifactStore, ArtifactStoreError};
use crate::domain::{ArtifactMeta, ArtifactName, WAV_MIME};
use crate::presentation::state::AppState;

use super::responses::ErrorResponse;

#[derive(Serialize)]
pub struct FileDetailsResponse {
    pub success: bool,
    pub file: FileDetails,
}

#[derive(Serialize)]
pub struct FileDetails {
    pub filename: String,
    pub size: u64,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: String,
    pub path: String,
}

#[derive(Serialize)]
pub struct FileListResponse {
    pub success: bool,
    pub files: Vec<FileListEntry>,
    pub count: usize,
}

#[derive(Serialize)]
pub struct FileListEntry {
    pub filename: String,
    pub size: u64,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: String,
    #[serde(rename = "downloadPath")]
    pub download_path: String,
}

#[derive(Serialize)]
pub struct FileDeletedResponse {
    pub success: bool,
    pub message: String,
}

#[tracing::instrument(skip(state))]
pub async fn get_file_handler<S, A>(
    State(state): State<AppState<S, A>>,
    Path(filename): Path<String>,
) -> Response
where
    S: ArtifactStore + 'static,
    A: AnalysisEngine + 'static,
{
    let name = match parse_name(&filename) {
        Ok(n) => n,
        Err(response) => return response,
    };

    match state.store.describe(&name).await {
        Ok(meta) => (
            StatusCode::OK,
            Json(FileDetailsResponse {
                success: true,
                file: FileDetails {
                    filename: meta.name.to_string(),
                    size: meta.size_bytes,
                    uploaded_at: meta.uploaded_at.to_rfc3339(),
                    path: download_path(&meta.name),
                },
            }),
        )
            .into_response(),
        Err(ArtifactStoreError::NotFound(_)) => not_found(),
        Err(e) => {
            tracing::error!(error = %e, filename = %filename, "Failed to stat artifact");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Error retrieving file")),
            )
                .into_response()
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn download_file_handler<S, A>(
    State(state): State<AppState<S, A>>,
    Path(filename): Path<String>,
) -> Response
where
    S: ArtifactStore + 'static,
    A: AnalysisEngine + 'static,
{
    let name = match parse_name(&filename) {
        Ok(n) => n,
        Err(response) => return response,
    };

    match state.store.open(&name).await {
        Ok(stream) => {
            let disposition = format!("attachment; filename=\"{}\"", name);
            (
                [
                    (header::CONTENT_TYPE, WAV_MIME.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                Body::from_stream(stream),
            )
                .into_response()
        }
        Err(ArtifactStoreError::NotFound(_)) => not_found(),
        Err(e) => {
            tracing::error!(error = %e, filename = %filename, "Failed to open artifact");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Error downloading file")),
            )
                .into_response()
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn delete_file_handler<S, A>(
    State(state): State<AppState<S, A>>,
    Path(filename): Path<String>,
) -> Response
where
    S: ArtifactStore + 'static,
    A: AnalysisEngine + 'static,
{
    let name = match parse_name(&filename) {
        Ok(n) => n,
        Err(response) => return response,
    };

    match state.store.delete(&name).await {
        Ok(()) => (
            StatusCode::OK,
            Json(FileDeletedResponse {
                success: true,
                message: "File deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Err(ArtifactStoreError::NotFound(_)) => not_found(),
        Err(e) => {
            tracing::error!(error = %e, filename = %filename, "Failed to delete artifact");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Error deleting file")),
            )
                .into_response()
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn list_files_handler<S, A>(State(state): State<AppState<S, A>>) -> Response
where
    S: ArtifactStore + 'static,
    A: AnalysisEngine + 'static,
{
    match state.store.list().await {
        Ok(metas) => {
            let files: Vec<FileListEntry> = metas.iter().map(list_entry).collect();
            (
                StatusCode::OK,
                Json(FileListResponse {
                    success: true,
                    count: files.len(),
                    files,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list artifacts");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Error listing files")),
            )
                .into_response()
        }
    }
}

fn list_entry(meta: &ArtifactMeta) -> FileListEntry {
    FileListEntry {
        filename: meta.name.to_string(),
        size: meta.size_bytes,
        uploaded_at: meta.uploaded_at.to_rfc3339(),
        download_path: download_path(&meta.name),
    }
}

fn download_path(name: &ArtifactName) -> String {
    format!("/api/files/download/{}", name)
}

fn parse_name(filename: &str) -> Result<ArtifactName, Response> {
    ArtifactName::parse(filename).ok_or_else(|| {
        tracing::warn!(filename = %filename, "Rejected unsafe artifact name");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("Invalid filename: {}", filename))),
        )
            .into_response()
    })
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("File not found")),
    )
        .into_response()
}
