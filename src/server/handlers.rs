use std::path::Path as FsPath;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use chrono::Utc;
use tracing::{debug, info};

use super::error::ApiError;
use super::models::{
    Endpoints, HealthResponse, LicenseQuery, LicenseResponse, RootResponse, ScanGithubRequest,
};
use super::AppState;
use crate::github::RepositoryRef;
use crate::models::{Ecosystem, ScanReport};

const SCAN_DIR_PREFIX: &str = "license-scan-";

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "License Scanner API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: Endpoints {
            scan_github: "/scan/github".to_string(),
            scan_upload: "/scan/upload".to_string(),
            health: "/health".to_string(),
            license: "/license/{package}".to_string(),
        },
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    })
}

/// Fetch the root manifests of a GitHub repository and scan them.
pub async fn scan_github(
    State(state): State<AppState>,
    payload: Result<Json<ScanGithubRequest>, JsonRejection>,
) -> Result<Json<ScanReport>, ApiError> {
    let Json(request) = payload?;
    let repo = RepositoryRef::from_url(&request.repo_url)?;
    info!(repo = %repo.full_name(), branch = %request.branch, "scanning repository");

    // Removed when dropped, on every return path.
    let staging = scan_dir(&state)?;
    state.github.fetch_manifests(&repo, staging.path()).await?;

    let report = state.scanner.scan_as(staging.path(), repo.full_name()).await;
    Ok(Json(report))
}

/// Save every uploaded file under its base name and scan them together.
pub async fn scan_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScanReport>, ApiError> {
    let staging = scan_dir(&state)?;
    let mut saved = 0usize;

    while let Some(field) = multipart.next_field().await.map_err(ApiError::scan_failed)? {
        // Strip any directory components the client sent.
        let Some(file_name) = field
            .file_name()
            .and_then(|n| FsPath::new(n).file_name())
            .map(|n| n.to_owned())
        else {
            continue;
        };

        let content = field.bytes().await.map_err(ApiError::scan_failed)?;
        tokio::fs::write(staging.path().join(&file_name), &content)
            .await
            .map_err(ApiError::scan_failed)?;
        debug!(file = %file_name.to_string_lossy(), bytes = content.len(), "stored upload");
        saved += 1;
    }

    if saved == 0 {
        return Err(ApiError::Unprocessable("No files uploaded".to_string()));
    }

    info!(files = saved, "scanning uploaded manifests");
    let report = state.scanner.scan(staging.path()).await;
    Ok(Json(report))
}

/// Single-package license lookup against npm or PyPI.
pub async fn license_lookup(
    State(state): State<AppState>,
    Path(package): Path<String>,
    Query(query): Query<LicenseQuery>,
) -> Result<Json<LicenseResponse>, ApiError> {
    let ecosystem = match query.ecosystem.as_str() {
        "npm" => Ecosystem::JavaScript,
        "pypi" => Ecosystem::Python,
        _ => return Err(ApiError::BadRequest("Unsupported ecosystem".to_string())),
    };

    let resolution = state.scanner.registry().resolve(ecosystem, &package).await;

    Ok(Json(LicenseResponse {
        package,
        ecosystem: query.ecosystem,
        license: resolution.license,
        license_source: resolution.source,
    }))
}

/// Staging directory for one request, removed when the returned guard drops.
fn scan_dir(state: &AppState) -> Result<tempfile::TempDir, ApiError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(SCAN_DIR_PREFIX);
    match &state.scratch_dir {
        Some(parent) => builder.tempdir_in(parent),
        None => builder.tempdir(),
    }
    .map_err(ApiError::scan_failed)
}
