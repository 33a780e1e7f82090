//! HTTP API for layer publishing and impact calculation.
//!
//! Endpoints:
//! - `GET /health`, `GET /version` - liveness and compatibility probes
//! - `GET /impact-functions` - catalog of runnable impact functions
//! - `POST /calculate` - hazard x exposure -> published impact layer
//! - `POST /layers/upload` - publish a local grid file
//! - `POST /layers/download` - fetch a coverage to the work directory

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use geoserver_client::{ClientError, Geoserver, GeoserverConfig, LayerHandle};
use raster_core::{earthquake_fatality, write_grid, RasterError, WriteOptions};

use crate::catalog;
use crate::config::ServiceConfig;

/// Version reported by the compatibility probe.
pub const API_VERSION: &str = "0.1.0";

/// Shared application state.
pub struct AppState {
    pub config: ServiceConfig,
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    /// Hazard layer handle, e.g. `admin:pw@http://host/geoserver/[hazard]/shakemap`
    pub hazard: String,

    /// Exposure layer handle
    pub exposure: String,

    /// Handle naming where the computed impact layer goes
    pub output: String,

    /// `[min_x, min_y, max_x, max_y]` in WGS84
    pub bounding_box: [f64; 4],

    /// Grid resolution in degrees; the service default when absent
    #[serde(default)]
    pub cellsize: Option<f64>,

    /// Impact function id; the fatality model when absent
    #[serde(default)]
    pub impact_function: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub status: String,
    pub layer: String,
    pub output_file: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    /// Target handle; its workspace receives the layer
    pub handle: String,

    /// Local path of the ASCII grid to publish
    pub file: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: String,
    pub layer: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    /// Handle of the coverage to fetch
    pub handle: String,

    /// `[min_x, min_y, max_x, max_y]` in WGS84
    pub bounding_box: [f64; 4],

    /// Grid resolution in degrees; the service default when absent
    #[serde(default)]
    pub cellsize: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub status: String,
    pub file: String,
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Error carried back to the caller with its message verbatim.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        let status = match &err {
            ClientError::Handle(_) | ClientError::InvalidName(_) => StatusCode::BAD_REQUEST,
            ClientError::Connection { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<RasterError> for ApiError {
    fn from(err: RasterError) -> Self {
        let status = match &err {
            RasterError::ShapeMismatch { .. } | RasterError::DegenerateInput(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<geoserver_client::HandleParseError> for ApiError {
    fn from(err: geoserver_client::HandleParseError) -> Self {
        Self::bad_request(err.to_string())
    }
}

// ============================================================================
// Router
// ============================================================================

/// Create the API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/impact-functions", get(impact_functions_handler))
        .route("/calculate", post(calculate_handler))
        .route("/layers/upload", post(upload_handler))
        .route("/layers/download", post(download_handler))
        .layer(cors)
        .layer(Extension(state))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health - liveness probe
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "risk-api"
    }))
}

/// GET /version - API version for compatibility checks
async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: API_VERSION,
    })
}

/// GET /impact-functions - runnable impact functions
async fn impact_functions_handler() -> Json<&'static [catalog::ImpactFunction]> {
    Json(catalog::IMPACT_FUNCTIONS)
}

/// POST /calculate - download hazard and exposure, compute the impact grid,
/// publish it with generated styling
async fn calculate_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<CalculateResponse>, ApiError> {
    if let Some(id) = &request.impact_function {
        if catalog::find(id).is_none() {
            return Err(ApiError::bad_request(format!(
                "unknown impact function '{}'",
                id
            )));
        }
    }

    let hazard = LayerHandle::parse(&request.hazard)?;
    let exposure = LayerHandle::parse(&request.exposure)?;
    let output = LayerHandle::parse(&request.output)?;

    let cellsize = request.cellsize.unwrap_or(state.config.default_cellsize);
    let bbox = request.bounding_box;
    let work_dir = &state.config.work_dir;

    info!(hazard = %hazard.qualified_name(), exposure = %exposure.qualified_name(), "Calculating impact");

    let hazard_grid = fetch_coverage(&hazard, bbox, cellsize, work_dir).await?;
    let exposure_grid = fetch_coverage(&exposure, bbox, cellsize, work_dir).await?;

    let impact = earthquake_fatality(&hazard_grid, &exposure_grid)?;

    let output_file = work_dir.join(format!("{}.asc", output.layer));
    let options = WriteOptions {
        cellsize,
        ..WriteOptions::default()
    };
    write_grid(&impact, &output_file, bbox[0], bbox[1], &options)?;

    let workspace = output
        .workspace
        .clone()
        .unwrap_or_else(|| state.config.default_workspace.clone());
    let publisher = Geoserver::connect(GeoserverConfig::from_handle(&output)).await?;
    publisher.create_workspace(&workspace).await?;
    let layer = publisher.upload_coverage(&output_file, &workspace).await?;

    info!(%layer, "Impact layer published");

    Ok(Json(CalculateResponse {
        status: "SUCCESS".to_string(),
        layer,
        output_file: output_file.display().to_string(),
    }))
}

/// POST /layers/upload - publish a local grid file
async fn upload_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    let handle = LayerHandle::parse(&request.handle)?;
    let workspace = handle
        .workspace
        .clone()
        .unwrap_or_else(|| state.config.default_workspace.clone());

    let client = Geoserver::connect(GeoserverConfig::from_handle(&handle)).await?;
    client.create_workspace(&workspace).await?;
    let layer = client
        .upload_coverage(&PathBuf::from(&request.file), &workspace)
        .await?;

    info!(%layer, "Layer uploaded");

    Ok(Json(UploadResponse {
        status: "SUCCESS".to_string(),
        layer,
    }))
}

/// POST /layers/download - fetch a coverage into the work directory
async fn download_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<DownloadRequest>,
) -> Result<Json<DownloadResponse>, ApiError> {
    let handle = LayerHandle::parse(&request.handle)?;
    let workspace = handle
        .workspace
        .clone()
        .ok_or_else(|| ApiError::bad_request("download handle must name a workspace"))?;
    let cellsize = request.cellsize.unwrap_or(state.config.default_cellsize);

    let client = Geoserver::connect(GeoserverConfig::from_handle(&handle)).await?;
    let output = state.config.work_dir.join(format!("{}.asc", handle.layer));
    let file = client
        .download_coverage(
            &workspace,
            &handle.layer,
            request.bounding_box,
            cellsize,
            &output,
        )
        .await?;

    Ok(Json(DownloadResponse {
        status: "SUCCESS".to_string(),
        file: file.display().to_string(),
    }))
}

/// Connect with a handle's credentials and fetch its coverage.
async fn fetch_coverage(
    handle: &LayerHandle,
    bbox: [f64; 4],
    cellsize: f64,
    work_dir: &std::path::Path,
) -> Result<raster_core::GridRaster, ApiError> {
    let workspace = handle
        .workspace
        .clone()
        .ok_or_else(|| ApiError::bad_request("layer handle must name a workspace"))?;
    let client = Geoserver::connect(GeoserverConfig::from_handle(handle)).await?;
    Ok(client
        .get_raster_data(&workspace, &handle.layer, bbox, cellsize, work_dir)
        .await?)
}

/// Start the HTTP server, shutting down on ctrl-c.
pub async fn run_server(state: Arc<AppState>) -> anyhow::Result<()> {
    let port = state.config.port;
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    info!(port = port, "Starting risk impact API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Received shutdown signal");
        })
        .await?;

    Ok(())
}
