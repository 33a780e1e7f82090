//! GeoServer REST API client.
//!
//! Covers the slice of the REST and WCS surfaces this system drives:
//! workspace management, coverage upload as ArcGrid, style upload and
//! assignment, layer deletion and coverage download.

use std::path::{Path, PathBuf};

use tracing::debug;

use raster_core::{read_grid, BinMode, GridRaster};

use crate::error::{ClientError, Result};
use crate::handle::LayerHandle;
use crate::sld::raster_colormap_sld;

/// Classification bins used for auto-generated styles.
const STYLE_BINS: usize = 10;

/// Connection settings for one GeoServer instance.
#[derive(Debug, Clone)]
pub struct GeoserverConfig {
    /// Base URL, e.g. `http://localhost:8080/geoserver`.
    pub base_url: String,
    pub username: String,
    pub password: String,
}

impl GeoserverConfig {
    /// Connection settings carried by a layer handle.
    pub fn from_handle(handle: &LayerHandle) -> Self {
        Self {
            base_url: handle.url.clone(),
            username: handle.username.clone(),
            password: handle.password.clone(),
        }
    }
}

/// Connection to one GeoServer instance.
pub struct Geoserver {
    config: GeoserverConfig,
    http: reqwest::Client,
}

impl Geoserver {
    /// Connect and verify that the REST API answers and lists workspaces.
    pub async fn connect(config: GeoserverConfig) -> Result<Self> {
        let client = Self {
            config,
            http: reqwest::Client::new(),
        };

        let url = client.rest_url("");
        let response = client
            .http
            .get(&url)
            .basic_auth(&client.config.username, Some(&client.config.password))
            .send()
            .await
            .map_err(|e| ClientError::Connection {
                url: client.config.base_url.clone(),
                message: e.to_string(),
            })?;
        let body = response.text().await?;
        if !body.contains("workspaces") {
            return Err(ClientError::Connection {
                url: client.config.base_url.clone(),
                message: "the REST endpoint does not list workspaces".to_string(),
            });
        }

        Ok(client)
    }

    /// Create a workspace. A workspace that already exists is not an error.
    pub async fn create_workspace(&self, name: &str) -> Result<()> {
        let body = format!("<workspace><name>{}</name></workspace>", name);
        match self
            .rest(
                reqwest::Method::POST,
                "workspaces",
                Some("text/xml"),
                Some(body.into_bytes()),
            )
            .await
        {
            Ok(_) => Ok(()),
            Err(ClientError::Http { message, .. }) if message.contains("already exists") => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Whether the named workspace exists on the server.
    pub async fn workspace_exists(&self, name: &str) -> Result<bool> {
        match self
            .rest(
                reqwest::Method::GET,
                &format!("workspaces/{}", name),
                None,
                None,
            )
            .await
        {
            Ok(_) => Ok(true),
            Err(ClientError::Http { status: 404, .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Upload an ASCII grid file as a coverage in the given workspace.
    ///
    /// The layer takes its name from the file stem. A sibling `.sld` file is
    /// used as the layer style when present; otherwise a classified style is
    /// generated from 10 equidistant bins of the grid data. Returns the
    /// qualified `workspace:layer` name.
    pub async fn upload_coverage(&self, path: &Path, workspace: &str) -> Result<String> {
        let layer_name = layer_name_from_path(path)?;

        let bytes = tokio::fs::read(path).await?;
        self.rest(
            reqwest::Method::PUT,
            &format!(
                "workspaces/{}/coveragestores/{}/file.arcgrid",
                workspace, layer_name
            ),
            Some("text/plain"),
            Some(bytes),
        )
        .await?;

        let provided_style = path.with_extension("sld");
        let sld = if provided_style.is_file() {
            tokio::fs::read_to_string(&provided_style).await?
        } else {
            generate_raster_style(path, BinMode::Equidistant)?
        };

        self.upload_style(&layer_name, &sld).await?;
        self.set_default_style(&layer_name, &layer_name).await?;

        Ok(format!("{}:{}", workspace, layer_name))
    }

    /// Upload an SLD document as a named style. An existing style of the
    /// same name is overwritten.
    pub async fn upload_style(&self, name: &str, sld: &str) -> Result<()> {
        let registration = format!(
            "<style><name>{0}</name><filename>{0}.sld</filename></style>",
            name
        );
        match self
            .rest(
                reqwest::Method::POST,
                "styles",
                Some("text/xml"),
                Some(registration.into_bytes()),
            )
            .await
        {
            Ok(_) => {}
            Err(ClientError::Http { message, .. }) if message.contains("already exists") => {}
            Err(e) => return Err(e),
        }

        self.rest(
            reqwest::Method::PUT,
            &format!("styles/{}", name),
            Some("application/vnd.ogc.sld+xml"),
            Some(sld.as_bytes().to_vec()),
        )
        .await?;
        Ok(())
    }

    /// Make the named style the default for a layer.
    pub async fn set_default_style(&self, style: &str, layer: &str) -> Result<()> {
        let body = format!(
            "<layer><defaultStyle><name>{}</name></defaultStyle><enabled>true</enabled></layer>",
            style
        );
        self.rest(
            reqwest::Method::PUT,
            &format!("layers/{}", layer),
            Some("text/xml"),
            Some(body.into_bytes()),
        )
        .await?;
        Ok(())
    }

    /// Look up a style definition; `None` when the server has no such style.
    pub async fn find_style(&self, name: &str) -> Result<Option<serde_json::Value>> {
        let text = match self
            .rest(
                reqwest::Method::GET,
                &format!("styles/{}.json", name),
                None,
                None,
            )
            .await
        {
            Ok(text) => text,
            Err(ClientError::Http { status: 404, .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        if text.starts_with("No such style") {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Remove a style and purge its SLD file from the server.
    pub async fn delete_style(&self, name: &str) -> Result<()> {
        self.rest(
            reqwest::Method::DELETE,
            &format!("styles/{}?purge=true", name),
            None,
            None,
        )
        .await?;
        Ok(())
    }

    /// Remove a layer together with its coverage and coverage store.
    pub async fn delete_layer(&self, layer: &str, workspace: &str) -> Result<()> {
        if layer.is_empty() {
            return Err(ClientError::InvalidName(
                "a layer name is required for deletion".to_string(),
            ));
        }

        self.rest(
            reqwest::Method::DELETE,
            &format!("layers/{}", layer),
            None,
            None,
        )
        .await?;
        self.rest(
            reqwest::Method::DELETE,
            &format!(
                "workspaces/{}/coveragestores/{}/coverages/{}",
                workspace, layer, layer
            ),
            None,
            None,
        )
        .await?;
        self.rest(
            reqwest::Method::DELETE,
            &format!("workspaces/{}/coveragestores/{}", workspace, layer),
            None,
            None,
        )
        .await?;
        Ok(())
    }

    /// Download a coverage as an ArcGrid file via WCS GetCoverage.
    ///
    /// `bbox` is `[min_x, min_y, max_x, max_y]` in WGS84; `cellsize` sets the
    /// requested resolution in both axes (square pixels). The response body
    /// is written to `output` and the path returned.
    pub async fn download_coverage(
        &self,
        workspace: &str,
        layer: &str,
        bbox: [f64; 4],
        cellsize: f64,
        output: &Path,
    ) -> Result<PathBuf> {
        let url = wcs_coverage_url(&self.config.base_url, workspace, layer, bbox, cellsize);
        debug!(%url, "wcs GetCoverage");

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        // A rejected WCS request answers 200 with an exception document
        let head = String::from_utf8_lossy(&bytes[..bytes.len().min(512)]).to_string();
        if head.contains("ServiceException") {
            return Err(ClientError::ServiceException(head));
        }
        if !status.is_success() {
            return Err(ClientError::from_status(status.as_u16(), head));
        }

        tokio::fs::write(output, &bytes).await?;
        Ok(output.to_path_buf())
    }

    /// Download a coverage and read it into a [`GridRaster`].
    pub async fn get_raster_data(
        &self,
        workspace: &str,
        layer: &str,
        bbox: [f64; 4],
        cellsize: f64,
        work_dir: &Path,
    ) -> Result<GridRaster> {
        let output = work_dir.join(format!("{}.asc", layer));
        self.download_coverage(workspace, layer, bbox, cellsize, &output)
            .await?;
        Ok(read_grid(&output)?)
    }

    fn rest_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if path.is_empty() {
            format!("{}/rest", base)
        } else {
            format!("{}/rest/{}", base, path)
        }
    }

    async fn rest(
        &self,
        method: reqwest::Method,
        path: &str,
        content_type: Option<&str>,
        body: Option<Vec<u8>>,
    ) -> Result<String> {
        let url = self.rest_url(path);
        debug!(%url, %method, "geoserver rest request");

        let mut request = self
            .http
            .request(method, &url)
            .basic_auth(&self.config.username, Some(&self.config.password));
        if let Some(content_type) = content_type {
            request = request.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::from_status(status.as_u16(), text));
        }
        Ok(text)
    }
}

/// Generate a classified SLD for an ASCII grid file on disk.
pub fn generate_raster_style(path: &Path, mode: BinMode) -> Result<String> {
    let layer_name = layer_name_from_path(path)?;
    let raster = read_grid(path)?;
    let levels = raster.bins(STYLE_BINS, mode)?;
    Ok(raster_colormap_sld(&layer_name, &levels, raster.nodata_value()))
}

fn layer_name_from_path(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            ClientError::InvalidName(format!("cannot derive a layer name from {:?}", path))
        })
}

fn wcs_coverage_url(
    base_url: &str,
    workspace: &str,
    layer: &str,
    bbox: [f64; 4],
    cellsize: f64,
) -> String {
    format!(
        "{}/wcs?service=WCS&version=1.0.0&request=GetCoverage&coverage={}:{}\
         &crs=EPSG:4326&bbox={},{},{},{}&resx={}&resy={}&format=ArcGrid",
        base_url.trim_end_matches('/'),
        workspace,
        layer,
        bbox[0],
        bbox[1],
        bbox[2],
        bbox[3],
        cellsize,
        cellsize
    )
}
