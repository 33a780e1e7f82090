//! Error types for GeoServer interactions.

use thiserror::Error;

use crate::handle::HandleParseError;

/// Result type alias using ClientError.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors raised while talking to a GeoServer instance.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The REST endpoint could not be reached or did not look like GeoServer.
    #[error("could not connect to geoserver at {url}: {message}")]
    Connection { url: String, message: String },

    /// The server answered with a failure status.
    #[error("geoserver request failed ({status} {reason}): {message}")]
    Http {
        status: u16,
        reason: &'static str,
        message: String,
    },

    /// A WCS request came back with a service exception document.
    #[error("wcs request rejected: {0}")]
    ServiceException(String),

    /// A layer or style name the API cannot work with.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Malformed layer handle.
    #[error(transparent)]
    Handle(#[from] HandleParseError),

    /// Failure in the raster core while preparing or consuming a coverage.
    #[error(transparent)]
    Raster(#[from] raster_core::RasterError),

    /// Transport-level failure.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// A response body that should have been JSON but was not.
    #[error("malformed response body: {0}")]
    Json(#[from] serde_json::Error),

    /// Local file IO failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Map a failure status code to an error named the way operators see it.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let reason = match status {
            404 => "Not Exist",
            405 => "Method Not Allowed",
            500 => "Internal Server Error",
            _ => "Unexpected Status",
        };
        Self::Http {
            status,
            reason,
            message: message.into(),
        }
    }
}
