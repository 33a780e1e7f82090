//! GeoServer REST and WCS client with structured layer handles and SLD
//! generation for classified raster styles.

pub mod client;
pub mod error;
pub mod handle;
pub mod sld;

pub use client::{generate_raster_style, Geoserver, GeoserverConfig};
pub use error::{ClientError, Result};
pub use handle::{HandleParseError, LayerHandle};
pub use sld::raster_colormap_sld;
