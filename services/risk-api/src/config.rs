//! Service configuration.

use std::path::PathBuf;

/// Runtime configuration assembled once in main and shared through the
/// application state. There is no process-wide mutable configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Port the HTTP API listens on.
    pub port: u16,

    /// Directory for downloaded and computed grid files.
    pub work_dir: PathBuf,

    /// Workspace that receives computed impact layers when the output
    /// handle does not name one.
    pub default_workspace: String,

    /// Grid resolution requested from WCS when a caller does not specify
    /// one (degrees, square pixels).
    pub default_cellsize: f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            work_dir: std::env::temp_dir().join("risk-api"),
            default_workspace: "impact".to_string(),
            default_cellsize: raster_core::DEFAULT_CELLSIZE,
        }
    }
}

impl ServiceConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("port must be > 0".to_string());
        }
        if self.default_workspace.is_empty() {
            return Err("default_workspace must not be empty".to_string());
        }
        if !(self.default_cellsize > 0.0) {
            return Err("default_cellsize must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.port, 8000);
        assert_eq!(config.default_workspace, "impact");
    }

    #[test]
    fn test_config_validation() {
        let mut config = ServiceConfig::default();
        config.port = 0;
        assert!(config.validate().is_err());

        config = ServiceConfig::default();
        config.default_workspace = String::new();
        assert!(config.validate().is_err());

        config = ServiceConfig::default();
        config.default_cellsize = 0.0;
        assert!(config.validate().is_err());
    }
}
