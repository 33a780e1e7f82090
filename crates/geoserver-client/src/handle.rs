//! Structured GeoServer layer handles.
//!
//! A handle bundles credentials, server URL, optional workspace and layer
//! name into a single token that can travel through an API call:
//!
//! ```text
//! handle    = username ":" password "@" url "/" [ "[" workspace "]" "/" ] layer
//! url       = [ scheme "://" ] host [ ":" port ] *( "/" segment )
//! ```
//!
//! `username` must not contain `:`; `username` and `password` must not
//! contain `@`; `workspace` and `layer` must not contain `/`. Every field
//! except the workspace must be non-empty; a handle with an empty layer name
//! is rejected rather than guessed at.

use std::fmt;

use thiserror::Error;

/// Credentials plus the location of one layer on one GeoServer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerHandle {
    pub username: String,
    pub password: String,
    pub url: String,
    pub workspace: Option<String>,
    pub layer: String,
}

/// Errors from parsing or constructing a layer handle.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HandleParseError {
    #[error("missing '@' between credentials and url in '{0}'")]
    MissingCredentialsSeparator(String),

    #[error("missing ':' between username and password in '{0}'")]
    MissingPasswordSeparator(String),

    #[error("missing '/' between url and layer name in '{0}'")]
    MissingLayerSeparator(String),

    #[error("unterminated workspace brackets in '{0}'")]
    BadWorkspaceBrackets(String),

    #[error("empty {field} in '{handle}'")]
    EmptyField {
        field: &'static str,
        handle: String,
    },
}

impl LayerHandle {
    /// Build a handle from its parts. An empty workspace is normalized to
    /// `None`; every other empty field is rejected.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        url: impl Into<String>,
        workspace: Option<String>,
        layer: impl Into<String>,
    ) -> Result<Self, HandleParseError> {
        let handle = Self {
            username: username.into(),
            password: password.into(),
            url: url.into(),
            workspace: workspace.filter(|w| !w.is_empty()),
            layer: layer.into(),
        };
        handle.validate()?;
        Ok(handle)
    }

    /// Parse the textual handle form.
    pub fn parse(s: &str) -> Result<Self, HandleParseError> {
        let (credentials, location) = s
            .split_once('@')
            .ok_or_else(|| HandleParseError::MissingCredentialsSeparator(s.to_string()))?;
        let (username, password) = credentials
            .split_once(':')
            .ok_or_else(|| HandleParseError::MissingPasswordSeparator(s.to_string()))?;

        let (prefix, layer) = location
            .rsplit_once('/')
            .ok_or_else(|| HandleParseError::MissingLayerSeparator(s.to_string()))?;

        let (url, workspace) = if prefix.ends_with(']') {
            let open = prefix
                .rfind("/[")
                .ok_or_else(|| HandleParseError::BadWorkspaceBrackets(s.to_string()))?;
            let workspace = &prefix[open + 2..prefix.len() - 1];
            (&prefix[..open], Some(workspace.to_string()))
        } else {
            (prefix, None)
        };

        let handle = Self {
            username: username.to_string(),
            password: password.to_string(),
            url: url.to_string(),
            workspace,
            layer: layer.to_string(),
        };
        handle.validate()?;
        Ok(handle)
    }

    /// The layer name qualified by its workspace, as GeoServer names it:
    /// `workspace:layer`, or just `layer` for the default workspace.
    pub fn qualified_name(&self) -> String {
        match &self.workspace {
            Some(ws) => format!("{}:{}", ws, self.layer),
            None => self.layer.clone(),
        }
    }

    fn validate(&self) -> Result<(), HandleParseError> {
        let empty = |field| HandleParseError::EmptyField {
            field,
            handle: self.to_string(),
        };
        if self.username.is_empty() {
            return Err(empty("username"));
        }
        if self.password.is_empty() {
            return Err(empty("password"));
        }
        if self.url.is_empty() {
            return Err(empty("url"));
        }
        if self.layer.is_empty() {
            return Err(empty("layer name"));
        }
        if matches!(&self.workspace, Some(ws) if ws.is_empty()) {
            return Err(empty("workspace"));
        }
        Ok(())
    }
}

impl fmt::Display for LayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}/", self.username, self.password, self.url)?;
        if let Some(ws) = &self.workspace {
            write!(f, "[{}]/", ws)?;
        }
        write!(f, "{}", self.layer)
    }
}

impl std::str::FromStr for LayerHandle {
    type Err = HandleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
