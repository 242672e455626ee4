use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why a capture file could not be turned into a packet table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("capture file {} not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {detail}", .path.display())]
    Parse { path: PathBuf, detail: String },

    #[error("{} is missing required columns: {}", .path.display(), .missing.join(", "))]
    SchemaViolation { path: PathBuf, missing: Vec<String> },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::NotFound { path }
            | LoadError::Io { path, .. }
            | LoadError::Parse { path, .. }
            | LoadError::SchemaViolation { path, .. } => path,
        }
    }

    /// Message shown to dashboard and API users.
    pub fn user_message(&self) -> String {
        let file = self
            .path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path().display().to_string());

        match self {
            LoadError::NotFound { .. } => format!(
                "Could not load {file} file. Please make sure it exists in the project directory."
            ),
            LoadError::Io { source, .. } => format!("Could not read {file}: {source}"),
            LoadError::Parse { detail, .. } => format!("Could not parse {file}: {detail}"),
            LoadError::SchemaViolation { missing, .. } => {
                format!("{file} is missing required columns: {}", missing.join(", "))
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid chart input: {0}")]
    InvalidInput(String),

    #[error("failed to encode chart image: {0}")]
    Encode(#[from] image::ImageError),
}
