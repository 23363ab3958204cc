//! Error type shared by every stage of certificate generation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while generating certificates.
///
/// Whether an error aborts the run or only skips a record is decided by the
/// orchestrator in [`crate::pipeline`], not by the variant.
#[derive(Debug, Error)]
pub enum CertError {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode image '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot encode image '{}': {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to parse font: {reason}")]
    FontParse { reason: String },

    #[error("malformed record{}: {source}", line_suffix(*line))]
    Record {
        line: Option<u64>,
        #[source]
        source: csv::Error,
    },

    #[error("malformed record{}: {reason}", line_suffix(*line))]
    MalformedRow { line: Option<u64>, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot read config file '{}': {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CertError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Source line the error refers to, when it is tied to one record.
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::Record { line, .. } | Self::MalformedRow { line, .. } => *line,
            _ => None,
        }
    }
}

fn line_suffix(line: Option<u64>) -> String {
    line.map(|l| format!(" on line {l}")).unwrap_or_default()
}

pub type Result<T, E = CertError> = std::result::Result<T, E>;
