use std::path::PathBuf;

/// Errors raised while configuring the pipeline or processing a medium.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unreadable medium {path}: {reason}")]
    UnreadableMedium { path: PathBuf, reason: String },

    #[error("Medium {path} is outside media root {root}")]
    OutsideMediaRoot { path: PathBuf, root: PathBuf },

    #[error("Invalid frame size {width}x{height}")]
    InvalidFrameSize { width: u32, height: u32 },
}

impl Error {
    /// Whether this error only affects the medium being processed.
    pub fn is_medium_local(&self) -> bool {
        matches!(
            self,
            Error::UnreadableMedium { .. }
                | Error::OutsideMediaRoot { .. }
                | Error::InvalidFrameSize { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
