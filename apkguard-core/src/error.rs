use thiserror::Error;
use uuid::Uuid;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum ApkGuardError {
    /// Shown to the user verbatim when a selection contains no APKs
    #[error("Please upload valid APK files only.")]
    NoApkFiles,

    #[error("File not found in upload list: {0}")]
    FileNotFound(Uuid),

    #[error("A scan is already running for {0}")]
    ScanInProgress(String),

    #[error("Invalid phase table: {0}")]
    InvalidPhaseTable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type Result<T> = std::result::Result<T, ApkGuardError>;
