use hugo_resolver::ResolveError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WrapperError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error at {path}: {message}")]
    Config { path: String, message: String },

    #[error("Failed to download {asset} from {url}: {message}")]
    DownloadFailed {
        asset: String,
        url: String,
        message: String,
    },

    #[error("Checksum verification failed for {file}: expected {expected}, got {actual}")]
    ChecksumVerification {
        file: String,
        expected: String,
        actual: String,
    },

    #[error("Archive extraction failed for {file}: {reason}. Supported formats: .tar.gz, .zip")]
    ArchiveExtraction { file: String, reason: String },

    #[error("Binary '{name}' not found in archive {archive}")]
    BinaryNotFound { name: String, archive: String },
}

pub type Result<T> = std::result::Result<T, WrapperError>;
