use thiserror::Error;

use crate::version::Precision;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Invalid version '{input}'. Expected format: latest[-extended] or [v]int[.int[.int]][-extended] (e.g., 0.73, v0.72.3-extended)")]
    InvalidSpecFormat { input: String },

    #[error("Requested version {requested} is newer than the latest available release {latest}")]
    VersionTooNew { requested: String, latest: String },

    #[error("No release matching {requested} (compared on {precision}) was found")]
    VersionNotFound {
        requested: String,
        precision: Precision,
    },

    #[error("Release not found: {tag}")]
    ReleaseNotFound { tag: String },

    #[error("No release older than {tag} exists")]
    NoPreviousRelease { tag: String },

    #[error("No asset named '{asset}' in release {release}. Available assets: {available}")]
    AssetNotFound {
        asset: String,
        release: String,
        available: String,
    },

    #[error("No Hugo build is published for platform {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Release registry unavailable while {operation}: {}", registry_failure(.source))]
    RegistryUnavailable {
        operation: String,
        #[source]
        source: octocrab::Error,
    },
}

/// octocrab's own `Display` names only the variant, so spell out what the API returned.
fn registry_failure(error: &octocrab::Error) -> String {
    match error {
        octocrab::Error::GitHub { source, .. } => {
            format!("{} {}", source.status_code, source.message)
        }
        other => match std::error::Error::source(other) {
            Some(cause) => format!("{other}: {cause}"),
            None => other.to_string(),
        },
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
