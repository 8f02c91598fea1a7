//! # hugo-resolver
//!
//! Resolves partial Hugo version specifiers into concrete GitHub releases.
//!
//! ## Overview
//!
//! The GitHub releases API offers no lookup by version, only a newest-first
//! paginated listing. `hugo-resolver` parses a specifier such as `latest`,
//! `0.73` or `v0.72.3-extended`, finds the highest matching release while
//! fetching as few pages as possible, and builds the name of the archive
//! published for the host platform.
//!
//! ## Usage
//!
//! ```no_run
//! # async fn run() -> hugo_resolver::error::Result<()> {
//! use hugo_resolver::{GitHubRegistry, Platform, Resolver};
//!
//! let registry = GitHubRegistry::new("gohugoio", "hugo")?;
//! let mut resolver = Resolver::new(registry, Platform::current());
//!
//! let version = resolver.resolve("0.73-extended").await?;
//! let asset = resolver.asset_download_url(&version).await?;
//! println!("{version}: {}", asset.url);
//! # Ok(())
//! # }
//! ```

/// Host platform mapping and asset names
pub mod asset;

/// Error types for version resolution
pub mod error;

/// GitHub REST implementation of the release registry
pub mod github;

/// Page-walking searches over the release listing
pub mod pager;

/// Release model and registry traits
pub mod registry;

/// Resolution of specifiers into releases and download locations
pub mod resolver;

/// Specifier parsing and precision-aware comparison
pub mod version;

pub use asset::Platform;
pub use error::ResolveError;
pub use github::GitHubRegistry;
pub use registry::{Asset, Release, ReleasePage, ReleasePages, ReleaseRegistry};
pub use resolver::{AssetLocation, Resolver};
pub use version::{CoreVersion, Precision, ResolvedVersion, VersionSpec};
