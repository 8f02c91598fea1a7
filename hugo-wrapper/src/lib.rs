//! # hugo-wrapper
//!
//! Runs any Hugo version, installing it from GitHub releases on first use.
//!
//! ## Overview
//!
//! `hugo-wrapper` resolves a version specifier such as `latest`, `0.73` or
//! `v0.72.3-extended` with [`hugo_resolver`], downloads the archive published
//! for the host platform, verifies its SHA-256 checksum, and unpacks the `hugo`
//! binary into a per-version directory. Later runs reuse the installed binary.
//!
//! ## Usage
//!
//! ```bash
//! # Run the latest release
//! hugo-wrapper server -D
//!
//! # Run the newest 0.73.x extended build
//! hugo-wrapper --hugo-version 0.73-extended --minify
//!
//! # Pin the version through the environment
//! HUGO_VERSION=0.53 hugo-wrapper version
//! ```
//!
//! ## Configuration
//!
//! Defaults can be set in `hugo-wrapper.toml` in the user configuration
//! directory, or in the file passed with `--wrapper-config`.

/// Command-line interface definitions
pub mod cli;

/// Configuration file handling and command line overrides
pub mod config;

/// Streaming asset downloads
pub mod download;

/// Error types for installing and running Hugo
pub mod error;

/// Per-version install directory management
pub mod installer;

/// Network retry logic with exponential backoff
pub mod retry;

/// Archive extraction, checksums and file permissions
pub mod utils;
