//! Release registry abstraction.
//!
//! [`ReleasePages`] is the narrow paging interface the [`crate::pager`] walks;
//! [`ReleaseRegistry`] adds the direct lookups the resolver needs.

#[cfg(test)]
use mockall::automock;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::Result;

/// A published release as listed by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    #[serde(default)]
    name: Option<String>,
    tag_name: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    assets: Vec<Asset>,
}

impl Release {
    pub fn new(tag: impl Into<String>, created_at: DateTime<Utc>, assets: Vec<Asset>) -> Self {
        let tag = tag.into();
        Self {
            name: Some(tag.clone()),
            tag_name: tag,
            created_at,
            assets,
        }
    }

    /// Release name, which carries the version tag for Hugo releases.
    pub fn name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.tag_name,
        }
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn asset(&self, name: &str) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: u64,
}

impl Asset {
    pub fn new(name: impl Into<String>, browser_download_url: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            browser_download_url: browser_download_url.into(),
            size,
        }
    }
}

/// One page of the newest-first release listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReleasePage {
    pub releases: Vec<Release>,
    pub next_page: Option<u32>,
}

impl ReleasePage {
    pub fn new(releases: Vec<Release>, next_page: Option<u32>) -> Self {
        Self {
            releases,
            next_page,
        }
    }

    pub fn oldest(&self) -> Option<&Release> {
        self.releases.last()
    }
}

/// Paged, newest-first access to the release history.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleasePages: Send + Sync {
    /// Fetch page `page` (1-based) of the release listing.
    async fn list_releases(&self, page: u32) -> Result<ReleasePage>;
}

#[async_trait::async_trait]
pub trait ReleaseRegistry: ReleasePages {
    async fn latest_release(&self) -> Result<Release>;

    async fn release_by_tag(&self, tag: &str) -> Result<Release>;

    /// The release published immediately before the release tagged `tag`.
    async fn previous_release(&self, tag: &str) -> Result<Release>;
}
