use std::cmp::Ordering;

use tracing::{debug, info};

use crate::asset::{asset_name, checksums_asset_name, Platform};
use crate::error::{ResolveError, Result};
use crate::pager::find_highest_release;
use crate::registry::{Asset, Release, ReleaseRegistry};
use crate::version::{pins_legacy_release, CoreVersion, Precision, ResolvedVersion, VersionSpec};

/// Downloadable asset of a resolved release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLocation {
    pub name: String,
    pub url: String,
    pub size: u64,
}

impl From<&Asset> for AssetLocation {
    fn from(asset: &Asset) -> Self {
        Self {
            name: asset.name.clone(),
            url: asset.browser_download_url.clone(),
            size: asset.size,
        }
    }
}

/// Resolves specifiers for one session.
///
/// The latest release and the most recently resolved release are cached on the
/// resolver and never invalidated; create a new resolver for a new session.
pub struct Resolver<R> {
    registry: R,
    platform: Platform,
    latest: Option<(CoreVersion, Release)>,
    selected: Option<(CoreVersion, Release)>,
}

impl<R: ReleaseRegistry> Resolver<R> {
    pub fn new(registry: R, platform: Platform) -> Self {
        Self {
            registry,
            platform,
            latest: None,
            selected: None,
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Resolve a specifier such as `latest`, `0.73` or `v0.72.3-extended`.
    pub async fn resolve(&mut self, specifier: &str) -> Result<ResolvedVersion> {
        let resolved = match specifier.parse::<VersionSpec>()? {
            VersionSpec::Latest { extended } => {
                let (version, release) = self.latest().await?.clone();
                self.selected = Some((version, release));
                ResolvedVersion::new(version, extended)
            }
            VersionSpec::Partial {
                core,
                precision,
                extended,
            } if pins_legacy_release(&core, precision) => {
                debug!("{} names a legacy release, no lookup needed", specifier);
                ResolvedVersion::new(core, extended)
            }
            VersionSpec::Partial {
                core,
                precision,
                extended,
            } => {
                let (version, release) = self.resolve_core(&core, precision).await?;
                self.selected = Some((version, release));
                ResolvedVersion::new(version, extended)
            }
        };

        info!("Resolved Hugo version '{}' to {}", specifier, resolved);
        Ok(resolved)
    }

    /// Download location of the archive for `version` on this resolver's platform.
    pub async fn asset_download_url(&mut self, version: &ResolvedVersion) -> Result<AssetLocation> {
        let name = asset_name(version, &self.platform)?;
        let release = self.release_for(version).await?;

        release
            .asset(&name)
            .map(AssetLocation::from)
            .ok_or_else(|| {
                let available = release
                    .assets()
                    .iter()
                    .map(|asset| asset.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                ResolveError::AssetNotFound {
                    asset: name.clone(),
                    release: release.name().to_string(),
                    available: if available.is_empty() {
                        "No assets available".to_string()
                    } else {
                        available
                    },
                }
            })
    }

    /// The checksums file published with `version`, if the release has one.
    pub async fn checksums_asset(&mut self, version: &ResolvedVersion) -> Result<Option<AssetLocation>> {
        let name = checksums_asset_name(version);
        let release = self.release_for(version).await?;
        Ok(release.asset(&name).map(AssetLocation::from))
    }

    async fn latest(&mut self) -> Result<&(CoreVersion, Release)> {
        let latest = match self.latest.take() {
            Some(latest) => {
                debug!("Using cached latest release {}", latest.1.name());
                latest
            }
            None => {
                let release = self.registry.latest_release().await?;
                let version = CoreVersion::from_tag(release.name())?;
                debug!("Latest release is {}", release.name());
                (version, release)
            }
        };
        Ok(self.latest.insert(latest))
    }

    async fn resolve_core(
        &mut self,
        desired: &CoreVersion,
        precision: Precision,
    ) -> Result<(CoreVersion, Release)> {
        let (latest_version, latest_release) = self.latest().await?.clone();

        match desired.compare(&latest_version, precision) {
            Ordering::Greater => Err(ResolveError::VersionTooNew {
                requested: desired.prefix(precision),
                latest: latest_release.name().to_string(),
            }),
            Ordering::Equal => Ok((latest_version, latest_release)),
            Ordering::Less => {
                let release = find_highest_release(&self.registry, desired, precision).await?;
                let version = CoreVersion::from_tag(release.name())?;
                Ok((version, release))
            }
        }
    }

    /// The release holding `version`, reusing the last resolved one when it matches.
    async fn release_for(&mut self, version: &ResolvedVersion) -> Result<&Release> {
        let selected = match self.selected.take() {
            Some(selected) if selected.0.matches(version.core(), Precision::Patch) => selected,
            _ => {
                debug!("Looking up the release of {}", version.core());
                self.resolve_core(version.core(), Precision::Patch).await?
            }
        };
        Ok(&self.selected.insert(selected).1)
    }
}
