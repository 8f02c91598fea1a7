use hugo_resolver::{AssetLocation, Platform, ReleaseRegistry, ResolvedVersion, Resolver};
use std::fs;
use std::path::{Path, PathBuf};

use crate::download::Downloader;
use crate::error::{Result, WrapperError};
use crate::utils;

/// Keeps one directory per installed Hugo version below `install_dir`.
pub struct Installer {
    install_dir: PathBuf,
    downloader: Downloader,
    skip_checksum: bool,
}

impl Installer {
    pub fn new(install_dir: PathBuf, downloader: Downloader, skip_checksum: bool) -> Self {
        Self {
            install_dir,
            downloader,
            skip_checksum,
        }
    }

    /// Where the binary of `version` lives once installed
    pub fn executable_path(&self, version: &ResolvedVersion, platform: &Platform) -> PathBuf {
        self.install_dir
            .join(version.to_string())
            .join(platform.binary_name())
    }

    pub fn is_installed(&self, version: &ResolvedVersion, platform: &Platform) -> bool {
        self.executable_path(version, platform).is_file()
    }

    /// Return the binary of `version`, downloading and unpacking it first if needed.
    pub async fn ensure_installed<R: ReleaseRegistry>(
        &self,
        resolver: &mut Resolver<R>,
        version: &ResolvedVersion,
    ) -> Result<PathBuf> {
        let platform = resolver.platform().clone();
        let dest_path = self.executable_path(version, &platform);

        if dest_path.is_file() {
            tracing::debug!("Hugo {} already installed at {}", version, dest_path.display());
            return Ok(dest_path);
        }

        tracing::info!("Installing Hugo {} for {}/{}", version, platform.os(), platform.arch());

        let asset = resolver.asset_download_url(version).await?;
        let archive = self.downloader.download(&asset).await?;

        if self.skip_checksum {
            tracing::warn!("Skipping checksum verification (--skip-checksum was specified)");
        } else {
            match resolver.checksums_asset(version).await? {
                Some(checksums) => {
                    self.verify_checksum(&checksums, &asset, archive.path())
                        .await?
                }
                None => tracing::warn!(
                    "Release of {} publishes no checksums file, continuing without verification",
                    version
                ),
            }
        }

        let extracted_dir = utils::extract_archive(archive.path())?;
        let binary = utils::find_binary(extracted_dir.path(), platform.binary_name())?
            .ok_or_else(|| WrapperError::BinaryNotFound {
                name: platform.binary_name().to_string(),
                archive: asset.name.clone(),
            })?;

        self.install_binary(&binary, &dest_path)?;

        tracing::info!("Installed Hugo {} to {}", version, dest_path.display());
        Ok(dest_path)
    }

    fn install_binary(&self, source: &Path, dest_path: &Path) -> Result<()> {
        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::copy(source, dest_path)?;
        utils::make_executable(dest_path)?;

        Ok(())
    }

    async fn verify_checksum(
        &self,
        checksums: &AssetLocation,
        asset: &AssetLocation,
        file_path: &Path,
    ) -> Result<()> {
        tracing::info!("Found checksum file: {}", checksums.name);

        let content = self.downloader.download_text(checksums).await?;
        let expected = utils::parse_checksum(&content, &asset.name).ok_or_else(|| {
            WrapperError::ChecksumVerification {
                file: asset.name.clone(),
                expected: "Unknown".to_string(),
                actual: format!("Not listed in {}", checksums.name),
            }
        })?;
        let actual = utils::calculate_sha256(file_path)?;

        if !actual.eq_ignore_ascii_case(&expected) {
            tracing::error!(
                "Checksum mismatch for {}: expected {}, got {}",
                asset.name,
                expected,
                actual
            );
            return Err(WrapperError::ChecksumVerification {
                file: asset.name.clone(),
                expected,
                actual,
            });
        }

        tracing::info!("Checksum verified successfully for {}", asset.name);
        Ok(())
    }
}
