use futures_util::StreamExt;
use hugo_resolver::AssetLocation;
use reqwest::Client;
use std::io::Write;
use std::time::Duration;

use crate::error::{Result, WrapperError};
use crate::retry::{with_retry, RetryConfig};

/// Downloads release assets, retrying transient failures.
pub struct Downloader {
    http_client: Client,
    retry_config: RetryConfig,
}

impl Downloader {
    pub fn new(timeout: Duration, retry_config: RetryConfig) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(concat!("hugo-wrapper/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            retry_config,
        })
    }

    /// Download asset to a temporary file keeping the asset's extension
    pub async fn download(&self, asset: &AssetLocation) -> Result<tempfile::NamedTempFile> {
        tracing::info!("Downloading asset: {} ({} bytes)", asset.name, asset.size);

        let operation_name = format!("Downloading {}", asset.name);
        let extension = archive_extension(&asset.name);

        with_retry(&operation_name, &self.retry_config, || {
            let http_client = self.http_client.clone();
            let url = asset.url.clone();

            async move {
                let response = http_client.get(&url).send().await?.error_for_status()?;

                let mut temp_file = tempfile::Builder::new()
                    .prefix("hugo-archive")
                    .suffix(extension)
                    .tempfile()?;

                let mut stream = response.bytes_stream();
                while let Some(chunk) = stream.next().await {
                    temp_file.write_all(&chunk?)?;
                }
                temp_file.flush()?;

                Ok::<_, anyhow::Error>(temp_file)
            }
        })
        .await
        .map_err(|e| WrapperError::DownloadFailed {
            asset: asset.name.clone(),
            url: asset.url.clone(),
            message: e.to_string(),
        })
    }

    /// Download a small text asset such as a checksums file
    pub async fn download_text(&self, asset: &AssetLocation) -> Result<String> {
        let file = self.download(asset).await?;
        Ok(std::fs::read_to_string(file.path())?)
    }
}

fn archive_extension(name: &str) -> &'static str {
    if name.ends_with(".tar.gz") {
        ".tar.gz"
    } else if name.ends_with(".zip") {
        ".zip"
    } else {
        ""
    }
}
