//! Image search HTTP client.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::error::{ImageError, ImageResult};
use crate::resize::save_jpeg;
use crate::types::SearchResponse;

/// Configuration for the image search client.
#[derive(Debug, Clone)]
pub struct ImageSearchConfig {
    /// Base URL of the search API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// How many candidates to try per keyword
    pub max_candidates: usize,
}

impl Default for ImageSearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openverse.org".to_string(),
            timeout: Duration::from_secs(60),
            max_candidates: 3,
        }
    }
}

impl ImageSearchConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("STORYCAST_IMAGE_API_URL")
                .unwrap_or_else(|_| "https://api.openverse.org".to_string()),
            timeout: Duration::from_secs(
                std::env::var("STORYCAST_IMAGE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            max_candidates: std::env::var("STORYCAST_IMAGE_CANDIDATES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
        }
    }
}

/// Client for a CC-licensed image search API.
pub struct ImageSearchClient {
    http: Client,
    config: ImageSearchConfig,
}

impl ImageSearchClient {
    /// Create a new client.
    pub fn new(config: ImageSearchConfig) -> ImageResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent("storycast/0.1")
            .build()
            .map_err(ImageError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ImageResult<Self> {
        Self::new(ImageSearchConfig::from_env())
    }

    /// Search for candidate image URLs.
    pub async fn search(&self, keyword: &str) -> ImageResult<Vec<String>> {
        let url = format!("{}/v1/images/", self.config.base_url);
        debug!("Searching images for '{}' at {}", keyword, url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", keyword),
                ("page_size", &self.config.max_candidates.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ImageError::SearchFailed(format!(
                "search API returned {} for '{}'",
                response.status(),
                keyword
            )));
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.results.into_iter().map(|r| r.url).collect())
    }

    /// Download the first candidate that decodes as a valid image and save
    /// it as JPEG at `dest`.
    pub async fn fetch_illustration(&self, keyword: &str, dest: &Path) -> ImageResult<()> {
        let candidates = self.search(keyword).await?;

        if candidates.is_empty() {
            return Err(ImageError::NoUsableImage(keyword.to_string()));
        }

        for url in candidates {
            match self.download_and_validate(&url).await {
                Ok(img) => {
                    save_jpeg(&img, dest)?;
                    info!("Downloaded image for '{}': {}", keyword, dest.display());
                    return Ok(());
                }
                Err(e) => {
                    warn!("Candidate {} rejected: {}", url, e);
                }
            }
        }

        Err(ImageError::NoUsableImage(keyword.to_string()))
    }

    async fn download_and_validate(&self, url: &str) -> ImageResult<image::DynamicImage> {
        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ImageError::SearchFailed(format!(
                "download returned {} for {}",
                response.status(),
                url
            )));
        }

        let bytes = response.bytes().await?;
        Ok(image::load_from_memory(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ImageSearchConfig::default();
        assert_eq!(config.base_url, "https://api.openverse.org");
        assert_eq!(config.max_candidates, 3);
    }
}
