//! # Tinify Client Module
//!
//! Implementazione concreta di `Compressor` contro l'API TinyPNG.
//!
//! ## Responsabilità:
//! - Upload del file sorgente all'endpoint `/shrink` con basic auth
//! - Parsing della risposta JSON (url e dimensione dell'output)
//! - Download a chunk del payload compresso con report di fase/percentuale
//! - Scrittura atomica sull'output path risolto dalle impostazioni
//!
//! ## Ripartizione del progresso:
//! Upload ed elaborazione remota coprono la banda 0-50%, il download la
//! banda 50-99%; l'ultimo punto resta alla scrittura su disco.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

use crate::compressor::{CompressedImage, Compressor};
use crate::error::CompressError;
use crate::file_manager::FileManager;
use crate::registry::CompressionPhase;
use crate::scheduler::{PathResolver, ProgressReporter, WORKER_POOL_SIZE};
use crate::settings::AppSettings;

const SHRINK_ENDPOINT: &str = "https://api.tinify.com/shrink";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
/// Sotto questa soglia il payload scaricato è sicuramente troncato
const MIN_VALID_OUTPUT: usize = 64;

#[derive(Debug, Deserialize)]
struct ShrinkResponse {
    output: ShrinkOutput,
}

#[derive(Debug, Deserialize)]
struct ShrinkOutput {
    url: String,
    size: u64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// TinyPNG-backed compressor, shared by every worker in the pool
pub struct TinifyClient {
    http: reqwest::Client,
}

impl TinifyClient {
    /// Un solo client HTTP per processo: il connection pool viene riusato
    /// da tutti i worker
    pub fn new() -> Result<Self, CompressError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .pool_max_idle_per_host(WORKER_POOL_SIZE)
            .build()?;
        Ok(Self { http })
    }

    async fn shrink(&self, data: Vec<u8>, api_key: &str) -> Result<ShrinkResponse, CompressError> {
        let response = self
            .http
            .post(SHRINK_ENDPOINT)
            .basic_auth("api", Some(api_key))
            .body(data)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<ApiErrorBody>()
                .await
                .map(|body| body.message)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            return Err(CompressError::Api(message));
        }

        Ok(response.json::<ShrinkResponse>().await?)
    }

    async fn download(
        &self,
        url: &str,
        api_key: &str,
        expected_size: u64,
        progress: &ProgressReporter,
    ) -> Result<Vec<u8>, CompressError> {
        let mut response = self
            .http
            .get(url)
            .basic_auth("api", Some(api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CompressError::Api(format!(
                "download failed: HTTP {}",
                response.status()
            )));
        }

        let mut data = Vec::with_capacity(expected_size as usize);
        let mut last_percent = 50u8;
        while let Some(chunk) = response.chunk().await? {
            data.extend_from_slice(&chunk);
            if expected_size > 0 {
                let percent = (50.0 + data.len() as f64 / expected_size as f64 * 49.0) as u8;
                if percent > last_percent {
                    last_percent = percent;
                    progress.report(percent, CompressionPhase::Downloading);
                }
            }
        }
        Ok(data)
    }
}

impl Compressor for TinifyClient {
    async fn compress(
        &self,
        path: &Path,
        settings: &AppSettings,
        progress: &ProgressReporter,
    ) -> Result<CompressedImage, CompressError> {
        if !path.exists() {
            return Err(CompressError::FileNotFound(path.display().to_string()));
        }
        if !FileManager::is_supported_image(path) {
            return Err(CompressError::UnsupportedFormat(path.display().to_string()));
        }

        let input_data = fs::read(path).await?;
        let input_size = input_data.len() as u64;

        progress.report(0, CompressionPhase::Uploading);
        let shrink = self.shrink(input_data, &settings.api_key).await?;
        progress.report(40, CompressionPhase::Processing);

        progress.report(50, CompressionPhase::Downloading);
        let compressed = self
            .download(&shrink.output.url, &settings.api_key, shrink.output.size, progress)
            .await?;
        if compressed.len() < MIN_VALID_OUTPUT {
            return Err(CompressError::Api(format!(
                "downloaded file looks truncated ({} bytes)",
                compressed.len()
            )));
        }

        let output_path = PathResolver::output_path(path, settings)?;
        FileManager::write_atomic(&output_path, &compressed)?;

        let output_size = compressed.len() as u64;
        debug!(
            "compressed {} -> {} ({} -> {})",
            path.display(),
            output_path.display(),
            FileManager::format_size(input_size),
            FileManager::format_size(output_size)
        );

        Ok(CompressedImage {
            input_size,
            output_size,
            output_path,
        })
    }
}
