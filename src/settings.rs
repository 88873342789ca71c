//! # Settings Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `AppSettings` con tutti i parametri di compressione
//! - Persiste le impostazioni in JSON nella config directory dell'utente
//! - Fornisce `SettingsStore`, l'handle condiviso alle impostazioni "live"
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri:
//! - `api_key`: Credenziale per l'API di compressione (default: vuota)
//! - `notify_mode`: Come annunciare il risultato del batch (default: notification)
//! - `output_mode`: Dove scrivere i file compressi (default: alongside)
//! - `output_directory`: Directory di output per la modalità `directory`
//!
//! ## Isolamento dello snapshot:
//! Uno snapshot è un semplice clone preso a inizio run tramite
//! `SettingsStore::snapshot()`. Le modifiche alle impostazioni live durante
//! un run non toccano mai il lavoro in volo.
//!
//! ## Persistence:
//! - Load fallito (file assente, JSON corrotto) degrada silenziosamente ai default
//! - Save fallito risale al chiamante come errore hard

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tokio::fs;
use tracing::debug;

use crate::error::CompressError;

/// How the batch result is announced once a run completes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NotifyMode {
    Dialog,
    Notification,
    Silent,
}

/// Where compressed files are written
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Next to the original, with a `-tiny` suffix
    Alongside,
    /// Replace the original in place
    Overwrite,
    /// Into a configured output directory
    Directory,
}

/// Configuration for a compression session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Credential for the compression API
    pub api_key: String,
    /// How the batch result is announced
    pub notify_mode: NotifyMode,
    /// Where compressed files are written
    pub output_mode: OutputMode,
    /// Output directory (only used when `output_mode` is `directory`)
    pub output_directory: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            notify_mode: NotifyMode::Notification,
            output_mode: OutputMode::Alongside,
            output_directory: String::new(),
        }
    }
}

impl AppSettings {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), CompressError> {
        if self.output_mode == OutputMode::Directory && self.output_directory.trim().is_empty() {
            return Err(CompressError::Output(
                "output mode 'directory' requires an output directory".to_string(),
            ));
        }
        Ok(())
    }
}

/// Handle condiviso alle impostazioni live della sessione.
///
/// Lo scheduler preleva uno snapshot a inizio run; il resto dell'applicazione
/// può continuare a modificare le impostazioni tramite `update` senza
/// influenzare i batch in volo.
#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<RwLock<AppSettings>>,
}

impl SettingsStore {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings)),
        }
    }

    /// Copia immutabile delle impostazioni correnti
    pub fn snapshot(&self) -> AppSettings {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Applica una modifica alle impostazioni live
    pub fn update<F>(&self, apply: F)
    where
        F: FnOnce(&mut AppSettings),
    {
        let mut settings = self.inner.write().unwrap_or_else(|e| e.into_inner());
        apply(&mut settings);
    }
}

fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tiny-compress")
        .join("settings.json")
}

/// Load settings from the default per-user location, falling back to defaults
pub async fn load() -> AppSettings {
    load_from(&config_path()).await
}

/// Load settings from a specific path, falling back to defaults on any failure
pub async fn load_from(path: &Path) -> AppSettings {
    match fs::read_to_string(path).await {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            debug!("saved settings are unreadable ({}), using defaults", e);
            AppSettings::default()
        }),
        Err(e) => {
            debug!("no saved settings ({}), using defaults", e);
            AppSettings::default()
        }
    }
}

/// Save settings to the default per-user location
pub async fn save(settings: &AppSettings) -> Result<(), CompressError> {
    save_to(&config_path(), settings).await
}

/// Save settings to a specific path, creating parent directories as needed
pub async fn save_to(path: &Path, settings: &AppSettings) -> Result<(), CompressError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let content = serde_json::to_string_pretty(settings)
        .map_err(|e| CompressError::Settings(e.to_string()))?;
    fs::write(path, content).await?;
    Ok(())
}
