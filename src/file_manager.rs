//! # File Management Module
//!
//! Questo modulo gestisce le operazioni sui file e la discovery di immagini.
//!
//! ## Responsabilità:
//! - Discovery ricorsiva di immagini supportate in directory
//! - Determinazione formato file tramite estensione
//! - Scrittura atomica dei payload compressi (temp file + rename)
//! - Formattazione human-readable delle dimensioni
//!
//! ## Formati supportati:
//! - **Immagini**: PNG, JPG, JPEG, WebP
//!
//! ## Sicurezza operazioni:
//! - Il file di output viene scritto in un temp file nella stessa directory e
//!   rinominato al suo posto, così la modalità overwrite non può corrompere
//!   l'originale a metà scrittura

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::error::CompressError;

/// Extensions accepted by the registry, lowercased
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Check if a file is a supported image (extension match, case-insensitive)
    pub fn is_supported_image(path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext_lower.as_str())
        } else {
            false
        }
    }

    /// Find all supported image files under a directory
    pub fn find_image_files(dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| Self::is_supported_image(e.path()))
            .map(|e| e.path().to_path_buf())
            .collect()
    }

    /// Scrive `data` in `dest` passando da un temp file nella stessa directory
    pub fn write_atomic(dest: &Path, data: &[u8]) -> Result<(), CompressError> {
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(data)?;
        tmp.persist(dest).map_err(|e| CompressError::Io(e.error))?;
        Ok(())
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction
    pub fn reduction_percent(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}
