//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per frontend che
//! incapsulano la CLI (un oggetto per riga su stdout).
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio del run con i file selezionati
//! - `file_start`: Un worker ha prelevato un file
//! - `file_progress`: Fase/percentuale di un file in volo
//! - `file_done`: File compresso con successo
//! - `file_error`: File fallito con il motivo
//! - `complete`: Fine run con statistiche finali

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::progress::RunReport;
use crate::registry::{CompressionPhase, FileId, FileItem};

/// Tipo di messaggio JSON
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    /// Inizio di un run
    #[serde(rename = "start")]
    Start { total_files: usize, selected: usize },

    /// Un worker ha iniziato a elaborare un file
    #[serde(rename = "file_start")]
    FileStart { id: FileId, path: PathBuf },

    /// Progresso di un file in volo
    #[serde(rename = "file_progress")]
    FileProgress {
        id: FileId,
        percent: u8,
        phase: CompressionPhase,
    },

    /// File compresso con successo
    #[serde(rename = "file_done")]
    FileDone {
        id: FileId,
        path: PathBuf,
        original_size: u64,
        compressed_size: u64,
        output_path: Option<PathBuf>,
    },

    /// File fallito
    #[serde(rename = "file_error")]
    FileError {
        id: FileId,
        path: PathBuf,
        message: String,
    },

    /// Fine run con statistiche
    #[serde(rename = "complete")]
    Complete {
        selected: usize,
        succeeded: usize,
        failed: usize,
        bytes_saved: u64,
        done_total: usize,
        error_total: usize,
    },
}

impl JsonMessage {
    pub fn start(total_files: usize, selected: usize) -> Self {
        Self::Start {
            total_files,
            selected,
        }
    }

    pub fn file_start(item: &FileItem) -> Self {
        Self::FileStart {
            id: item.id,
            path: item.path.clone(),
        }
    }

    pub fn file_progress(item: &FileItem, percent: u8, phase: CompressionPhase) -> Self {
        Self::FileProgress {
            id: item.id,
            percent,
            phase,
        }
    }

    pub fn file_done(item: &FileItem) -> Self {
        Self::FileDone {
            id: item.id,
            path: item.path.clone(),
            original_size: item.original_size,
            compressed_size: item.compressed_size,
            output_path: item.output_path.clone(),
        }
    }

    pub fn file_error(item: &FileItem) -> Self {
        Self::FileError {
            id: item.id,
            path: item.path.clone(),
            message: item
                .error_message
                .clone()
                .unwrap_or_else(|| "unknown error".to_string()),
        }
    }

    pub fn complete(report: &RunReport, done_total: usize, error_total: usize) -> Self {
        Self::Complete {
            selected: report.selected,
            succeeded: report.succeeded,
            failed: report.failed,
            bytes_saved: report.bytes_saved,
            done_total,
            error_total,
        }
    }

    /// Emette il messaggio su stdout come singola riga JSON
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }
}
