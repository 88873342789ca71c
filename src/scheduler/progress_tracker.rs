//! # Progress Tracker Module
//!
//! Feedback unificato per un singolo run: progress bar e stream di eventi
//! JSON sono guidati dal consumer unico dello scheduler, quindi non serve
//! nessun contatore condiviso.

use crate::file_manager::FileManager;
use crate::json_output::JsonMessage;
use crate::progress::{ProgressManager, RunReport};
use crate::registry::{CompressionPhase, FileItem};

/// Tracker del run corrente, creato a inizio run sul numero di selezionati
pub struct ProgressTracker {
    manager: ProgressManager,
    json_output: bool,
    total_files: usize,
    selected: usize,
}

impl ProgressTracker {
    pub fn new(selected: usize, total_files: usize, show_bar: bool, json_output: bool) -> Self {
        let manager = if show_bar {
            ProgressManager::new(selected as u64)
        } else {
            ProgressManager::hidden()
        };
        Self {
            manager,
            json_output,
            total_files,
            selected,
        }
    }

    pub fn run_started(&self) {
        if self.json_output {
            JsonMessage::start(self.total_files, self.selected).emit();
        }
    }

    pub fn file_started(&self, item: &FileItem) {
        self.manager
            .set_message(&format!("{}: compressing", item.name));
        if self.json_output {
            JsonMessage::file_start(item).emit();
        }
    }

    pub fn file_progress(&self, item: &FileItem, percent: u8, phase: CompressionPhase) {
        self.manager
            .set_message(&format!("{}: {} {}%", item.name, phase.as_str(), percent));
        if self.json_output {
            JsonMessage::file_progress(item, percent, phase).emit();
        }
    }

    pub fn file_done(&self, item: &FileItem) {
        let reduction = FileManager::reduction_percent(item.original_size, item.compressed_size);
        self.manager
            .update(&format!("[OK] {}: {:.1}% saved", item.name, reduction));
        if self.json_output {
            JsonMessage::file_done(item).emit();
        }
    }

    pub fn file_failed(&self, item: &FileItem) {
        self.manager.update(&format!(
            "[ERROR] {}: {}",
            item.name,
            item.error_message.as_deref().unwrap_or("unknown error")
        ));
        if self.json_output {
            JsonMessage::file_error(item).emit();
        }
    }

    pub fn finish(&self, report: &RunReport, done_total: usize, error_total: usize) {
        self.manager.finish(&report.format_summary());
        if self.json_output {
            JsonMessage::complete(report, done_total, error_total).emit();
        }
    }
}
