//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche di run.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per feedback real-time
//! - Tracking statistiche del run corrente (selezionati, riusciti, falliti)
//! - Report finale con byte risparmiati formattati
//!
//! ## Componenti principali:
//! - `ProgressManager`: Gestisce la progress bar principale (o una bar
//!   nascosta per run non interattivi e per i test)
//! - `RunReport`: Statistiche di un singolo run del batch

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::file_manager::FileManager;

/// Manages progress reporting for a compression run
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Bar invisibile: stessa interfaccia, nessun output
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Set a custom message without incrementing
    pub fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

/// Statistics for a single compression run
#[derive(Debug, Default, Clone)]
pub struct RunReport {
    /// Eligible files selected into this run
    pub selected: usize,
    /// Files that reached `done` in this run
    pub succeeded: usize,
    /// Files that reached `error` in this run
    pub failed: usize,
    /// Bytes saved by this run's successful files
    pub bytes_saved: u64,
}

impl RunReport {
    pub fn new(selected: usize) -> Self {
        Self {
            selected,
            ..Default::default()
        }
    }

    /// True quando il run non ha selezionato nessun file
    pub fn is_empty_run(&self) -> bool {
        self.selected == 0
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Selected: {} files | Compressed: {} | Errors: {} | Saved: {}",
            self.selected,
            self.succeeded,
            self.failed,
            FileManager::format_size(self.bytes_saved)
        )
    }
}
