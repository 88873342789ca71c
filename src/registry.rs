//! # File Registry Module
//!
//! Questo modulo mantiene l'elenco canonico dei file tracciati dalla sessione.
//!
//! ## Responsabilità:
//! - Registra i file accettati (filtro estensioni + dedup per path)
//! - Possiede il lifecycle di ogni `FileItem` (pending → compressing → done/error)
//! - Espone aggregati derivati sempre consistenti (contatori, byte risparmiati)
//! - Protegge `remove`/`clear` mentre un run è attivo
//!
//! ## Transizioni di stato:
//! Le transizioni (`mark_compressing`, `complete`, `fail`, ...) sono
//! crate-private: le applica soltanto il consumer unico dello scheduler, così
//! due worker non contendono mai la mutazione dello stesso item.
//!
//! ## Invarianti:
//! - Un path compare al massimo una volta (dedup case-sensitive sull'intero path)
//! - `error_message` e `output_path` non sono mai popolati insieme
//! - `progress`/`phase` esistono solo mentre lo status è `compressing`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::compressor::CompressedImage;
use crate::file_manager::FileManager;
use crate::scheduler::RunState;

/// Identificatore opaco di un file tracciato, stabile per tutta la sessione
pub type FileId = u64;

/// Lifecycle status of a tracked file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Pending,
    Compressing,
    Done,
    Error,
}

/// Phase of an in-flight compression, meaningful only while `Compressing`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionPhase {
    Uploading,
    Processing,
    Downloading,
}

impl CompressionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Processing => "processing",
            Self::Downloading => "downloading",
        }
    }
}

/// One tracked file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileItem {
    pub id: FileId,
    /// Absolute source path, dedup key within the registry
    pub path: PathBuf,
    /// Display name, final path segment
    pub name: String,
    /// Byte count of the source, 0 until the item reaches `done`
    pub original_size: u64,
    /// Byte count of the compressed output, 0 until the item reaches `done`
    pub compressed_size: u64,
    pub status: FileStatus,
    /// Percentage in 0-100 while compressing
    pub progress: Option<u8>,
    pub phase: Option<CompressionPhase>,
    /// Failure reason, present only when `status` is `error`
    pub error_message: Option<String>,
    /// Destination path, present only when `status` is `done`
    pub output_path: Option<PathBuf>,
}

impl FileItem {
    fn new(id: FileId, path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            id,
            path,
            name,
            original_size: 0,
            compressed_size: 0,
            status: FileStatus::Pending,
            progress: None,
            phase: None,
            error_message: None,
            output_path: None,
        }
    }

    /// Byte risparmiati da questo item, 0 finché non è `done`
    pub fn bytes_saved(&self) -> u64 {
        if self.status == FileStatus::Done {
            self.original_size.saturating_sub(self.compressed_size)
        } else {
            0
        }
    }
}

/// Insertion-ordered collection of tracked files
pub struct FileRegistry {
    items: Vec<FileItem>,
    next_id: FileId,
    run_state: RunState,
}

impl FileRegistry {
    pub fn new(run_state: RunState) -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            run_state,
        }
    }

    /// Stato di esecuzione condiviso con lo scheduler
    pub fn run_state(&self) -> &RunState {
        &self.run_state
    }

    /// Aggiunge i path accettati come nuovi item `pending`.
    ///
    /// Path con estensione non supportata o già presenti vengono saltati in
    /// silenzio. Ritorna il numero di item effettivamente registrati.
    pub fn add<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut accepted = 0;
        for path in paths {
            let path: PathBuf = path.into();
            if !FileManager::is_supported_image(&path) {
                debug!("skipping unsupported file: {}", path.display());
                continue;
            }
            if self.items.iter().any(|item| item.path == path) {
                debug!("skipping duplicate file: {}", path.display());
                continue;
            }
            let id = self.next_id;
            self.next_id += 1;
            self.items.push(FileItem::new(id, path));
            accepted += 1;
        }
        accepted
    }

    /// Rimuove l'item con quell'id. No-op mentre un run è attivo.
    pub fn remove(&mut self, id: FileId) -> bool {
        if self.run_state.is_running() {
            debug!("remove ignored while a run is active");
            return false;
        }
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Svuota il registry. No-op mentre un run è attivo.
    pub fn clear(&mut self) -> bool {
        if self.run_state.is_running() {
            debug!("clear ignored while a run is active");
            return false;
        }
        self.items.clear();
        true
    }

    pub fn items(&self) -> &[FileItem] {
        &self.items
    }

    pub fn get(&self, id: FileId) -> Option<&FileItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    pub fn done_count(&self) -> usize {
        self.count_with_status(FileStatus::Done)
    }

    pub fn error_count(&self) -> usize {
        self.count_with_status(FileStatus::Error)
    }

    /// Somma di (original − compressed) sugli item `done`
    pub fn total_bytes_saved(&self) -> u64 {
        self.items.iter().map(FileItem::bytes_saved).sum()
    }

    fn count_with_status(&self, status: FileStatus) -> usize {
        self.items.iter().filter(|item| item.status == status).count()
    }

    fn get_mut(&mut self, id: FileId) -> Option<&mut FileItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Riporta un item fallito a `pending` in vista di un nuovo run.
    /// Ritorna false se l'item non esiste o non è in stato `error`.
    pub fn reset_for_retry(&mut self, id: FileId) -> bool {
        match self.get_mut(id) {
            Some(item) if item.status == FileStatus::Error => {
                item.status = FileStatus::Pending;
                item.error_message = None;
                item.progress = None;
                item.phase = None;
                true
            }
            _ => false,
        }
    }

    /// Il worker ha prelevato il file: status `compressing`, residui azzerati
    pub(crate) fn mark_compressing(&mut self, id: FileId) {
        if let Some(item) = self.get_mut(id) {
            item.status = FileStatus::Compressing;
            item.progress = Some(0);
            item.phase = None;
            item.error_message = None;
            item.output_path = None;
        }
    }

    /// Aggiorna progress/fase; ignorato se l'item non è più `compressing`
    pub(crate) fn update_progress(&mut self, id: FileId, percent: u8, phase: CompressionPhase) {
        if let Some(item) = self.get_mut(id) {
            if item.status == FileStatus::Compressing {
                item.progress = Some(percent.min(100));
                item.phase = Some(phase);
            }
        }
    }

    /// L'operazione esterna è riuscita: registra dimensioni e output path
    pub(crate) fn complete(&mut self, id: FileId, result: &CompressedImage) {
        if let Some(item) = self.get_mut(id) {
            item.status = FileStatus::Done;
            item.original_size = result.input_size;
            item.compressed_size = result.output_size;
            item.output_path = Some(result.output_path.clone());
            item.progress = None;
            item.phase = None;
            item.error_message = None;
        }
    }

    /// L'operazione esterna è fallita: registra il motivo
    pub(crate) fn fail(&mut self, id: FileId, message: impl Into<String>) {
        if let Some(item) = self.get_mut(id) {
            item.status = FileStatus::Error;
            item.error_message = Some(message.into());
            item.progress = None;
            item.phase = None;
            item.output_path = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn registry() -> FileRegistry {
        FileRegistry::new(RunState::new())
    }

    fn sample_result(output: &str) -> CompressedImage {
        CompressedImage {
            input_size: 1000,
            output_size: 400,
            output_path: PathBuf::from(output),
        }
    }

    #[test]
    fn test_add_filters_by_extension() {
        let mut reg = registry();
        let accepted = reg.add([
            PathBuf::from("/img/a.png"),
            PathBuf::from("/img/b.gif"),
            PathBuf::from("/img/c.JPEG"),
            PathBuf::from("/img/readme.txt"),
        ]);

        assert_eq!(accepted, 2);
        assert_eq!(reg.total_count(), 2);
        assert!(reg.items().iter().all(|i| i.status == FileStatus::Pending));
    }

    #[test]
    fn test_add_mixed_case_extension_is_accepted() {
        let mut reg = registry();
        assert_eq!(reg.add([PathBuf::from("/img/a.PNG")]), 1);
    }

    #[test]
    fn test_add_deduplicates_by_exact_path() {
        let mut reg = registry();
        reg.add([PathBuf::from("/img/a.png")]);
        let accepted = reg.add([PathBuf::from("/img/a.png")]);

        assert_eq!(accepted, 0);
        assert_eq!(reg.total_count(), 1);

        // paths differing only in case are distinct entries
        assert_eq!(reg.add([PathBuf::from("/img/A.png")]), 1);
        assert_eq!(reg.total_count(), 2);
    }

    #[test]
    fn test_item_ids_are_unique_and_stable() {
        let mut reg = registry();
        reg.add([PathBuf::from("/img/a.png"), PathBuf::from("/img/b.png")]);
        let first = reg.items()[0].id;
        let second = reg.items()[1].id;
        assert_ne!(first, second);

        reg.remove(first);
        reg.add([PathBuf::from("/img/c.png")]);
        assert!(reg.items().iter().all(|i| i.id != first));
    }

    #[test]
    fn test_name_is_final_path_segment() {
        let mut reg = registry();
        reg.add([PathBuf::from("/some/deep/dir/photo.webp")]);
        assert_eq!(reg.items()[0].name, "photo.webp");
    }

    #[test]
    fn test_remove_and_clear() {
        let mut reg = registry();
        reg.add([PathBuf::from("/img/a.png"), PathBuf::from("/img/b.png")]);
        let id = reg.items()[0].id;

        assert!(reg.remove(id));
        assert_eq!(reg.total_count(), 1);
        assert!(!reg.remove(9999));

        assert!(reg.clear());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_remove_and_clear_are_noops_during_a_run() {
        let mut reg = registry();
        reg.add([PathBuf::from("/img/a.png")]);
        let id = reg.items()[0].id;

        let guard = reg.run_state().begin();
        assert!(!reg.remove(id));
        assert!(!reg.clear());
        assert_eq!(reg.total_count(), 1);

        drop(guard);
        assert!(reg.remove(id));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_status_transitions_keep_invariants() {
        let mut reg = registry();
        reg.add([PathBuf::from("/img/a.png")]);
        let id = reg.items()[0].id;

        reg.mark_compressing(id);
        let item = reg.get(id).unwrap();
        assert_eq!(item.status, FileStatus::Compressing);
        assert_eq!(item.progress, Some(0));
        assert!(item.error_message.is_none());

        reg.update_progress(id, 42, CompressionPhase::Downloading);
        let item = reg.get(id).unwrap();
        assert_eq!(item.progress, Some(42));
        assert_eq!(item.phase, Some(CompressionPhase::Downloading));

        reg.complete(id, &sample_result("/img/a-tiny.png"));
        let item = reg.get(id).unwrap();
        assert_eq!(item.status, FileStatus::Done);
        assert_eq!(item.original_size, 1000);
        assert_eq!(item.compressed_size, 400);
        assert_eq!(item.output_path.as_deref(), Some(Path::new("/img/a-tiny.png")));
        assert!(item.progress.is_none());
        assert!(item.phase.is_none());
        assert!(item.error_message.is_none());
    }

    #[test]
    fn test_progress_updates_are_dropped_outside_compressing() {
        let mut reg = registry();
        reg.add([PathBuf::from("/img/a.png")]);
        let id = reg.items()[0].id;

        reg.update_progress(id, 10, CompressionPhase::Uploading);
        assert!(reg.get(id).unwrap().progress.is_none());

        reg.mark_compressing(id);
        reg.complete(id, &sample_result("/img/a-tiny.png"));
        reg.update_progress(id, 99, CompressionPhase::Downloading);
        let item = reg.get(id).unwrap();
        assert!(item.progress.is_none());
        assert!(item.phase.is_none());
    }

    #[test]
    fn test_fail_records_message_and_clears_output() {
        let mut reg = registry();
        reg.add([PathBuf::from("/img/a.png")]);
        let id = reg.items()[0].id;

        reg.mark_compressing(id);
        reg.fail(id, "quota exceeded");
        let item = reg.get(id).unwrap();
        assert_eq!(item.status, FileStatus::Error);
        assert_eq!(item.error_message.as_deref(), Some("quota exceeded"));
        assert!(item.output_path.is_none());
        assert!(item.progress.is_none());
    }

    #[test]
    fn test_reset_for_retry_only_applies_to_errors() {
        let mut reg = registry();
        reg.add([PathBuf::from("/img/a.png"), PathBuf::from("/img/b.png")]);
        let failed = reg.items()[0].id;
        let done = reg.items()[1].id;

        reg.mark_compressing(failed);
        reg.fail(failed, "boom");
        reg.mark_compressing(done);
        reg.complete(done, &sample_result("/img/b-tiny.png"));

        assert!(reg.reset_for_retry(failed));
        let item = reg.get(failed).unwrap();
        assert_eq!(item.status, FileStatus::Pending);
        assert!(item.error_message.is_none());

        assert!(!reg.reset_for_retry(done));
        assert!(!reg.reset_for_retry(9999));
    }

    #[test]
    fn test_aggregates_follow_status_changes() {
        let mut reg = registry();
        reg.add([
            PathBuf::from("/img/a.png"),
            PathBuf::from("/img/b.png"),
            PathBuf::from("/img/c.png"),
        ]);
        let ids: Vec<FileId> = reg.items().iter().map(|i| i.id).collect();

        reg.mark_compressing(ids[0]);
        reg.complete(
            ids[0],
            &CompressedImage {
                input_size: 1000,
                output_size: 600,
                output_path: PathBuf::from("/img/a-tiny.png"),
            },
        );
        reg.mark_compressing(ids[1]);
        reg.complete(
            ids[1],
            &CompressedImage {
                input_size: 2000,
                output_size: 500,
                output_path: PathBuf::from("/img/b-tiny.png"),
            },
        );
        reg.mark_compressing(ids[2]);
        reg.fail(ids[2], "network down");

        assert_eq!(reg.total_count(), 3);
        assert_eq!(reg.done_count(), 2);
        assert_eq!(reg.error_count(), 1);
        assert_eq!(reg.total_bytes_saved(), 400 + 1500);

        // a retry sweep puts the failed file back in play, aggregates follow
        assert!(reg.reset_for_retry(ids[2]));
        assert_eq!(reg.error_count(), 0);
        assert_eq!(reg.total_bytes_saved(), 1900);
    }
}
