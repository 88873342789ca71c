//! # Compression Scheduler Main Orchestrator
//!
//! Orchestratore del batch: seleziona i file eleggibili, li fa scorrere in
//! un pool di worker a dimensione fissa e applica ogni transizione di stato
//! dal proprio consumer unico di eventi.
//!
//! ## Protocollo del run:
//! 1. Snapshot delle impostazioni, poi precondizione sulla credenziale
//! 2. Selezione FIFO dei file `pending`/`error` (nessuno: no-op)
//! 3. `min(3, eleggibili)` worker prelevano dalla coda condivisa
//! 4. Il consumer applica Started/Progress/Finished al registry
//! 5. A pool esaurito, una singola notifica con i contatori dell'intero registry
//!
//! ## Isolamento dei fallimenti:
//! Il fallimento di un file non tocca mai gli altri in coda o in volo, e non
//! viene ritentato nello stesso run; un errore del notifier viene loggato e
//! non altera né l'esito del run né lo stato dei file.

use futures::future::join_all;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::compressor::Compressor;
use crate::error::CompressError;
use crate::notify::Notifier;
use crate::progress::RunReport;
use crate::registry::{FileId, FileRegistry, FileStatus};
use crate::scheduler::progress_tracker::ProgressTracker;
use crate::scheduler::run_state::RunState;
use crate::scheduler::worker::{worker_loop, Job, JobQueue, WorkerEvent};
use crate::settings::SettingsStore;

/// Dimensione fissa del pool di worker concorrenti
pub const WORKER_POOL_SIZE: usize = 3;

/// Registry condiviso tra la sessione e lo scheduler; le sezioni critiche
/// sono brevi e mai tenute attraverso un await
pub type SharedRegistry = Arc<Mutex<FileRegistry>>;

/// Batch scheduler with a bounded worker pool
pub struct CompressionScheduler<C, N> {
    registry: SharedRegistry,
    settings: SettingsStore,
    compressor: Arc<C>,
    notifier: Arc<N>,
    run_state: RunState,
    show_progress: bool,
    json_output: bool,
}

impl<C: Compressor, N: Notifier> CompressionScheduler<C, N> {
    /// Crea lo scheduler sul registry condiviso; lo stato di run viene
    /// condiviso con il registry così le sue operazioni protette lo vedono
    pub fn new(
        registry: SharedRegistry,
        settings: SettingsStore,
        compressor: Arc<C>,
        notifier: Arc<N>,
    ) -> Self {
        let run_state = registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .run_state()
            .clone();
        Self {
            registry,
            settings,
            compressor,
            notifier,
            run_state,
            show_progress: false,
            json_output: false,
        }
    }

    /// Mostra la progress bar durante i run
    pub fn with_progress_bar(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Emette eventi JSON su stdout durante i run
    pub fn with_json_output(mut self, enabled: bool) -> Self {
        self.json_output = enabled;
        self
    }

    pub fn run_state(&self) -> &RunState {
        &self.run_state
    }

    /// Esegue un batch completo sui file eleggibili.
    ///
    /// Ritorna subito con errore se manca la credenziale (nessun file viene
    /// toccato) e come no-op se nessun file è `pending`/`error`.
    pub async fn run(&self) -> Result<RunReport, CompressError> {
        let snapshot = self.settings.snapshot();
        if snapshot.api_key.trim().is_empty() {
            return Err(CompressError::MissingApiKey);
        }

        let (jobs, total_files) = {
            let registry = self.lock_registry();
            let jobs: Vec<Job> = registry
                .items()
                .iter()
                .filter(|item| {
                    matches!(item.status, FileStatus::Pending | FileStatus::Error)
                })
                .map(|item| Job {
                    id: item.id,
                    path: item.path.clone(),
                })
                .collect();
            (jobs, registry.total_count())
        };

        if jobs.is_empty() {
            debug!("no eligible files, skipping run");
            return Ok(RunReport::default());
        }

        let guard = self.run_state.begin();
        let selected = jobs.len();
        let worker_count = selected.min(WORKER_POOL_SIZE);
        info!(
            "Starting compression run: {} eligible files, {} workers",
            selected, worker_count
        );

        let tracker = ProgressTracker::new(selected, total_files, self.show_progress, self.json_output);
        tracker.run_started();

        let queue: JobQueue = Arc::new(Mutex::new(VecDeque::from(jobs)));
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();

        let mut handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            handles.push(tokio::spawn(worker_loop(
                worker_id,
                Arc::clone(&queue),
                events_tx.clone(),
                Arc::clone(&self.compressor),
                snapshot.clone(),
            )));
        }
        // il canale si chiude quando l'ultimo worker rilascia il sender
        drop(events_tx);

        let mut report = RunReport::new(selected);
        while let Some(event) = events_rx.recv().await {
            self.apply_event(event, &tracker, &mut report);
        }
        for join_result in join_all(handles).await {
            if let Err(e) = join_result {
                error!("compression worker panicked: {}", e);
            }
        }

        // remove/clear tornano disponibili prima della notifica
        drop(guard);

        let (done_total, error_total) = {
            let registry = self.lock_registry();
            (registry.done_count(), registry.error_count())
        };
        tracker.finish(&report, done_total, error_total);

        // la notifica riceve le impostazioni correnti, non lo snapshot del run
        let current = self.settings.snapshot();
        if let Err(e) = self.notifier.notify(&current, done_total, error_total).await {
            warn!("result notification failed: {}", e);
        }

        Ok(report)
    }

    /// Riporta un file fallito a `pending` e rientra nel run completo.
    ///
    /// L'eleggibilità è per status, quindi eventuali altri file
    /// `pending`/`error` vengono ripresi insieme al file richiesto.
    pub async fn retry(&self, id: FileId) -> Result<RunReport, CompressError> {
        let reset = self.lock_registry().reset_for_retry(id);
        if !reset {
            debug!("retry requested for file {} but it is not in error state", id);
            return Ok(RunReport::default());
        }
        self.run().await
    }

    fn lock_registry(&self) -> MutexGuard<'_, FileRegistry> {
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Consumer unico: applica una transizione di stato al registry
    fn apply_event(&self, event: WorkerEvent, tracker: &ProgressTracker, report: &mut RunReport) {
        let mut registry = self.lock_registry();
        match event {
            WorkerEvent::Started { id } => {
                registry.mark_compressing(id);
                if let Some(item) = registry.get(id) {
                    tracker.file_started(item);
                }
            }
            WorkerEvent::Progress { id, percent, phase } => {
                registry.update_progress(id, percent, phase);
                if let Some(item) = registry.get(id) {
                    if item.status == FileStatus::Compressing {
                        tracker.file_progress(item, percent, phase);
                    }
                }
            }
            WorkerEvent::Finished { id, result } => match result {
                Ok(output) => {
                    registry.complete(id, &output);
                    report.succeeded += 1;
                    report.bytes_saved += output.input_size.saturating_sub(output.output_size);
                    if let Some(item) = registry.get(id) {
                        tracker.file_done(item);
                    }
                }
                Err(err) => {
                    warn!("compression failed for file {}: {}", id, err);
                    registry.fail(id, err.to_string());
                    report.failed += 1;
                    if let Some(item) = registry.get(id) {
                        tracker.file_failed(item);
                    }
                }
            },
        }
    }
}
