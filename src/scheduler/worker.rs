//! # Worker Module
//!
//! Worker del pool di compressione, separati dall'orchestratore.
//! Ogni worker preleva un file alla volta dalla coda FIFO condivisa e lo
//! elabora fino a completamento; tutte le mutazioni di stato passano dal
//! consumer unico tramite eventi, mai dal worker stesso.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::compressor::{CompressedImage, Compressor};
use crate::error::CompressError;
use crate::registry::{CompressionPhase, FileId};
use crate::settings::AppSettings;

/// Unità di lavoro: un file eleggibile selezionato a inizio run
#[derive(Debug, Clone)]
pub(crate) struct Job {
    pub id: FileId,
    pub path: PathBuf,
}

/// Coda FIFO condivisa tra i worker; il `pop_front` sotto lock è l'unico
/// punto di contesa, così nessun file viene elaborato due volte
pub(crate) type JobQueue = Arc<Mutex<VecDeque<Job>>>;

/// Eventi emessi dai worker verso il consumer unico dello scheduler
#[derive(Debug)]
pub(crate) enum WorkerEvent {
    Started {
        id: FileId,
    },
    Progress {
        id: FileId,
        percent: u8,
        phase: CompressionPhase,
    },
    Finished {
        id: FileId,
        result: Result<CompressedImage, CompressError>,
    },
}

/// Canale di progresso consegnato al `Compressor` per il file corrente.
///
/// I report arrivati quando il file non è più `compressing` vengono scartati
/// dal registry, quindi l'implementazione può segnalare liberamente.
#[derive(Clone)]
pub struct ProgressReporter {
    id: FileId,
    events: UnboundedSender<WorkerEvent>,
}

impl ProgressReporter {
    pub(crate) fn new(id: FileId, events: UnboundedSender<WorkerEvent>) -> Self {
        Self { id, events }
    }

    /// Segnala percentuale e fase correnti del file in elaborazione
    pub fn report(&self, percent: u8, phase: CompressionPhase) {
        let _ = self.events.send(WorkerEvent::Progress {
            id: self.id,
            percent: percent.min(100),
            phase,
        });
    }
}

/// Loop di un singolo worker: dequeue FIFO atomico, poi elaborazione a
/// completamento prima del prossimo prelievo
pub(crate) async fn worker_loop<C: Compressor>(
    worker_id: usize,
    queue: JobQueue,
    events: UnboundedSender<WorkerEvent>,
    compressor: Arc<C>,
    settings: AppSettings,
) {
    loop {
        let job = queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        let Some(job) = job else {
            debug!("worker {} found the queue empty, shutting down", worker_id);
            break;
        };

        debug!("worker {} picked {}", worker_id, job.path.display());
        let _ = events.send(WorkerEvent::Started { id: job.id });

        let reporter = ProgressReporter::new(job.id, events.clone());
        let result = compressor.compress(&job.path, &settings, &reporter).await;
        let _ = events.send(WorkerEvent::Finished { id: job.id, result });
    }
}
