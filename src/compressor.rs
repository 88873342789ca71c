//! # Compressor Interface Module
//!
//! Il seam verso l'operazione esterna di compressione. Lo scheduler non sa
//! nulla di HTTP o di codec: riceve un `Compressor` iniettato e ne osserva
//! soltanto il risultato per file.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::error::CompressError;
use crate::scheduler::ProgressReporter;
use crate::settings::AppSettings;

/// Risultato di una compressione riuscita
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressedImage {
    pub input_size: u64,
    pub output_size: u64,
    pub output_path: PathBuf,
}

/// External compression operation.
///
/// Implementations must be safely callable concurrently up to the worker
/// pool size; the future is `Send` because workers run as tokio tasks.
/// Failures carry a descriptive message and are recorded per file, never
/// propagated to the rest of the batch.
pub trait Compressor: Send + Sync + 'static {
    /// Comprime il file e restituisce dimensioni e path di output.
    ///
    /// `settings` è lo snapshot immutabile preso a inizio run, mai le
    /// impostazioni live. `progress` può essere usato per segnalare fase e
    /// percentuale del file corrente.
    fn compress(
        &self,
        path: &Path,
        settings: &AppSettings,
        progress: &ProgressReporter,
    ) -> impl Future<Output = Result<CompressedImage, CompressError>> + Send;
}
