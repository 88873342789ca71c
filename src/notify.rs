//! # Result Notification Module
//!
//! Seam verso la consegna della notifica di fine batch. Lo scheduler invoca
//! il notifier una sola volta per run, con i contatori calcolati sull'intero
//! registry; un errore del notifier viene loggato e mai propagato.

use std::future::Future;
use tracing::info;

use crate::error::CompressError;
use crate::settings::{AppSettings, NotifyMode};

/// Best-effort notification of a finished batch
pub trait Notifier: Send + Sync + 'static {
    fn notify(
        &self,
        settings: &AppSettings,
        success_count: usize,
        error_count: usize,
    ) -> impl Future<Output = Result<(), CompressError>> + Send;
}

/// Notifier per l'uso da terminale: logga il riepilogo rispettando la
/// modalità configurata. La consegna di toast o dialog nativi è fuori dal
/// perimetro di questo layer.
pub struct ConsoleNotifier;

/// Testo del riepilogo mostrato all'utente
fn result_message(success_count: usize, error_count: usize) -> String {
    if error_count == 0 {
        format!("Compressed {} images successfully", success_count)
    } else {
        format!(
            "Compression finished: {} succeeded, {} failed",
            success_count, error_count
        )
    }
}

impl Notifier for ConsoleNotifier {
    async fn notify(
        &self,
        settings: &AppSettings,
        success_count: usize,
        error_count: usize,
    ) -> Result<(), CompressError> {
        if success_count + error_count == 0 {
            return Ok(());
        }

        match settings.notify_mode {
            NotifyMode::Silent => {}
            NotifyMode::Dialog | NotifyMode::Notification => {
                info!("{}", result_message(success_count, error_count));
            }
        }
        Ok(())
    }
}
