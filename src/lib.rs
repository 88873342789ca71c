//! # Tiny Image Compressor Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `settings`: Impostazioni live, snapshot e persistenza JSON
//! - `error`: Tipi di errore custom per le diverse operazioni
//! - `registry`: Elenco canonico dei file tracciati e loro lifecycle
//! - `file_manager`: Filtro estensioni, discovery e scritture atomiche
//! - `compressor`: Seam verso l'operazione esterna di compressione
//! - `tinify`: Client HTTP concreto per l'API TinyPNG
//! - `notify`: Seam verso la notifica di fine batch
//! - `scheduler`: Orchestratore del batch con pool di worker a dimensione fissa
//! - `progress`: Progress bar e statistiche di run
//! - `json_output`: Stream di eventi JSON per frontend che incapsulano la CLI
//!
//! ## Utilizzo:
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::{Arc, Mutex};
//! use tiny_image_compressor::{
//!     AppSettings, CompressionScheduler, ConsoleNotifier, FileRegistry, RunState,
//!     SettingsStore, TinifyClient,
//! };
//!
//! # async fn example() -> Result<(), tiny_image_compressor::CompressError> {
//! let registry = Arc::new(Mutex::new(FileRegistry::new(RunState::new())));
//! registry.lock().unwrap().add([PathBuf::from("photo.png")]);
//!
//! let settings = SettingsStore::new(AppSettings {
//!     api_key: "my-api-key".to_string(),
//!     ..Default::default()
//! });
//! let scheduler = CompressionScheduler::new(
//!     Arc::clone(&registry),
//!     settings,
//!     Arc::new(TinifyClient::new()?),
//!     Arc::new(ConsoleNotifier),
//! );
//! let report = scheduler.run().await?;
//! println!("{}", report.format_summary());
//! # Ok(())
//! # }
//! ```

pub mod compressor;
pub mod error;
pub mod file_manager;
pub mod json_output;
pub mod notify;
pub mod progress;
pub mod registry;
pub mod scheduler;
pub mod settings;
pub mod tinify;

pub use compressor::{CompressedImage, Compressor};
pub use error::CompressError;
pub use notify::{ConsoleNotifier, Notifier};
pub use progress::RunReport;
pub use registry::{CompressionPhase, FileId, FileItem, FileRegistry, FileStatus};
pub use scheduler::{
    CompressionScheduler, ProgressReporter, RunState, SharedRegistry, WORKER_POOL_SIZE,
};
pub use settings::{AppSettings, NotifyMode, OutputMode, SettingsStore};
pub use tinify::TinifyClient;
