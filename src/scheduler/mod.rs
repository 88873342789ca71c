//! # Scheduler Module
//!
//! Modulo che separa le responsabilità del batch in sottomoduli:
//! - `compression_scheduler`: Orchestratore del run
//! - `worker`: Pool di worker su coda FIFO condivisa
//! - `run_state`: Stato di esecuzione condiviso con il registry
//! - `progress_tracker`: Feedback unificato (bar + eventi JSON)
//! - `path_resolver`: Logica di calcolo path di output centralizzata

pub mod compression_scheduler;
pub mod path_resolver;
pub mod progress_tracker;
pub mod run_state;
pub mod worker;

pub use compression_scheduler::{CompressionScheduler, SharedRegistry, WORKER_POOL_SIZE};
pub use path_resolver::PathResolver;
pub use progress_tracker::ProgressTracker;
pub use run_state::RunState;
pub use worker::ProgressReporter;
