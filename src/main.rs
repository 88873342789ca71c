//! # Tiny Image Compressor - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Caricamento impostazioni salvate e merge con gli override da CLI
//! - Registrazione dei file (con espansione ricorsiva delle directory)
//! - Avvio dello scheduler e stampa del riepilogo finale
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (path, api key, output mode, notify, etc.)
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose)
//! 3. Carica le impostazioni salvate (default se assenti) e applica gli override
//! 4. Registra i file accettati dal filtro estensioni
//! 5. Esegue il run e stampa statistiche e righe d'errore per-file
//!
//! ## Esempio di utilizzo:
//! ```bash
//! tiny-compress ./photos vacation.png --api-key XXXX --mode directory --output ./compressed
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use tiny_image_compressor::{
    file_manager::FileManager, settings, CompressionScheduler, ConsoleNotifier, FileRegistry,
    FileStatus, NotifyMode, OutputMode, RunState, SettingsStore, TinifyClient,
};

#[derive(Parser)]
#[command(name = "tiny-compress")]
#[command(about = "Batch-compress images through the TinyPNG API")]
struct Args {
    /// Image files or directories to compress
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// TinyPNG API key (overrides the saved settings for this run)
    #[arg(short, long)]
    api_key: Option<String>,

    /// Where compressed files are written
    #[arg(short, long, value_enum)]
    mode: Option<OutputMode>,

    /// Output directory (implies --mode directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// How the batch result is announced
    #[arg(short, long, value_enum)]
    notify: Option<NotifyMode>,

    /// Persist the effective settings as new defaults
    #[arg(long)]
    save_settings: bool,

    /// Emit machine-readable JSON events instead of a progress bar
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Impostazioni salvate + override della singola invocazione
    let mut app_settings = settings::load().await;
    if let Some(api_key) = args.api_key {
        app_settings.api_key = api_key;
    }
    if let Some(mode) = args.mode {
        app_settings.output_mode = mode;
    }
    if let Some(output) = args.output {
        app_settings.output_mode = OutputMode::Directory;
        app_settings.output_directory = output.to_string_lossy().into_owned();
    }
    if let Some(notify) = args.notify {
        app_settings.notify_mode = notify;
    }
    app_settings.validate()?;

    if args.save_settings {
        settings::save(&app_settings).await?;
        info!("Settings saved");
    }

    // Espandi le directory nei loro file immagine
    let mut paths = Vec::new();
    for path in &args.paths {
        if path.is_dir() {
            paths.extend(FileManager::find_image_files(path));
        } else {
            paths.push(path.clone());
        }
    }

    let registry = Arc::new(Mutex::new(FileRegistry::new(RunState::new())));
    let accepted = registry
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .add(paths);
    if accepted == 0 {
        warn!("No supported image files among the given paths (png/jpg/jpeg/webp)");
        return Ok(());
    }
    info!("Tracking {} files for compression", accepted);

    let store = SettingsStore::new(app_settings);
    let scheduler = CompressionScheduler::new(
        Arc::clone(&registry),
        store,
        Arc::new(TinifyClient::new()?),
        Arc::new(ConsoleNotifier),
    )
    .with_progress_bar(!args.json)
    .with_json_output(args.json);

    let report = scheduler.run().await?;

    if !args.json {
        let registry = registry.lock().unwrap_or_else(|e| e.into_inner());
        info!("=== Compression Complete ===");
        info!("Files selected this run: {}", report.selected);
        info!("Files compressed: {}", report.succeeded);
        info!("Errors: {}", report.failed);
        info!(
            "Bytes saved this run: {}",
            FileManager::format_size(report.bytes_saved)
        );
        info!(
            "Total saved across the session: {}",
            FileManager::format_size(registry.total_bytes_saved())
        );
        for item in registry
            .items()
            .iter()
            .filter(|item| item.status == FileStatus::Error)
        {
            warn!(
                "[ERROR] {}: {}",
                item.name,
                item.error_message.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}
