//! # Error Types Module
//!
//! Questo modulo definisce i tipi di errore custom dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce `CompressError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi e strutturati
//! - Integra con `thiserror` per automatic error conversion
//!
//! ## Categorie di errori:
//! - `MissingApiKey`: precondizione di run violata (nessuna credenziale configurata)
//! - `Io`: Errori di I/O (permessi, directory mancanti, etc.)
//! - `FileNotFound`: File sorgente scomparso prima della compressione
//! - `Http`: Errori di trasporto verso l'API di compressione
//! - `Api`: Errori applicativi restituiti dall'API (auth, quota, formato)
//! - `UnsupportedFormat`: Formato file non supportato
//! - `Output`: Configurazione di output non valida
//! - `Settings`: Errori di persistenza impostazioni
//!
//! ## Propagazione:
//! - `MissingApiKey` e `Settings` (save) risalgono al chiamante
//! - Gli errori per-file vengono catturati nello stato del registry, mai rilanciati

/// Custom error types for batch image compression
#[derive(thiserror::Error, Debug)]
pub enum CompressError {
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Compression API error: {0}")]
    Api(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid output configuration: {0}")]
    Output(String),

    #[error("Settings error: {0}")]
    Settings(String),
}
