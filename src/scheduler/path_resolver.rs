//! # Path Resolver Module
//!
//! Logica di calcolo del path di output centralizzata, in funzione della
//! modalità configurata nelle impostazioni.

use std::path::{Path, PathBuf};

use crate::error::CompressError;
use crate::settings::{AppSettings, OutputMode};

/// Suffisso applicato in modalità `alongside`
const ALONGSIDE_SUFFIX: &str = "-tiny";

/// Centralized output path computation
pub struct PathResolver;

impl PathResolver {
    /// Dove va scritto il file compresso per `input` date le impostazioni
    pub fn output_path(input: &Path, settings: &AppSettings) -> Result<PathBuf, CompressError> {
        match settings.output_mode {
            OutputMode::Overwrite => Ok(input.to_path_buf()),

            OutputMode::Alongside => {
                let stem = input.file_stem().ok_or_else(|| {
                    CompressError::Output(format!(
                        "cannot derive a file name from {}",
                        input.display()
                    ))
                })?;
                let stem = stem.to_string_lossy();
                let new_name = match input.extension() {
                    Some(ext) => {
                        format!("{}{}.{}", stem, ALONGSIDE_SUFFIX, ext.to_string_lossy())
                    }
                    None => format!("{}{}", stem, ALONGSIDE_SUFFIX),
                };
                let dir = input.parent().ok_or_else(|| {
                    CompressError::Output(format!(
                        "cannot derive a parent directory from {}",
                        input.display()
                    ))
                })?;
                Ok(dir.join(new_name))
            }

            OutputMode::Directory => {
                if settings.output_directory.trim().is_empty() {
                    return Err(CompressError::Output(
                        "no output directory configured".to_string(),
                    ));
                }
                let file_name = input.file_name().ok_or_else(|| {
                    CompressError::Output(format!(
                        "cannot derive a file name from {}",
                        input.display()
                    ))
                })?;
                Ok(Path::new(&settings.output_directory).join(file_name))
            }
        }
    }
}
