//! # Run State Module
//!
//! Stato di esecuzione esplicito condiviso tra scheduler e registry.
//! Sostituisce il flag globale "is compressing" con un valore posseduto
//! dallo scheduler e interrogato dalle operazioni protette del registry.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Handle clonabile allo stato di run della sessione.
///
/// Il contatore interno tollera run sovrapposti: lo stato torna `idle`
/// soltanto quando l'ultimo guard viene rilasciato.
#[derive(Clone, Debug, Default)]
pub struct RunState {
    active: Arc<AtomicUsize>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True mentre almeno un run è in volo
    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::SeqCst) > 0
    }

    /// Marca l'inizio di un run; lo stato si rilascia al drop del guard
    pub(crate) fn begin(&self) -> RunGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        RunGuard {
            active: Arc::clone(&self.active),
        }
    }
}

#[must_use = "dropping the guard marks the run as finished"]
pub(crate) struct RunGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}
