//! Solution Publisher.
//!
//! A latest-wins slot for `progress` records plus a dedicated,
//! never-dropped slot for the single terminal record. The solve runs on a
//! worker thread distinct from the subscriber; this is the only piece of
//! state the two threads share.

use crate::models::OutputRecord;
use std::sync::{mpsc, Arc, Mutex};

/// The solve-side handle: writes progress, then writes exactly one
/// terminal record.
pub struct Publisher {
    progress_slot: Arc<Mutex<Option<crate::models::ProgressRecord>>>,
    terminal_tx: mpsc::SyncSender<OutputRecord>,
}

/// The caller-side handle: polls progress (non-blocking, coalescing) and
/// blocks for the terminal record.
pub struct Subscriber {
    progress_slot: Arc<Mutex<Option<crate::models::ProgressRecord>>>,
    terminal_rx: mpsc::Receiver<OutputRecord>,
}

pub fn channel() -> (Publisher, Subscriber) {
    let progress_slot = Arc::new(Mutex::new(None));
    let (terminal_tx, terminal_rx) = mpsc::sync_channel(1);
    (
        Publisher {
            progress_slot: progress_slot.clone(),
            terminal_tx,
        },
        Subscriber {
            progress_slot,
            terminal_rx,
        },
    )
}

impl Publisher {
    /// Overwrites whatever progress record hasn't yet been read: the solver
    /// thread never blocks on the subscriber, so if the subscriber lags,
    /// the older progress record is simply overwritten.
    pub fn publish_progress(&self, record: crate::models::ProgressRecord) {
        *self.progress_slot.lock().expect("progress slot poisoned") = Some(record);
    }

    /// Delivers the one terminal record. Never fails under normal use: the
    /// channel has capacity 1 and is only ever sent to once per solve.
    pub fn publish_terminal(&self, record: OutputRecord) {
        let _ = self.terminal_tx.send(record);
    }
}

impl Subscriber {
    /// Takes whatever progress record is currently queued, if any.
    pub fn poll_progress(&self) -> Option<crate::models::ProgressRecord> {
        self.progress_slot
            .lock()
            .expect("progress slot poisoned")
            .take()
    }

    /// Blocks until the terminal record arrives.
    pub fn recv_terminal(&self) -> OutputRecord {
        self.terminal_rx
            .recv()
            .expect("publisher dropped without sending a terminal record")
    }

    /// Waits for the terminal record up to `timeout`, for callers that
    /// want to interleave progress polling while waiting.
    pub fn recv_terminal_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Option<OutputRecord> {
        self.terminal_rx.recv_timeout(timeout).ok()
    }
}
