//! Watch dispatch thread.
//!
//! Backends push changes into a channel tagged with the registration
//! generation that produced them. The dispatch thread forwards a change to
//! the callback only if that generation is still the active one, so events
//! from a superseded registration are dropped even if the backend delivers
//! them late.
//!
//! A panicking callback loses only the change it was handling; the thread
//! keeps serving later changes and registrations.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

use parking_lot::Mutex;
use tracing::{debug, error, trace, warn};

use crate::domain::{ChangeEvent, KeyNamespace};
use crate::ports::{ChangeSink, WatchCallback};

pub(crate) enum DispatchMessage {
    Change { generation: u64, event: ChangeEvent },
    Shutdown,
}

#[derive(Clone)]
pub(crate) struct ActiveWatch {
    pub generation: u64,
    pub callback: WatchCallback,
}

type ActiveSlot = Arc<Mutex<Option<ActiveWatch>>>;

/// Owns the dispatch thread and the currently active callback.
pub(crate) struct Dispatcher {
    tx: Sender<DispatchMessage>,
    active: ActiveSlot,
    handle: Option<JoinHandle<()>>,
    thread_id: Option<ThreadId>,
}

impl Dispatcher {
    pub fn spawn(namespace: KeyNamespace) -> Self {
        let (tx, rx) = mpsc::channel();
        let active: ActiveSlot = Arc::new(Mutex::new(None));
        let worker_active = Arc::clone(&active);

        let handle = thread::Builder::new()
            .name("store-watch".into())
            .spawn(move || run(rx, worker_active, namespace));

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!(error = %e, "failed to spawn watch dispatch thread");
                None
            }
        };
        let thread_id = handle.as_ref().map(|h| h.thread().id());

        Self {
            tx,
            active,
            handle,
            thread_id,
        }
    }

    /// Sink feeding this dispatcher, tagged with `generation`.
    pub fn sink(&self, generation: u64) -> ChangeSink {
        let tx = self.tx.clone();
        ChangeSink::new(move |event| {
            tx.send(DispatchMessage::Change { generation, event })
                .is_ok()
        })
    }

    /// Install `watch` as the active registration, returning the previous one.
    pub fn activate(&self, watch: Option<ActiveWatch>) -> Option<ActiveWatch> {
        std::mem::replace(&mut *self.active.lock(), watch)
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.active.lock().take();
        let _ = self.tx.send(DispatchMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            // A callback may drop the last client handle on the dispatch thread itself.
            if Some(thread::current().id()) != self.thread_id && handle.join().is_err() {
                warn!("watch dispatch thread panicked");
            }
        }
    }
}

fn run(rx: Receiver<DispatchMessage>, active: ActiveSlot, namespace: KeyNamespace) {
    debug!("watch dispatch thread started");
    while let Ok(message) = rx.recv() {
        let (generation, event) = match message {
            DispatchMessage::Change { generation, event } => (generation, event),
            DispatchMessage::Shutdown => break,
        };

        let callback = match active.lock().as_ref() {
            Some(watch) if watch.generation == generation => Arc::clone(&watch.callback),
            _ => {
                trace!(generation, key = %event.key, "dropping change from superseded watch");
                continue;
            }
        };

        let value = match String::from_utf8(event.value) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %event.key, error = %e, "watched value is not UTF-8, skipping");
                continue;
            }
        };

        let key = namespace.strip(&event.key);
        if panic::catch_unwind(AssertUnwindSafe(|| callback(key, &value))).is_err() {
            error!(key = %key, generation, "watch callback panicked, change dropped");
        }
    }
    debug!("watch dispatch thread stopped");
}
