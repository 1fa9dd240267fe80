//! Debounced deck persistence.
//!
//! The store publishes on every mutation; writing a file per keystroke would
//! be wasteful, so saves go through this observer: each [`Autosave::touch`]
//! replaces the pending snapshot and re-arms an idle window, and the flush
//! callback runs only once no further edit has arrived for the whole window.
//! Dropping the handle shuts the worker down and discards any pending
//! snapshot, so a torn-down session can no longer write stale state.
//!
//! Typical wiring:
//!
//! ```no_run
//! use std::time::Duration;
//! use orator_core::{autosave::Autosave, decks_dir, write_deck, Deck, Theme};
//! use orator_core::store::SlideStore;
//!
//! let autosave = Autosave::new(Duration::from_secs(2), |name, deck| {
//!     if let Err(e) = write_deck(&decks_dir(), name, deck) {
//!         log::error!("autosave of {name} failed: {e}");
//!     }
//! });
//! let mut store = SlideStore::new();
//! store.subscribe(Box::new(move |slides| {
//!     autosave.touch("my-talk", Deck { theme: Theme::default(), slides: slides.to_vec() });
//! }));
//! ```

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::Deck;

enum Msg {
    Touch(String, Deck),
    Flush,
    Shutdown,
}

/// Handle to the background debounce worker.
pub struct Autosave {
    tx: mpsc::Sender<Msg>,
    worker: Option<thread::JoinHandle<()>>,
}

impl Autosave {
    /// Spawn the worker. `on_flush` runs on the worker thread with the deck
    /// name and the most recent snapshot once `delay` passes without a new
    /// touch.
    pub fn new<F>(delay: Duration, mut on_flush: F) -> Self
    where
        F: FnMut(&str, &Deck) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let worker = thread::spawn(move || {
            let mut pending: Option<(String, Deck)> = None;
            let mut deadline: Option<Instant> = None;
            loop {
                let msg = match deadline {
                    None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                    Some(due) => {
                        let now = Instant::now();
                        if due <= now {
                            Err(RecvTimeoutError::Timeout)
                        } else {
                            rx.recv_timeout(due - now)
                        }
                    }
                };
                match msg {
                    Ok(Msg::Touch(name, deck)) => {
                        pending = Some((name, deck));
                        deadline = Some(Instant::now() + delay);
                    }
                    Ok(Msg::Flush) | Err(RecvTimeoutError::Timeout) => {
                        if let Some((name, deck)) = pending.take() {
                            log::debug!("flushing deck {name}");
                            on_flush(&name, &deck);
                        }
                        deadline = None;
                    }
                    Ok(Msg::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });
        Autosave {
            tx,
            worker: Some(worker),
        }
    }

    /// Record a new snapshot and restart the idle window, superseding any
    /// pending one.
    pub fn touch(&self, name: impl Into<String>, deck: Deck) {
        let _ = self.tx.send(Msg::Touch(name.into(), deck));
    }

    /// Flush the pending snapshot now instead of waiting out the idle
    /// window. Does nothing when there is no pending snapshot. The write
    /// itself still happens on the worker thread.
    pub fn flush(&self) {
        let _ = self.tx.send(Msg::Flush);
    }
}

impl Drop for Autosave {
    fn drop(&mut self) {
        let _ = self.tx.send(Msg::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::{Slide, Theme};

    fn deck(names: &[&str]) -> Deck {
        Deck {
            theme: Theme::default(),
            slides: names
                .iter()
                .map(|n| {
                    Slide::new(
                        *n,
                        "blank-card",
                        crate::ContentNode::new(crate::ContentKind::Column, "Column"),
                    )
                })
                .collect(),
        }
    }

    fn collecting_autosave(delay_ms: u64) -> (Autosave, Arc<Mutex<Vec<(String, usize)>>>) {
        let flushed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&flushed);
        let autosave = Autosave::new(Duration::from_millis(delay_ms), move |name, deck: &Deck| {
            sink.lock().unwrap().push((name.to_string(), deck.slides.len()));
        });
        (autosave, flushed)
    }

    #[test]
    fn burst_of_touches_coalesces_into_one_flush() {
        let (autosave, flushed) = collecting_autosave(50);
        autosave.touch("talk", deck(&["A"]));
        autosave.touch("talk", deck(&["A", "B"]));
        autosave.touch("talk", deck(&["A", "B", "C"]));
        std::thread::sleep(Duration::from_millis(400));

        let seen = flushed.lock().unwrap().clone();
        assert_eq!(seen, vec![("talk".to_string(), 3)]);
    }

    #[test]
    fn touch_within_window_postpones_flush() {
        let (autosave, flushed) = collecting_autosave(150);
        autosave.touch("talk", deck(&["A"]));
        std::thread::sleep(Duration::from_millis(50));
        // still inside the window: nothing flushed yet
        assert!(flushed.lock().unwrap().is_empty());
        autosave.touch("talk", deck(&["A", "B"]));
        std::thread::sleep(Duration::from_millis(600));
        assert_eq!(flushed.lock().unwrap().clone(), vec![("talk".to_string(), 2)]);
    }

    #[test]
    fn explicit_flush_skips_the_wait() {
        let (autosave, flushed) = collecting_autosave(10_000);
        autosave.touch("talk", deck(&["A"]));
        autosave.flush();
        std::thread::sleep(Duration::from_millis(300));
        assert_eq!(flushed.lock().unwrap().clone(), vec![("talk".to_string(), 1)]);
    }

    #[test]
    fn drop_discards_pending_snapshot() {
        let (autosave, flushed) = collecting_autosave(10_000);
        autosave.touch("talk", deck(&["A"]));
        drop(autosave);
        std::thread::sleep(Duration::from_millis(100));
        assert!(flushed.lock().unwrap().is_empty());
    }

    #[test]
    fn flush_without_pending_is_a_noop() {
        let (autosave, flushed) = collecting_autosave(50);
        autosave.flush();
        std::thread::sleep(Duration::from_millis(150));
        assert!(flushed.lock().unwrap().is_empty());
    }
}
