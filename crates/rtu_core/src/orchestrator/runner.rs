//! Running the matching engine on an isolated worker thread.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{mpsc, Arc};
use std::thread;

use crate::matching::{CancelHandle, EngineError, FuzzyMatcher, MatchEngine};
use crate::models::{MatchOptions, PlaylistEntry};
use crate::playlist::PlaylistStore;

use super::errors::{MatchError, MatchResult};
use super::protocol::{MatchEvent, MatchRequest};

/// Starts match runs and enforces the single-flight rule.
///
/// The engine executes on its own worker thread so scoring never
/// blocks the caller and a panicking engine cannot corrupt caller
/// state. Communication with the worker is a snapshot in and an event
/// stream out; the worker holds no reference to the live playlist.
pub struct MatchOrchestrator {
    engine: Arc<dyn MatchEngine>,
    in_flight: Arc<AtomicBool>,
    live_contexts: Arc<AtomicUsize>,
}

impl MatchOrchestrator {
    /// Create an orchestrator backed by the default fuzzy engine.
    pub fn new() -> Self {
        Self::with_engine(Arc::new(FuzzyMatcher::new()))
    }

    /// Create an orchestrator backed by a specific engine.
    pub fn with_engine(engine: Arc<dyn MatchEngine>) -> Self {
        Self {
            engine,
            in_flight: Arc::new(AtomicBool::new(false)),
            live_contexts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Whether a match run is currently outstanding.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Number of worker contexts currently alive. Returns to zero after
    /// every run, however it ended.
    pub fn live_contexts(&self) -> usize {
        self.live_contexts.load(Ordering::SeqCst)
    }

    /// Start a match over the store's current labels.
    ///
    /// Fails fast with `NoPlaylistLoaded` when the store is empty and
    /// with `MatchInProgress` while another run is outstanding. On
    /// success the run is underway on its worker thread; drive it with
    /// the returned handle.
    pub fn begin_match(
        &self,
        store: &PlaylistStore,
        candidate_filenames: Vec<String>,
        options: MatchOptions,
    ) -> MatchResult<MatchHandle> {
        let labels = match store.labels() {
            Some(labels) if !labels.is_empty() => labels,
            _ => return Err(MatchError::NoPlaylistLoaded),
        };

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(MatchError::MatchInProgress);
        }

        // The flight flag is now held by the guard, which travels into
        // the worker closure. Any exit from here on releases it: a
        // spawn failure drops the closure, a worker panic unwinds
        // through it.
        let guard = ContextGuard::enter(&self.in_flight, &self.live_contexts);

        let entry_count = labels.len();
        let candidate_count = candidate_filenames.len();
        let request = MatchRequest {
            labels,
            candidate_filenames,
            options,
        };
        let cancel = CancelHandle::new();
        let (events_tx, events_rx) = mpsc::channel();

        let engine = Arc::clone(&self.engine);
        let worker_cancel = cancel.clone();
        let spawned = thread::Builder::new()
            .name("match-worker".to_string())
            .spawn(move || run_worker(engine, request, events_tx, worker_cancel, guard));

        let join = match spawned {
            Ok(join) => join,
            Err(e) => {
                return Err(MatchError::engine(format!(
                    "failed to spawn match worker: {e}"
                )));
            }
        };

        tracing::info!(
            "Match run started: {} entries against {} candidates",
            entry_count,
            candidate_count
        );
        Ok(MatchHandle {
            events: events_rx,
            cancel,
            join: Some(join),
            last_ratio: 0.0,
        })
    }
}

impl Default for MatchOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Worker body: run the engine and translate its result into stream
/// events. A cancelled run ends the stream with no terminal event.
fn run_worker(
    engine: Arc<dyn MatchEngine>,
    request: MatchRequest,
    events: Sender<MatchEvent>,
    cancel: CancelHandle,
    guard: ContextGuard,
) {
    // Held for the whole run, so teardown happens on every exit path,
    // panics included.
    let _guard = guard;

    let progress_events = events.clone();
    let progress = move |ratio: f64| {
        let _ = progress_events.send(MatchEvent::Progress { ratio });
    };

    let result = engine.run(
        &request.labels,
        &request.candidate_filenames,
        &request.options,
        &progress,
        &cancel,
    );

    match result {
        Ok(outcome) => {
            tracing::info!(
                "Match run complete: {}/{} entries assigned, {} candidates unused",
                outcome.diagnostics.entries_assigned,
                outcome.assignment.len(),
                outcome.diagnostics.candidates_unused
            );
            for suggestion in &outcome.diagnostics.suggestions {
                tracing::debug!(
                    "Suggestion: entry {} ~ '{}' ({:.3})",
                    suggestion.entry_index,
                    suggestion.candidate,
                    suggestion.score
                );
            }
            let _ = events.send(MatchEvent::Done {
                assignment: outcome.assignment,
            });
        }
        Err(EngineError::Cancelled) => {
            tracing::info!("Match run cancelled");
        }
        Err(EngineError::Failed(message)) => {
            tracing::warn!("Match run failed: {}", message);
            let _ = events.send(MatchEvent::Error { message });
        }
    }
}

/// Decrements the live-context count and releases the flight flag when
/// the worker context ends, on every path.
struct ContextGuard {
    in_flight: Arc<AtomicBool>,
    live_contexts: Arc<AtomicUsize>,
}

impl ContextGuard {
    fn enter(in_flight: &Arc<AtomicBool>, live_contexts: &Arc<AtomicUsize>) -> Self {
        live_contexts.fetch_add(1, Ordering::SeqCst);
        Self {
            in_flight: Arc::clone(in_flight),
            live_contexts: Arc::clone(live_contexts),
        }
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        self.live_contexts.fetch_sub(1, Ordering::SeqCst);
        self.in_flight.store(false, Ordering::SeqCst);
        tracing::debug!("Match worker context torn down");
    }
}

/// Handle to one outstanding match run.
///
/// `wait` drives the run to its end; dropping the handle instead
/// cancels the run and joins the worker, so an abandoned handle never
/// leaks a thread.
pub struct MatchHandle {
    events: Receiver<MatchEvent>,
    cancel: CancelHandle,
    join: Option<thread::JoinHandle<()>>,
    last_ratio: f64,
}

impl MatchHandle {
    /// Request cancellation of the running match.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A cancel handle that stops the run from another thread. `wait`
    /// consumes the handle, so this is the only way to cancel while a
    /// wait is blocking.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Block until the run ends, forwarding progress along the way.
    ///
    /// Forwarded ratios are clamped monotonically non-decreasing into
    /// `[0, 1]`. On completion the assignment is written into the
    /// store's live document and the updated entries are returned; on
    /// failure or cancellation the document is untouched. The worker
    /// thread is joined before this returns, whatever the outcome.
    pub fn wait(
        mut self,
        store: &mut PlaylistStore,
        mut on_progress: impl FnMut(f64),
    ) -> MatchResult<Vec<PlaylistEntry>> {
        let terminal = loop {
            match self.events.recv() {
                Ok(MatchEvent::Progress { ratio }) => {
                    if ratio.is_finite() && !self.cancel.is_cancelled() {
                        let ratio = ratio.clamp(self.last_ratio, 1.0);
                        self.last_ratio = ratio;
                        on_progress(ratio);
                    }
                }
                Ok(event) => break Some(event),
                // Worker gone and channel drained.
                Err(_) => break None,
            }
        };

        self.join_worker();

        if self.cancel.is_cancelled() {
            // A terminal event that raced the cancel is discarded.
            return Err(MatchError::Cancelled);
        }

        match terminal {
            Some(MatchEvent::Done { assignment }) => {
                let entries = store
                    .apply_assignment(&assignment)
                    .map_err(|e| MatchError::engine(e.to_string()))?;
                Ok(entries.to_vec())
            }
            Some(MatchEvent::Error { message }) => Err(MatchError::Engine(message)),
            Some(MatchEvent::Progress { .. }) | None => Err(MatchError::engine(
                "match worker exited without reporting a result",
            )),
        }
    }

    fn join_worker(&mut self) {
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                tracing::warn!("Match worker panicked");
            }
        }
    }
}

impl Drop for MatchHandle {
    fn drop(&mut self) {
        if self.join.is_some() {
            self.cancel.cancel();
            self.join_worker();
        }
    }
}
