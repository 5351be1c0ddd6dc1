use futures::future::{BoxFuture, FutureExt, Shared};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::CoordinatorError;

type SharedResult<T> = Shared<BoxFuture<'static, Result<T, CoordinatorError>>>;

#[derive(Debug, PartialEq, Eq)]
struct PendingKey {
    priority: i32,
    seq: u64,
    id: String,
}

impl Ord for PendingKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher priority first, then lower sequence (FIFO).
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PendingKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Slot<T> {
    seq: u64,
    priority: i32,
    shared: SharedResult<T>,
    token: CancellationToken,
    /// `Some` while queued; taken on admission.
    admit: Option<oneshot::Sender<()>>,
}

struct QueueState<T> {
    running: usize,
    next_seq: u64,
    pending: BinaryHeap<PendingKey>,
    slots: FxHashMap<String, Slot<T>>,
}

impl<T> QueueState<T> {
    fn new() -> Self {
        Self {
            running: 0,
            next_seq: 0,
            pending: BinaryHeap::new(),
            slots: FxHashMap::default(),
        }
    }
}

/// Priority-ordered, deduplicating request lane with a concurrency ceiling.
///
/// Every accepted request is driven by its own spawned task; callers await a
/// [`Shared`] handle to that task's outcome, so a request whose `id` is
/// already queued or in flight attaches instead of executing again.
pub struct RequestQueue<T> {
    name: &'static str,
    ceiling: usize,
    state: Arc<Mutex<QueueState<T>>>,
}

impl<T> RequestQueue<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str, ceiling: usize) -> Self {
        Self {
            name,
            ceiling: ceiling.max(1),
            state: Arc::new(Mutex::new(QueueState::new())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    pub fn running(&self) -> usize {
        lock(&self.state).running
    }

    pub fn queued(&self) -> usize {
        lock(&self.state)
            .slots
            .values()
            .filter(|s| s.admit.is_some())
            .count()
    }

    pub fn contains(&self, id: &str) -> bool {
        lock(&self.state).slots.contains_key(id)
    }

    pub async fn enqueue<F, Fut>(
        &self,
        id: impl Into<String>,
        priority: i32,
        request_fn: F,
    ) -> Result<T, CoordinatorError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, CoordinatorError>> + Send + 'static,
    {
        let id = id.into();
        let shared = {
            let mut state = lock(&self.state);

            let attached = state.slots.get_mut(&id).map(|slot| {
                // A queued request takes the highest priority any caller asked
                // for. The superseded heap key is skipped by `promote`.
                let raised = slot.admit.is_some() && priority > slot.priority;
                if raised {
                    slot.priority = priority;
                }
                (slot.shared.clone(), raised.then_some(slot.seq))
            });

            if let Some((shared, raised)) = attached {
                debug!(lane = self.name, id = %id, "Attaching to existing request");
                if let Some(seq) = raised {
                    state.pending.push(PendingKey { priority, seq, id });
                }
                shared
            } else {
                let seq = state.next_seq;
                state.next_seq += 1;

                let token = CancellationToken::new();
                let (admit_tx, admit_rx) = oneshot::channel();
                let driver = drive(
                    Arc::clone(&self.state),
                    self.name,
                    self.ceiling,
                    id.clone(),
                    seq,
                    token.clone(),
                    admit_rx,
                    request_fn,
                );
                let handle = tokio::spawn(driver);
                let shared = handle
                    .map(|joined| {
                        joined.unwrap_or_else(|e| Err(CoordinatorError::Aborted(e.to_string())))
                    })
                    .boxed()
                    .shared();

                state.slots.insert(
                    id.clone(),
                    Slot {
                        seq,
                        priority,
                        shared: shared.clone(),
                        token,
                        admit: Some(admit_tx),
                    },
                );
                state.pending.push(PendingKey {
                    priority,
                    seq,
                    id: id.clone(),
                });
                promote(&mut state, self.ceiling, self.name);
                shared
            }
        };

        shared.await
    }

    /// Cancels `id`. A queued request is dropped before its function runs;
    /// an in-flight request has its result discarded and every attached
    /// caller receives [`CoordinatorError::Cancelled`]. Returns `false` when
    /// nothing with that id is known.
    pub fn cancel(&self, id: &str) -> bool {
        let mut state = lock(&self.state);
        let Some(slot) = state.slots.remove(id) else {
            return false;
        };

        if slot.admit.is_some() {
            debug!(lane = self.name, id = %id, "Cancelled queued request");
        } else {
            debug!(lane = self.name, id = %id, "Cancelled in-flight request");
            slot.token.cancel();
        }
        true
    }
}

fn lock<T>(state: &Mutex<QueueState<T>>) -> MutexGuard<'_, QueueState<T>> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Admits pending requests while slots are free. Heap keys whose slot was
/// cancelled or replaced are skipped.
fn promote<T>(state: &mut QueueState<T>, ceiling: usize, lane: &'static str) {
    while state.running < ceiling {
        let Some(next) = state.pending.pop() else {
            return;
        };
        let Some(slot) = state.slots.get_mut(&next.id) else {
            continue;
        };
        if slot.seq != next.seq {
            continue;
        }
        let Some(admit) = slot.admit.take() else {
            continue;
        };
        if admit.send(()).is_ok() {
            state.running += 1;
            debug!(lane, id = %next.id, priority = next.priority, running = state.running, "Admitted request");
        }
    }
}

/// Frees the slot even if the request function panics.
struct Admission<T> {
    state: Arc<Mutex<QueueState<T>>>,
    lane: &'static str,
    ceiling: usize,
    id: String,
    seq: u64,
}

impl<T> Drop for Admission<T> {
    fn drop(&mut self) {
        let mut state = lock(&self.state);
        state.running = state.running.saturating_sub(1);
        if state.slots.get(&self.id).map(|s| s.seq) == Some(self.seq) {
            state.slots.remove(&self.id);
        }
        promote(&mut state, self.ceiling, self.lane);
    }
}

async fn drive<T, F, Fut>(
    state: Arc<Mutex<QueueState<T>>>,
    lane: &'static str,
    ceiling: usize,
    id: String,
    seq: u64,
    token: CancellationToken,
    admit: oneshot::Receiver<()>,
    request_fn: F,
) -> Result<T, CoordinatorError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, CoordinatorError>>,
{
    if admit.await.is_err() {
        return Err(CoordinatorError::Cancelled);
    }
    let _admission = Admission {
        state,
        lane,
        ceiling,
        id: id.clone(),
        seq,
    };

    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => Err(CoordinatorError::Cancelled),
        result = request_fn() => result,
    };

    if token.is_cancelled() {
        return Err(CoordinatorError::Cancelled);
    }
    if let Err(e) = &outcome {
        warn!(lane, id = %id, error = %e, "Request failed");
    }
    outcome
}
