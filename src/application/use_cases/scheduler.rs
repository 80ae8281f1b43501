//! Cooperative scheduling primitives
//!
//! - `Generation` / `Ticket`: supersession check for long-running work
//! - `for_each_chunk`: fixed-size batches with a yield between batches
//! - `Debouncer`: cancellable delayed task, reset by every new request

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Progress sink for chunked operations. Hosts implement this to show
/// a progress bar or status line.
pub trait Progress: Send + Sync {
    /// Called once before the first chunk
    fn begin(&self, _total: usize) {}

    /// Called after every completed chunk
    fn chunk_done(&self, _processed: usize, _total: usize) {}

    /// Free-form status line
    fn log(&self, _msg: &str) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Monotonic counter identifying the most recent request
#[derive(Debug, Clone, Default)]
pub struct Generation {
    counter: Arc<AtomicU64>,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation; every earlier ticket becomes stale
    pub fn bump(&self) -> Ticket {
        let value = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            counter: Arc::clone(&self.counter),
            value,
        }
    }

    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

/// Handle held by one unit of work
#[derive(Debug, Clone)]
pub struct Ticket {
    counter: Arc<AtomicU64>,
    value: u64,
}

impl Ticket {
    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.value
    }
}

/// How a chunked run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkOutcome {
    Completed,
    /// A newer generation started; remaining chunks were skipped
    Superseded { processed: usize },
}

/// Run `f` over `items` in batches of `chunk_size`, yielding to the
/// runtime between batches. The ticket is checked at every boundary.
pub async fn for_each_chunk<T, F>(
    items: &[T],
    chunk_size: usize,
    ticket: &Ticket,
    progress: &dyn Progress,
    mut f: F,
) -> ChunkOutcome
where
    T: Sync,
    F: FnMut(&[T]) + Send,
{
    let total = items.len();
    let chunk_size = chunk_size.max(1);
    let mut processed = 0;

    progress.begin(total);

    for chunk in items.chunks(chunk_size) {
        if !ticket.is_current() {
            debug!(ticket = ticket.value(), processed, total, "Chunked run superseded");
            return ChunkOutcome::Superseded { processed };
        }

        f(chunk);
        processed += chunk.len();
        progress.chunk_done(processed, total);

        tokio::task::yield_now().await;
    }

    if !ticket.is_current() {
        return ChunkOutcome::Superseded { processed };
    }

    ChunkOutcome::Completed
}

struct PendingTask {
    handle: JoinHandle<()>,
    started: Arc<AtomicBool>,
}

/// Delays a task until no new task has been scheduled for `delay`.
///
/// Scheduling again before the delay elapses cancels the waiting task.
/// A task whose delay already elapsed is left to finish; callers use
/// [`Generation`] to make it stop early.
pub struct Debouncer {
    delay: Duration,
    pending: Option<PendingTask>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let delay = self.delay;
        let started = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&started);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            flag.store(true, Ordering::SeqCst);
            task.await;
        });

        self.pending = Some(PendingTask { handle, started });
    }

    /// Drop the waiting task, if it has not started yet
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            if !pending.started.load(Ordering::SeqCst) {
                pending.handle.abort();
            }
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| !p.started.load(Ordering::SeqCst) && !p.handle.is_finished())
    }

    /// Wait for the scheduled task (delay included) to finish. Returns
    /// `false` when the task panicked.
    pub async fn flush(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return true;
        };
        match pending.handle.await {
            Err(e) if e.is_panic() => {
                warn!(error = %e, "Debounced task panicked");
                false
            }
            _ => true,
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
