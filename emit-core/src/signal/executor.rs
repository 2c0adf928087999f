//! Execution contexts for subscriber actions.
//!
//! `emit` never runs subscriber code itself. Each subscription, and each link
//! from a signal to a signal derived from it, names an [`Executor`], and emit
//! only *submits* work to it. Two executors are provided:
//!
//! - [`SerialQueue`]: one dedicated worker thread, jobs run in submission
//!   order. The usual choice for UI-style consumers that need a stable event
//!   order.
//! - [`TokioExecutor`]: jobs run on a tokio runtime's blocking pool, with no
//!   ordering between them.
//!
//! A panicking job is caught and logged; the worker keeps serving jobs.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

use crate::error::{Error, Result};

/// A unit of work submitted to an executor.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Somewhere to run subscriber actions.
///
/// `execute` should return without waiting for the job to run. An executor
/// that runs jobs inline makes `emit` wait for the subscribers it serves.
pub trait Executor: Send + Sync + 'static {
    /// Submit a job for asynchronous execution.
    fn execute(&self, job: Job);
}

impl<X: Executor + ?Sized> Executor for Arc<X> {
    fn execute(&self, job: Job) {
        (**self).execute(job)
    }
}

/// Run a job, containing any panic it raises.
fn run_job(context: &str, job: Job) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
        tracing::error!(
            context,
            panic = panic_message(&*payload),
            "subscriber action panicked"
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}

// ----------------------------------------------------------------------------
// Serial queue
// ----------------------------------------------------------------------------

/// A FIFO queue drained by one dedicated worker thread.
///
/// Handles are cheap to clone and share the same worker. The worker exits
/// after the last handle is dropped and the queue has drained.
///
/// # Example
///
/// ```rust
/// use emit_core::{Owner, SerialQueue, Signal};
///
/// let queue = SerialQueue::new("events").unwrap();
/// let owner = Owner::new();
/// let signal = Signal::<u32>::new();
///
/// signal.subscribe(&owner, &queue, |n| println!("got {n}"));
/// signal.emit(1);
/// queue.flush();
/// ```
#[derive(Clone)]
pub struct SerialQueue {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    label: String,
    worker: ThreadId,
    sender: mpsc::UnboundedSender<Job>,

    /// Jobs ever submitted. Lets `flush` notice work queued while it waited.
    submitted: AtomicU64,
}

impl SerialQueue {
    /// Start a new queue. `label` names the worker thread and tags log events.
    pub fn new(label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();

        let worker_label = label.clone();
        let handle = thread::Builder::new()
            .name(label.clone())
            .spawn(move || {
                tracing::debug!(queue = %worker_label, "serial queue started");
                while let Some(job) = receiver.blocking_recv() {
                    run_job(&worker_label, job);
                }
                tracing::debug!(queue = %worker_label, "serial queue stopped");
            })
            .map_err(|source| Error::Spawn {
                label: label.clone(),
                source,
            })?;

        Ok(Self {
            inner: Arc::new(QueueInner {
                label,
                worker: handle.thread().id(),
                sender,
                submitted: AtomicU64::new(0),
            }),
        })
    }

    /// The queue's label.
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Whether the calling thread is this queue's worker.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.inner.worker
    }

    /// Block until the queue is idle.
    ///
    /// Every job submitted before this call has run on return, and so has any
    /// job submitted while it waited, such as the follow-up work of a derived
    /// signal sharing this queue. Returns immediately when called from the
    /// queue's own worker, since waiting there could never complete. Must not
    /// be called from inside an async task.
    pub fn flush(&self) {
        if self.is_current() {
            return;
        }

        loop {
            let before = self.inner.submitted.load(Ordering::SeqCst);

            let (done, finished) = oneshot::channel::<()>();
            self.execute(Box::new(move || {
                let _ = done.send(());
            }));
            // An error means the worker is gone, so nothing is pending either.
            if finished.blocking_recv().is_err() {
                return;
            }

            // Only the barrier itself was submitted meanwhile.
            if self.inner.submitted.load(Ordering::SeqCst) == before + 1 {
                return;
            }
        }
    }
}

impl Executor for SerialQueue {
    fn execute(&self, job: Job) {
        self.inner.submitted.fetch_add(1, Ordering::SeqCst);
        if self.inner.sender.send(job).is_err() {
            tracing::warn!(queue = %self.inner.label, "worker has stopped, job dropped");
        }
    }
}

impl fmt::Debug for SerialQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialQueue")
            .field("label", &self.inner.label)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tokio
// ----------------------------------------------------------------------------

/// Runs jobs on a tokio runtime's blocking thread pool.
#[derive(Clone, Debug)]
pub struct TokioExecutor {
    handle: Handle,
}

impl TokioExecutor {
    /// Wrap an existing runtime handle.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime the caller is running on, if any.
    pub fn try_current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl Executor for TokioExecutor {
    fn execute(&self, job: Job) {
        // Detached; panics are contained by run_job.
        drop(self.handle.spawn_blocking(move || run_job("tokio", job)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::mpsc as std_mpsc;
    use std::time::Duration;

    #[test]
    fn serial_queue_runs_jobs_in_order() {
        let queue = SerialQueue::new("order").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..100 {
            let seen = seen.clone();
            queue.execute(Box::new(move || seen.lock().push(i)));
        }
        queue.flush();

        assert_eq!(*seen.lock(), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn serial_queue_runs_on_its_own_thread() {
        let queue = SerialQueue::new("worker-thread").unwrap();
        let (tx, rx) = std_mpsc::channel();

        let worker = queue.clone();
        queue.execute(Box::new(move || {
            tx.send((worker.is_current(), thread::current().name().map(String::from)))
                .unwrap();
        }));

        let (is_current, name) = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(is_current);
        assert_eq!(name.as_deref(), Some("worker-thread"));
        assert!(!queue.is_current());
    }

    #[test]
    fn serial_queue_survives_panicking_job() {
        let queue = SerialQueue::new("panics").unwrap();
        let ran = Arc::new(Mutex::new(false));

        queue.execute(Box::new(|| panic!("subscriber failure")));
        let flag = ran.clone();
        queue.execute(Box::new(move || *flag.lock() = true));
        queue.flush();

        assert!(*ran.lock());
    }

    #[test]
    fn execute_does_not_wait_for_job() {
        let queue = SerialQueue::new("non-blocking").unwrap();
        let (release, blocked) = std_mpsc::channel::<()>();

        queue.execute(Box::new(move || {
            blocked.recv().unwrap();
        }));

        // Reaching this line means execute returned while the job is parked.
        release.send(()).unwrap();
        queue.flush();
    }

    #[test]
    fn flush_from_worker_returns() {
        let queue = SerialQueue::new("reentrant").unwrap();
        let (tx, rx) = std_mpsc::channel();

        let inner = queue.clone();
        queue.execute(Box::new(move || {
            inner.flush();
            tx.send(()).unwrap();
        }));

        rx.recv_timeout(Duration::from_secs(1)).unwrap();
    }

    #[test]
    fn flush_waits_for_jobs_submitted_by_jobs() {
        let queue = SerialQueue::new("follow-up").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let outer_queue = queue.clone();
        let outer_seen = seen.clone();
        queue.execute(Box::new(move || {
            outer_seen.lock().push("first");
            let inner_queue = outer_queue.clone();
            let inner_seen = outer_seen.clone();
            outer_queue.execute(Box::new(move || {
                inner_seen.lock().push("second");
                let last_seen = inner_seen.clone();
                inner_queue.execute(Box::new(move || last_seen.lock().push("third")));
            }));
        }));
        queue.flush();

        assert_eq!(*seen.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn tokio_executor_runs_jobs() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .build()
            .unwrap();
        let executor = TokioExecutor::new(runtime.handle().clone());
        let (tx, rx) = std_mpsc::channel();

        for i in 0..10 {
            let tx = tx.clone();
            executor.execute(Box::new(move || tx.send(i).unwrap()));
        }

        let mut seen: Vec<i32> = (0..10)
            .map(|_| rx.recv_timeout(Duration::from_secs(1)).unwrap())
            .collect();
        seen.sort();
        assert_eq!(seen, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn try_current_outside_runtime_is_none() {
        assert!(TokioExecutor::try_current().is_none());
    }

    #[test]
    fn panic_message_extracts_strings() {
        let boxed: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(&*boxed), "static");

        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*boxed), "owned");

        let boxed: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(panic_message(&*boxed), "<non-string panic payload>");
    }
}
