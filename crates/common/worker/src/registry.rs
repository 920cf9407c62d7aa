// Copyright 2025 Crrow
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The worker registry: spawns producer and consumer dispatch loops and owns
//! their reaping.
//!
//! Grounded on `amq_worker_create`/`amq_producer_create`/`amq_consumer_create`
//! from the original library, with one deliberate change: the original
//! worker thread removed itself from the registry just before exiting, which
//! left a window where a caller could look a name up, find nothing, and
//! conclude the worker never existed. Here the dispatch loop only reports
//! that it is done; the registry itself removes the entry and then flips the
//! `watch` channel backing [`WorkerHandle::wait`], so the entry is always
//! present until the moment a waiter can observe it is gone.

use std::{sync::Arc, time::Duration, time::Instant};

use amq_error::{DuplicateWorkerSnafu, Error};
use amq_mq::{Message, QueueRegistry};
use parking_lot::Mutex;
use snafu::OptionExt;
use tokio::{runtime::Runtime, sync::watch};
use tokio_util::sync::CancellationToken;

use crate::{
    context::{SIGNAL_POLL_INTERVAL, WorkerContext},
    handle::WorkerHandle,
    id::{WorkerId, random_worker_name},
    metrics::{
        WORKER_ACTIVE, WORKER_EXECUTIONS, WORKER_EXECUTION_DURATION_SECONDS, WORKER_STARTED,
        WORKER_STOPPED, WORKER_SUSPENDED,
    },
    signals::SignalSet,
    stats::WorkerStats,
    work::{ConsumerWork, ProducerWork, WorkOutcome},
};

/// How long a consumer's dispatch loop waits on its supply queue before
/// re-checking its signal bitmask, matching [`SIGNAL_POLL_INTERVAL`].
const CONSUMER_WAIT_TIMEOUT: Duration = SIGNAL_POLL_INTERVAL;

/// Owns every running worker, keyed by name.
///
/// Must be held behind an `Arc` — the dispatch loops spawned by
/// [`producer_create`](Self::producer_create) and
/// [`consumer_create`](Self::consumer_create) hold a clone of it so they can
/// reap their own entry on exit.
pub struct WorkerRegistry {
    workers: amq_mq::NamedContainer<WorkerHandle>,
    runtime: Arc<Runtime>,
}

impl WorkerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            workers: amq_mq::NamedContainer::new(),
            runtime: amq_runtime::background_runtime(),
        }
    }

    #[must_use]
    pub fn with_runtime(runtime: Arc<Runtime>) -> Self {
        Self {
            workers: amq_mq::NamedContainer::new(),
            runtime,
        }
    }

    fn register(&self, name: Option<String>) -> Result<(Arc<WorkerHandle>, WorkerContext, watch::Sender<bool>), Error> {
        let name = name.filter(|n| !n.is_empty()).unwrap_or_else(random_worker_name);
        let id = WorkerId::new();
        let signals = Arc::new(SignalSet::new());
        let cancel_token = CancellationToken::new();
        let stats = Arc::new(Mutex::new(WorkerStats::new()));
        let (done_tx, done_rx) = watch::channel(false);
        let name_arc: Arc<str> = Arc::from(name.as_str());

        let handle = Arc::new(WorkerHandle {
            id,
            name: name_arc.clone(),
            signals: signals.clone(),
            cancel_token: cancel_token.clone(),
            stats,
            done_rx,
        });

        self.workers
            .add(name.clone(), handle.clone())
            .ok()
            .context(DuplicateWorkerSnafu { name: name.clone() })?;

        let ctx = WorkerContext {
            id,
            name: name_arc,
            signals,
            cancel_token,
        };

        WORKER_STARTED.with_label_values(&[&name]).inc();
        WORKER_ACTIVE.with_label_values(&[&name]).set(1);

        Ok((handle, ctx, done_tx))
    }

    fn reap(&self, name: &str, done_tx: &watch::Sender<bool>) {
        self.workers.remove(name);
        WORKER_ACTIVE.with_label_values(&[name]).set(0);
        WORKER_STOPPED.with_label_values(&[name]).inc();
        let _ = done_tx.send(true);
    }

    /// Spawns a producer: a dispatch loop that repeatedly calls
    /// [`ProducerWork::poll`] until it returns [`WorkOutcome::Stop`] or
    /// `TERMINATE` is signalled.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateWorker`] if `name` is already taken; no task
    /// is spawned in that case.
    pub fn producer_create(
        self: &Arc<Self>,
        name: Option<String>,
        mut work: impl ProducerWork,
    ) -> Result<Arc<WorkerHandle>, Error> {
        let (handle, ctx, done_tx) = self.register(name)?;
        let registry = Arc::clone(self);

        self.runtime.spawn(async move {
            work.on_start(&ctx).await;

            loop {
                if ctx.is_terminating() {
                    break;
                }
                if ctx.is_suspended() {
                    WORKER_SUSPENDED.with_label_values(&[ctx.name()]).set(1);
                    ctx.suspend_tick().await;
                    continue;
                }
                WORKER_SUSPENDED.with_label_values(&[ctx.name()]).set(0);

                let started = Instant::now();
                let outcome = work.poll(&ctx).await;
                WORKER_EXECUTIONS.with_label_values(&[ctx.name()]).inc();
                WORKER_EXECUTION_DURATION_SECONDS
                    .with_label_values(&[ctx.name()])
                    .observe(started.elapsed().as_secs_f64());

                if outcome == WorkOutcome::Stop {
                    break;
                }
            }

            work.on_shutdown(&ctx).await;
            registry.reap(ctx.name(), &done_tx);
        });

        Ok(handle)
    }

    /// Spawns a consumer bound to `supply_queue`: a dispatch loop that waits
    /// for messages on that queue, decodes each as `T`, and hands it to
    /// [`ConsumerWork::handle`].
    ///
    /// A message of an unexpected payload type is logged and dropped rather
    /// than treated as fatal, matching the runtime's stance that payload
    /// type safety is the application's concern, not the queue's.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateWorker`] if `name` is already taken, or
    /// [`Error::MissingQueue`] if `supply_queue` does not exist yet — the
    /// check happens before the worker is registered, so a missing queue is
    /// always a creation-time failure rather than something discovered only
    /// once the dispatch loop starts running.
    pub fn consumer_create<T: Send + 'static>(
        self: &Arc<Self>,
        queues: Arc<QueueRegistry>,
        supply_queue: impl Into<String>,
        name: Option<String>,
        mut work: impl ConsumerWork<T>,
    ) -> Result<Arc<WorkerHandle>, Error> {
        let supply_queue = supply_queue.into();
        if !queues.snapshot_names().iter().any(|q| q == &supply_queue) {
            return amq_error::MissingQueueSnafu { name: supply_queue }.fail();
        }

        let (handle, ctx, done_tx) = self.register(name)?;
        let registry = Arc::clone(self);
        let stats = Arc::clone(&handle.stats);

        self.runtime.spawn(async move {
            work.on_start(&ctx).await;

            loop {
                if ctx.is_terminating() {
                    break;
                }
                if ctx.is_suspended() {
                    WORKER_SUSPENDED.with_label_values(&[ctx.name()]).set(1);
                    ctx.suspend_tick().await;
                    continue;
                }
                WORKER_SUSPENDED.with_label_values(&[ctx.name()]).set(0);

                let waited: Option<amq_mq::WaitOutcome<Message>> = tokio::select! {
                    () = ctx.terminated() => break,
                    outcome = queues.wait(&supply_queue, CONSUMER_WAIT_TIMEOUT) => outcome,
                };
                let Some(outcome) = waited else {
                    tracing::warn!(
                        worker = ctx.name(),
                        queue = %supply_queue,
                        "supply queue no longer exists, stopping consumer"
                    );
                    break;
                };
                stats.lock().update(outcome.waited);

                let Some(message) = outcome.message else {
                    continue;
                };

                let work_outcome = match message.downcast::<T>() {
                    Ok(value) => {
                        let started = Instant::now();
                        let outcome = work.handle(&ctx, value).await;
                        WORKER_EXECUTION_DURATION_SECONDS
                            .with_label_values(&[ctx.name()])
                            .observe(started.elapsed().as_secs_f64());
                        outcome
                    }
                    Err(_) => {
                        tracing::warn!(
                            worker = ctx.name(),
                            queue = %supply_queue,
                            "dropped a message of unexpected payload type"
                        );
                        WorkOutcome::Continue
                    }
                };
                WORKER_EXECUTIONS.with_label_values(&[ctx.name()]).inc();

                if work_outcome == WorkOutcome::Stop {
                    break;
                }
            }

            work.on_shutdown(&ctx).await;
            registry.reap(ctx.name(), &done_tx);
        });

        Ok(handle)
    }

    /// Sets `bits` on the named worker's signals; a silent no-op if `name`
    /// does not identify a currently running worker.
    pub fn sigset(&self, name: &str, bits: u64) {
        if let Some(handle) = self.workers.find(name) {
            handle.sigset(bits);
        }
    }

    /// Clears `bits` on the named worker's signals; a silent no-op if `name`
    /// does not identify a currently running worker.
    pub fn sigclr(&self, name: &str, bits: u64) {
        if let Some(handle) = self.workers.find(name) {
            handle.sigclr(bits);
        }
    }

    /// Current signal bitmask for `name`, or 0 if it does not identify a
    /// currently running worker.
    #[must_use]
    pub fn sigget(&self, name: &str) -> u64 {
        self.workers.find(name).map_or(0, |handle| handle.sigget())
    }

    /// Blocks until `name`'s dispatch loop has exited, returning immediately
    /// if it is not currently running.
    pub async fn wait(&self, name: &str) {
        if let Some(handle) = self.workers.find(name) {
            handle.wait().await;
        }
    }

    /// Running statistics for `name`, or `None` if it does not identify a
    /// currently running worker.
    #[must_use]
    pub fn stats(&self, name: &str) -> Option<WorkerStats> { self.workers.find(name).map(|handle| handle.stats()) }

    #[must_use]
    pub fn snapshot_names(&self) -> Vec<String> { self.workers.snapshot_names() }

    /// Signals `TERMINATE` to every currently running worker and waits for
    /// each to exit, in snapshot order. Used by library teardown.
    pub async fn terminate_all(&self) {
        let names = self.workers.snapshot_names();
        for name in &names {
            self.sigset(name, crate::signals::TERMINATE);
        }
        for name in &names {
            self.wait(name).await;
        }
    }
}

impl Default for WorkerRegistry {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use amq_mq::Message;

    use super::*;
    use crate::signals::TERMINATE;

    fn test_registry() -> Arc<WorkerRegistry> {
        let runtime = Arc::new(
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .unwrap(),
        );
        Arc::new(WorkerRegistry::with_runtime(runtime))
    }

    #[tokio::test]
    async fn producer_create_rejects_duplicate_names() {
        let registry = test_registry();
        registry
            .producer_create(Some("dup".to_string()), |_ctx: &_| WorkOutcome::Stop)
            .unwrap();
        let err = registry
            .producer_create(Some("dup".to_string()), |_ctx: &_| WorkOutcome::Stop)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateWorker { .. }));
    }

    #[tokio::test]
    async fn producer_posts_until_terminated() {
        let queues = Arc::new(QueueRegistry::new());
        queues.create("out").unwrap();
        let registry = test_registry();

        let produced = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&produced);
        let queues_for_worker = Arc::clone(&queues);
        let handle = registry
            .producer_create(None, move |_ctx: &_| {
                counter.fetch_add(1, Ordering::SeqCst);
                let _ = queues_for_worker.post("out", Message::new(1u32));
                WorkOutcome::Continue
            })
            .unwrap();

        while queues.count("out") < 3 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        handle.sigset(TERMINATE);
        handle.wait().await;

        assert!(produced.load(Ordering::SeqCst) >= 3);
        assert!(registry.snapshot_names().is_empty());
    }

    #[tokio::test]
    async fn consumer_stops_on_work_outcome_stop_and_is_reaped() {
        let queues = Arc::new(QueueRegistry::new());
        queues.create("in").unwrap();
        queues.post("in", Message::new(42u32)).unwrap();
        let registry = test_registry();

        let received = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&received);
        let handle = registry
            .consumer_create::<u32>(Arc::clone(&queues), "in", Some("reader".to_string()), move |_ctx: &_, value: u32| {
                counter.store(value, Ordering::SeqCst);
                WorkOutcome::Stop
            })
            .unwrap();

        handle.wait().await;
        assert_eq!(received.load(Ordering::SeqCst), 42);
        assert!(registry.stats("reader").is_none());
    }

    #[tokio::test]
    async fn sigset_sigclr_and_wait_on_unknown_worker_are_no_ops() {
        let registry = test_registry();
        registry.sigset("ghost", TERMINATE);
        registry.sigclr("ghost", TERMINATE);
        assert_eq!(registry.sigget("ghost"), 0);
        registry.wait("ghost").await;
    }
}
