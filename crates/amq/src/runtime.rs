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

//! The single runtime handle an application holds instead of the original
//! library's process-wide globals. Grounded on `amq_lib_init`/`amq_lib_destroy`
//! from the original library and on `crates/app`'s `App`/`AppConfig` lifecycle
//! shape.

use std::{sync::Arc, time::Duration};

use amq_error::Error;
use amq_mq::{ERROR_QUEUE_NAME, ErrorRecord, Message, QueueRegistry, WaitOutcome};
use amq_worker::{ConsumerWork, ProducerWork, WorkerGroup, WorkerHandle, WorkerRegistry, WorkerStats};
use tracing::info;

/// A single AMQ runtime instance. Cheaply cloneable — every clone shares the
/// same underlying queue and worker registries, so passing a clone into a
/// spawned worker's closure is the normal way to give it access back to the
/// runtime that created it.
#[derive(Clone)]
pub struct AmqRuntime {
    queues:  Arc<QueueRegistry>,
    workers: Arc<WorkerRegistry>,
}

impl AmqRuntime {
    /// Creates a fresh runtime: an empty queue registry, an empty worker
    /// registry, and the reserved `AMQ:ERROR` queue.
    ///
    /// # Errors
    /// Returns [`Error::RuntimeInit`] if the error queue cannot be created —
    /// in practice this cannot happen on a freshly constructed registry, but
    /// the fallible signature leaves room for a future runtime that must
    /// acquire external resources during startup.
    pub fn init() -> Result<Self, Error> {
        let queues = Arc::new(QueueRegistry::new());
        queues
            .create(ERROR_QUEUE_NAME)
            .map_err(|source| amq_error::RuntimeInitSnafu {
                reason: source.to_string(),
            }.build())?;

        info!("AMQ runtime initialized");

        Ok(Self {
            queues,
            workers: Arc::new(WorkerRegistry::new()),
        })
    }

    /// Signals `TERMINATE` to every running worker, waits for each to exit,
    /// then destroys the error queue and every remaining message queue.
    ///
    /// Mirrors `amq_lib_destroy`: workers are always torn down before
    /// queues, so a worker mid-poll never observes a queue disappearing out
    /// from under it.
    pub async fn shutdown(self) {
        info!("AMQ runtime shutting down");
        self.workers.terminate_all().await;
        self.queues.destroy_all();
    }

    // --- Queues ---------------------------------------------------------

    /// Creates a new, empty named queue.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateQueue`] if `name` is already in use.
    pub fn queue_create(&self, name: impl Into<String>) -> Result<(), Error> { self.queues.create(name) }

    /// Posts `message` to the named queue. If the queue does not exist, the
    /// message is handed back to the caller rather than dropped.
    ///
    /// # Errors
    /// Returns the original `Message` when `name` does not identify a queue.
    pub fn post(&self, name: &str, message: Message) -> Result<(), Message> { self.queues.post(name, message) }

    /// Waits up to `timeout` for a message on `name`. Returns `None`
    /// immediately if the queue does not exist.
    pub async fn wait(&self, name: &str, timeout: Duration) -> Option<WaitOutcome<Message>> {
        self.queues.wait(name, timeout).await
    }

    /// Current depth of `name`, or 0 if it does not exist.
    #[must_use]
    pub fn queue_count(&self, name: &str) -> usize { self.queues.count(name) }

    /// Destroys a single named queue, returning whether it existed.
    pub fn queue_destroy(&self, name: &str) -> bool { self.queues.destroy(name) }

    #[must_use]
    pub fn queue_names(&self) -> Vec<String> { self.queues.snapshot_names() }

    // --- Workers ---------------------------------------------------------

    /// Spawns a producer worker.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateWorker`] if `name` is already taken.
    pub fn producer_create(&self, name: Option<String>, work: impl ProducerWork) -> Result<Arc<WorkerHandle>, Error> {
        self.workers.producer_create(name, work)
    }

    /// Spawns a consumer worker bound to `supply_queue`.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateWorker`] if `name` is already taken, or
    /// [`Error::MissingQueue`] if `supply_queue` does not exist.
    pub fn consumer_create<T: Send + 'static>(
        &self,
        supply_queue: impl Into<String>,
        name: Option<String>,
        work: impl ConsumerWork<T>,
    ) -> Result<Arc<WorkerHandle>, Error> {
        self.workers
            .consumer_create(Arc::clone(&self.queues), supply_queue, name, work)
    }

    pub fn worker_sigset(&self, name: &str, bits: u64) { self.workers.sigset(name, bits); }

    pub fn worker_sigclr(&self, name: &str, bits: u64) { self.workers.sigclr(name, bits); }

    #[must_use]
    pub fn worker_sigget(&self, name: &str) -> u64 { self.workers.sigget(name) }

    pub async fn worker_wait(&self, name: &str) { self.workers.wait(name).await; }

    #[must_use]
    pub fn worker_stats(&self, name: &str) -> Option<WorkerStats> { self.workers.stats(name) }

    #[must_use]
    pub fn worker_names(&self) -> Vec<String> { self.workers.snapshot_names() }

    /// A handle to the worker registry, for building a [`WorkerGroup`]'s
    /// bulk-control calls against this runtime.
    #[must_use]
    pub fn workers(&self) -> &Arc<WorkerRegistry> { &self.workers }

    /// Convenience for constructing a group over this runtime's workers.
    /// Groups are never stored in the runtime itself — the caller owns the
    /// returned value and drives it directly.
    #[must_use]
    pub fn new_group(&self, name: impl Into<String>) -> WorkerGroup { WorkerGroup::new(name) }

    // --- Error queue -------------------------------------------------------

    /// Posts a structured error record to the reserved `AMQ:ERROR` queue.
    /// Used by the [`crate::error_post!`] macro; prefer that macro at call
    /// sites so the record carries its file/line automatically.
    pub fn post_error(&self, record: ErrorRecord) { let _ = self.queues.post(ERROR_QUEUE_NAME, Message::new(record)); }
}

#[cfg(test)]
mod tests {
    use amq_worker::WorkOutcome;

    use super::*;

    #[tokio::test]
    async fn init_creates_the_reserved_error_queue() {
        let runtime = AmqRuntime::init().unwrap();
        assert!(runtime.queue_names().contains(&ERROR_QUEUE_NAME.to_string()));
        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn post_error_lands_on_the_error_queue() {
        let runtime = AmqRuntime::init().unwrap();
        runtime.post_error(ErrorRecord::new(-1, "disk full"));
        assert_eq!(runtime.queue_count(ERROR_QUEUE_NAME), 1);
        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn shutdown_terminates_running_workers_before_destroying_queues() {
        let runtime = AmqRuntime::init().unwrap();
        runtime.queue_create("q").unwrap();
        runtime
            .producer_create(Some("p".to_string()), |_ctx: &_| WorkOutcome::Continue)
            .unwrap();

        runtime.clone().shutdown().await;

        assert!(runtime.worker_names().is_empty());
        assert_eq!(runtime.queue_count(ERROR_QUEUE_NAME), 0);
    }

    #[tokio::test]
    async fn consumer_create_rejects_a_missing_supply_queue_up_front() {
        let runtime = AmqRuntime::init().unwrap();

        let err = runtime
            .consumer_create::<u32>("nope", None, |_ctx: &_, _value: u32| WorkOutcome::Continue)
            .unwrap_err();

        assert!(matches!(err, Error::MissingQueue { .. }));
        assert!(runtime.worker_names().is_empty());
        runtime.shutdown().await;
    }
}
