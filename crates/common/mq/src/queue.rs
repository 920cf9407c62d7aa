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

//! The message queue registry: a [`NamedContainer`] of [`Fifo`]s.
//!
//! Grounded on `amq_message_queue_create`/`amq_post`/`amq_count` from the
//! original library. Posting to an unknown queue name used to silently drop
//! the payload; here it returns the [`Message`] to the caller instead.

use std::{sync::Arc, time::Duration};

use amq_error::{DuplicateQueueSnafu, Error};
use snafu::OptionExt;

use crate::{container::NamedContainer, fifo::Fifo, fifo::WaitOutcome, message::Message};

/// Reserved name of the runtime's built-in error queue.
pub const ERROR_QUEUE_NAME: &str = "AMQ:ERROR";

#[derive(Default)]
pub struct QueueRegistry {
    queues: NamedContainer<Fifo<Message>>,
}

impl QueueRegistry {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Creates a new, empty named queue.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateQueue`] if `name` is already in use.
    pub fn create(&self, name: impl Into<String>) -> Result<(), Error> {
        let name = name.into();
        self.queues
            .add(name.clone(), Arc::new(Fifo::new()))
            .ok()
            .context(DuplicateQueueSnafu { name })
    }

    /// Posts `message` to the named queue. If the queue does not exist, the
    /// message is handed back to the caller rather than dropped.
    ///
    /// # Errors
    /// Returns the original `Message` when `name` does not identify a queue.
    pub fn post(&self, name: &str, message: Message) -> Result<(), Message> {
        match self.queues.find(name) {
            Some(fifo) => {
                fifo.post(message);
                Ok(())
            }
            None => Err(message),
        }
    }

    /// Waits up to `timeout` for a message on `name`. Returns `None`
    /// immediately if the queue does not exist.
    pub async fn wait(&self, name: &str, timeout: Duration) -> Option<WaitOutcome<Message>> {
        let fifo = self.queues.find(name)?;
        Some(fifo.wait(timeout).await)
    }

    /// Current depth of `name`, or 0 if it does not exist.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.queues.find(name).map_or(0, |fifo| fifo.count())
    }

    /// Destroys a single named queue, discarding and logging any in-flight
    /// messages (via `Fifo`'s `Drop`).
    pub fn destroy(&self, name: &str) -> bool { self.queues.remove(name).is_some() }

    #[must_use]
    pub fn snapshot_names(&self) -> Vec<String> { self.queues.snapshot_names() }

    /// Destroys every remaining queue, in arbitrary order.
    pub fn destroy_all(&self) {
        for (name, fifo) in self.queues.drain() {
            drop(fifo);
            tracing::debug!(queue = %name, "queue destroyed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_post_then_wait_roundtrips() {
        let registry = QueueRegistry::new();
        registry.create("Q").unwrap();
        registry.post("Q", Message::new(7u32)).unwrap();
        assert_eq!(registry.count("Q"), 1);
        let outcome = registry.wait("Q", Duration::from_secs(1)).await.unwrap();
        assert_eq!(outcome.message.unwrap().downcast::<u32>().unwrap(), 7);
    }

    #[tokio::test]
    async fn post_to_missing_queue_returns_the_message() {
        let registry = QueueRegistry::new();
        let err = registry.post("missing", Message::new(1u32)).unwrap_err();
        assert_eq!(err.downcast::<u32>().unwrap(), 1);
    }

    #[test]
    fn create_rejects_duplicate_names() {
        let registry = QueueRegistry::new();
        registry.create("Q").unwrap();
        assert!(registry.create("Q").is_err());
    }

    #[test]
    fn count_and_destroy_on_missing_queue_are_safe_no_ops() {
        let registry = QueueRegistry::new();
        assert_eq!(registry.count("missing"), 0);
        assert!(!registry.destroy("missing"));
    }
}
