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

//! A small concurrent FIFO used as the storage behind every named queue.
//!
//! Mirrors the `cmq_t` contract of the original C library: `post` appends
//! and wakes one waiter, `wait` blocks up to a timeout and reports the
//! duration actually spent waiting, `count` is lock-free, and `destroy`
//! drops whatever is left in the queue, logging how much was discarded.

use std::{
    collections::VecDeque,
    sync::atomic::{AtomicUsize, Ordering},
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use tokio::sync::Notify;

/// Outcome of a [`Fifo::wait`] call: the message received (if any) and how
/// long the call actually waited for it.
pub struct WaitOutcome<T> {
    pub message: Option<T>,
    pub waited:  Duration,
}

pub struct Fifo<T> {
    queue:  Mutex<VecDeque<T>>,
    notify: Notify,
    depth:  AtomicUsize,
}

impl<T> Default for Fifo<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Fifo<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue:  Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            depth:  AtomicUsize::new(0),
        }
    }

    /// Appends `item` to the tail and wakes one waiter, if any.
    pub fn post(&self, item: T) {
        self.queue.lock().push_back(item);
        self.depth.fetch_add(1, Ordering::AcqRel);
        self.notify.notify_one();
    }

    /// Number of messages currently queued. Does not require the lock.
    #[must_use]
    pub fn count(&self) -> usize { self.depth.load(Ordering::Acquire) }

    /// Pops the head of the queue, waiting up to `timeout` if it is empty.
    /// Reports the time actually spent waiting so callers can fold it into
    /// worker statistics.
    pub async fn wait(&self, timeout: Duration) -> WaitOutcome<T> {
        let start = Instant::now();
        if let Some(item) = self.try_pop() {
            return WaitOutcome {
                message: Some(item),
                waited:  start.elapsed(),
            };
        }

        let deadline = start + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return WaitOutcome {
                    message: None,
                    waited:  start.elapsed(),
                };
            }

            let notified = self.notify.notified();
            tokio::select! {
                () = notified => {
                    if let Some(item) = self.try_pop() {
                        return WaitOutcome { message: Some(item), waited: start.elapsed() };
                    }
                }
                () = tokio::time::sleep(remaining) => {
                    return WaitOutcome { message: self.try_pop(), waited: start.elapsed() };
                }
            }
        }
    }

    fn try_pop(&self) -> Option<T> {
        let item = self.queue.lock().pop_front();
        if item.is_some() {
            self.depth.fetch_sub(1, Ordering::AcqRel);
        }
        item
    }
}

impl<T> Drop for Fifo<T> {
    fn drop(&mut self) {
        let discarded = self.queue.lock().len();
        if discarded > 0 {
            tracing::warn!(discarded, "removing queue, discarding in-flight messages");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn post_then_wait_returns_immediately() {
        let fifo = Fifo::new();
        fifo.post(42);
        assert_eq!(fifo.count(), 1);
        let outcome = fifo.wait(Duration::from_secs(1)).await;
        assert_eq!(outcome.message, Some(42));
        assert_eq!(fifo.count(), 0);
    }

    #[tokio::test]
    async fn wait_times_out_on_empty_queue() {
        let fifo: Fifo<i32> = Fifo::new();
        let outcome = fifo.wait(Duration::from_millis(50)).await;
        assert_eq!(outcome.message, None);
        assert!(outcome.waited >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn wait_wakes_as_soon_as_message_posted() {
        use std::sync::Arc;
        let fifo = Arc::new(Fifo::new());
        let waiter = {
            let fifo = fifo.clone();
            tokio::spawn(async move { fifo.wait(Duration::from_secs(5)).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        fifo.post("hello");
        let outcome = waiter.await.unwrap();
        assert_eq!(outcome.message, Some("hello"));
        assert!(outcome.waited < Duration::from_secs(1));
    }
}
