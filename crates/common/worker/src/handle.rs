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

//! A handle to a running producer or consumer.
//!
//! Unlike the original library, the worker never removes itself from the
//! registry or frees its own state. `WorkerHandle::wait` blocks on a
//! `watch` channel that the owning `WorkerRegistry` flips only after it has
//! observed the dispatch loop's task exit and reaped the entry, so there is
//! never a window where a caller can look a worker up by name while its
//! backing task has already torn itself down.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    id::WorkerId,
    signals::{SignalSet, TERMINATE},
    stats::WorkerStats,
};

pub struct WorkerHandle {
    pub(crate) id:           WorkerId,
    pub(crate) name:         Arc<str>,
    pub(crate) signals:      Arc<SignalSet>,
    pub(crate) cancel_token: CancellationToken,
    pub(crate) stats:        Arc<Mutex<WorkerStats>>,
    pub(crate) done_rx:      watch::Receiver<bool>,
}

impl WorkerHandle {
    #[must_use]
    pub fn id(&self) -> WorkerId { self.id }

    /// The worker's name — generated randomly at creation time if the
    /// caller did not supply one, and always reachable from here.
    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    /// Sets the given signal bits. Setting `TERMINATE` also cancels the
    /// worker's cancellation token, waking a loop that is blocked in a FIFO
    /// wait instead of leaving it to discover the signal at its next poll.
    pub fn sigset(&self, bits: u64) {
        self.signals.set(bits);
        if bits & TERMINATE != 0 {
            self.cancel_token.cancel();
        }
    }

    pub fn sigclr(&self, bits: u64) { self.signals.clear(bits); }

    #[must_use]
    pub fn sigget(&self) -> u64 { self.signals.get() }

    #[must_use]
    pub fn stats(&self) -> WorkerStats { *self.stats.lock() }

    /// Blocks until the worker's dispatch loop has exited and the registry
    /// has reaped its entry.
    pub async fn wait(&self) {
        let mut rx = self.done_rx.clone();
        while !*rx.borrow() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    #[must_use]
    pub fn is_done(&self) -> bool { *self.done_rx.borrow() }
}
