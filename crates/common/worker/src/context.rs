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

//! Per-worker context handed to a running producer or consumer: its name,
//! the shared signal bitmask, and a `CancellationToken` that is cancelled
//! the moment `TERMINATE` is set, so a dispatch loop blocked in a FIFO wait
//! wakes immediately instead of waiting out the rest of its poll interval.

use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::{
    id::WorkerId,
    signals::{SUSPEND, SignalSet},
};

/// How often a suspended or otherwise idle dispatch loop re-checks its
/// signal bitmask, matching the original library's `sleep(1)` poll.
pub const SIGNAL_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct WorkerContext {
    pub(crate) id:           WorkerId,
    pub(crate) name:         Arc<str>,
    pub(crate) signals:      Arc<SignalSet>,
    pub(crate) cancel_token: CancellationToken,
}

impl WorkerContext {
    #[must_use]
    pub fn id(&self) -> WorkerId { self.id }

    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    #[must_use]
    pub fn is_terminating(&self) -> bool { self.cancel_token.is_cancelled() }

    #[must_use]
    pub fn is_suspended(&self) -> bool { self.signals.is_set(SUSPEND) }

    /// Resolves as soon as `TERMINATE` is signalled.
    pub async fn terminated(&self) { self.cancel_token.cancelled().await; }

    /// Sleeps for the signal-poll interval, but wakes early if `TERMINATE`
    /// is signalled while suspended.
    pub async fn suspend_tick(&self) {
        tokio::select! {
            () = tokio::time::sleep(SIGNAL_POLL_INTERVAL) => {}
            () = self.terminated() => {}
        }
    }
}
