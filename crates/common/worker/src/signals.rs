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

//! The worker control plane: a bitmask distinct from OS signals, polled by
//! the dispatch loop at roughly one-second granularity.
//!
//! The original library guarded this bitmask with a recursive mutex; a
//! single `AtomicU64` is sufficient here since every operation — set, clear,
//! get — is a single bitwise read-modify-write.

use std::sync::atomic::{AtomicU64, Ordering};

/// Request the worker's dispatch loop exit at the next poll.
pub const TERMINATE: u64 = 1 << 0;
/// Request the worker's dispatch loop pause work until cleared.
pub const SUSPEND: u64 = 1 << 1;

#[derive(Default)]
pub struct SignalSet(AtomicU64);

impl SignalSet {
    #[must_use]
    pub fn new() -> Self { Self(AtomicU64::new(0)) }

    pub fn set(&self, bits: u64) { self.0.fetch_or(bits, Ordering::AcqRel); }

    pub fn clear(&self, bits: u64) { self.0.fetch_and(!bits, Ordering::AcqRel); }

    #[must_use]
    pub fn get(&self) -> u64 { self.0.load(Ordering::Acquire) }

    #[must_use]
    pub fn is_set(&self, bits: u64) -> bool { self.get() & bits == bits }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_clear_and_get_round_trip() {
        let signals = SignalSet::new();
        assert_eq!(signals.get(), 0);

        signals.set(TERMINATE);
        assert!(signals.is_set(TERMINATE));
        assert!(!signals.is_set(SUSPEND));

        signals.set(SUSPEND);
        assert!(signals.is_set(TERMINATE));
        assert!(signals.is_set(SUSPEND));

        signals.clear(TERMINATE);
        assert!(!signals.is_set(TERMINATE));
        assert!(signals.is_set(SUSPEND));
    }
}
