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

//! Unique identifier for workers.

use derive_more::{Debug, Display};
use uuid::Uuid;

/// Unique identifier for a worker, distinct from its (possibly
/// auto-generated) name. Used internally to correlate statistics and
/// completion notifications with a specific spawn, even across worker
/// restarts that reuse the same name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
#[debug("WorkerId({_0})")]
#[display("{_0}")]
pub struct WorkerId(Uuid);

impl WorkerId {
    pub(crate) fn new() -> Self { Self(Uuid::new_v4()) }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid { &self.0 }
}

/// Generates a random worker name: 16 hex characters (8 random bytes).
/// Used when a caller creates a producer or consumer without naming it.
/// Unlike the original library, this name is always returned to the caller
/// via the resulting handle, so an anonymous worker is never unreachable.
#[must_use]
pub fn random_worker_name() -> String { Uuid::new_v4().simple().to_string()[..16].to_string() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_names_are_sixteen_hex_characters() {
        let name = random_worker_name();
        assert_eq!(name.len(), 16);
        assert!(name.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
