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

//! Worker groups: a named list of worker names for bulk signal control.
//!
//! Grounded on `amq_wgroup_t` in the original library: a plain growable list
//! of names, not a set, with no locking of its own. The original's
//! `ds_array_t` ran on a single orchestrating thread; a group here is
//! likewise meant to be owned and mutated from one place, not shared across
//! tasks without external synchronization. Membership is resolved against a
//! [`WorkerRegistry`] at call time rather than holding handles directly, so a
//! group stays valid even if a named member has not been created yet or has
//! already exited.

use std::sync::Arc;

use crate::registry::WorkerRegistry;

pub struct WorkerGroup {
    name: String,
    members: Vec<String>,
}

impl WorkerGroup {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str { &self.name }

    /// Appends `worker_name` to the group. Unlike a set, duplicates are not
    /// rejected — adding the same name twice broadcasts to it twice,
    /// matching the original's plain array.
    pub fn add_worker(&mut self, worker_name: impl Into<String>) { self.members.push(worker_name.into()); }

    /// Removes the first member matching `worker_name`, if any.
    pub fn remove_worker(&mut self, worker_name: &str) -> bool {
        if let Some(pos) = self.members.iter().position(|member| member == worker_name) {
            self.members.remove(pos);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn members(&self) -> &[String] { &self.members }

    /// Sets `bits` on every member, looked up in `registry`. Members that
    /// are not currently running are silently skipped, same as
    /// [`WorkerRegistry::sigset`].
    pub fn sigset(&self, registry: &Arc<WorkerRegistry>, bits: u64) {
        for member in &self.members {
            registry.sigset(member, bits);
        }
    }

    pub fn sigclr(&self, registry: &Arc<WorkerRegistry>, bits: u64) {
        for member in &self.members {
            registry.sigclr(member, bits);
        }
    }

    /// Waits for every member to exit, in membership order.
    pub async fn wait(&self, registry: &Arc<WorkerRegistry>) {
        for member in &self.members {
            registry.wait(member).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_does_not_reject_duplicates() {
        let mut group = WorkerGroup::new("g");
        group.add_worker("a");
        group.add_worker("a");
        assert_eq!(group.members(), ["a".to_string(), "a".to_string()]);
    }

    #[test]
    fn remove_takes_only_the_first_match() {
        let mut group = WorkerGroup::new("g");
        group.add_worker("a");
        group.add_worker("a");
        assert!(group.remove_worker("a"));
        assert_eq!(group.members(), ["a".to_string()]);
        assert!(!group.remove_worker("missing"));
    }

    #[tokio::test]
    async fn sigset_and_wait_on_unknown_members_are_no_ops() {
        let registry = Arc::new(WorkerRegistry::new());
        let mut group = WorkerGroup::new("g");
        group.add_worker("nobody");
        group.sigset(&registry, crate::signals::TERMINATE);
        group.wait(&registry).await;
    }
}
