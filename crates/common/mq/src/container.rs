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

//! A process-wide named container: readers run in parallel, writers are
//! exclusive. Grounded on the rwlock-backed `amq_container_t` — the revision
//! that superseded an earlier two-mutex design in the original library.

use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;

pub struct NamedContainer<T> {
    entries: RwLock<HashMap<String, Arc<T>>>,
}

impl<T> Default for NamedContainer<T> {
    fn default() -> Self { Self::new() }
}

impl<T> NamedContainer<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts `value` under `name`. Returns the existing value back to the
    /// caller (without inserting) if `name` is already taken, so callers can
    /// report a duplicate-name error without the container knowing about
    /// error types.
    pub fn add(&self, name: impl Into<String>, value: Arc<T>) -> Result<(), Arc<T>> {
        let mut entries = self.entries.write();
        let name = name.into();
        if entries.contains_key(&name) {
            return Err(value);
        }
        entries.insert(name, value);
        Ok(())
    }

    /// Detaches `name` from the container without running any destructor
    /// logic beyond normal `Drop` — any teardown behavior for `T` is the
    /// caller's responsibility, mirroring `amq_container_remove`.
    pub fn remove(&self, name: &str) -> Option<Arc<T>> { self.entries.write().remove(name) }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<Arc<T>> { self.entries.read().get(name).cloned() }

    /// Deep copy of every current name, safe to iterate without holding the
    /// lock — mirrors `amq_container_names`.
    #[must_use]
    pub fn snapshot_names(&self) -> Vec<String> { self.entries.read().keys().cloned().collect() }

    #[must_use]
    pub fn len(&self) -> usize { self.entries.read().len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.read().is_empty() }

    /// Removes and returns every entry, clearing the container. Used by
    /// lifecycle teardown, which needs to release each entry under its own
    /// rules rather than a single per-item callback.
    pub fn drain(&self) -> Vec<(String, Arc<T>)> { self.entries.write().drain().collect() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_rejects_duplicate_names() {
        let container = NamedContainer::new();
        assert!(container.add("a", Arc::new(1)).is_ok());
        let rejected = container.add("a", Arc::new(2));
        assert!(rejected.is_err());
        assert_eq!(*rejected.unwrap_err(), 2);
        assert_eq!(*container.find("a").unwrap(), 1);
    }

    #[test]
    fn remove_detaches_without_running_any_special_teardown() {
        let container = NamedContainer::new();
        container.add("a", Arc::new(1)).unwrap();
        assert!(container.remove("a").is_some());
        assert!(container.find("a").is_none());
        assert!(container.remove("a").is_none());
    }

    #[test]
    fn snapshot_names_is_a_stable_copy() {
        let container = NamedContainer::new();
        container.add("a", Arc::new(1)).unwrap();
        container.add("b", Arc::new(2)).unwrap();
        let mut names = container.snapshot_names();
        names.sort();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }
}
