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

//! Named message queues backed by an in-process concurrent FIFO.
//!
//! - [`fifo`]: the concurrent FIFO behind every named queue.
//! - [`container`]: the rwlock-backed named container the queue registry and
//!   the worker registry are both built on.
//! - [`queue`]: the named queue registry itself, plus the reserved
//!   `AMQ:ERROR` queue name.
//! - [`message`]: the type-erased message envelope that replaces the
//!   original library's `void *` payloads.
//! - [`error_record`]: the payload carried on the error queue.

pub mod container;
pub mod error_record;
pub mod fifo;
pub mod message;
pub mod queue;

pub use container::NamedContainer;
pub use error_record::ErrorRecord;
pub use fifo::{Fifo, WaitOutcome};
pub use message::Message;
pub use queue::{ERROR_QUEUE_NAME, QueueRegistry};
