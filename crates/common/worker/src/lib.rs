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

//! Producer/consumer worker runtime for the AMQ message queue library.
//!
//! A worker is an independently running producer or consumer dispatch loop,
//! controlled through a small signal bitmask ([`TERMINATE`], [`SUSPEND`])
//! rather than OS signals, and reporting [`WorkerStats`] back through its
//! [`WorkerHandle`]. [`WorkerRegistry`] owns every running worker by name;
//! [`WorkerGroup`] layers bulk signal control for a named subset of them.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use amq_mq::{Message, QueueRegistry};
//! use amq_worker::{WorkOutcome, WorkerRegistry, signals::TERMINATE};
//!
//! # async fn run() {
//! let queues = Arc::new(QueueRegistry::new());
//! queues.create("numbers").unwrap();
//!
//! let workers = Arc::new(WorkerRegistry::new());
//! let producer = workers
//!     .producer_create(Some("emit".to_string()), {
//!         let queues = Arc::clone(&queues);
//!         move |_ctx: &_| {
//!             let _ = queues.post("numbers", Message::new(1u32));
//!             WorkOutcome::Continue
//!         }
//!     })
//!     .unwrap();
//!
//! producer.sigset(TERMINATE);
//! producer.wait().await;
//! # }
//! ```

mod context;
mod group;
mod handle;
mod id;
mod metrics;
mod registry;
pub mod signals;
mod stats;
mod work;

pub use context::{SIGNAL_POLL_INTERVAL, WorkerContext};
pub use group::WorkerGroup;
pub use handle::WorkerHandle;
pub use id::{WorkerId, random_worker_name};
pub use registry::WorkerRegistry;
pub use stats::WorkerStats;
pub use work::{ConsumerWork, ProducerWork, WorkOutcome};
