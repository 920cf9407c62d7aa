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

//! In-process application message queue runtime.
//!
//! `amq` ties together [`amq_mq`]'s named queues and [`amq_worker`]'s
//! producer/consumer dispatch loops behind a single [`AmqRuntime`] handle —
//! one process may hold more than one, unlike the original library's
//! process-wide globals. Creating a runtime also creates the reserved
//! [`amq_mq::ERROR_QUEUE_NAME`] queue; any worker may consume it to observe
//! structured error records posted via [`error_post!`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use amq::{AmqRuntime, error_post};
//! use amq_mq::Message;
//! use amq_worker::WorkOutcome;
//!
//! # async fn run() -> Result<(), amq_error::Error> {
//! let runtime = AmqRuntime::init()?;
//! runtime.queue_create("numbers")?;
//!
//! runtime.producer_create(Some("emit".to_string()), {
//!     let runtime = runtime.clone();
//!     move |_ctx: &_| {
//!         if runtime.post("numbers", Message::new(1u32)).is_err() {
//!             error_post!(runtime, -1, "numbers queue vanished");
//!         }
//!         WorkOutcome::Continue
//!     }
//! })?;
//!
//! runtime.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod macros;
mod runtime;

pub use amq_mq::{ERROR_QUEUE_NAME, ErrorRecord, Message, WaitOutcome};
pub use amq_worker::{ConsumerWork, ProducerWork, WorkOutcome, WorkerContext, WorkerGroup, WorkerHandle, WorkerStats, signals};
pub use runtime::AmqRuntime;
