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

//! Producer and consumer work units.
//!
//! The original library passed workers a C function pointer plus a `void *`
//! closure argument (`amq_producer_func_t` / `amq_consumer_func_t`). Rust has
//! no equivalent idiom, so each becomes a small async trait with the same
//! on-start/work/on-shutdown lifecycle shape the worker crate already used
//! for its generic scheduled workers, specialized to AMQ's fixed
//! continuous-dispatch-loop semantics rather than a configurable trigger.

use crate::context::WorkerContext;

/// Whether a dispatch loop should run again or stop on its own initiative
/// (distinct from being stopped by a `TERMINATE` signal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkOutcome {
    Continue,
    Stop,
}

/// A producer repeatedly generates messages and posts them to queues of its
/// choosing; it is not bound to any single queue.
#[async_trait::async_trait]
pub trait ProducerWork: Send + 'static {
    async fn on_start(&mut self, _ctx: &WorkerContext) {}

    async fn poll(&mut self, ctx: &WorkerContext) -> WorkOutcome;

    async fn on_shutdown(&mut self, _ctx: &WorkerContext) {}
}

/// A consumer is bound to one supply queue at creation time; it receives
/// decoded messages of type `T` pulled from that queue.
#[async_trait::async_trait]
pub trait ConsumerWork<T: Send + 'static>: Send + 'static {
    async fn on_start(&mut self, _ctx: &WorkerContext) {}

    async fn handle(&mut self, ctx: &WorkerContext, message: T) -> WorkOutcome;

    async fn on_shutdown(&mut self, _ctx: &WorkerContext) {}
}

#[async_trait::async_trait]
impl<F> ProducerWork for F
where
    F: FnMut(&WorkerContext) -> WorkOutcome + Send + 'static,
{
    async fn poll(&mut self, ctx: &WorkerContext) -> WorkOutcome { self(ctx) }
}

#[async_trait::async_trait]
impl<T, F> ConsumerWork<T> for F
where
    T: Send + 'static,
    F: FnMut(&WorkerContext, T) -> WorkOutcome + Send + 'static,
{
    async fn handle(&mut self, ctx: &WorkerContext, message: T) -> WorkOutcome { self(ctx, message) }
}
