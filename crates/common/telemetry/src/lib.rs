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

//! Structured logging and panic handling for the AMQ runtime.
//!
//! This crate has no distributed-tracing backend to export to — AMQ is an
//! in-process library — so it carries only the [`logging`] layer stack and
//! [`panic_hook`] from the wider telemetry stack, trimmed of the OTLP
//! exporter plumbing.

pub mod logging;
pub mod panic_hook;
