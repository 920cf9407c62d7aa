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

//! `error_post!`, mirroring the `AMQ_ERROR_POST` macro from
//! `original_source/samples/folder-stats`: captures the call site and posts
//! a record to the runtime's reserved error queue.

/// Posts a structured error record to `$runtime`'s `AMQ:ERROR` queue,
/// prefixing the message with the call site's file and line.
///
/// ```rust
/// use amq::{AmqRuntime, error_post};
///
/// let runtime = AmqRuntime::init().unwrap();
/// error_post!(runtime, -2, "unexpected payload on {}", "numbers");
/// assert_eq!(runtime.queue_count(amq::ERROR_QUEUE_NAME), 1);
/// ```
#[macro_export]
macro_rules! error_post {
    ($runtime:expr, $code:expr, $($arg:tt)*) => {
        $runtime.post_error($crate::ErrorRecord::at(file!(), line!(), $code, format!($($arg)*)))
    };
}
