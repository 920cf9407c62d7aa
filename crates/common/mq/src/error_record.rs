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

//! The payload posted to the reserved `AMQ:ERROR` queue.
//!
//! Grounded on `amq_error_new`/`amq_error_del` from the original library: a
//! numeric `code` plus a free-form message. The `code == INT_MAX` shutdown
//! sentinel used by the sample folder-scanner application is deliberately
//! not represented here — it is application policy, not runtime policy.

#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub code:    i32,
    pub message: String,
}

impl ErrorRecord {
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Builds a record whose message is prefixed with the call site and the
    /// code, the way the `AMQ_ERROR_POST` macro in the original library
    /// captured `__FILE__`/`__LINE__` and formatted them alongside the code
    /// via `ds_str_printf(&prefix, "[%s:%i] [code:%i]", file, line, code)`.
    #[must_use]
    pub fn at(file: &str, line: u32, code: i32, message: impl Into<String>) -> Self {
        Self::new(code, format!("[{file}:{line}] [code:{code}] {}", message.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_prefixes_the_call_site_and_code() {
        let record = ErrorRecord::at("queue.rs", 42, -2, "null pathname");
        assert_eq!(record.code, -2);
        assert_eq!(record.message, "[queue.rs:42] [code:-2] null pathname");
    }
}
