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

//! Error taxonomy for the AMQ runtime.
//!
//! Most AMQ operations on an unknown queue/worker name are silent no-ops per
//! the runtime contract (see `amq::AmqRuntime`), not `Result` errors. The
//! `Error` type here covers the handful of operations that can genuinely
//! fail: runtime initialization and duplicate-name registration.

use std::{any::Any, error::Error as StdError, sync::Arc};

use serde::Serialize;
use snafu::Snafu;

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    Serialize,
    strum_macros::EnumProperty,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusCode {
    AlreadyExists,
    Internal,
    Unknown,
}

pub trait StackError: StdError {
    fn debug_fmt(&self, layer: usize, buf: &mut Vec<String>);

    fn next(&self) -> Option<&dyn StackError>;

    fn last(&self) -> &dyn StackError
    where
        Self: Sized,
    {
        let Some(mut result) = self.next() else {
            return self;
        };
        while let Some(err) = result.next() {
            result = err;
        }
        result
    }

    fn transparent(&self) -> bool { false }
}

pub trait ErrorExt: StackError {
    fn status_code(&self) -> StatusCode { StatusCode::Unknown }

    fn as_any(&self) -> &dyn Any;

    fn output_msg(&self) -> String
    where
        Self: Sized,
    {
        match self.status_code() {
            StatusCode::Unknown | StatusCode::Internal => {
                format!("Internal error: {:?}", self.status_code())
            }
            _ => {
                let error = self.last();
                if let Some(external_error) = error.source() {
                    let mut root = external_error;
                    while let Some(source) = root.source() {
                        root = source;
                    }
                    if error.transparent() {
                        format!("{root}")
                    } else {
                        format!("{error}: {root}")
                    }
                } else {
                    format!("{error}")
                }
            }
        }
    }

    fn root_cause(&self) -> Option<&dyn StdError>
    where
        Self: Sized,
    {
        let error = self.last();
        let mut source = error.source()?;
        while let Some(next) = source.source() {
            source = next;
        }
        Some(source)
    }
}

impl<T: ?Sized + StackError> StackError for Arc<T> {
    fn debug_fmt(&self, layer: usize, buf: &mut Vec<String>) { self.as_ref().debug_fmt(layer, buf) }

    fn next(&self) -> Option<&dyn StackError> { self.as_ref().next() }
}

impl<T: StackError> StackError for Box<T> {
    fn debug_fmt(&self, layer: usize, buf: &mut Vec<String>) { self.as_ref().debug_fmt(layer, buf) }

    fn next(&self) -> Option<&dyn StackError> { self.as_ref().next() }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("message queue {name:?} already exists"))]
    DuplicateQueue {
        name: String,
        #[snafu(implicit)]
        loc:  snafu::Location,
    },

    #[snafu(display("worker {name:?} already exists"))]
    DuplicateWorker {
        name: String,
        #[snafu(implicit)]
        loc:  snafu::Location,
    },

    #[snafu(display("message queue {name:?} does not exist"))]
    MissingQueue {
        name: String,
        #[snafu(implicit)]
        loc:  snafu::Location,
    },

    #[snafu(display("failed to initialize AMQ runtime: {reason}"))]
    RuntimeInit {
        reason: String,
        #[snafu(implicit)]
        loc:    snafu::Location,
    },
}
