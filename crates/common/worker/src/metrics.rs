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

use lazy_static::lazy_static;
use prometheus::*;

pub const WORKER_LABEL: &str = "worker";

lazy_static! {
    pub static ref WORKER_STARTED: IntCounterVec = register_int_counter_vec!(
        "amq_worker_started_total",
        "Total number of workers started",
        &[WORKER_LABEL]
    )
    .unwrap();
    pub static ref WORKER_STOPPED: IntCounterVec = register_int_counter_vec!(
        "amq_worker_stopped_total",
        "Total number of workers stopped, for any reason",
        &[WORKER_LABEL]
    )
    .unwrap();
    pub static ref WORKER_ACTIVE: IntGaugeVec = register_int_gauge_vec!(
        "amq_worker_active",
        "Whether the worker is currently running (1) or has exited (0)",
        &[WORKER_LABEL]
    )
    .unwrap();
    pub static ref WORKER_SUSPENDED: IntGaugeVec = register_int_gauge_vec!(
        "amq_worker_suspended",
        "Whether the worker currently has the SUSPEND signal set",
        &[WORKER_LABEL]
    )
    .unwrap();
    pub static ref WORKER_EXECUTIONS: IntCounterVec = register_int_counter_vec!(
        "amq_worker_executions_total",
        "Total number of dispatch-loop iterations that produced or consumed a message",
        &[WORKER_LABEL]
    )
    .unwrap();
    pub static ref WORKER_EXECUTION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "amq_worker_execution_duration_seconds",
        "Duration of a single dispatch-loop iteration",
        &[WORKER_LABEL]
    )
    .unwrap();
}
