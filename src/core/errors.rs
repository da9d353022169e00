// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error taxonomy.
//!
//! Anything indicating the *tool* is misused or fed malformed structural
//! data is fatal and aborts the run. Anything indicating the *target*
//! misbehaved is a finding, surfaced through `TestOutcome` and never
//! raised as an error.

use std::time::Duration;
use thiserror::Error;

/// Type-signature parsing failures. Always fatal: a malformed introspected
/// signature means the introspection layer cannot be trusted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// Unknown type code, unbalanced delimiters, bad dict-entry shape,
    /// or trailing garbage after one complete type.
    #[error("malformed type signature {signature:?}: {reason}")]
    Malformed { signature: String, reason: String },

    /// Container nesting beyond the fixed maximum.
    #[error("type signature {signature:?} exceeds the maximum container nesting of {max_depth}")]
    TooDeep { signature: String, max_depth: usize },
}

impl SignatureError {
    pub(crate) fn malformed(signature: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            signature: signature.to_string(),
            reason: reason.into(),
        }
    }
}

/// Misuse of the fuzz-engine state machine. Programmer error, fatal.
#[derive(Error, Debug)]
pub enum EngineError {
    /// `begin_method` called while the engine is not idle.
    #[error("begin_method called while a method is already in progress")]
    AlreadyAccumulating,

    /// `add_argument` or `run` called before `begin_method`.
    #[error("no method is being accumulated")]
    NotAccumulating,

    /// `reset` called outside the reporting state.
    #[error("reset called outside the reporting state")]
    NotReporting,

    /// An argument signature failed to parse. Fatal to the whole run.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// The failure log could not be written.
    #[error("failed to write log entry: {0}")]
    LogWrite(#[from] std::io::Error),
}

/// Process status sampling failures. Treated as a liveness signal and
/// mapped to `TestOutcome::TargetCrashed`, never propagated mid-run.
#[derive(Error, Debug)]
pub enum HealthError {
    #[error("process status for pid {pid} is unreadable: {reason}")]
    UnreadableStatus { pid: u32, reason: String },
}

/// Errors surfaced by the externally supplied call proxy.
#[derive(Error, Debug, Clone)]
pub enum CallError {
    /// The call did not return within the bounded wait.
    #[error("call did not return within {0:?}")]
    Timeout(Duration),

    /// The target answered with an error response. Healthy behavior for
    /// adversarial input.
    #[error("target rejected the call: {0}")]
    Rejected(String),

    /// The transport itself failed (connection dropped, peer gone).
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Failures reported by the external bus-side collaborators at run start.
#[derive(Error, Debug)]
pub enum BusError {
    #[error("introspection failed: {0}")]
    Introspection(String),

    #[error("pid resolution failed for {bus_name:?}: {reason}")]
    PidResolution { bus_name: String, reason: String },
}

/// Configuration-boundary validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_buffer_bytes must be at least {floor} bytes, got {got}")]
    BufferTooSmall { floor: usize, got: usize },

    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },

    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },

    #[error("{field} exceeds the {max}-character bus limit")]
    NameTooLong { field: &'static str, max: usize },

    #[error("{field} is not a valid bus identifier: {reason}")]
    MalformedName {
        field: &'static str,
        reason: &'static str,
    },
}

/// Aggregate error for the run driver.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bus(#[from] BusError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The target could not be baselined at run start.
    #[error(transparent)]
    Health(#[from] HealthError),

    #[error("failed to open the failure log: {0}")]
    Log(#[from] std::io::Error),
}
