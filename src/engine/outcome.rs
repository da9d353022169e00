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

//! Test outcome classification.
//!
//! Findings are data, not errors: a crashed, hung or bloated target is
//! the fuzzer working as intended. Only `TargetCrashed` ends the run;
//! `TargetHung` and `MemoryExceeded` end the current method;
//! `CallRejected` is a healthy target defending itself.

use crate::core::errors::{CallError, HealthError};
use crate::engine::CallReply;
use crate::health::{EffectiveMemoryLimit, HealthSample};

/// Classification of one fuzz-case invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum TestOutcome {
    /// Call returned and health is within limits.
    Ok,
    /// The target was alive at baseline and is gone after the call.
    TargetCrashed,
    /// No response within the bounded wait. Presumptive: the target is
    /// not killed, only reported.
    TargetHung,
    /// Post-call resident size above the effective limit.
    MemoryExceeded {
        sample: HealthSample,
        limit_kb: u64,
    },
    /// The target answered with an error response; expected behavior for
    /// adversarial input.
    CallRejected { reason: String },
}

impl TestOutcome {
    /// Stable tag for log records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::TargetCrashed => "target_crashed",
            Self::TargetHung => "target_hung",
            Self::MemoryExceeded { .. } => "memory_exceeded",
            Self::CallRejected { .. } => "call_rejected",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// A finding stops the current method; a crash stops the run.
    pub fn is_finding(&self) -> bool {
        matches!(
            self,
            Self::TargetCrashed | Self::TargetHung | Self::MemoryExceeded { .. }
        )
    }
}

/// Classifies one invocation from the call result and the post-call
/// health read. A failed health read is a liveness signal, mapped to
/// `TargetCrashed` rather than propagated.
///
/// Precedence: crash over hang (a dead target ends the run; a timed-out
/// call against a corpse is not "still pending"), hang over memory (with
/// no reply there is no post-call state worth judging), memory over a
/// rejected reply (resident growth is damage regardless of the answer).
pub(crate) fn classify(
    call_result: Result<CallReply, CallError>,
    post_sample: Result<HealthSample, HealthError>,
    limit: &EffectiveMemoryLimit,
) -> TestOutcome {
    let sample = match post_sample {
        Ok(sample) => sample,
        Err(HealthError::UnreadableStatus { .. }) => return TestOutcome::TargetCrashed,
    };
    match call_result {
        Err(CallError::Timeout(_)) => TestOutcome::TargetHung,
        _ if limit.exceeded_by(&sample) => TestOutcome::MemoryExceeded {
            sample,
            limit_kb: limit.kb(),
        },
        Ok(_) => TestOutcome::Ok,
        Err(CallError::Rejected(reason)) | Err(CallError::Transport(reason)) => {
            TestOutcome::CallRejected { reason }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::time::Duration;

    fn sample(resident_kb: u64) -> HealthSample {
        HealthSample {
            resident_kb,
            taken_at: Utc::now(),
        }
    }

    fn unreadable() -> HealthError {
        HealthError::UnreadableStatus {
            pid: 1,
            reason: "gone".into(),
        }
    }

    #[test]
    fn test_timeout_classifies_as_hang() {
        let outcome = classify(
            Err(CallError::Timeout(Duration::from_secs(5))),
            Ok(sample(10)),
            &EffectiveMemoryLimit::from_kb(100),
        );
        assert_eq!(outcome, TestOutcome::TargetHung);
    }

    #[test]
    fn test_crash_takes_precedence_over_hang() {
        let outcome = classify(
            Err(CallError::Timeout(Duration::from_secs(5))),
            Err(unreadable()),
            &EffectiveMemoryLimit::from_kb(100),
        );
        assert_eq!(outcome, TestOutcome::TargetCrashed);
    }

    #[test]
    fn test_unreadable_status_classifies_as_crash() {
        let outcome = classify(
            Ok(CallReply::default()),
            Err(unreadable()),
            &EffectiveMemoryLimit::from_kb(100),
        );
        assert_eq!(outcome, TestOutcome::TargetCrashed);
    }

    #[test]
    fn test_resident_growth_classifies_as_memory_exceeded() {
        let outcome = classify(
            Ok(CallReply::default()),
            Ok(sample(101)),
            &EffectiveMemoryLimit::from_kb(100),
        );
        assert!(matches!(
            outcome,
            TestOutcome::MemoryExceeded { limit_kb: 100, .. }
        ));
    }

    #[test]
    fn test_error_reply_from_live_target_is_rejection() {
        let outcome = classify(
            Err(CallError::Rejected("invalid argument".into())),
            Ok(sample(10)),
            &EffectiveMemoryLimit::from_kb(100),
        );
        assert_eq!(
            outcome,
            TestOutcome::CallRejected {
                reason: "invalid argument".into()
            }
        );
        assert!(!outcome.is_finding());
    }

    #[test]
    fn test_quiet_success_is_ok() {
        let outcome = classify(
            Ok(CallReply::default()),
            Ok(sample(10)),
            &EffectiveMemoryLimit::from_kb(100),
        );
        assert!(outcome.is_ok());
    }
}
