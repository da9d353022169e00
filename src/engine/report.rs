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

//! Failure log sink.
//!
//! One JSON line per recorded outcome: method, case index, seed, each
//! argument's signature and rendered literal, outcome kind, and the
//! observed-vs-limit resident sizes for memory findings. Append-only,
//! single writer; the engine is single-threaded so no locking is needed.

use crate::core::constants::report::MAX_RENDERED_LITERAL_BYTES;
use crate::engine::outcome::TestOutcome;
use crate::generator::value::Value;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Serialize)]
struct LogRecord<'a> {
    run_id: &'a str,
    timestamp: DateTime<Utc>,
    method: &'a str,
    case_index: usize,
    seed: u64,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    observed_kb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit_kb: Option<u64>,
    arguments: Vec<LogArgument>,
}

#[derive(Serialize)]
struct LogArgument {
    signature: String,
    value: String,
}

/// Rendered literals are bounded; the seed and case index in the same
/// record reproduce the full value.
fn truncate_literal(mut literal: String) -> String {
    if literal.len() <= MAX_RENDERED_LITERAL_BYTES {
        return literal;
    }
    let total = literal.len();
    let mut end = MAX_RENDERED_LITERAL_BYTES;
    while !literal.is_char_boundary(end) {
        end -= 1;
    }
    literal.truncate(end);
    literal.push_str(&format!(" [truncated, {total} bytes total]"));
    literal
}

pub struct FuzzLog {
    writer: Box<dyn Write + Send>,
    run_id: String,
}

impl FuzzLog {
    /// Opens the append-only log file, creating it if needed.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::from_writer(Box::new(file)))
    }

    pub fn from_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer,
            run_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Writes one record and flushes it; a fuzzer that loses its findings
    /// when the run dies alongside the target is useless.
    pub fn record(
        &mut self,
        method: &str,
        case_index: usize,
        seed: u64,
        arguments: &[(&str, &Value)],
        outcome: &TestOutcome,
    ) -> io::Result<()> {
        let (reason, observed_kb, limit_kb) = match outcome {
            TestOutcome::CallRejected { reason } => (Some(reason.as_str()), None, None),
            TestOutcome::MemoryExceeded { sample, limit_kb } => {
                (None, Some(sample.resident_kb), Some(*limit_kb))
            }
            _ => (None, None, None),
        };
        let record = LogRecord {
            run_id: &self.run_id,
            timestamp: Utc::now(),
            method,
            case_index,
            seed,
            outcome: outcome.kind(),
            reason,
            observed_kb,
            limit_kb,
            arguments: arguments
                .iter()
                .map(|(signature, value)| LogArgument {
                    signature: (*signature).to_string(),
                    value: truncate_literal(value.render()),
                })
                .collect(),
        };

        if outcome.is_finding() {
            warn!(
                target: "findings",
                method,
                case_index,
                outcome = outcome.kind(),
                "target misbehaved"
            );
        } else {
            info!(
                target: "findings",
                method,
                case_index,
                outcome = outcome.kind(),
                "call rejected"
            );
        }

        let line = serde_json::to_string(&record)?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_records_are_json_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("findings.log");
        let mut log = FuzzLog::create(&path).unwrap();

        let value = Value::Text("boom".into());
        log.record("SetName", 3, 42, &[("s", &value)], &TestOutcome::TargetHung)
            .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(contents.trim()).unwrap();
        assert_eq!(parsed["method"], "SetName");
        assert_eq!(parsed["case_index"], 3);
        assert_eq!(parsed["seed"], 42);
        assert_eq!(parsed["outcome"], "target_hung");
        assert_eq!(parsed["arguments"][0]["signature"], "s");
        assert_eq!(parsed["arguments"][0]["value"], "\"boom\"");
    }

    #[test]
    fn test_memory_record_carries_observed_and_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("findings.log");
        let mut log = FuzzLog::create(&path).unwrap();

        let outcome = TestOutcome::MemoryExceeded {
            sample: crate::health::HealthSample {
                resident_kb: 40_000,
                taken_at: Utc::now(),
            },
            limit_kb: 30_000,
        };
        log.record("Grow", 0, 1, &[], &outcome).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(contents.trim()).unwrap();
        assert_eq!(parsed["observed_kb"], 40_000);
        assert_eq!(parsed["limit_kb"], 30_000);
    }

    #[test]
    fn test_long_literals_are_truncated() {
        let literal = truncate_literal("x".repeat(10_000));
        assert!(literal.len() < 10_000);
        assert!(literal.contains("10000 bytes total"));
    }

    #[test]
    fn test_appends_across_reopens() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("findings.log");
        for _ in 0..2 {
            let mut log = FuzzLog::create(&path).unwrap();
            log.record("M", 0, 0, &[], &TestOutcome::TargetHung).unwrap();
        }
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }
}
