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

//! Target process health monitoring.
//!
//! Resident memory is read from the target's status pseudo-file on every
//! call; nothing is cached, since stale health data would defeat the
//! purpose. The monitor never signals the target and assumes no
//! process-management privilege: a process whose status cannot be read
//! is treated as dead.

use crate::core::constants::health::{FALLBACK_LIMIT_MULTIPLIER, RESIDENT_FIELD};
use crate::core::errors::HealthError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// One resident-memory observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSample {
    pub resident_kb: u64,
    pub taken_at: DateTime<Utc>,
}

/// Reads the target's kernel-maintained status file. Holds nothing but
/// the PID.
#[derive(Debug, Clone, Copy)]
pub struct ProcessMonitor {
    pid: u32,
}

impl ProcessMonitor {
    pub fn new(pid: u32) -> Self {
        Self { pid }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    fn status_path(&self) -> PathBuf {
        PathBuf::from(format!("/proc/{}/status", self.pid))
    }

    /// First observation after the target is located; the memory limit is
    /// derived from it.
    pub fn baseline(&self) -> Result<HealthSample, HealthError> {
        self.sample()
    }

    pub fn sample(&self) -> Result<HealthSample, HealthError> {
        let status = fs::read_to_string(self.status_path()).map_err(|e| {
            HealthError::UnreadableStatus {
                pid: self.pid,
                reason: e.to_string(),
            }
        })?;
        let resident_kb =
            parse_resident_kb(&status).ok_or_else(|| HealthError::UnreadableStatus {
                pid: self.pid,
                reason: format!("status file has no parsable {RESIDENT_FIELD} field"),
            })?;
        Ok(HealthSample {
            resident_kb,
            taken_at: Utc::now(),
        })
    }

    /// Liveness is the same read: an unreadable status file means the
    /// process is gone (or a zombie with its memory already released).
    pub fn is_alive(&self) -> bool {
        self.sample().is_ok()
    }
}

/// Extracts the resident-set size in kB from status-file text.
fn parse_resident_kb(status: &str) -> Option<u64> {
    status
        .lines()
        .find_map(|line| line.strip_prefix(RESIDENT_FIELD))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|kb| kb.parse().ok())
}

/// Memory limit for the run: the requested limit when it exceeds the
/// baseline resident size, otherwise a multiple of the baseline.
/// Computed once per run, immutable afterward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveMemoryLimit {
    kb: u64,
}

impl EffectiveMemoryLimit {
    pub fn derive(baseline_kb: u64, requested_kb: Option<u64>) -> Self {
        let kb = match requested_kb {
            Some(requested) if requested > baseline_kb => requested,
            _ => baseline_kb.saturating_mul(FALLBACK_LIMIT_MULTIPLIER),
        };
        Self { kb }
    }

    /// For tests and embedders that compute their own limit.
    pub fn from_kb(kb: u64) -> Self {
        Self { kb }
    }

    pub fn kb(&self) -> u64 {
        self.kb
    }

    pub fn exceeded_by(&self, sample: &HealthSample) -> bool {
        sample.resident_kb > self.kb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_FIXTURE: &str = "\
Name:\tfuzz-target
Umask:\t0022
State:\tS (sleeping)
Pid:\t4242
VmPeak:\t  165432 kB
VmSize:\t  123456 kB
VmRSS:\t   10240 kB
Threads:\t3
";

    #[test]
    fn test_parses_resident_field_from_status_text() {
        assert_eq!(parse_resident_kb(STATUS_FIXTURE), Some(10_240));
    }

    #[test]
    fn test_missing_resident_field_is_none() {
        assert_eq!(parse_resident_kb("Name:\tzombie\nState:\tZ\n"), None);
    }

    #[test]
    fn test_sampling_own_process_succeeds() {
        let monitor = ProcessMonitor::new(std::process::id());
        let sample = monitor.sample().expect("own status file is readable");
        assert!(sample.resident_kb > 0);
        assert!(monitor.is_alive());
    }

    #[test]
    fn test_nonexistent_pid_reads_as_dead() {
        // Above the kernel's default pid_max, so never a live process.
        let monitor = ProcessMonitor::new(u32::MAX - 1);
        assert!(!monitor.is_alive());
        assert!(matches!(
            monitor.sample(),
            Err(HealthError::UnreadableStatus { .. })
        ));
    }

    #[test]
    fn test_limit_falls_back_when_request_does_not_exceed_baseline() {
        let limit = EffectiveMemoryLimit::derive(10_000, Some(5_000));
        assert_eq!(limit.kb(), 30_000);
    }

    #[test]
    fn test_limit_honors_request_above_baseline() {
        let limit = EffectiveMemoryLimit::derive(10_000, Some(50_000));
        assert_eq!(limit.kb(), 50_000);
    }

    #[test]
    fn test_limit_defaults_to_baseline_multiple() {
        let limit = EffectiveMemoryLimit::derive(10_000, None);
        assert_eq!(limit.kb(), 30_000);
    }

    #[test]
    fn test_exceeded_by_compares_resident_size() {
        let limit = EffectiveMemoryLimit::from_kb(100);
        let over = HealthSample {
            resident_kb: 101,
            taken_at: Utc::now(),
        };
        let at = HealthSample {
            resident_kb: 100,
            taken_at: Utc::now(),
        };
        assert!(limit.exceeded_by(&over));
        assert!(!limit.exceeded_by(&at));
    }
}
