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

//! End-to-end run-driver tests against scripted collaborator doubles.

use hornet::catalog::RawMethod;
use hornet::config::Config;
use hornet::core::errors::{BusError, CallError};
use hornet::core::types::{BusName, FuzzTarget};
use hornet::engine::outcome::TestOutcome;
use hornet::engine::{CallReply, Proxy};
use hornet::generator::value::Value;
use hornet::runner::{self, IntrospectionSource, PidResolver, Termination};
use hornet::utils::cancel::CancelToken;
use std::fs;
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;

struct StaticPid(u32);

impl PidResolver for StaticPid {
    fn resolve(&self, _bus_name: &BusName) -> Result<u32, BusError> {
        Ok(self.0)
    }
}

struct StaticIntrospection(Vec<RawMethod>);

impl IntrospectionSource for StaticIntrospection {
    fn methods(&self) -> Result<Vec<RawMethod>, BusError> {
        Ok(self.0.clone())
    }
}

/// Succeeds everywhere except the configured method, which times out.
struct HangOn {
    hanging_method: &'static str,
}

impl Proxy for HangOn {
    fn call(
        &self,
        method: &str,
        _arguments: &[Value],
        timeout: Duration,
    ) -> Result<CallReply, CallError> {
        if method == self.hanging_method {
            Err(CallError::Timeout(timeout))
        } else {
            Ok(CallReply::default())
        }
    }
}

struct AlwaysOk;

impl Proxy for AlwaysOk {
    fn call(
        &self,
        _method: &str,
        _arguments: &[Value],
        _timeout: Duration,
    ) -> Result<CallReply, CallError> {
        Ok(CallReply::default())
    }
}

/// Kills (and reaps) the wrapped child on the first call to the
/// configured method, simulating a target crash mid-call.
struct KillOn {
    lethal_method: &'static str,
    child: Mutex<Option<Child>>,
}

impl Proxy for KillOn {
    fn call(
        &self,
        method: &str,
        _arguments: &[Value],
        _timeout: Duration,
    ) -> Result<CallReply, CallError> {
        if method == self.lethal_method {
            if let Some(mut child) = self.child.lock().unwrap().take() {
                let _ = child.kill();
                let _ = child.wait();
            }
        }
        Ok(CallReply::default())
    }
}

fn target() -> FuzzTarget {
    FuzzTarget::new("org.example.Daemon", "/org/example/Daemon", "org.example.Daemon")
        .expect("valid target")
}

fn config(dir: &TempDir) -> Config {
    Config {
        log_path: dir.path().join("hornet.log"),
        max_buffer_bytes: 1024,
        ..Config::default()
    }
}

fn spawn_disposable_target() -> Child {
    Command::new("sleep")
        .arg("60")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn disposable child process")
}

#[test]
fn test_full_coverage_with_cooperative_target() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let summary = runner::run(
        &target(),
        &AlwaysOk,
        &StaticPid(std::process::id()),
        &StaticIntrospection(vec![
            RawMethod::new("SetName", ["s"]),
            RawMethod::new("Resize", ["u", "u"]),
            RawMethod::new("Ping", Vec::<String>::new()),
        ]),
        &config(&dir),
        &CancelToken::new(),
    )?;

    assert_eq!(summary.termination, Termination::Completed);
    assert_eq!(summary.methods_total, 3);
    assert_eq!(summary.methods_tested, 3);
    assert!(summary.findings.is_empty());
    assert!(summary.baseline_kb > 0);
    assert!(summary.memory_limit_kb >= summary.baseline_kb);
    assert!(dir.path().join("hornet.log").exists());
    Ok(())
}

#[test]
fn test_hang_stops_only_the_affected_method() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let cfg = config(&dir);
    let summary = runner::run(
        &target(),
        &HangOn {
            hanging_method: "Stall",
        },
        &StaticPid(std::process::id()),
        &StaticIntrospection(vec![
            RawMethod::new("Stall", ["i"]),
            RawMethod::new("Healthy", ["s"]),
        ]),
        &cfg,
        &CancelToken::new(),
    )?;

    assert_eq!(summary.termination, Termination::Completed);
    assert_eq!(summary.methods_tested, 2);
    assert_eq!(summary.findings.len(), 1);
    assert_eq!(summary.findings[0].method, "Stall");
    assert_eq!(summary.findings[0].outcome, TestOutcome::TargetHung);

    let log = fs::read_to_string(&cfg.log_path)?;
    let record: serde_json::Value =
        serde_json::from_str(log.lines().next().expect("one record was written"))?;
    assert_eq!(record["method"], "Stall");
    assert_eq!(record["outcome"], "target_hung");
    assert_eq!(record["run_id"], summary.run_id.as_str());
    assert_eq!(record["arguments"][0]["signature"], "i");
    Ok(())
}

#[test]
fn test_crash_terminates_the_whole_run() {
    let dir = TempDir::new().unwrap();
    let child = spawn_disposable_target();
    let pid = child.id();

    let summary = runner::run(
        &target(),
        &KillOn {
            lethal_method: "Detonate",
            child: Mutex::new(Some(child)),
        },
        &StaticPid(pid),
        &StaticIntrospection(vec![
            RawMethod::new("Detonate", ["y"]),
            RawMethod::new("NeverReached", ["s"]),
        ]),
        &config(&dir),
        &CancelToken::new(),
    )
    .expect("run reports the crash cleanly");

    assert_eq!(
        summary.termination,
        Termination::TargetCrashed {
            method: "Detonate".to_string()
        }
    );
    assert_eq!(summary.methods_tested, 1);
    assert_eq!(summary.findings.len(), 1);
    assert_eq!(summary.findings[0].outcome, TestOutcome::TargetCrashed);
}

#[test]
fn test_precancelled_token_stops_the_run_cleanly() {
    let dir = TempDir::new().unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();

    let summary = runner::run(
        &target(),
        &AlwaysOk,
        &StaticPid(std::process::id()),
        &StaticIntrospection(vec![
            RawMethod::new("First", ["u"]),
            RawMethod::new("Second", ["u"]),
        ]),
        &config(&dir),
        &cancel,
    )
    .expect("cancellation is a clean stop");

    assert_eq!(
        summary.termination,
        Termination::Cancelled {
            method: "First".to_string()
        }
    );
    assert_eq!(summary.methods_tested, 1);
    assert!(summary.findings.is_empty());
}

#[test]
fn test_malformed_introspected_signature_aborts_before_fuzzing() {
    let dir = TempDir::new().unwrap();
    let result = runner::run(
        &target(),
        &AlwaysOk,
        &StaticPid(std::process::id()),
        &StaticIntrospection(vec![RawMethod::new("Broken", ["a{as}"])]),
        &config(&dir),
        &CancelToken::new(),
    );
    assert!(result.is_err(), "untrustworthy introspection must be fatal");
}

#[test]
fn test_invalid_buffer_cap_rejected_at_the_boundary() {
    let dir = TempDir::new().unwrap();
    let cfg = Config {
        max_buffer_bytes: 64,
        ..config(&dir)
    };
    let result = runner::run(
        &target(),
        &AlwaysOk,
        &StaticPid(std::process::id()),
        &StaticIntrospection(vec![RawMethod::new("Ping", Vec::<String>::new())]),
        &cfg,
        &CancelToken::new(),
    );
    assert!(result.is_err());
}
