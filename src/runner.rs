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

//! Run driver.
//!
//! Wires the catalog, engine and health monitor together for one full
//! run: resolve the target's PID, take the memory baseline, build the
//! method catalog, then feed the engine one method at a time. The run
//! ends with full coverage, a cooperative cancellation, or an early stop
//! whose cause (method and outcome) the summary names.

use crate::catalog::{MethodCatalog, RawMethod};
use crate::config::Config;
use crate::core::errors::{BusError, RunError};
use crate::core::types::{BusName, FuzzTarget};
use crate::engine::outcome::TestOutcome;
use crate::engine::report::FuzzLog;
use crate::engine::{FuzzEngine, Proxy};
use crate::health::{EffectiveMemoryLimit, ProcessMonitor};
use crate::utils::cancel::CancelToken;
use tracing::{info, warn};

/// Resolves a bus name to the owning process's OS PID. Used once at run
/// start; health sampling reuses the resolved PID afterwards.
pub trait PidResolver {
    fn resolve(&self, bus_name: &BusName) -> Result<u32, BusError>;
}

/// Delivers the raw method list already extracted from the bus's
/// introspection document.
pub trait IntrospectionSource {
    fn methods(&self) -> Result<Vec<RawMethod>, BusError>;
}

/// A non-`Ok` method result worth reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub method: String,
    pub outcome: TestOutcome,
}

/// Why the run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    /// Every method was tested.
    Completed,
    /// The target died; no further methods can safely be tested.
    TargetCrashed { method: String },
    /// The cancellation token was observed between fuzz cases.
    Cancelled { method: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub run_id: String,
    pub target_pid: u32,
    pub baseline_kb: u64,
    pub memory_limit_kb: u64,
    pub methods_total: usize,
    pub methods_tested: usize,
    pub findings: Vec<Finding>,
    pub termination: Termination,
}

/// Fuzzes every method of the target interface.
pub fn run<P: Proxy>(
    target: &FuzzTarget,
    proxy: &P,
    pids: &dyn PidResolver,
    introspection: &dyn IntrospectionSource,
    config: &Config,
    cancel: &CancelToken,
) -> Result<RunSummary, RunError> {
    config.validate()?;

    let pid = pids.resolve(target.bus_name())?;
    let monitor = ProcessMonitor::new(pid);
    let baseline = monitor.baseline()?;
    let limit = EffectiveMemoryLimit::derive(baseline.resident_kb, config.memory_limit_kb);

    let mut catalog = MethodCatalog::from_methods(introspection.methods()?)?;
    let log = FuzzLog::create(&config.log_path)?;

    info!(
        bus_name = target.bus_name().as_str(),
        object_path = target.object_path().as_str(),
        interface = target.interface().as_str(),
        pid,
        baseline_kb = baseline.resident_kb,
        limit_kb = limit.kb(),
        methods = catalog.len(),
        "starting fuzz run"
    );

    let mut engine = FuzzEngine::new(
        proxy,
        monitor,
        limit,
        config.per_call_timeout,
        config.random_seed,
        log,
    );

    let mut summary = RunSummary {
        run_id: engine.run_id().to_string(),
        target_pid: pid,
        baseline_kb: baseline.resident_kb,
        memory_limit_kb: limit.kb(),
        methods_total: catalog.len(),
        methods_tested: 0,
        findings: Vec::new(),
        termination: Termination::Completed,
    };

    loop {
        let Some(name) = catalog.current_method().map(|m| m.name().to_string()) else {
            break;
        };

        engine.begin_method(&name)?;
        loop {
            let Some(signature) = catalog
                .current_argument()
                .map(|arg| arg.raw_signature().to_string())
            else {
                break;
            };
            engine.add_argument(&signature)?;
            catalog.advance_argument();
        }

        let report = engine.run(config.max_buffer_bytes, cancel)?;
        engine.reset()?;
        summary.methods_tested += 1;

        if !report.outcome.is_ok() {
            summary.findings.push(Finding {
                method: report.method.clone(),
                outcome: report.outcome.clone(),
            });
        }

        if report.outcome == TestOutcome::TargetCrashed {
            warn!(method = %report.method, "target crashed; stopping the run");
            summary.termination = Termination::TargetCrashed {
                method: report.method,
            };
            break;
        }
        if report.cancelled {
            info!(method = %report.method, "cancellation observed; stopping the run");
            summary.termination = Termination::Cancelled {
                method: report.method,
            };
            break;
        }

        catalog.advance_method();
    }

    info!(
        methods_tested = summary.methods_tested,
        findings = summary.findings.len(),
        "fuzz run finished"
    );
    Ok(summary)
}
