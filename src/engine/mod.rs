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

//! Fuzz-test execution engine.
//!
//! A per-method state machine: `Idle -> Accumulating -> Running ->
//! Reporting -> Idle`. Exactly one fuzz case is in flight at any time;
//! the only suspension point is the proxy's bounded wait. Cancellation
//! is polled between cases, never preempting an in-flight call, so the
//! proxy is never left in an undefined state.

pub mod outcome;
pub mod report;

use crate::catalog::ArgSpec;
use crate::core::constants::engine::MAX_CASES_PER_METHOD;
use crate::core::errors::{CallError, EngineError};
use crate::generator::value::Value;
use crate::generator::ValueGenerator;
use crate::health::{EffectiveMemoryLimit, ProcessMonitor};
use crate::utils::cancel::CancelToken;
use self::outcome::TestOutcome;
use self::report::FuzzLog;
use std::time::Duration;
use tracing::{debug, info};

/// Reply payload of a successful call. The engine only needs to know the
/// call returned; the body is kept for trace-level logging.
#[derive(Debug, Clone, Default)]
pub struct CallReply {
    pub body: Option<String>,
}

/// The externally supplied call capability, already bound to the target's
/// bus name, object path and interface. The engine never connects to a
/// bus itself.
pub trait Proxy {
    fn call(
        &self,
        method: &str,
        arguments: &[Value],
        timeout: Duration,
    ) -> Result<CallReply, CallError>;
}

impl<P: Proxy + ?Sized> Proxy for &P {
    fn call(
        &self,
        method: &str,
        arguments: &[Value],
        timeout: Duration,
    ) -> Result<CallReply, CallError> {
        (**self).call(method, arguments, timeout)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineState {
    Idle,
    Accumulating,
    Running,
    Reporting,
}

/// Result of testing one method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodReport {
    pub method: String,
    pub cases_planned: usize,
    pub cases_executed: usize,
    pub rejected_calls: usize,
    /// Final classification: `Ok` when every executed case passed.
    pub outcome: TestOutcome,
    /// True when the run's cancellation token stopped the method early.
    pub cancelled: bool,
}

pub struct FuzzEngine<P> {
    proxy: P,
    monitor: ProcessMonitor,
    limit: EffectiveMemoryLimit,
    per_call_timeout: Duration,
    seed: u64,
    log: FuzzLog,
    state: EngineState,
    method: Option<String>,
    arguments: Vec<ArgSpec>,
}

impl<P: Proxy> FuzzEngine<P> {
    pub fn new(
        proxy: P,
        monitor: ProcessMonitor,
        limit: EffectiveMemoryLimit,
        per_call_timeout: Duration,
        seed: u64,
        log: FuzzLog,
    ) -> Self {
        Self {
            proxy,
            monitor,
            limit,
            per_call_timeout,
            seed,
            log,
            state: EngineState::Idle,
            method: None,
            arguments: Vec::new(),
        }
    }

    pub fn run_id(&self) -> &str {
        self.log.run_id()
    }

    /// `Idle -> Accumulating`.
    pub fn begin_method(&mut self, name: &str) -> Result<(), EngineError> {
        if self.state != EngineState::Idle {
            return Err(EngineError::AlreadyAccumulating);
        }
        self.method = Some(name.to_string());
        self.state = EngineState::Accumulating;
        Ok(())
    }

    /// Decodes and appends one argument signature. A malformed signature
    /// aborts the whole run: it means the introspection layer is feeding
    /// garbage and nothing it said can be trusted.
    pub fn add_argument(&mut self, signature: &str) -> Result<(), EngineError> {
        if self.state != EngineState::Accumulating {
            return Err(EngineError::NotAccumulating);
        }
        self.arguments.push(ArgSpec::parse(signature)?);
        Ok(())
    }

    /// Generates and dispatches every fuzz case for the accumulated
    /// method, classifying each invocation. `Accumulating -> Running ->
    /// Reporting`.
    ///
    /// Findings stop the method (fail-fast: a method already known to be
    /// defective needs no further probing); a crash makes the caller stop
    /// the run. Rejections are recorded and testing continues.
    pub fn run(
        &mut self,
        buffer_cap: usize,
        cancel: &CancelToken,
    ) -> Result<MethodReport, EngineError> {
        if self.state != EngineState::Accumulating {
            return Err(EngineError::NotAccumulating);
        }
        self.state = EngineState::Running;

        let method = self.method.clone().unwrap_or_default();
        let generator = ValueGenerator::new(buffer_cap, self.seed);

        let counts: Vec<usize> = self
            .arguments
            .iter()
            .map(|arg| generator.case_count(arg.type_tree()))
            .collect();
        // Positional pairing across arguments: case i takes argument j's
        // case min(i, count_j - 1). Zero-argument methods are invoked once.
        let planned = counts
            .iter()
            .copied()
            .max()
            .unwrap_or(1)
            .clamp(1, MAX_CASES_PER_METHOD);

        info!(method = %method, cases = planned, "testing method");

        let mut executed = 0;
        let mut rejected = 0;
        let mut verdict = TestOutcome::Ok;
        let mut cancelled = false;

        for case_index in 0..planned {
            // Polled only at case boundaries; an in-flight call always
            // completes and has its outcome recorded.
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let values: Vec<Value> = self
                .arguments
                .iter()
                .zip(&counts)
                .map(|(arg, count)| {
                    generator.case(arg.type_tree(), case_index.min(count.saturating_sub(1)))
                })
                .collect();

            if self.monitor.sample().is_err() {
                // Dead before we even called: attribute it to the previous
                // case's method, but report it here so the run stops.
                verdict = TestOutcome::TargetCrashed;
                self.record(&method, case_index, &values, &verdict)?;
                break;
            }

            debug!(method = %method, case_index, "dispatching fuzz case");
            let call_result = self
                .proxy
                .call(&method, &values, self.per_call_timeout);
            executed += 1;

            let post_sample = self.monitor.sample();
            let outcome = outcome::classify(call_result, post_sample, &self.limit);

            match &outcome {
                TestOutcome::Ok => {}
                TestOutcome::CallRejected { .. } => {
                    rejected += 1;
                    self.record(&method, case_index, &values, &outcome)?;
                }
                _ => {
                    self.record(&method, case_index, &values, &outcome)?;
                    verdict = outcome;
                    break;
                }
            }
        }

        self.state = EngineState::Reporting;
        Ok(MethodReport {
            method,
            cases_planned: planned,
            cases_executed: executed,
            rejected_calls: rejected,
            outcome: verdict,
            cancelled,
        })
    }

    /// `Reporting -> Idle`; clears the working method and arguments so no
    /// state survives into the next method.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        if self.state != EngineState::Reporting {
            return Err(EngineError::NotReporting);
        }
        self.method = None;
        self.arguments.clear();
        self.state = EngineState::Idle;
        Ok(())
    }

    fn record(
        &mut self,
        method: &str,
        case_index: usize,
        values: &[Value],
        outcome: &TestOutcome,
    ) -> Result<(), EngineError> {
        let rendered: Vec<(&str, &Value)> = self
            .arguments
            .iter()
            .zip(values)
            .map(|(arg, value)| (arg.raw_signature(), value))
            .collect();
        self.log
            .record(method, case_index, self.seed, &rendered, outcome)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::SignatureError;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Proxy double that always succeeds and counts invocations.
    struct CountingProxy {
        calls: AtomicUsize,
    }

    impl CountingProxy {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Proxy for CountingProxy {
        fn call(
            &self,
            _method: &str,
            _arguments: &[Value],
            _timeout: Duration,
        ) -> Result<CallReply, CallError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(CallReply::default())
        }
    }

    struct TimeoutProxy;

    impl Proxy for TimeoutProxy {
        fn call(
            &self,
            _method: &str,
            _arguments: &[Value],
            timeout: Duration,
        ) -> Result<CallReply, CallError> {
            Err(CallError::Timeout(timeout))
        }
    }

    fn engine<P: Proxy>(proxy: P) -> FuzzEngine<P> {
        FuzzEngine::new(
            proxy,
            ProcessMonitor::new(std::process::id()),
            EffectiveMemoryLimit::from_kb(u64::MAX),
            Duration::from_millis(100),
            7,
            FuzzLog::from_writer(Box::new(io::sink())),
        )
    }

    #[test]
    fn test_two_argument_method_runs_bounded_and_ok() {
        let mut engine = engine(CountingProxy::new());
        engine.begin_method("Resize").unwrap();
        engine.add_argument("u").unwrap();
        engine.add_argument("s").unwrap();

        let report = engine.run(1024, &CancelToken::new()).unwrap();
        assert_eq!(report.outcome, TestOutcome::Ok);
        assert!(!report.cancelled);
        assert!(report.cases_planned > 0);
        assert!(report.cases_planned <= MAX_CASES_PER_METHOD);
        assert_eq!(report.cases_executed, report.cases_planned);
        assert_eq!(
            engine.proxy.calls.load(Ordering::SeqCst),
            report.cases_executed
        );

        // Deterministic length: a second engine plans the same sequence.
        let mut again = self::engine(CountingProxy::new());
        again.begin_method("Resize").unwrap();
        again.add_argument("u").unwrap();
        again.add_argument("s").unwrap();
        let second = again.run(1024, &CancelToken::new()).unwrap();
        assert_eq!(second.cases_planned, report.cases_planned);
    }

    #[test]
    fn test_zero_argument_method_is_invoked_once() {
        let mut engine = engine(CountingProxy::new());
        engine.begin_method("Ping").unwrap();
        let report = engine.run(1024, &CancelToken::new()).unwrap();
        assert_eq!(report.cases_planned, 1);
        assert_eq!(report.cases_executed, 1);
        assert_eq!(report.outcome, TestOutcome::Ok);
    }

    #[test]
    fn test_timeout_stops_method_with_hang_finding() {
        let mut engine = engine(TimeoutProxy);
        engine.begin_method("Stall").unwrap();
        engine.add_argument("i").unwrap();
        let report = engine.run(1024, &CancelToken::new()).unwrap();
        assert_eq!(report.outcome, TestOutcome::TargetHung);
        // Fail-fast: the first hang ends the method.
        assert_eq!(report.cases_executed, 1);
    }

    #[test]
    fn test_rejections_do_not_stop_testing() {
        struct RejectingProxy;
        impl Proxy for RejectingProxy {
            fn call(
                &self,
                _method: &str,
                _arguments: &[Value],
                _timeout: Duration,
            ) -> Result<CallReply, CallError> {
                Err(CallError::Rejected("invalid argument".into()))
            }
        }

        let mut engine = engine(RejectingProxy);
        engine.begin_method("Strict").unwrap();
        engine.add_argument("y").unwrap();
        let report = engine.run(1024, &CancelToken::new()).unwrap();
        assert_eq!(report.outcome, TestOutcome::Ok);
        assert_eq!(report.rejected_calls, report.cases_executed);
        assert!(report.rejected_calls > 1);
    }

    #[test]
    fn test_memory_growth_stops_method() {
        let mut engine = FuzzEngine::new(
            CountingProxy::new(),
            ProcessMonitor::new(std::process::id()),
            // Any real process dwarfs a 1 kB limit.
            EffectiveMemoryLimit::from_kb(1),
            Duration::from_millis(100),
            7,
            FuzzLog::from_writer(Box::new(io::sink())),
        );
        engine.begin_method("Grow").unwrap();
        engine.add_argument("u").unwrap();
        let report = engine.run(1024, &CancelToken::new()).unwrap();
        assert!(matches!(
            report.outcome,
            TestOutcome::MemoryExceeded { limit_kb: 1, .. }
        ));
        assert_eq!(report.cases_executed, 1);
    }

    #[test]
    fn test_dead_target_reports_crash() {
        let mut engine = FuzzEngine::new(
            CountingProxy::new(),
            ProcessMonitor::new(u32::MAX - 1),
            EffectiveMemoryLimit::from_kb(u64::MAX),
            Duration::from_millis(100),
            7,
            FuzzLog::from_writer(Box::new(io::sink())),
        );
        engine.begin_method("Anything").unwrap();
        engine.add_argument("b").unwrap();
        let report = engine.run(1024, &CancelToken::new()).unwrap();
        assert_eq!(report.outcome, TestOutcome::TargetCrashed);
        // The pre-call liveness check fires before any dispatch.
        assert_eq!(report.cases_executed, 0);
        assert_eq!(engine.proxy.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_cancellation_is_polled_at_case_boundaries() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut engine = engine(CountingProxy::new());
        engine.begin_method("Anything").unwrap();
        engine.add_argument("u").unwrap();
        let report = engine.run(1024, &cancel).unwrap();
        assert!(report.cancelled);
        assert_eq!(report.cases_executed, 0);
    }

    #[test]
    fn test_state_machine_rejects_misuse() {
        let mut engine = engine(CountingProxy::new());
        assert!(matches!(
            engine.add_argument("u"),
            Err(EngineError::NotAccumulating)
        ));
        assert!(matches!(
            engine.run(1024, &CancelToken::new()),
            Err(EngineError::NotAccumulating)
        ));
        assert!(matches!(engine.reset(), Err(EngineError::NotReporting)));

        engine.begin_method("First").unwrap();
        assert!(matches!(
            engine.begin_method("Second"),
            Err(EngineError::AlreadyAccumulating)
        ));
    }

    #[test]
    fn test_reset_clears_state_between_methods() {
        let mut engine = engine(CountingProxy::new());
        engine.begin_method("First").unwrap();
        engine.add_argument("u").unwrap();
        engine.run(1024, &CancelToken::new()).unwrap();
        engine.reset().unwrap();

        // Nothing leaks into the next method: a fresh zero-argument
        // method plans exactly one case.
        engine.begin_method("Second").unwrap();
        let report = engine.run(1024, &CancelToken::new()).unwrap();
        assert_eq!(report.method, "Second");
        assert_eq!(report.cases_planned, 1);
    }

    #[test]
    fn test_malformed_signature_aborts_accumulation() {
        let mut engine = engine(CountingProxy::new());
        engine.begin_method("Bad").unwrap();
        assert!(matches!(
            engine.add_argument("a{as}"),
            Err(EngineError::Signature(SignatureError::Malformed { .. }))
        ));
    }
}
