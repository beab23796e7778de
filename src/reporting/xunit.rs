//! # xUnit Report Module / xUnit 报告模块
//!
//! Collects test results into an xUnit-compatible XML report and writes it when
//! the run ends. Test suites are keyed by the first name component; unknown
//! issues turn a test case into a failure, known issues are kept in its
//! system-out.
//!
//! 将测试结果收集到 xUnit 兼容的 XML 报告中，并在运行结束时写出。
//! 测试套件以第一个名称组件为键；未知问题会使测试用例失败，已知问题保存在其 system-out 中。

use chrono::{DateTime, FixedOffset, Local};
use quick_junit::{NonSuccessKind, Report, TestCase, TestCaseStatus, TestSuite};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use crate::core::models::{Event, EventContext, EventKind, Issue, TestId};
use crate::core::pipeline::EventRecorder;

static REPORT_NAME: &str = "suite-runner";

#[derive(Default)]
struct CaseState {
    started: Option<(Instant, DateTime<FixedOffset>)>,
    issues: Vec<Issue>,
}

struct XunitState {
    writer: Box<dyn Write + Send>,
    run_started: Option<(Instant, DateTime<FixedOffset>)>,
    suites: BTreeMap<String, TestSuite>,
    cases: HashMap<TestId, CaseState>,
}

/// Builds an xUnit XML report from the events of a run.
pub struct XunitRecorder {
    state: Mutex<XunitState>,
}

impl XunitRecorder {
    pub fn new<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            state: Mutex::new(XunitState {
                writer: Box::new(writer),
                run_started: None,
                suites: BTreeMap::new(),
                cases: HashMap::new(),
            }),
        }
    }
}

fn now() -> (Instant, DateTime<FixedOffset>) {
    (Instant::now(), Local::now().fixed_offset())
}

impl XunitState {
    fn finish_case(&mut self, id: &TestId) {
        let case = self.cases.remove(id).unwrap_or_default();
        let (known, unknown): (Vec<_>, Vec<_>) =
            case.issues.into_iter().partition(|issue| issue.is_known);

        let status = match unknown.first() {
            None => TestCaseStatus::success(),
            Some(first) => {
                let mut status = TestCaseStatus::non_success(NonSuccessKind::Failure);
                status.set_message(first.summary());
                status.set_type(format!("{:?}", first.kind));
                status.set_description(
                    unknown
                        .iter()
                        .map(Issue::summary)
                        .collect::<Vec<_>>()
                        .join("\n"),
                );
                status
            }
        };

        let mut testcase = TestCase::new(id.leaf_name().to_string(), status);
        let components = id.name_components();
        if components.len() > 1 {
            testcase.set_classname(components[..components.len() - 1].join("."));
        }
        if let Some((started, timestamp)) = case.started {
            testcase.set_timestamp(timestamp).set_time(started.elapsed());
        }
        if !known.is_empty() {
            let known = known
                .iter()
                .map(|issue| format!("known issue: {}", issue.summary()))
                .collect::<Vec<_>>()
                .join("\n");
            testcase.set_system_out(known);
        }

        let suite_name = components.first().cloned().unwrap_or_default();
        self.suites
            .entry(suite_name.clone())
            .or_insert_with(|| TestSuite::new(suite_name))
            .add_test_case(testcase);
    }

    fn write_report(&mut self) {
        let mut report = Report::new(REPORT_NAME);
        if let Some((started, timestamp)) = self.run_started {
            report.set_timestamp(timestamp).set_time(started.elapsed());
        }
        report.add_test_suites(std::mem::take(&mut self.suites).into_values());

        if let Err(error) = report.serialize(&mut self.writer) {
            tracing::warn!(%error, "failed to write the xUnit report");
            return;
        }
        if let Err(error) = self.writer.flush() {
            tracing::warn!(%error, "failed to flush the xUnit report");
        }
    }
}

impl EventRecorder for XunitRecorder {
    fn record(&self, event: &Event, context: &EventContext) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match (&event.kind, &context.test) {
            (EventKind::RunStarted, _) => state.run_started = Some(now()),
            (EventKind::TestStarted, Some(test)) => {
                state.cases.entry(test.clone()).or_default().started = Some(now());
            }
            (EventKind::IssueRecorded { issue }, Some(test)) => {
                state
                    .cases
                    .entry(test.clone())
                    .or_default()
                    .issues
                    .push(issue.clone());
            }
            (EventKind::TestEnded, Some(test)) => state.finish_case(test),
            (EventKind::RunEnded, _) => state.write_report(),
            _ => {}
        }
    }
}
