//! # Engine Module / 引擎模块
//!
//! The [`Engine`] trait is the contract between the entry point and whatever
//! discovers and runs tests. [`LocalEngine`] is an in-process implementation:
//! tests are registered as async closures and run as tokio tasks, several at
//! once when parallelization is enabled.
//!
//! [`Engine`] trait 是入口点与发现并运行测试的组件之间的契约。
//! [`LocalEngine`] 是一个进程内实现：测试以异步闭包的形式注册，
//! 并作为 tokio 任务运行，启用并行时会同时运行多个。

use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt, stream};
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::configuration::Configuration;
use crate::core::exit_test::{ExitCondition, ExitTestBody, ExitTestHandler};
use crate::core::models::{
    Event, EventContext, EventKind, Issue, IssueKind, SourceLocation, Test, TestId,
};
use crate::core::pipeline::{EventPipeline, EventRecorder};
use crate::infra::t;

/// Discovers and runs tests.
pub trait Engine: Send + Sync {
    /// Every test and suite the engine knows about, in registration order.
    fn tests(&self) -> Vec<Test>;

    /// Runs the tests selected by `configuration`, reporting every event to its
    /// event handler. Resolves once the last event has been reported.
    fn run(&self, configuration: Configuration) -> impl Future<Output = ()> + Send;

    /// The body of the exit test named `id`, if one is registered.
    fn exit_test(&self, id: &str) -> Option<ExitTestBody>;
}

/// The body of a test registered with a [`LocalEngine`].
pub type TestBody = Arc<dyn Fn(TestScope) -> BoxFuture<'static, ()> + Send + Sync>;

/// An engine whose tests are closures registered in this process.
///
/// 测试为在本进程中注册的闭包的引擎。
#[derive(Clone, Default)]
pub struct LocalEngine {
    tests: Vec<Test>,
    bodies: HashMap<TestId, TestBody>,
    exit_tests: HashMap<String, ExitTestBody>,
}

impl LocalEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a suite. Suites group tests and never run themselves.
    pub fn with_suite(mut self, id: TestId) -> Self {
        self.tests.push(Test::suite(id));
        self
    }

    /// Registers a test function.
    pub fn with_test<F, Fut>(self, id: TestId, body: F) -> Self
    where
        F: Fn(TestScope) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.register(Test::function(id), body)
    }

    /// Registers a test that runs like any other but is never listed.
    pub fn with_hidden_test<F, Fut>(self, id: TestId, body: F) -> Self
    where
        F: Fn(TestScope) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.register(Test::function(id).hidden(), body)
    }

    /// Registers the body of an exit test, run by a child process that was
    /// launched for `id`.
    pub fn with_exit_test<F>(mut self, id: impl Into<String>, body: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.exit_tests.insert(id.into(), Arc::new(body));
        self
    }

    fn register<F, Fut>(mut self, test: Test, body: F) -> Self
    where
        F: Fn(TestScope) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let body: TestBody = Arc::new(move |scope: TestScope| body(scope).boxed());
        self.bodies.insert(test.id.clone(), body);
        self.tests.push(test);
        self
    }

    fn selected(&self, configuration: &Configuration) -> Vec<(TestId, TestBody)> {
        self.tests
            .iter()
            .filter(|test| !test.is_suite && configuration.test_filter.includes(&test.id))
            .filter_map(|test| {
                self.bodies
                    .get(&test.id)
                    .map(|body| (test.id.clone(), Arc::clone(body)))
            })
            .collect()
    }
}

impl Engine for LocalEngine {
    fn tests(&self) -> Vec<Test> {
        self.tests.clone()
    }

    async fn run(&self, configuration: Configuration) {
        let handler = Arc::new(configuration.event_handler.clone());
        let selected = self.selected(&configuration);
        let jobs = if configuration.is_parallelization_enabled {
            num_cpus::get().max(1)
        } else {
            1
        };
        tracing::debug!(
            tests = selected.len(),
            jobs,
            policy = ?configuration.repetition_policy,
            "starting run"
        );

        handler.record(&Event::new(EventKind::RunStarted), &EventContext::for_run());

        let mut completed = 0;
        loop {
            let index = completed;
            let context = EventContext::for_iteration(index);
            handler.record(&Event::new(EventKind::IterationStarted { index }), &context);

            let issue_recorded = Arc::new(AtomicBool::new(false));
            let tests: Vec<BoxFuture<'static, ()>> = selected
                .iter()
                .map(|(id, body)| {
                    let scope = TestScope {
                        test: id.clone(),
                        iteration: index,
                        handler: Arc::clone(&handler),
                        exit_test_handler: configuration.exit_test_handler.clone(),
                        issue_recorded: Arc::clone(&issue_recorded),
                    };
                    run_test(scope, Arc::clone(body)).boxed()
                })
                .collect();
            stream::iter(tests)
                .buffer_unordered(jobs)
                .collect::<Vec<()>>()
                .await;

            handler.record(&Event::new(EventKind::IterationEnded { index }), &context);

            completed += 1;
            let policy = &configuration.repetition_policy;
            if !policy.should_continue(completed, issue_recorded.load(Ordering::SeqCst)) {
                break;
            }
        }

        handler.record(&Event::new(EventKind::RunEnded), &EventContext::for_run());
    }

    fn exit_test(&self, id: &str) -> Option<ExitTestBody> {
        self.exit_tests.get(id).cloned()
    }
}

/// Runs one test body as its own task so a panic is contained and reported.
async fn run_test(scope: TestScope, body: TestBody) {
    scope.emit(EventKind::TestStarted);

    if let Err(error) = tokio::spawn(body(scope.clone())).await {
        let comment = if error.is_panic() {
            t!("error.test_panicked", reason = panic_message(error.into_panic())).to_string()
        } else {
            error.to_string()
        };
        scope.record_issue(Issue::new(IssueKind::ErrorCaught, comment));
    }

    scope.emit(EventKind::TestEnded);
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => payload
            .downcast_ref::<&str>()
            .map(|message| message.to_string())
            .unwrap_or_else(|| "Box<dyn Any>".to_string()),
    }
}

/// What a running test can do: record issues and run exit tests.
///
/// 正在运行的测试可以执行的操作：记录问题和运行退出测试。
#[derive(Clone)]
pub struct TestScope {
    test: TestId,
    iteration: usize,
    handler: Arc<EventPipeline>,
    exit_test_handler: ExitTestHandler,
    issue_recorded: Arc<AtomicBool>,
}

impl TestScope {
    pub fn test(&self) -> &TestId {
        &self.test
    }

    /// Zero-based index of the current iteration.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn record_issue(&self, issue: Issue) {
        if !issue.is_known {
            self.issue_recorded.store(true, Ordering::SeqCst);
        }
        self.emit(EventKind::IssueRecorded { issue });
    }

    /// Records an expectation failure at the caller's location unless `condition` holds.
    #[track_caller]
    pub fn expect(&self, condition: bool, comment: impl Into<String>) -> bool {
        if !condition {
            let issue = Issue::new(IssueKind::ExpectationFailed, comment).at(caller_location());
            self.record_issue(issue);
        }
        condition
    }

    /// Records an issue that is expected and must not fail the run.
    #[track_caller]
    pub fn known_issue(&self, comment: impl Into<String>) {
        let issue = Issue::new(IssueKind::ExpectationFailed, comment)
            .known()
            .at(caller_location());
        self.record_issue(issue);
    }

    /// Runs the exit test `id` in a child process and records an issue unless
    /// it terminates as `condition` describes.
    pub async fn expect_exit(&self, id: &str, condition: ExitCondition) -> bool {
        match self.exit_test_handler.run(id).await {
            Ok(outcome) if condition.is_satisfied_by(&outcome.status) => true,
            Ok(outcome) => {
                let mut issue = Issue::new(
                    IssueKind::ExitTestFailed,
                    t!(
                        "error.exit_test_failed",
                        id = id,
                        status = outcome.status,
                        expected = format!("{condition:?}")
                    ),
                );
                let output = outcome.output.trim();
                if !output.is_empty() {
                    issue.comments.push(output.to_string());
                }
                self.record_issue(issue);
                false
            }
            Err(error) => {
                let issue = Issue::new(
                    IssueKind::ExitTestFailed,
                    t!("error.exit_test_not_started", id = id, reason = error),
                );
                self.record_issue(issue);
                false
            }
        }
    }

    fn emit(&self, kind: EventKind) {
        let context = EventContext::for_test(self.test.clone(), self.iteration);
        self.handler.record(&Event::new(kind), &context);
    }
}

#[track_caller]
fn caller_location() -> SourceLocation {
    let location = Location::caller();
    SourceLocation::new(location.file(), location.line(), location.column())
}
