//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures shared by the entry point, the
//! engine and the recorders: test identifiers, issues, events and the context
//! an event is observed in.
//!
//! 此模块定义了入口点、引擎和记录器共享的核心数据结构：
//! 测试标识符、问题、事件以及观察事件时的上下文。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in a source file.
/// 源文件中的位置。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// The hierarchical identifier of a test or suite.
///
/// Two identifiers denote the same test only when both the name path and the
/// source location match. The canonical string form joins the name components
/// with `.` and appends `/file:line:column` when a location is attached.
///
/// 测试或测试套件的分层标识符。
/// 只有当名称路径和源代码位置都相同时，两个标识符才表示同一个测试。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestId {
    name_components: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_location: Option<SourceLocation>,
}

impl TestId {
    pub fn new<I, S>(name_components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name_components: name_components.into_iter().map(Into::into).collect(),
            source_location: None,
        }
    }

    pub fn with_source_location(mut self, source_location: SourceLocation) -> Self {
        self.source_location = Some(source_location);
        self
    }

    pub fn name_components(&self) -> &[String] {
        &self.name_components
    }

    pub fn source_location(&self) -> Option<&SourceLocation> {
        self.source_location.as_ref()
    }

    /// The name path without any source location, e.g. `Module.Type.function`.
    pub fn name_path(&self) -> String {
        self.name_components.join(".")
    }

    /// The last name component, if any.
    pub fn leaf_name(&self) -> &str {
        self.name_components.last().map(String::as_str).unwrap_or_default()
    }

    /// The identifier of the enclosing named scope.
    ///
    /// An identifier carrying a source location has the same name path without
    /// the location as its parent; otherwise the last name component is dropped.
    /// A single bare component has no parent.
    ///
    /// 携带源代码位置的标识符，其父级是去掉位置后的相同名称路径；
    /// 否则去掉最后一个名称组件。单个裸组件没有父级。
    pub fn parent(&self) -> Option<TestId> {
        if self.source_location.is_some() {
            return Some(TestId::new(self.name_components.iter().cloned()));
        }
        match self.name_components.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(TestId::new(rest.iter().cloned())),
            _ => None,
        }
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name_path())?;
        if let Some(location) = &self.source_location {
            write!(f, "/{location}")?;
        }
        Ok(())
    }
}

/// A discovered test or suite as reported by an engine.
/// 引擎报告的已发现测试或测试套件。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    pub id: TestId,
    /// `true` for a suite that groups other tests rather than running itself.
    /// 对于将其他测试分组而不是自身运行的测试套件，为 `true`。
    #[serde(default)]
    pub is_suite: bool,
    /// `true` for tests synthesized by the engine that users never name.
    /// 对于由引擎合成、用户从不直接命名的测试，为 `true`。
    #[serde(default)]
    pub is_hidden: bool,
}

impl Test {
    pub fn function(id: TestId) -> Self {
        Self {
            id,
            is_suite: false,
            is_hidden: false,
        }
    }

    pub fn suite(id: TestId) -> Self {
        Self {
            id,
            is_suite: true,
            is_hidden: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }
}

/// Enumerates the kinds of problems a test can record.
/// 枚举测试可能记录的问题类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueKind {
    /// An expectation evaluated to false.
    /// 期望的求值结果为 false。
    ExpectationFailed,
    /// The test body panicked or returned an error.
    /// 测试主体发生 panic 或返回错误。
    ErrorCaught,
    /// An exit test terminated differently than expected, or could not be started.
    /// 退出测试的终止方式与预期不符，或无法启动。
    ExitTestFailed,
    /// A problem raised by the runner itself rather than by test code.
    /// 由运行器自身而不是测试代码引发的问题。
    System,
}

/// A recorded problem associated with a test.
///
/// A known issue was declared as expected ahead of time: it is still reported
/// to every recorder but never fails the run.
///
/// 与测试关联的已记录问题。
/// 已知问题是预先声明为预期的问题：它仍会报告给每个记录器，但永远不会导致运行失败。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub kind: IssueKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    #[serde(default)]
    pub is_known: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_location: Option<SourceLocation>,
}

impl Issue {
    pub fn new(kind: IssueKind, comment: impl Into<String>) -> Self {
        Self {
            kind,
            comments: vec![comment.into()],
            is_known: false,
            source_location: None,
        }
    }

    pub fn known(mut self) -> Self {
        self.is_known = true;
        self
    }

    pub fn at(mut self, source_location: SourceLocation) -> Self {
        self.source_location = Some(source_location);
        self
    }

    /// All comments joined into one line.
    pub fn summary(&self) -> String {
        self.comments.join("; ")
    }
}

/// The kinds of occurrences an engine reports while running tests.
/// 引擎在运行测试时报告的事件类型。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EventKind {
    RunStarted,
    IterationStarted { index: usize },
    TestStarted,
    IssueRecorded { issue: Issue },
    TestEnded,
    IterationEnded { index: usize },
    RunEnded,
}

impl EventKind {
    /// The camelCase name used by structured encodings.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::RunStarted => "runStarted",
            EventKind::IterationStarted { .. } => "iterationStarted",
            EventKind::TestStarted => "testStarted",
            EventKind::IssueRecorded { .. } => "issueRecorded",
            EventKind::TestEnded => "testEnded",
            EventKind::IterationEnded { .. } => "iterationEnded",
            EventKind::RunEnded => "runEnded",
        }
    }
}

/// An immutable snapshot of something that happened during a run.
/// 运行期间发生的某件事的不可变快照。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    #[serde(flatten)]
    pub kind: EventKind,
    pub instant: DateTime<Utc>,
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            instant: Utc::now(),
        }
    }

    pub fn issue(&self) -> Option<&Issue> {
        match &self.kind {
            EventKind::IssueRecorded { issue } => Some(issue),
            _ => None,
        }
    }
}

/// Where an event happened. Recorders pass it through untouched.
/// 事件发生的位置。记录器原样传递它。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<TestId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iteration: Option<usize>,
}

impl EventContext {
    pub fn for_run() -> Self {
        Self::default()
    }

    pub fn for_iteration(iteration: usize) -> Self {
        Self {
            test: None,
            iteration: Some(iteration),
        }
    }

    pub fn for_test(test: TestId, iteration: usize) -> Self {
        Self {
            test: Some(test),
            iteration: Some(iteration),
        }
    }
}
