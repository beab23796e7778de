//! # Event Stream Module / 事件流模块
//!
//! Writes every event as one line of JSON. The output is flushed after each
//! line so the path may be a named pipe read by another process while tests
//! are still running.
//!
//! Two encodings exist. The verbatim encoding serializes the event and its
//! context as they are defined in this crate and may change between releases.
//! Version 0 is a stable, flattened record wrapped in a versioned envelope.
//!
//! 将每个事件写为一行 JSON。每写一行都会刷新输出，因此路径可以是一个命名管道，
//! 在测试仍在运行时由另一个进程读取。
//! 原样编码按照本 crate 中的定义序列化事件及其上下文，可能在不同版本之间变化；
//! 版本 0 是一个稳定的扁平记录，包装在带版本号的信封中。

use serde::Serialize;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::core::errors::EntryPointError;
use crate::core::models::{Event, EventContext, IssueKind, SourceLocation};
use crate::core::pipeline::EventRecorder;

/// The JSON schema used for each line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StreamEncoding {
    Verbatim,
    V0,
}

impl StreamEncoding {
    /// Selects the encoding for `--experimental-event-stream-version`.
    pub fn from_version(version: Option<i32>) -> Result<Self, EntryPointError> {
        match version {
            None => Ok(Self::Verbatim),
            Some(0) => Ok(Self::V0),
            Some(other) => Err(EntryPointError::invalid_argument(
                "--experimental-event-stream-version",
                format!("unsupported event stream version {other}"),
            )),
        }
    }

    /// Encodes one event as a single line of JSON, without the line terminator.
    pub fn encode(&self, event: &Event, context: &EventContext) -> serde_json::Result<String> {
        match self {
            Self::Verbatim => serde_json::to_string(&VerbatimRecord { event, context }),
            Self::V0 => serde_json::to_string(&RecordV0::new(event, context)),
        }
    }
}

#[derive(Serialize)]
struct VerbatimRecord<'a> {
    event: &'a Event,
    context: &'a EventContext,
}

#[derive(Serialize)]
struct RecordV0<'a> {
    version: i32,
    kind: &'static str,
    payload: PayloadV0<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PayloadV0<'a> {
    kind: &'static str,
    instant: InstantV0,
    #[serde(rename = "testID", skip_serializing_if = "Option::is_none")]
    test_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    iteration: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    issue: Option<IssueV0<'a>>,
    messages: Vec<MessageV0<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InstantV0 {
    since_1970: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IssueV0<'a> {
    kind: IssueKind,
    is_known: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_location: Option<&'a SourceLocation>,
}

#[derive(Serialize)]
struct MessageV0<'a> {
    symbol: &'static str,
    text: &'a str,
}

impl<'a> RecordV0<'a> {
    fn new(event: &'a Event, context: &'a EventContext) -> Self {
        let issue = event.issue();
        let symbol = match issue {
            Some(issue) if issue.is_known => "knownIssue",
            Some(_) => "fail",
            None => "default",
        };
        let messages = issue
            .map(|issue| {
                issue
                    .comments
                    .iter()
                    .map(|text| MessageV0 { symbol, text })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            version: 0,
            kind: "event",
            payload: PayloadV0 {
                kind: event.kind.name(),
                instant: InstantV0 {
                    since_1970: event.instant.timestamp_millis() as f64 / 1000.0,
                },
                test_id: context.test.as_ref().map(ToString::to_string),
                iteration: context.iteration,
                issue: issue.map(|issue| IssueV0 {
                    kind: issue.kind,
                    is_known: issue.is_known,
                    source_location: issue.source_location.as_ref(),
                }),
                messages,
            },
        }
    }
}

/// Streams events as newline-delimited JSON.
///
/// Each line is written and flushed synchronously on the thread that reported
/// the event. When the output is a named pipe, a reader that falls behind
/// stalls the test tasks reporting to it until the pipe drains, so consumers
/// should read continuously.
///
/// 每一行都在报告事件的线程上同步写入并刷新。当输出是命名管道时，
/// 读取方跟不上会使向其报告的测试任务停顿，直到管道被读空，因此消费者应持续读取。
pub struct EventStreamRecorder {
    encoding: StreamEncoding,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl EventStreamRecorder {
    pub fn new<W>(writer: W, encoding: StreamEncoding) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            encoding,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn encoding(&self) -> StreamEncoding {
        self.encoding
    }
}

impl EventRecorder for EventStreamRecorder {
    fn record(&self, event: &Event, context: &EventContext) {
        let line = match self.encoding.encode(event, context) {
            Ok(line) => line,
            Err(error) => {
                tracing::warn!(%error, event = event.kind.name(), "failed to encode event");
                return;
            }
        };
        // Compact JSON escapes control characters inside strings.
        debug_assert!(!line.contains(['\n', '\r']));

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let written = writeln!(writer, "{line}").and_then(|()| writer.flush());
        if let Err(error) = written {
            tracing::warn!(%error, "failed to write to the event stream");
        }
    }
}
