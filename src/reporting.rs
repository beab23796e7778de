//! # Reporting Module / 报告模块
//!
//! This module holds the recorders that observe test events: a colorful,
//! localized console recorder, an xUnit XML report recorder and a JSON
//! event-stream recorder. Each one is installed into a configuration's
//! event pipeline.
//!
//! 此模块包含观察测试事件的记录器：彩色的本地化控制台记录器、
//! xUnit XML 报告记录器和 JSON 事件流记录器。每个记录器都会被安装到配置的事件管道中。

pub mod console;
pub mod event_stream;
pub mod xunit;

// Re-export common recorders
pub use console::{ConsoleRecorder, TerminalCapabilities};
pub use event_stream::{EventStreamRecorder, StreamEncoding};
pub use xunit::XunitRecorder;
