//! # Suite Runner Library / Suite Runner 库
//!
//! This library provides the entry point of a test harness: it turns command-line
//! arguments into a runtime configuration, composes the recorders that observe
//! test events, lists discovered tests and derives the process exit status.
//!
//! 此库提供测试框架的入口点：它将命令行参数转换为运行时配置，
//! 组合观察测试事件的记录器，列出已发现的测试并推导进程退出状态。
//!
//! ## Modules / 模块
//!
//! - `core` - Options, configuration, event pipeline, exit status, listing and the entry point
//! - `infra` - Infrastructure services like child processes, output files and logging
//! - `reporting` - Console, xUnit XML and JSON event-stream recorders
//! - `cli` - Command-line parsing
//!
//! - `core` - 选项、配置、事件管道、退出状态、列表和入口点
//! - `infra` - 基础设施服务，如子进程、输出文件和日志
//! - `reporting` - 控制台、xUnit XML 和 JSON 事件流记录器
//! - `cli` - 命令行解析

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use crate::core::engine::{Engine, LocalEngine, TestScope};
pub use crate::core::entry_point::{Arguments, entry_point};
pub use crate::core::exit_status::ExitStatus;
pub use crate::core::models::{
    Event, EventContext, EventKind, Issue, IssueKind, SourceLocation, Test, TestId,
};
pub use crate::core::options::Options;
pub use crate::core::pipeline::EventRecorder;

/// Captures the source location of the macro invocation as a [`SourceLocation`].
///
/// 将宏调用处的源代码位置捕获为 [`SourceLocation`]。
#[macro_export]
macro_rules! source_location {
    () => {
        $crate::SourceLocation::new(file!(), line!(), column!())
    };
}

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// This function detects the user's system locale and sets the appropriate
/// language for the runner's console output. It attempts to match the full
/// locale (e.g., "zh-CN"), then just the language code (e.g., "en"), and
/// finally falls back to the default language ("en").
pub fn init() {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    // Full locale first ("zh-CN"), then the language part ("en" from "en-US"), then "en".
    let lang = if available_locales.contains(&locale.as_str()) {
        &locale
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
