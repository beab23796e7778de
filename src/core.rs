//! # Core Module / 核心模块
//!
//! This module contains the core functionality of Suite Runner: the options
//! record, the runtime configuration and its event pipeline, the exit status
//! tracker, the test lister and the entry point that sequences them.
//!
//! 此模块包含 Suite Runner 的核心功能：选项记录、运行时配置及其事件管道、
//! 退出状态跟踪器、测试列表器以及将它们串联起来的入口点。

pub mod configuration;
pub mod engine;
pub mod entry_point;
pub mod errors;
pub mod exit_status;
pub mod exit_test;
pub mod filter;
pub mod listing;
pub mod models;
pub mod options;
pub mod pipeline;
pub mod repetition;

// Re-exports
pub use configuration::Configuration;
pub use errors::EntryPointError;
pub use exit_status::{ExitStatus, ExitStatusTracker};
pub use listing::list_tests;
pub use pipeline::{EventPipeline, EventRecorder};
