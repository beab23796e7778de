//! # Errors Module / 错误模块
//!
//! Errors raised while turning options into a runnable configuration.
//!
//! 将选项转换为可运行配置时产生的错误。

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// An error that aborts the entry point before any test runs.
///
/// 在任何测试运行之前中止入口点的错误。
#[derive(Debug, Error)]
pub enum EntryPointError {
    /// A flag's value failed validation.
    #[error("invalid value for `{flag}`: {reason}")]
    InvalidArgument { flag: String, reason: String },

    /// A requested capability cannot be provided on this platform.
    #[error("{feature} is unavailable: {reason}")]
    FeatureUnavailable { feature: String, reason: String },

    /// An output sink could not be opened.
    #[error("failed to open the `{flag}` output at {}", path.display())]
    OutputSink {
        flag: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The environment requested an exit test the engine does not know.
    #[error("no exit test named `{0}` is registered")]
    UnknownExitTest(String),
}

impl EntryPointError {
    pub fn invalid_argument(flag: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            flag: flag.into(),
            reason: reason.into(),
        }
    }

    pub fn feature_unavailable(feature: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FeatureUnavailable {
            feature: feature.into(),
            reason: reason.into(),
        }
    }
}
