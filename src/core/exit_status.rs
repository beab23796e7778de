//! # Exit Status Module / 退出状态模块
//!
//! Deriving the process exit status from observed issues.
//!
//! 根据观察到的问题推导进程退出状态。

use std::process::ExitCode;
use std::sync::{Arc, Mutex, PoisonError};

use crate::core::models::{Event, EventContext, EventKind};
use crate::core::pipeline::EventRecorder;

/// Exit status code produced by the entry point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct ExitStatus(i32);

impl ExitStatus {
    pub const SUCCESS: Self = Self(0);
    pub const FAILURE: Self = Self(1);

    /// Return the raw exit code.
    #[inline]
    pub fn code(self) -> i32 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match u8::try_from(status.code()) {
            Ok(code) => ExitCode::from(code),
            Err(_) => ExitCode::FAILURE,
        }
    }
}

/// A shared success/failure flag flipped by unknown issues.
///
/// Clones share the same flag. It starts at [`ExitStatus::SUCCESS`] and, once
/// set to [`ExitStatus::FAILURE`], is never reset.
///
/// 由未知问题翻转的共享成功/失败标志。克隆共享同一个标志。
/// 它从 [`ExitStatus::SUCCESS`] 开始，一旦被设置为 [`ExitStatus::FAILURE`]，就不会再被重置。
#[derive(Clone, Debug, Default)]
pub struct ExitStatusTracker {
    status: Arc<Mutex<ExitStatus>>,
}

impl ExitStatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> ExitStatus {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks the run as failed regardless of recorded issues.
    pub fn force_failure(&self) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = ExitStatus::FAILURE;
    }

    /// Consumes the tracker and returns the final status.
    pub fn into_status(self) -> ExitStatus {
        self.current()
    }
}

impl EventRecorder for ExitStatusTracker {
    fn record(&self, event: &Event, _context: &EventContext) {
        if let EventKind::IssueRecorded { issue } = &event.kind {
            if !issue.is_known {
                self.force_failure();
            }
        }
    }
}
