//! # Exit Test Module / 退出测试模块
//!
//! An exit test is a piece of test code expected to terminate the process. The
//! parent test asks the [`ExitTestHandler`] to re-launch the host executable
//! with [`EXIT_TEST_ID_ENV_VAR`] set; the entry point of that child process
//! sees the variable, runs only the requested exit test and terminates. The
//! parent then judges how the child exited.
//!
//! 退出测试是一段预期会终止进程的测试代码。父测试请求 [`ExitTestHandler`]
//! 在设置了 [`EXIT_TEST_ID_ENV_VAR`] 的情况下重新启动宿主可执行文件；
//! 子进程的入口点看到该变量后，只运行所请求的退出测试并终止。
//! 随后父进程判断子进程的退出方式。

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crate::core::errors::EntryPointError;
use crate::core::exit_status::ExitStatus;
use crate::infra::command;

/// Names the exit test a child process should run.
pub const EXIT_TEST_ID_ENV_VAR: &str = "SUITE_RUNNER_EXIT_TEST_ID";

/// The code of an exit test. It is expected not to return.
pub type ExitTestBody = Arc<dyn Fn() + Send + Sync>;

/// How an exit test is expected to terminate.
/// 退出测试预期的终止方式。
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitCondition {
    /// Exit code zero.
    Success,
    /// Any non-zero exit code, or termination by a signal.
    Failure,
    /// Exactly this exit code.
    Code(i32),
}

impl ExitCondition {
    pub fn is_satisfied_by(&self, status: &std::process::ExitStatus) -> bool {
        match self {
            ExitCondition::Success => status.success(),
            ExitCondition::Failure => !status.success(),
            ExitCondition::Code(code) => status.code() == Some(*code),
        }
    }
}

/// The result of running an exit test in a child process.
#[derive(Debug, Clone)]
pub struct ExitTestOutcome {
    pub status: std::process::ExitStatus,
    /// Combined stdout and stderr of the child.
    pub output: String,
}

/// Launches exit tests in a child copy of the host executable.
#[derive(Debug, Clone, Default)]
pub struct ExitTestHandler {
    host: Option<PathBuf>,
}

impl ExitTestHandler {
    /// `host` overrides the executable to launch; `None` means the current one.
    pub fn new(host: Option<&str>) -> Self {
        Self {
            host: host.map(PathBuf::from),
        }
    }

    pub fn host(&self) -> Option<&PathBuf> {
        self.host.as_ref()
    }

    /// Runs the exit test named `id` in a child process and waits for it.
    pub async fn run(&self, id: &str) -> Result<ExitTestOutcome, EntryPointError> {
        let executable = match &self.host {
            Some(host) => host.clone(),
            None => env::current_exe().map_err(|error| {
                EntryPointError::feature_unavailable(
                    "exit tests",
                    format!("the host executable cannot be located: {error}"),
                )
            })?,
        };

        tracing::debug!(exit_test = id, host = %executable.display(), "launching exit test");

        let mut cmd = tokio::process::Command::new(&executable);
        cmd.env(EXIT_TEST_ID_ENV_VAR, id).kill_on_drop(true);

        let (status, output) = command::spawn_and_capture(cmd).await;
        let status = status.map_err(|error| {
            EntryPointError::feature_unavailable(
                "exit tests",
                format!("`{}` could not be launched: {error}", executable.display()),
            )
        })?;

        Ok(ExitTestOutcome { status, output })
    }
}

/// The exit test this process was launched to run, if any.
pub fn requested_exit_test() -> Option<String> {
    env::var(EXIT_TEST_ID_ENV_VAR)
        .ok()
        .filter(|id| !id.is_empty())
}

/// Runs an exit test body and terminates the process.
///
/// A body that returns instead of exiting terminates with success.
pub fn dispatch(body: ExitTestBody) -> ! {
    body();
    std::process::exit(ExitStatus::SUCCESS.code())
}
