//! # Logging Module / 日志模块
//!
//! Console output for users goes through the console recorder; this is for
//! people debugging the runner itself. The filter is read from
//! `SUITE_RUNNER_LOG` (same syntax as `RUST_LOG`) and defaults to `warn`.
//!
//! 面向用户的控制台输出由控制台记录器负责；此模块用于调试运行器本身。
//! 过滤规则读取自 `SUITE_RUNNER_LOG`（语法与 `RUST_LOG` 相同），默认为 `warn`。

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "SUITE_RUNNER_LOG";

/// Installs the global subscriber. Calling it again is a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
