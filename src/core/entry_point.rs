//! # Entry Point Module / 入口点模块
//!
//! Sequences a whole invocation: resolve the options, then either list the
//! discovered tests or build the configuration, wire the recorders, run the
//! engine and return the exit status observed along the way.
//!
//! 串联整个调用过程：解析选项，然后列出已发现的测试，或者构建配置、
//! 连接记录器、运行引擎并返回过程中观察到的退出状态。

use anyhow::Result;
use colored::*;
use std::env;
use std::sync::Arc;

use crate::cli;
use crate::core::configuration::Configuration;
use crate::core::engine::Engine;
use crate::core::errors::EntryPointError;
use crate::core::exit_status::{ExitStatus, ExitStatusTracker};
use crate::core::exit_test;
use crate::core::listing::list_tests;
use crate::core::options::Options;
use crate::core::pipeline::EventRecorder;
use crate::infra::t;
use crate::reporting::console::ConsoleRecorder;

/// What the entry point was invoked with.
#[derive(Debug, Clone)]
pub enum Arguments {
    /// Raw arguments, without the program path.
    CommandLine(Vec<String>),
    /// An options record supplied by an embedder, used as is.
    Options(Options),
}

impl Arguments {
    /// The arguments of the current process.
    pub fn from_env() -> Self {
        Self::CommandLine(env::args().skip(1).collect())
    }
}

/// Runs the harness and returns the status the process should exit with.
///
/// `external_handler`, when given, observes every event before the built-in
/// recorders do. Errors are reported on stderr and turn into
/// [`ExitStatus::FAILURE`]; a help or version request prints and succeeds.
///
/// 运行测试框架并返回进程应使用的退出状态。
/// 如果提供了 `external_handler`，它会在内置记录器之前观察每个事件。
/// 错误会输出到 stderr 并转换为 [`ExitStatus::FAILURE`]；帮助或版本请求会打印并成功返回。
pub async fn entry_point<E: Engine>(
    engine: &E,
    arguments: Arguments,
    external_handler: Option<Arc<dyn EventRecorder>>,
) -> ExitStatus {
    let tracker = ExitStatusTracker::new();

    if let Err(error) = run(engine, arguments, external_handler, &tracker).await {
        if let Some(clap_error) = error.downcast_ref::<clap::Error>() {
            if let Err(print_error) = clap_error.print() {
                tracing::warn!(error = %print_error, "failed to print the command-line error");
            }
            if !clap_error.use_stderr() {
                return ExitStatus::SUCCESS;
            }
        } else {
            eprintln!("{} {:#}", t!("error.prefix").red().bold(), error);
        }
        tracker.force_failure();
    }

    tracker.into_status()
}

async fn run<E: Engine>(
    engine: &E,
    arguments: Arguments,
    external_handler: Option<Arc<dyn EventRecorder>>,
    tracker: &ExitStatusTracker,
) -> Result<()> {
    let options = match arguments {
        Arguments::CommandLine(args) => cli::parse_options(&args)?,
        Arguments::Options(options) => options,
    };

    if options.list_tests {
        for line in list_tests(&engine.tests()) {
            println!("{line}");
        }
        return Ok(());
    }

    if let Some(id) = exit_test::requested_exit_test() {
        let body = engine
            .exit_test(&id)
            .ok_or_else(|| EntryPointError::UnknownExitTest(id.clone()))?;
        tracing::debug!(exit_test = %id, "running exit test");
        exit_test::dispatch(body);
    }

    let mut configuration = Configuration::from_options(&options)?;
    configuration.install(tracker.clone());
    configuration.install(ConsoleRecorder::stderr(options.resolved_verbosity()));
    if let Some(handler) = external_handler {
        configuration.install_shared(handler);
    }

    engine.run(configuration).await;
    Ok(())
}
