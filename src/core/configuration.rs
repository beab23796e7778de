//! # Configuration Module / 配置模块
//!
//! Maps an [`Options`] record to the runtime [`Configuration`] handed to the
//! engine. The configuration is built once; afterwards only its event pipeline
//! grows as recorders are installed.
//!
//! 将 [`Options`] 记录映射为交给引擎的运行时 [`Configuration`]。
//! 配置只构建一次；之后只有其事件管道会随着记录器的安装而增长。

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use crate::core::errors::EntryPointError;
use crate::core::exit_test::ExitTestHandler;
use crate::core::filter::{Membership, TestFilter};
use crate::core::options::Options;
use crate::core::pipeline::{EventPipeline, EventRecorder};
use crate::core::repetition::RepetitionPolicy;
use crate::infra::fs;
use crate::reporting::event_stream::{EventStreamRecorder, StreamEncoding};
use crate::reporting::xunit::XunitRecorder;

/// Fully resolved parameters of one run.
/// 一次运行的完全解析参数。
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    /// Whether tests may run concurrently. / 测试是否可以并发运行。
    pub is_parallelization_enabled: bool,
    /// Which tests run. / 运行哪些测试。
    pub test_filter: TestFilter,
    /// How often the selected tests run. / 所选测试运行的频率。
    pub repetition_policy: RepetitionPolicy,
    /// Every recorder observing the run. / 观察运行的所有记录器。
    pub event_handler: EventPipeline,
    /// Launches exit tests in child processes. / 在子进程中启动退出测试。
    pub exit_test_handler: ExitTestHandler,
}

impl Configuration {
    /// Builds a configuration from `options`, installing the output sinks it names.
    ///
    /// Everything that can be rejected is validated before any output file is
    /// opened, so a failed build leaves no sink behind.
    pub fn from_options(options: &Options) -> Result<Self, EntryPointError> {
        Self::from_options_with(options, |path| {
            fs::open_output_file(path).map(|file| Box::new(file) as Box<dyn Write + Send>)
        })
    }

    /// Like [`Configuration::from_options`], but output sinks are opened by
    /// `open` instead of on the file system. `open` receives the path with `~`
    /// already expanded.
    ///
    /// 与 [`Configuration::from_options`] 相同，但输出接收器由 `open` 打开，
    /// 而不是在文件系统上打开。传给 `open` 的路径中的 `~` 已被展开。
    pub fn from_options_with<F>(options: &Options, mut open: F) -> Result<Self, EntryPointError>
    where
        F: FnMut(&Path) -> io::Result<Box<dyn Write + Send>>,
    {
        let test_filter = build_test_filter(options)?;
        let repetition_policy = RepetitionPolicy::from_options(options)?;
        let stream_encoding = options
            .event_stream_output_path
            .as_ref()
            .map(|_| StreamEncoding::from_version(options.event_stream_version))
            .transpose()?;

        // Every sink is opened before any recorder is installed, the report first.
        let xunit = options
            .xunit_output
            .as_deref()
            .map(|path| open_sink("--xunit-output", path, &mut open))
            .transpose()?;
        let stream = match (&options.event_stream_output_path, stream_encoding) {
            (Some(path), Some(encoding)) => Some((
                open_sink("--experimental-event-stream-output", path, &mut open)?,
                encoding,
            )),
            _ => None,
        };

        let mut configuration = Configuration {
            is_parallelization_enabled: options.parallel,
            test_filter,
            repetition_policy,
            event_handler: EventPipeline::new(),
            exit_test_handler: ExitTestHandler::new(options.exit_test_host.as_deref()),
        };

        // The JSON stream goes in first so the XML report observes each event before it.
        if let Some((writer, encoding)) = stream {
            tracing::debug!(?encoding, "installing event stream recorder");
            configuration.install(EventStreamRecorder::new(writer, encoding));
        }
        if let Some(writer) = xunit {
            tracing::debug!("installing xUnit recorder");
            configuration.install(XunitRecorder::new(writer));
        }

        Ok(configuration)
    }

    /// Wraps the current event handler so `recorder` observes every event first.
    pub fn install<R>(&mut self, recorder: R)
    where
        R: EventRecorder + 'static,
    {
        self.event_handler.install(Arc::new(recorder));
    }

    /// Like [`Configuration::install`], for a recorder that is already shared.
    pub fn install_shared(&mut self, recorder: Arc<dyn EventRecorder>) {
        self.event_handler.install(recorder);
    }
}

/// `--filter` patterns include, `--skip` patterns exclude, and a test must pass both.
fn build_test_filter(options: &Options) -> Result<TestFilter, EntryPointError> {
    let include = TestFilter::compile(
        options.filter.as_deref().unwrap_or_default(),
        Membership::Including,
        "--filter",
    )?;
    let exclude = TestFilter::compile(
        options.skip.as_deref().unwrap_or_default(),
        Membership::Excluding,
        "--skip",
    )?;
    Ok(include.combining(exclude))
}

fn open_sink<F>(
    flag: &str,
    path: &str,
    open: &mut F,
) -> Result<Box<dyn Write + Send>, EntryPointError>
where
    F: FnMut(&Path) -> io::Result<Box<dyn Write + Send>>,
{
    let path = fs::expand_path(path);
    tracing::debug!(flag, path = %path.display(), "opening output sink");
    open(&path).map_err(|source| EntryPointError::OutputSink {
        flag: flag.to_string(),
        path,
        source,
    })
}
