//! # Options Record Module / 选项记录模块
//!
//! The options record is a parsed, serializable snapshot of every recognized
//! command-line option. It can also be loaded from a JSON or TOML file, which is
//! how embedders and `--experimental-configuration-path` supply a whole record
//! at once.
//!
//! 选项记录是所有已识别命令行选项的已解析、可序列化快照。
//! 它也可以从 JSON 或 TOML 文件加载，嵌入方和 `--experimental-configuration-path`
//! 就是通过这种方式一次性提供完整记录的。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::infra::t;

/// Every option the entry point understands.
///
/// Field names are internal; the serialized form uses the stable camelCase keys
/// (`explicit_verbosity` is stored under `verbosity`). Absent optional fields are
/// left out of the serialized form.
///
/// 入口点能理解的所有选项。
/// 字段名称是内部的；序列化形式使用稳定的 camelCase 键
/// （`explicit_verbosity` 存储在 `verbosity` 下）。缺失的可选字段不会出现在序列化结果中。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// List the discovered tests instead of running them.
    /// 列出已发现的测试而不是运行它们。
    #[serde(default)]
    pub list_tests: bool,

    /// Run tests in parallel. Defaults to `true`.
    /// 并行运行测试。默认为 `true`。
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub very_verbose: bool,

    #[serde(default)]
    pub quiet: bool,

    /// An explicitly requested verbosity level. Wins over the boolean flags.
    /// 显式请求的详细级别。优先于布尔标志。
    #[serde(rename = "verbosity", default, skip_serializing_if = "Option::is_none")]
    pub explicit_verbosity: Option<i32>,

    /// Where to write an xUnit-compatible XML report.
    /// xUnit 兼容 XML 报告的写入位置。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xunit_output: Option<String>,

    /// Where to write the newline-delimited JSON event stream.
    /// 以换行分隔的 JSON 事件流的写入位置。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_stream_output_path: Option<String>,

    /// Schema version of the event stream. `None` selects the verbatim encoding.
    /// 事件流的模式版本。`None` 表示使用原样编码。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_stream_version: Option<i32>,

    /// Regular expressions selecting tests to run.
    /// 选择要运行的测试的正则表达式。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Vec<String>>,

    /// Regular expressions selecting tests to leave out.
    /// 选择要排除的测试的正则表达式。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<Vec<String>>,

    /// Maximum number of times to run the selected tests.
    /// 运行所选测试的最大次数。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetitions: Option<i64>,

    /// `pass` or `fail`: keep repeating until the run passes or fails.
    /// `pass` 或 `fail`：持续重复，直到运行通过或失败。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_until: Option<String>,

    /// The executable that hosts exit tests. Defaults to the current executable.
    /// 承载退出测试的可执行文件。默认为当前可执行文件。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_test_host: Option<String>,
}

fn default_parallel() -> bool {
    true
}

impl Default for Options {
    fn default() -> Self {
        Self {
            list_tests: false,
            parallel: default_parallel(),
            verbose: false,
            very_verbose: false,
            quiet: false,
            explicit_verbosity: None,
            xunit_output: None,
            event_stream_output_path: None,
            event_stream_version: None,
            filter: None,
            skip: None,
            repetitions: None,
            repeat_until: None,
            exit_test_host: None,
        }
    }
}

impl Options {
    /// Resolves the effective verbosity.
    ///
    /// An explicit value wins; otherwise `very_verbose` gives 2, `verbose` 1,
    /// `quiet` -1 and the default is 0.
    ///
    /// 解析有效的详细级别：显式值优先；否则 `very_verbose` 为 2，`verbose` 为 1，
    /// `quiet` 为 -1，默认为 0。
    pub fn resolved_verbosity(&self) -> i32 {
        if let Some(verbosity) = self.explicit_verbosity {
            verbosity
        } else if self.very_verbose {
            2
        } else if self.verbose {
            1
        } else if self.quiet {
            -1
        } else {
            0
        }
    }

    /// Loads a complete options record from a structured file.
    ///
    /// Files ending in `.toml` are read as TOML, everything else as JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| t!("config.read_failed", path = path.display()).to_string())?;

        let is_toml = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("toml"));
        let options = if is_toml {
            toml::from_str(&contents)
                .with_context(|| t!("config.decode_failed", path = path.display()).to_string())?
        } else {
            serde_json::from_str(&contents)
                .with_context(|| t!("config.decode_failed", path = path.display()).to_string())?
        };

        tracing::debug!(path = %path.display(), "loaded options from configuration file");
        Ok(options)
    }

    /// Serializes the record as JSON, the form `from_file` reads back.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
