//! # Child Process Module / 子进程模块
//!
//! Runs child processes and captures their combined output. Exit tests use it
//! to re-enter the host executable.
//!
//! 运行子进程并捕获其合并输出。退出测试使用它重新进入宿主可执行文件。

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;

/// Spawns a command, captures its stdout and stderr.
/// The output streams are read concurrently and combined into a single string.
///
/// # Arguments
/// * `cmd` - The `tokio::process::Command` to execute.
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The combined stdout and stderr as a `String`.
///
/// 派生一个命令，捕获其 stdout 和 stderr。
/// 输出流被并发读取并合并到一个字符串中。
pub async fn spawn_and_capture(
    mut cmd: tokio::process::Command,
) -> (std::io::Result<std::process::ExitStatus>, String) {
    let mut child = match cmd
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return (Err(e), String::new()),
    };

    // Arc<Mutex<String>> so the stdout and stderr readers can append concurrently.
    // 使用 Arc<Mutex<String>> 以便 stdout 和 stderr 读取任务并发追加。
    let output = Arc::new(tokio::sync::Mutex::new(String::new()));

    let readers = [
        child.stdout.take().map(|stdout| collect_lines(stdout, Arc::clone(&output))),
        child.stderr.take().map(|stderr| collect_lines(stderr, Arc::clone(&output))),
    ];

    let status = child.wait().await;

    // Wait for the readers so no output is lost.
    // 等待读取任务完成，以确保不丢失任何输出。
    for reader in readers.into_iter().flatten() {
        if let Err(e) = reader.await {
            tracing::warn!(error = %e, "failed to join an output reader task");
        }
    }

    let output = output.lock().await.clone();
    (status, output)
}

fn collect_lines<R>(stream: R, output: Arc<tokio::sync::Mutex<String>>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let mut output = output.lock().await;
            output.push_str(&line);
            output.push('\n');
        }
    })
}
