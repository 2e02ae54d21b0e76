use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;

/// Spawns an external test command and captures its combined output.
/// stdout and stderr are read concurrently and merged into one string in
/// arrival order, so the captured log reads the way it did on a terminal.
///
/// Never errors on a non-zero exit status; only the spawn or wait failing
/// surfaces as an `Err` in the first tuple slot.
///
/// 派生外部测试命令并捕获其合并输出。
/// stdout 和 stderr 被并发读取，并按到达顺序合并为一个字符串。
/// 非零退出状态不会产生错误；只有派生或等待失败才会在元组第一项中返回 `Err`。
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

    let Some(stdout) = child.stdout.take() else {
        return (
            Err(std::io::Error::other("Failed to capture stdout")),
            String::new(),
        );
    };
    let Some(stderr) = child.stderr.take() else {
        return (
            Err(std::io::Error::other("Failed to capture stderr")),
            String::new(),
        );
    };

    // Both streams append to the same buffer so interleaving is preserved.
    // 两个流写入同一缓冲区，以保留交错顺序。
    let output = Arc::new(tokio::sync::Mutex::new(String::new()));
    let stdout_handle = drain_into(stdout, Arc::clone(&output));
    let stderr_handle = drain_into(stderr, Arc::clone(&output));

    let status = child.wait().await;

    // Join the readers before taking the buffer, so no tail output is lost.
    // 在取出缓冲区之前等待读取任务结束，避免丢失尾部输出。
    for handle in [stdout_handle, stderr_handle] {
        if let Err(e) = handle.await {
            eprintln!("Failed to join output capture task: {}", e);
        }
    }

    let captured = output.lock().await.clone();
    (status, captured)
}

/// Reads a stream line by line into the shared capture buffer.
fn drain_into<R>(reader: R, sink: Arc<tokio::sync::Mutex<String>>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let mut sink = sink.lock().await;
            sink.push_str(&line);
            sink.push('\n');
        }
    })
}
