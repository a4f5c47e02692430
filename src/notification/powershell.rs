//! Windows toast via PowerShell + BurntToast
//!
//! The script prints `True` only when BurntToast was found and the toast was
//! raised, so success means exit 0 *and* `True` on stdout.

use std::io::Read;
use std::process::{Child, Command, Output, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use super::{NotificationRequest, NotificationSink};
use crate::config::DEFAULT_TOAST_TIMEOUT;
use crate::error::NotifyError;

const POWERSHELL: &str = "powershell.exe";
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// PowerShell notification backend
#[derive(Debug, Clone)]
pub struct PowerShellSink {
    program: String,
    timeout: Duration,
}

impl Default for PowerShellSink {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TIMEOUT)
    }
}

impl PowerShellSink {
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: POWERSHELL.to_string(),
            timeout,
        }
    }
}

impl NotificationSink for PowerShellSink {
    fn name(&self) -> &'static str {
        "powershell"
    }

    fn is_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    fn send(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-ExecutionPolicy", "Bypass", "-Command"])
            .arg(toast_script(request));

        let output = run_with_timeout(cmd, self.timeout)?;
        check_toast_output(&output)
    }
}

/// Quote for a single-quoted PowerShell literal (`'` → `''`)
fn escape_single_quotes(value: &str) -> String {
    value.replace('\'', "''")
}

/// BurntToast script printing `$true` on success, `$false` otherwise
fn toast_script(request: &NotificationRequest) -> String {
    format!(
        r#"
$Title = '{title}'
$Message = '{message}'

try {{
    if (Get-Module -ListAvailable -Name BurntToast) {{
        Import-Module BurntToast -ErrorAction SilentlyContinue
        New-BurntToastNotification -Text $Title, $Message
        $true
    }} else {{
        $false
    }}
}} catch {{
    $false
}}
"#,
        title = escape_single_quotes(&request.title),
        message = escape_single_quotes(&request.message),
    )
}

/// exit 0 + `True` on stdout → delivered
fn check_toast_output(output: &Output) -> Result<(), NotifyError> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    if output.status.success() && stdout.trim().contains("True") {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(NotifyError::SubprocessFailure {
        message: format!(
            "{} stdout={:?} stderr={:?}",
            output.status,
            stdout.trim(),
            stderr.trim()
        ),
    })
}

/// Spawn with captured stdout/stderr; give up once `timeout` elapses
///
/// The deadline covers both the child's exit and collecting its output, so a
/// grandchild holding the pipes open cannot stretch the call past `timeout`.
fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Result<Output, NotifyError> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let deadline = Instant::now() + timeout;
    let (tx, rx) = mpsc::channel();
    if let Some(pipe) = child.stdout.take() {
        drain(pipe, Stream::Stdout, tx.clone());
    }
    if let Some(pipe) = child.stderr.take() {
        drain(pipe, Stream::Stderr, tx.clone());
    }
    drop(tx);

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                kill(&mut child);
                tracing::debug!(event = "notify.subprocess_killed", timeout = ?timeout);
                return Err(NotifyError::Timeout { after: timeout });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                kill(&mut child);
                return Err(e.into());
            }
        }
    };

    let mut output = Output {
        status,
        stdout: Vec::new(),
        stderr: Vec::new(),
    };
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok((Stream::Stdout, buf)) => output.stdout = buf,
            Ok((Stream::Stderr, buf)) => output.stderr = buf,
            Err(RecvTimeoutError::Disconnected) => return Ok(output),
            Err(RecvTimeoutError::Timeout) => {
                // readers stay detached; a grandchild still holds the pipes
                tracing::debug!(event = "notify.output_timed_out", timeout = ?timeout);
                return Err(NotifyError::Timeout { after: timeout });
            }
        }
    }
}

enum Stream {
    Stdout,
    Stderr,
}

fn drain(mut pipe: impl Read + Send + 'static, stream: Stream, tx: Sender<(Stream, Vec<u8>)>) {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send((stream, buf));
    });
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
