//! Desktop toast notifications for hook events
//!
//! Best-effort: every public entry point returns `bool`, failures are logged
//! and never propagate to the calling tool.

mod native;
mod powershell;

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::config::{Config, SinkChoice};
use crate::error::NotifyError;

pub use native::NativeSink;
pub use powershell::PowerShellSink;

/// One toast: title line + body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub title: String,
    pub message: String,
}

impl NotificationRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Platform mechanism that actually shows a toast
pub trait NotificationSink {
    /// Canonical backend name (e.g. "powershell", "native")
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool;

    fn send(&self, request: &NotificationRequest) -> Result<(), NotifyError>;
}

/// Hook events that raise a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Long-running task stopped
    Stop,
    /// Tool needs attention
    Notification,
}

impl ToastKind {
    pub fn request(self, window_name: &str) -> NotificationRequest {
        match self {
            ToastKind::Stop => NotificationRequest::new(format!("[⚠️] {window_name}"), "Stop Hook"),
            ToastKind::Notification => {
                NotificationRequest::new(format!("[📢] {window_name}"), "Notification Hook")
            }
        }
    }
}

impl FromStr for ToastKind {
    type Err = NotifyError;

    /// Accepts legacy tags (`Send-StopToast`) and short names (`stop`)
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "Send-StopToast" | "stop" => Ok(ToastKind::Stop),
            "Send-NotificationToast" | "notification" => Ok(ToastKind::Notification),
            _ => Err(NotifyError::UnknownKind {
                tag: tag.to_string(),
            }),
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToastKind::Stop => f.write_str("stop"),
            ToastKind::Notification => f.write_str("notification"),
        }
    }
}

/// Pick the sink for this host
pub fn default_sink(config: &Config) -> Box<dyn NotificationSink> {
    let powershell = PowerShellSink::new(config.toast_timeout);
    let sink: Box<dyn NotificationSink> = match config.sink {
        SinkChoice::PowerShell => Box::new(powershell),
        SinkChoice::Native => Box::new(NativeSink),
        SinkChoice::Auto if powershell.is_available() => Box::new(powershell),
        SinkChoice::Auto => Box::new(NativeSink),
    };
    debug!(event = "notify.sink_selected", sink = sink.name());
    sink
}

/// Send one toast; `true` only if the sink confirmed delivery
pub fn send_toast_notification(sink: &dyn NotificationSink, title: &str, message: &str) -> bool {
    let request = NotificationRequest::new(title, message);
    match sink.send(&request) {
        Ok(()) => {
            info!(event = "notify.toast_sent", sink = sink.name(), title);
            true
        }
        Err(e) => {
            warn!(
                event = "notify.toast_failed",
                sink = sink.name(),
                kind = ?e.kind(),
                title,
                error = %e,
            );
            false
        }
    }
}

/// `project_name` is accepted for call-site compatibility only
pub fn send_stop_toast(sink: &dyn NotificationSink, window_name: &str, project_name: &str) -> bool {
    send_toast(sink, ToastKind::Stop, window_name, project_name)
}

/// `project_name` is accepted for call-site compatibility only
pub fn send_notification_toast(
    sink: &dyn NotificationSink,
    window_name: &str,
    project_name: &str,
) -> bool {
    send_toast(sink, ToastKind::Notification, window_name, project_name)
}

pub fn send_toast(
    sink: &dyn NotificationSink,
    kind: ToastKind,
    window_name: &str,
    _project_name: &str,
) -> bool {
    let request = kind.request(window_name);
    send_toast_notification(sink, &request.title, &request.message)
}

/// Dispatch by legacy tag; unknown tags return `false` without sending
pub fn invoke_toast_with_fallback(
    sink: &dyn NotificationSink,
    tag: &str,
    window_name: &str,
    project_name: &str,
) -> bool {
    match tag.parse::<ToastKind>() {
        Ok(kind) => send_toast(sink, kind, window_name, project_name),
        Err(e) => {
            warn!(event = "notify.dispatch_rejected", error = %e);
            false
        }
    }
}
