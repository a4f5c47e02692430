//! Native desktop notification via notify-rust (D-Bus, WinRT, NSUserNotification)

use notify_rust::Notification;

use super::{NotificationRequest, NotificationSink};
use crate::error::NotifyError;

const APP_NAME: &str = "Terminal Notifier";

/// notify-rust backend for hosts without PowerShell
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeSink;

impl NotificationSink for NativeSink {
    fn name(&self) -> &'static str {
        "native"
    }

    fn is_available(&self) -> bool {
        cfg!(any(windows, unix))
    }

    fn send(&self, request: &NotificationRequest) -> Result<(), NotifyError> {
        Notification::new()
            .appname(APP_NAME)
            .summary(&request.title)
            .body(&request.message)
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::SubprocessFailure {
                message: format!("notify-rust: {e}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_sink_name() {
        assert_eq!(NativeSink.name(), "native");
    }
}
