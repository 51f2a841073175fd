use crate::progress::ConnectionStatus;

pub const SUBMIT_LABEL: &str = "Process Addresses";
pub const SUBMITTING_LABEL: &str = "Processing...";
pub const COMPLETION_MESSAGE: &str =
    "Processing completed! You can now download the processed file.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl UploadPhase {
    pub fn is_submitting(&self) -> bool {
        matches!(self, UploadPhase::Submitting)
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            SUBMITTING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Info,
    Notice,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub text: String,
    pub kind: LogKind,
}

/// Append-only view of progress text. Only a new submission clears it.
#[derive(Debug, Default)]
pub struct ProgressLog {
    entries: Vec<LogEntry>,
}

impl ProgressLog {
    pub fn push(&mut self, kind: LogKind, text: impl Into<String>) {
        self.entries.push(LogEntry {
            text: text.into(),
            kind,
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ConnectionStatus {
    pub fn label(&self) -> String {
        match self {
            ConnectionStatus::Connecting => "⏳ Connecting to progress updates...".to_string(),
            ConnectionStatus::Connected => "🟢 Live progress connected".to_string(),
            ConnectionStatus::Disconnected(None) => "⚪ Live progress disconnected".to_string(),
            ConnectionStatus::Disconnected(Some(reason)) => {
                format!("🔴 Live progress unavailable: {}", reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_tracks_submission() {
        assert_eq!(UploadPhase::Idle.submit_label(), "Process Addresses");
        assert_eq!(UploadPhase::Submitting.submit_label(), "Processing...");
        assert_eq!(UploadPhase::Failed.submit_label(), "Process Addresses");
        assert_eq!(UploadPhase::Succeeded.submit_label(), "Process Addresses");
    }

    #[test]
    fn starts_out_connecting() {
        let status = ConnectionStatus::default();
        assert_eq!(status, ConnectionStatus::Connecting);
        assert!(status.label().contains("Connecting"));
    }

    #[test]
    fn log_keeps_arrival_order() {
        let mut log = ProgressLog::default();
        log.push(LogKind::Info, "Parsing rows...");
        log.push(LogKind::Info, "Geocoding...");
        log.push(LogKind::Error, "Error: boom");

        let texts: Vec<_> = log.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["Parsing rows...", "Geocoding...", "Error: boom"]);

        log.clear();
        assert!(log.is_empty());
    }
}
