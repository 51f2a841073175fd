use super::state::{LogKind, ProgressLog, UploadPhase, COMPLETION_MESSAGE};
use crate::error::{UploadError, ValidationError};
use crate::progress::ProgressMessage;
use crate::upload::{validate_selection, ProcessedFile, SelectedFile, UploadRequest, UploadTransport};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self as std_mpsc, Receiver, TryRecvError};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{info, warn};

type UploadOutcome = Result<ProcessedFile, UploadError>;

/// Drives one upload at a time and owns everything the view shows about it.
///
/// The network work runs on the tokio runtime; its outcome comes back over a
/// std channel and is applied by [`UploadController::poll`] on the UI thread.
pub struct UploadController {
    runtime: Handle,
    transport: Arc<dyn UploadTransport>,
    phase: UploadPhase,
    log: ProgressLog,
    processed: Option<ProcessedFile>,
    outcome_receiver: Option<Receiver<UploadOutcome>>,
}

impl UploadController {
    pub fn new(runtime: Handle, transport: Arc<dyn UploadTransport>) -> Self {
        Self {
            runtime,
            transport,
            phase: UploadPhase::Idle,
            log: ProgressLog::default(),
            processed: None,
            outcome_receiver: None,
        }
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    pub fn log(&self) -> &ProgressLog {
        &self.log
    }

    pub fn processed_file(&self) -> Option<&ProcessedFile> {
        self.processed.as_ref()
    }

    pub fn is_submit_enabled(&self) -> bool {
        !self.phase.is_submitting()
    }

    pub fn is_download_visible(&self) -> bool {
        self.phase == UploadPhase::Succeeded && self.processed.is_some()
    }

    pub fn submit_label(&self) -> &'static str {
        self.phase.submit_label()
    }

    pub fn submit(&mut self, selection: Option<&SelectedFile>) -> Result<(), ValidationError> {
        if self.phase.is_submitting() {
            return Err(ValidationError::Busy);
        }
        let file = validate_selection(selection)?.clone();

        info!(file = %file.name, size = file.size, "starting upload");
        self.log.clear();
        self.processed = None;
        self.phase = UploadPhase::Submitting;

        let (sender, receiver) = std_mpsc::channel();
        self.outcome_receiver = Some(receiver);

        let transport = Arc::clone(&self.transport);
        self.runtime.spawn(async move {
            let outcome = process_file(transport.as_ref(), &file).await;
            let _ = sender.send(outcome);
        });

        Ok(())
    }

    /// Appends a pushed progress message. Runs regardless of the upload phase,
    /// so messages that arrive after settling are still shown.
    pub fn record_progress(&mut self, message: ProgressMessage) {
        self.log.push(LogKind::Info, message.message);
    }

    /// Applies the upload outcome if it has arrived. Returns true when the
    /// upload settled during this call.
    pub fn poll(&mut self) -> bool {
        let outcome = match &self.outcome_receiver {
            Some(receiver) => match receiver.try_recv() {
                Ok(outcome) => outcome,
                Err(TryRecvError::Empty) => return false,
                Err(TryRecvError::Disconnected) => Err(UploadError::Interrupted),
            },
            None => return false,
        };

        self.settle(outcome);
        true
    }

    fn settle(&mut self, outcome: UploadOutcome) {
        self.outcome_receiver = None;

        match outcome {
            Ok(file) => {
                info!(size = file.bytes.len(), "processed file ready");
                self.processed = Some(file);
                self.phase = UploadPhase::Succeeded;
                self.log.push(LogKind::Notice, COMPLETION_MESSAGE);
            }
            Err(e) => {
                warn!("upload failed: {}", e);
                self.phase = UploadPhase::Failed;
                self.log.push(LogKind::Error, format!("Error: {}", e));
            }
        }
    }

    /// Writes the held processed file to `target`. Returns `Ok(None)` when
    /// there is nothing to save.
    pub fn save_processed(&self, target: &Path) -> Result<Option<PathBuf>, UploadError> {
        let Some(file) = &self.processed else {
            return Ok(None);
        };

        file.save_to(target)?;
        info!(path = %target.display(), "processed file saved");
        Ok(Some(target.to_path_buf()))
    }
}

async fn process_file(
    transport: &dyn UploadTransport,
    file: &SelectedFile,
) -> Result<ProcessedFile, UploadError> {
    let contents = file.read().await?;
    let request = UploadRequest {
        file_name: file.name.clone(),
        content_type: file.content_type,
        contents,
    };
    let body = transport.upload(request).await?;
    Ok(ProcessedFile::new(body))
}
