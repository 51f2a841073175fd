mod controller;
mod state;
mod ui;

use crate::config::ClientConfig;
use crate::error::UploadError;
use crate::progress::{ChannelEvent, ConnectionStatus, ProgressChannel};
use crate::upload::{HttpUploadClient, SelectedFile};
use eframe::App;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::info;

pub use controller::UploadController;
pub use state::{
    LogEntry, LogKind, ProgressLog, UploadPhase, COMPLETION_MESSAGE, SUBMITTING_LABEL,
    SUBMIT_LABEL,
};

const REPAINT_INTERVAL: Duration = Duration::from_millis(100);

pub struct AddressUploader {
    config: ClientConfig,
    selected: Option<SelectedFile>,
    controller: UploadController,
    progress: ProgressChannel,
    connection: ConnectionStatus,
    saved_to: Option<PathBuf>,
    // Dropped last so the listener's shutdown signal is sent while the runtime is alive.
    _runtime: Runtime,
}

impl AddressUploader {
    pub fn new(config: ClientConfig, runtime: Runtime) -> Result<Self, UploadError> {
        info!(server = %config.server_url, "initializing address uploader");

        let transport = Arc::new(HttpUploadClient::new(&config)?);
        let controller = UploadController::new(runtime.handle().clone(), transport);
        let progress = ProgressChannel::subscribe(runtime.handle(), &config);

        Ok(Self {
            config,
            selected: None,
            controller,
            progress,
            connection: ConnectionStatus::default(),
            saved_to: None,
            _runtime: runtime,
        })
    }

    pub fn select_file(&mut self, path: PathBuf) {
        match SelectedFile::from_path(&path) {
            Ok(file) => {
                info!(file = %file.name, size = file.size, "file selected");
                self.selected = Some(file);
            }
            Err(e) => {
                self.selected = None;
                ui::show_alert(&e.to_string());
            }
        }
    }

    pub fn submit(&mut self) {
        match self.controller.submit(self.selected.as_ref()) {
            Ok(()) => self.saved_to = None,
            Err(e) => ui::show_alert(&e.to_string()),
        }
    }

    pub fn download(&mut self, target: PathBuf) {
        match self.controller.save_processed(&target) {
            Ok(saved) => {
                if saved.is_some() {
                    self.saved_to = saved;
                }
            }
            Err(e) => ui::show_alert(&e.to_string()),
        }
    }

    pub fn update_state(&mut self) {
        for event in self.progress.drain() {
            match event {
                ChannelEvent::Connecting => self.connection = ConnectionStatus::Connecting,
                ChannelEvent::Connected => self.connection = ConnectionStatus::Connected,
                ChannelEvent::Progress(message) => self.controller.record_progress(message),
                ChannelEvent::Disconnected(reason) => {
                    self.connection = ConnectionStatus::Disconnected(reason)
                }
            }
        }

        self.controller.poll();
    }
}

impl App for AddressUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state();
        self.render(ctx);
        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}
