mod client;
mod types;
mod validation;

pub use client::{HttpUploadClient, UploadTransport, FALLBACK_ERROR};
pub use types::{
    ProcessedFile, SelectedFile, UploadRequest, PROCESSED_FILE_NAME, XLSX_CONTENT_TYPE,
    XLSX_EXTENSION,
};
pub use validation::validate_selection;
