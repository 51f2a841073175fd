use crate::error::UploadError;
use derivative::Derivative;
use std::fs;
use std::path::{Path, PathBuf};

pub const XLSX_EXTENSION: &str = ".xlsx";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PROCESSED_FILE_NAME: &str = "processed_addresses.xlsx";

/// A file chosen in the picker. Only metadata is held; the contents are read
/// once, when the upload starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub content_type: &'static str,
}

impl SelectedFile {
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let metadata = fs::metadata(path).map_err(|source| UploadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        Ok(Self::new(path.to_path_buf(), name, metadata.len()))
    }

    pub fn new(path: PathBuf, name: String, size: u64) -> Self {
        let content_type = if name.ends_with(XLSX_EXTENSION) {
            XLSX_CONTENT_TYPE
        } else {
            "application/octet-stream"
        };

        Self {
            path,
            name,
            size,
            content_type,
        }
    }

    /// Size for the picker label, e.g. "812 B" or "1.5 KB".
    pub fn size_label(&self) -> String {
        const KIB: u64 = 1024;
        const MIB: u64 = KIB * 1024;

        match self.size {
            size if size < KIB => format!("{} B", size),
            size if size < MIB => format!("{:.1} KB", size as f64 / KIB as f64),
            size => format!("{:.1} MB", size as f64 / MIB as f64),
        }
    }

    pub async fn read(&self) -> Result<Vec<u8>, UploadError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|source| UploadError::Read {
                path: self.path.clone(),
                source,
            })
    }
}

/// Body of a single multipart upload.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct UploadRequest {
    pub file_name: String,
    pub content_type: &'static str,
    #[derivative(Debug = "ignore")]
    pub contents: Vec<u8>,
}

/// The server's result, held in memory until the user saves it.
#[derive(Derivative, Clone, PartialEq, Eq)]
#[derivative(Debug)]
pub struct ProcessedFile {
    pub name: &'static str,
    pub content_type: &'static str,
    #[derivative(Debug = "ignore")]
    pub bytes: Vec<u8>,
}

impl ProcessedFile {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            name: PROCESSED_FILE_NAME,
            content_type: XLSX_CONTENT_TYPE,
            bytes,
        }
    }

    pub fn save_to(&self, target: &Path) -> Result<(), UploadError> {
        fs::write(target, &self.bytes).map_err(|source| UploadError::Save {
            path: target.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processed_file_debug_omits_bytes() {
        let file = ProcessedFile::new(vec![0x50, 0x4b, 0x03, 0x04]);
        let debug = format!("{:?}", file);
        assert!(debug.contains(PROCESSED_FILE_NAME));
        assert!(!debug.contains("bytes"));
    }

    #[test]
    fn declared_content_type_follows_name() {
        let sheet = SelectedFile::new("a.xlsx".into(), "a.xlsx".into(), 1);
        let notes = SelectedFile::new("notes.txt".into(), "notes.txt".into(), 1);
        assert_eq!(sheet.content_type, XLSX_CONTENT_TYPE);
        assert_eq!(notes.content_type, "application/octet-stream");
    }

    #[test]
    fn size_label_scales_units() {
        let label = |size| SelectedFile::new("a.xlsx".into(), "a.xlsx".into(), size).size_label();
        assert_eq!(label(0), "0 B");
        assert_eq!(label(812), "812 B");
        assert_eq!(label(1536), "1.5 KB");
        assert_eq!(label(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn saves_bytes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join(PROCESSED_FILE_NAME);
        ProcessedFile::new(b"sheet".to_vec()).save_to(&target).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"sheet");
    }

    #[tokio::test]
    async fn reading_a_missing_file_reports_the_path() {
        let file = SelectedFile::new("/nonexistent/a.xlsx".into(), "a.xlsx".into(), 0);
        match file.read().await {
            Err(UploadError::Read { path, .. }) => assert_eq!(path, file.path),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
