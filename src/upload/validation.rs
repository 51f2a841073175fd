use super::types::{SelectedFile, XLSX_EXTENSION};
use crate::error::ValidationError;

/// Advisory checks run before any request is made. Only the name is inspected.
pub fn validate_selection(selection: Option<&SelectedFile>) -> Result<&SelectedFile, ValidationError> {
    let file = selection.ok_or(ValidationError::NoFileSelected)?;

    if !file.name.ends_with(XLSX_EXTENSION) {
        return Err(ValidationError::WrongExtension {
            file_name: file.name.clone(),
        });
    }

    Ok(file)
}
