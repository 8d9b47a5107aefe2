//! Reads `multipart/form-data` posts from the browser so they can be forwarded
//! to the backend.

use std::collections::HashMap;

use actix_multipart::Multipart;
use futures::StreamExt;

use crate::api::FilePart;
use crate::errors::AppError;

/// Largest file accepted for forwarding.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
/// Largest single text field (news bodies are the long ones).
pub const MAX_TEXT_FIELD_BYTES: usize = 256 * 1024;
/// Most parts a form may send; the content forms have about a dozen.
pub const MAX_PARTS: usize = 32;
/// Bytes buffered across every part of one request.
pub const MAX_TOTAL_BYTES: usize = MAX_UPLOAD_BYTES + 1024 * 1024;

fn too_large(what: &str, limit: usize) -> AppError {
    if limit >= 1024 * 1024 {
        AppError::Upload(format!("{what} is larger than the {} MB limit", limit / (1024 * 1024)))
    } else {
        AppError::Upload(format!("{what} is larger than the {} KB limit", limit / 1024))
    }
}

/// Text parts plus the single file part, if one was chosen.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub file: Option<FilePart>,
}

impl UploadForm {
    pub fn csrf_token(&self) -> &str {
        self.fields.get("csrf_token").map(String::as_str).unwrap_or("")
    }
}

/// Drain the multipart stream. `file_field` names the part that carries the file;
/// an empty file input (no filename, no bytes) counts as no file.
pub async fn read_upload(mut payload: Multipart, file_field: &str) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();
    let mut parts = 0;
    let mut total = 0;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::Upload(format!("Failed to read upload: {e}")))?;
        parts += 1;
        if parts > MAX_PARTS {
            return Err(AppError::Upload(format!("Upload has more than {MAX_PARTS} parts")));
        }

        let name = field.name().unwrap_or_default().to_string();
        let is_file = name == file_field;
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let limit = if is_file { MAX_UPLOAD_BYTES } else { MAX_TEXT_FIELD_BYTES };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::Upload(format!("Failed to read upload: {e}")))?;
            if bytes.len() + chunk.len() > limit {
                let what = if is_file { "File".to_string() } else { format!("Field '{name}'") };
                return Err(too_large(&what, limit));
            }
            total += chunk.len();
            if total > MAX_TOTAL_BYTES {
                return Err(too_large("Upload", MAX_TOTAL_BYTES));
            }
            bytes.extend_from_slice(&chunk);
        }

        if is_file {
            match filename {
                Some(_) if form.file.is_some() && !bytes.is_empty() => {
                    return Err(AppError::Upload("Only one file can be uploaded".to_string()));
                }
                Some(filename) if !filename.is_empty() && !bytes.is_empty() => {
                    form.file = Some(FilePart { field: name, filename, content_type, bytes });
                }
                _ => {}
            }
        } else {
            let text = String::from_utf8(bytes)
                .map_err(|_| AppError::Upload(format!("Field '{name}' is not valid text")))?;
            form.fields.insert(name, text);
        }
    }

    Ok(form)
}
