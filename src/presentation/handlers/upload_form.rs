use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;

pub const FILE_FIELD: &str = "file";
const UNKNOWN_MIME: &str = "application/octet-stream";

pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// A drained multipart form: text fields by name plus at most one file.
#[derive(Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            let filename = field.file_name().map(str::to_string);

            if name == FILE_FIELD || filename.is_some() {
                let content_type = field.content_type().unwrap_or(UNKNOWN_MIME).to_string();
                let data = field.bytes().await?;
                tracing::debug!(
                    filename = ?filename,
                    content_type = %content_type,
                    bytes = data.len(),
                    "File field received"
                );
                form.file = Some(UploadedFile {
                    filename: filename.unwrap_or_else(|| "upload".to_string()),
                    content_type,
                    data,
                });
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}
