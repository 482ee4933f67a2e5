//! Uploaded study files.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use edtecg_core::{ApiRequest, FormPart, Result};

use crate::client::ApiClient;

/// Metadata of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: u64,
    pub file_name: String,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub uploaded_by: Option<String>,
    /// Server timestamp; see [`crate::api::parse_timestamp`].
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub upload_status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A file held in memory, ready for a multipart upload.
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    fn into_part(self, field: &str) -> FormPart {
        FormPart::file(field, self.file_name, self.content_type, self.bytes)
    }
}

impl std::fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// File endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Files<'a> {
    api: &'a ApiClient,
}

impl<'a> Files<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// List files, optionally for one language. No files is an empty list,
    /// even when the server answers 404.
    #[instrument(skip(self))]
    pub async fn list(&self, language: Option<&str>) -> Result<Vec<FileRecord>> {
        let mut request = ApiRequest::get("files/all");
        if let Some(language) = language {
            request = request.query("language", language);
        }

        match self.api.json(request).await {
            Err(e) if e.status() == Some(404) => {
                debug!("No files found");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Upload one or more files in a single request.
    #[instrument(skip(self, files), fields(count = files.len()))]
    pub async fn upload(
        &self,
        files: Vec<FileUpload>,
        uploaded_by: &str,
        language: &str,
    ) -> Result<Vec<FileRecord>> {
        let mut parts: Vec<FormPart> = files.into_iter().map(|f| f.into_part("files")).collect();
        parts.push(FormPart::text("uploadedBy", uploaded_by));
        parts.push(FormPart::text("language", language));

        self.api
            .json(ApiRequest::post("files/upload").multipart(parts))
            .await
    }

    #[instrument(skip(self))]
    pub async fn info(&self, id: u64) -> Result<FileRecord> {
        self.api.get(&format!("files/{}/info", id)).await
    }

    /// Download the raw file content.
    #[instrument(skip(self))]
    pub async fn content(&self, id: u64) -> Result<Vec<u8>> {
        let response = self
            .api
            .execute(ApiRequest::get(format!("files/{}/content", id)))
            .await?;
        Ok(response.into_bytes())
    }

    /// Replace the content of an uploaded file.
    #[instrument(skip(self, file))]
    pub async fn update(
        &self,
        id: u64,
        file: FileUpload,
        uploaded_by: &str,
        language: &str,
    ) -> Result<FileRecord> {
        let parts = vec![
            file.into_part("file"),
            FormPart::text("uploadedBy", uploaded_by),
            FormPart::text("language", language),
        ];
        self.api
            .json(ApiRequest::put(format!("files/{}", id)).multipart(parts))
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.api.delete(&format!("files/{}", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_parses_server_shape() {
        let record: FileRecord = serde_json::from_value(serde_json::json!({
            "id": 9,
            "fileName": "deck.csv",
            "fileType": "text/csv",
            "size": 120,
            "language": "en",
            "uploadedBy": "alice",
            "uploadDate": "2024-03-01T10:15:00",
            "uploadStatus": "SUCCESS",
            "message": "ok"
        }))
        .unwrap();
        assert_eq!(record.file_name, "deck.csv");
        assert!(record.upload_date.as_deref().and_then(crate::api::parse_timestamp).is_some());
    }

    #[test]
    fn upload_debug_hides_bytes() {
        let upload = FileUpload::new("deck.csv", vec![1, 2, 3]).with_content_type("text/csv");
        let debug = format!("{:?}", upload);
        assert!(debug.contains("len: 3"));
        assert!(!debug.contains("[1, 2, 3]"));
    }
}
