use async_trait::async_trait;

use super::{DumpClient, MediaApi, UPLOAD_FILE_PATH};
use crate::error::{ApiError, Result};
use crate::models::{UploadRequest, UploadTicket, MAX_UPLOAD_BYTES};

#[async_trait]
impl MediaApi for DumpClient {
    /// Requests a signed URL, then `PUT`s the bytes to it.
    async fn upload(&self, request: &UploadRequest, bytes: Vec<u8>) -> Result<UploadTicket> {
        validate_upload(request, bytes.len())?;

        let ticket: UploadTicket = self.transport().post(UPLOAD_FILE_PATH, request).await?;
        self.transport()
            .put_bytes(&ticket.upload_url, &request.content_type, bytes)
            .await?;
        tracing::debug!("Uploaded {} to {}", request.filename, ticket.storage_path);
        Ok(ticket)
    }
}

pub(crate) fn validate_upload(request: &UploadRequest, size: usize) -> Result<()> {
    if request.filename.trim().is_empty() {
        return Err(ApiError::bad_request("Filename is required"));
    }
    if request.content_type.trim().is_empty() {
        return Err(ApiError::bad_request("Content type is required"));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(ApiError::bad_request("File exceeds 100MB limit"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_validation() {
        let request = UploadRequest::new("photo_1.jpg", "image/jpeg");
        assert!(validate_upload(&request, 10).is_ok());
        assert!(validate_upload(&request, MAX_UPLOAD_BYTES).is_ok());
        assert!(validate_upload(&request, MAX_UPLOAD_BYTES + 1).is_err());
        assert!(validate_upload(&UploadRequest::new(" ", "image/jpeg"), 1).is_err());
        assert!(validate_upload(&UploadRequest::new("a.jpg", ""), 1).is_err());
    }
}
