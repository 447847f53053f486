//! Record image upload: client-side validation, then a multipart POST.
//!
//! Validation runs before any network call so oversized or mistyped files
//! are rejected immediately with a message the form can show inline.

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use store::TokenStore;

use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::models::RecordImage;

/// Upload ceiling, 5 MiB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// MIME types the backend accepts for record images.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] =
    ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Check a candidate file before uploading it.
pub fn validate_image(filename: &str, content_type: &str, size: usize) -> ApiResult<()> {
    if !ALLOWED_IMAGE_TYPES.contains(&content_type) {
        return Err(ApiError::InvalidUpload(format!(
            "{filename}: only JPEG, PNG and WebP images are accepted"
        )));
    }
    if size > MAX_IMAGE_BYTES {
        return Err(ApiError::InvalidUpload(format!(
            "{filename}: image exceeds the 5 MB limit"
        )));
    }
    Ok(())
}

impl<S: TokenStore> ApiClient<S> {
    /// Attach an image to a record. The file is validated locally first.
    pub async fn upload_record_image(
        &self,
        record_id: i64,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<RecordImage> {
        validate_image(filename, content_type, bytes.len())?;

        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| ApiError::InvalidUpload(e.to_string()))?;
        let form = Form::new().part("file", part);

        let builder = self
            .build_request(Method::POST, &format!("/records/{record_id}/images"))
            .multipart(form);
        let response = self.send_request(builder).await?;
        self.decode_response(response).await
    }

    pub async fn delete_record_image(&self, record_id: i64, image_id: i64) -> ApiResult<()> {
        let builder =
            self.build_request(Method::DELETE, &format!("/records/{record_id}/images/{image_id}"));
        self.send_request(builder).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_allowed_type_under_the_limit() {
        for content_type in ALLOWED_IMAGE_TYPES {
            assert!(validate_image("photo.img", content_type, 1024).is_ok());
        }
    }

    #[test]
    fn rejects_unsupported_types_before_any_network_call() {
        let err = validate_image("diagram.gif", "image/gif", 1024).unwrap_err();
        match err {
            ApiError::InvalidUpload(msg) => {
                assert!(msg.contains("diagram.gif"));
                assert!(msg.contains("JPEG"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_files_over_five_mebibytes() {
        assert!(validate_image("big.png", "image/png", MAX_IMAGE_BYTES).is_ok());
        let err = validate_image("big.png", "image/png", MAX_IMAGE_BYTES + 1).unwrap_err();
        match err {
            ApiError::InvalidUpload(msg) => assert!(msg.contains("5 MB")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
