use std::path::Path;
use std::sync::Arc;

use dump_core::models::{UploadKind, UploadStatus};
use dump_core::state::{UploadCapture, UploadSession};

use crate::cli::CaptureKind;
use crate::commands::common::{build_client, load_profile};
use crate::error::CliError;

pub async fn run_upload(
    path: &Path,
    kind: Option<CaptureKind>,
    profile: Option<&str>,
) -> Result<(), CliError> {
    let bytes = std::fs::read(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let kind = kind.map_or_else(|| kind_for_mime(mime.type_().as_str()), upload_kind);

    let mut capture = UploadCapture::new(kind, bytes)
        .content_type(mime.essence_str())
        .local_ref(path);
    if let Some(extension) = path.extension().and_then(|extension| extension.to_str()) {
        capture = capture.extension(extension);
    }

    let context = load_profile(profile)?;
    let storage_path = upload_capture(&context, capture).await?;
    println!("{storage_path}");
    Ok(())
}

/// Uploads a typed quick note.
pub async fn run_capture(content: String, profile: Option<&str>) -> Result<(), CliError> {
    let context = load_profile(profile)?;
    let storage_path = upload_capture(&context, UploadCapture::text(content)).await?;
    println!("{storage_path}");
    Ok(())
}

async fn upload_capture(
    context: &crate::commands::common::ProfileContext,
    capture: UploadCapture,
) -> Result<String, CliError> {
    let session = Arc::new(UploadSession::new(build_client(context)?));
    let (id, handle) = session.capture(capture);
    tracing::debug!("Started upload {}", id);

    let status = handle
        .await
        .map_err(|error| CliError::Upload(error.to_string()))?;
    match status {
        UploadStatus::Success { storage_path } => Ok(storage_path),
        UploadStatus::Failed { reason } => Err(CliError::Upload(reason)),
        other => Err(CliError::Upload(other.display_text())),
    }
}

pub const fn upload_kind(kind: CaptureKind) -> UploadKind {
    match kind {
        CaptureKind::Photo => UploadKind::Photo,
        CaptureKind::Audio => UploadKind::Audio,
        CaptureKind::File => UploadKind::File,
        CaptureKind::Text => UploadKind::Text,
    }
}

/// Capture kind for a top-level MIME type such as `image` or `audio`.
pub fn kind_for_mime(top_level: &str) -> UploadKind {
    match top_level {
        "image" => UploadKind::Photo,
        "audio" => UploadKind::Audio,
        _ => UploadKind::File,
    }
}
