use std::io::{Cursor, Read};

use tiny_http::{Request, Response};

use leafscan::ClassifyError;

use crate::state::{DisplayedImage, FlashMessage, ImageSource, SharedState};
use crate::util::multipart::{extract_boundary, file_part, parse_parts};

// ---------------------------------------------------------------------------
// Upload outcome
// ---------------------------------------------------------------------------

/// What came back from the camera or gallery.
#[derive(Debug, PartialEq)]
pub enum UploadOutcome {
    /// No file chosen; the screen stays as it was.
    Cancelled,
    /// Body is larger than the configured limit.
    TooLarge { limit: usize },
    /// Not a multipart request at all.
    Malformed(String),
    /// Encoded image bytes.
    Image(Vec<u8>),
}

/// Extracts the uploaded file for `source` from a raw request body.
pub fn read_upload(content_type: &str, body: &[u8], source: ImageSource) -> UploadOutcome {
    if !content_type.starts_with("multipart/form-data") {
        return UploadOutcome::Malformed(format!("expected multipart/form-data, got '{}'", content_type));
    }
    let boundary = match extract_boundary(content_type) {
        Some(b) => b,
        None => return UploadOutcome::Malformed("multipart request without a boundary".into()),
    };

    let parts = parse_parts(body, &boundary);
    match file_part(&parts, source.field_name()) {
        Some(part) if !part.data.is_empty() => UploadOutcome::Image(part.data.to_vec()),
        _ => UploadOutcome::Cancelled,
    }
}

/// Maps the decoded format to the MIME type used when serving it back.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        image::ImageFormat::Png  => Some("image/png"),
        image::ImageFormat::Jpeg => Some("image/jpeg"),
        image::ImageFormat::Gif  => Some("image/gif"),
        image::ImageFormat::Bmp  => Some("image/bmp"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// POST /capture  and  POST /pick
// ---------------------------------------------------------------------------

pub fn handle(request: &mut Request, state: SharedState, source: ImageSource) -> Response<Cursor<Vec<u8>>> {
    let content_type = request.headers().iter()
        .find(|h| h.field.equiv("Content-Type"))
        .map(|h| h.value.as_str().to_owned())
        .unwrap_or_default();

    let limit = state.max_upload_bytes;
    let mut body: Vec<u8> = Vec::new();
    let outcome = match request.as_reader().take(limit as u64 + 1).read_to_end(&mut body) {
        Err(e) => UploadOutcome::Malformed(format!("could not read request body: {}", e)),
        Ok(n) if n > limit => UploadOutcome::TooLarge { limit },
        Ok(_) => read_upload(&content_type, &body, source),
    };

    apply_outcome(&state, source, outcome);
    crate::routes::redirect("/")
}

/// Updates the screen for one activity result.
pub fn apply_outcome(state: &SharedState, source: ImageSource, outcome: UploadOutcome) {
    match outcome {
        UploadOutcome::Cancelled => {
            log::warn!("{} request returned no image; screen unchanged", source.describe());
        }
        UploadOutcome::TooLarge { limit } => {
            log::warn!("rejected {} upload over {} bytes", source.describe(), limit);
            state.screen().flash = Some(FlashMessage::error(format!(
                "Image is too large (limit {}).", format_size(limit)
            )));
        }
        UploadOutcome::Malformed(reason) => {
            log::warn!("bad {} upload: {}", source.describe(), reason);
            state.screen().flash = Some(FlashMessage::error("The upload could not be read."));
        }
        UploadOutcome::Image(bytes) => classify_and_show(state, source, bytes),
    }
}

/// Exact human-readable size: whole MiB or KiB when it divides evenly,
/// bytes otherwise.
fn format_size(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * KIB;
    match bytes {
        b if b >= MIB && b % MIB == 0 => format!("{} MiB", b / MIB),
        b if b >= KIB && b % KIB == 0 => format!("{} KiB", b / KIB),
        b => format!("{} bytes", b),
    }
}

fn classify_and_show(state: &SharedState, source: ImageSource, bytes: Vec<u8>) {
    let result = match sniff_mime(&bytes) {
        Some(mime) => state.classifier.classify_bytes(&bytes).map(|p| (mime, p)),
        None => Err(ClassifyError::Decode("unrecognised image format".into())),
    };

    match result {
        Ok((mime, prediction)) => {
            log::info!(
                "{} image ({} bytes) classified as {}",
                source.describe(), bytes.len(), prediction.label
            );
            state.screen().show(DisplayedImage { bytes, mime, source }, prediction);
        }
        Err(e) => {
            log::warn!("{} image could not be classified: {}", source.describe(), e);
            state.screen().flash = Some(FlashMessage::error(format!(
                "Could not classify that image: {}", e
            )));
        }
    }
}
