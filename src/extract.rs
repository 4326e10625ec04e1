//! Result-shape normalization for generation responses.
//!
//! An upstream response can carry inline data, a text fallback or a remote
//! reference. These functions pick exactly one, deterministically, without I/O.

use crate::gemini::Part;
use serde_json::Value;

/// The authoritative result of a generation call.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPayload {
    /// Base64-encoded bytes returned in the response body.
    InlineBinary { data: String, mime_type: String },
    /// Text the model returned instead of media (often a refusal).
    Text { content: String },
    /// A URI the artifact must be downloaded from.
    RemoteReference { uri: String, mime_type: Option<String> },
}

/// Fields that may hold generated video samples, in lookup order.
///
/// The first one resolving to a non-empty array wins.
pub const VIDEO_SAMPLE_FIELDS: &[&str] = &[
    "/generatedVideos",
    "/generatedSamples",
    "/generateVideoResponse/generatedSamples",
    "/generateVideoResponse/generatedVideos",
];

/// Fields inside a sample that may carry the video bytes inline.
const INLINE_VIDEO_FIELDS: &[&str] = &["/video/videoBytes", "/video/bytesBase64Encoded"];

/// Select the result among response parts.
///
/// Inline data beats text, text beats a file reference. Within each kind the
/// last part seen wins.
pub fn select_result(parts: &[Part]) -> Option<ResultPayload> {
    let mut inline = None;
    let mut text = None;
    let mut reference = None;

    for part in parts {
        if let Some(data) = &part.inline_data {
            inline = Some(ResultPayload::InlineBinary {
                data: data.data.clone(),
                mime_type: data.mime_type.clone(),
            });
        } else if let Some(content) = &part.text {
            text = Some(ResultPayload::Text {
                content: content.clone(),
            });
        } else if let Some(file) = &part.file_data {
            reference = Some(ResultPayload::RemoteReference {
                uri: file.file_uri.clone(),
                mime_type: file.mime_type.clone(),
            });
        }
    }

    inline.or(text).or(reference)
}

/// The generated samples of a finished video operation, if any.
pub fn video_samples(response: &Value) -> Option<&Vec<Value>> {
    VIDEO_SAMPLE_FIELDS
        .iter()
        .filter_map(|field| response.pointer(field))
        .filter_map(Value::as_array)
        .find(|samples| !samples.is_empty())
}

/// Locate the video of the first generated sample.
///
/// A URI is preferred; bytes embedded in the sample are accepted as a fallback.
pub fn find_video_result(response: &Value) -> Option<ResultPayload> {
    let sample = video_samples(response)?.first()?;
    let mime_type = sample
        .pointer("/video/mimeType")
        .and_then(Value::as_str)
        .map(str::to_string);

    if let Some(uri) = sample
        .pointer("/video/uri")
        .and_then(Value::as_str)
        .filter(|uri| !uri.is_empty())
    {
        return Some(ResultPayload::RemoteReference {
            uri: uri.to_string(),
            mime_type,
        });
    }

    INLINE_VIDEO_FIELDS
        .iter()
        .filter_map(|field| sample.pointer(field))
        .filter_map(Value::as_str)
        .find(|data| !data.is_empty())
        .map(|data| ResultPayload::InlineBinary {
            data: data.to_string(),
            mime_type: mime_type.unwrap_or_else(|| "video/mp4".to_string()),
        })
}
