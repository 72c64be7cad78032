use serde::Deserialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::ValidationError;
use crate::mode::MediaKind;

/// Relative video references under this prefix are served by the API itself.
pub const API_VIDEO_PREFIX: &str = "/video/";

const IMAGE_LAYOUT_LEN: usize = 3;
const VIDEO_LAYOUT_LEN: usize = 4;

/// How the annotated image came back.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Base64 JPEG carried inline in the response.
    Embedded(String),
    /// A URL the browser can load directly.
    Url(String),
}

impl ImageSource {
    /// Value for an `<img src>`.
    pub fn to_src(&self) -> String {
        match self {
            ImageSource::Embedded(b64) => format!("data:image/jpeg;base64,{}", b64),
            ImageSource::Url(url) => url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VideoSource {
    /// Path under [`API_VIDEO_PREFIX`], resolved against the API base.
    ApiRelative(String),
    DataUri(String),
    Url(String),
}

impl VideoSource {
    pub fn from_reference(reference: &str) -> Self {
        if reference.starts_with(API_VIDEO_PREFIX) {
            VideoSource::ApiRelative(reference.to_string())
        } else if reference.starts_with("data:") {
            VideoSource::DataUri(reference.to_string())
        } else {
            VideoSource::Url(reference.to_string())
        }
    }

    /// Value for a `<video src>`.
    pub fn resolve(&self, config: &ApiConfig) -> String {
        match self {
            VideoSource::ApiRelative(path) => config.endpoint(path),
            VideoSource::DataUri(uri) | VideoSource::Url(uri) => uri.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageResult {
    pub image: Option<ImageSource>,
    pub detection_text: Option<String>,
    pub category_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VideoResult {
    pub video: Option<VideoSource>,
    pub detection_text: Option<String>,
    pub category_summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorResult {
    pub message: String,
}

/// A decoded `/predict` response. Shape inspection happens once, here.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionResponse {
    Image(ImageResult),
    Video(VideoResult),
    Error(ErrorResult),
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    data: Option<Vec<Value>>,
}

impl DetectionResponse {
    /// Decodes a response body. `kind` selects the positional layout:
    /// `[image, text, summary]` for images, `[_, video, text, summary]` for videos.
    pub fn decode(body: &str, kind: MediaKind) -> Result<Self, ValidationError> {
        let envelope: Envelope =
            serde_json::from_str(body).map_err(|e| ValidationError::InvalidJson(e.to_string()))?;

        if let Some(message) = envelope.error.as_ref().and_then(error_message) {
            return Ok(DetectionResponse::Error(ErrorResult { message }));
        }

        let data = envelope.data.ok_or(ValidationError::MissingData)?;
        match kind {
            MediaKind::Image => {
                check_len(&data, kind, IMAGE_LAYOUT_LEN)?;
                Ok(DetectionResponse::Image(ImageResult {
                    image: image_source(&data[0]),
                    detection_text: text(&data[1]),
                    category_summary: text(&data[2]),
                }))
            }
            MediaKind::Video => {
                check_len(&data, kind, VIDEO_LAYOUT_LEN)?;
                Ok(DetectionResponse::Video(VideoResult {
                    video: data[1]
                        .as_str()
                        .filter(|s| !s.is_empty())
                        .map(VideoSource::from_reference),
                    detection_text: text(&data[2]),
                    category_summary: text(&data[3]),
                }))
            }
        }
    }

    /// Turns an API-reported error into a failure, passing results through.
    pub fn into_result(self) -> Result<Self, ValidationError> {
        match self {
            DetectionResponse::Error(err) => Err(ValidationError::Rejected(err.message)),
            other => Ok(other),
        }
    }

    pub fn detection_text(&self) -> Option<&str> {
        match self {
            DetectionResponse::Image(r) => r.detection_text.as_deref(),
            DetectionResponse::Video(r) => r.detection_text.as_deref(),
            DetectionResponse::Error(_) => None,
        }
    }

    pub fn category_summary(&self) -> Option<&str> {
        match self {
            DetectionResponse::Image(r) => r.category_summary.as_deref(),
            DetectionResponse::Video(r) => r.category_summary.as_deref(),
            DetectionResponse::Error(_) => None,
        }
    }
}

fn check_len(data: &[Value], kind: MediaKind, expected: usize) -> Result<(), ValidationError> {
    if data.len() < expected {
        return Err(ValidationError::TooFewElements {
            kind,
            expected,
            found: data.len(),
        });
    }
    Ok(())
}

/// JSON falsy values: null, false, 0 and the empty string.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn error_message(value: &Value) -> Option<String> {
    match value {
        v if is_falsy(v) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn image_source(value: &Value) -> Option<ImageSource> {
    match value {
        Value::Object(map) => map
            .get("image")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(|b64| ImageSource::Embedded(b64.to_string())),
        Value::String(url) if !url.is_empty() => Some(ImageSource::Url(url.clone())),
        _ => None,
    }
}

/// Non-empty strings verbatim; other truthy scalars in their JSON form.
fn text(value: &Value) -> Option<String> {
    match value {
        v if is_falsy(v) => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(_) | Value::Bool(true) => Some(value.to_string()),
        Value::Array(_) | Value::Object(_) | Value::Bool(false) | Value::Null => None,
    }
}
