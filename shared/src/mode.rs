use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Where the media for a detection comes from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    #[default]
    Image,
    Video,
    Webcam,
}

impl InputMode {
    /// The kind of payload a submission in this mode carries. Webcam frames
    /// are still images.
    pub fn media_kind(self) -> MediaKind {
        match self {
            InputMode::Video => MediaKind::Video,
            InputMode::Image | InputMode::Webcam => MediaKind::Image,
        }
    }

    pub fn accepts_files(self) -> bool {
        !matches!(self, InputMode::Webcam)
    }

    /// Whether a file with the given MIME type may be selected in this mode.
    pub fn accepts_mime(self, mime: &str) -> bool {
        self.accepts_files() && mime.starts_with(self.media_kind().mime_prefix())
    }

    /// Submissions in streaming modes run without timeout and fail silently.
    pub fn is_streaming(self) -> bool {
        matches!(self, InputMode::Webcam)
    }

    pub fn label(self) -> &'static str {
        match self {
            InputMode::Image => "Image",
            InputMode::Video => "Video",
            InputMode::Webcam => "Webcam",
        }
    }

    pub fn upload_hint(self) -> &'static str {
        match self {
            InputMode::Image => "Supported image formats: JPG, PNG, JPEG",
            InputMode::Video => "Supported video formats: MP4, AVI, MOV",
            InputMode::Webcam => "",
        }
    }

    /// Value for the `accept` attribute of the file picker.
    pub fn accept_attr(self) -> &'static str {
        match self {
            InputMode::Image => "image/*",
            InputMode::Video => "video/*",
            InputMode::Webcam => "",
        }
    }
}

/// Payload type sent to the inference API. Its display form is the
/// `input_type` form value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Multipart field name carrying the media blob.
    pub fn field_name(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    pub fn mime_prefix(self) -> &'static str {
        match self {
            MediaKind::Image => "image/",
            MediaKind::Video => "video/",
        }
    }
}
