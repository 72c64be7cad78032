use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::UserInputError;
use crate::mode::MediaKind;

pub const DEFAULT_MODEL_ID: &str = "yolov8n-garbage";
pub const DEFAULT_IMAGE_SIZE: u32 = 640;
pub const DEFAULT_CONF_THRESHOLD: f32 = 0.25;
pub const IMAGE_SIZE_RANGE: (u32, u32) = (320, 1280);
pub const IMAGE_SIZE_STEP: u32 = 32;

/// Knobs the user sets in the sidebar, forwarded verbatim to the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionParams {
    pub model_id: String,
    pub image_size: u32,
    pub conf_threshold: f32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            image_size: DEFAULT_IMAGE_SIZE,
            conf_threshold: DEFAULT_CONF_THRESHOLD,
        }
    }
}

impl DetectionParams {
    pub fn validate(&self) -> Result<(), UserInputError> {
        if self.model_id.trim().is_empty() {
            return Err(UserInputError::InvalidParameter(
                "model id must not be empty".into(),
            ));
        }
        let (min, max) = IMAGE_SIZE_RANGE;
        if !(min..=max).contains(&self.image_size) || self.image_size % IMAGE_SIZE_STEP != 0 {
            return Err(UserInputError::InvalidParameter(format!(
                "image size must be a multiple of {} between {} and {}, got {}",
                IMAGE_SIZE_STEP, min, max, self.image_size
            )));
        }
        if !(0.0..=1.0).contains(&self.conf_threshold) {
            return Err(UserInputError::InvalidParameter(format!(
                "confidence threshold must be within [0, 1], got {}",
                self.conf_threshold
            )));
        }
        Ok(())
    }
}

/// Raw media bytes plus the metadata the multipart part needs.
/// Cloning is cheap; large videos are shared, not copied.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaPayload {
    pub bytes: Rc<[u8]>,
    pub mime_type: String,
    pub file_name: String,
}

impl MediaPayload {
    pub fn new(bytes: impl Into<Rc<[u8]>>, mime_type: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
            file_name: file_name.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// One part of the outbound multipart body.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Blob {
        name: &'static str,
        payload: MediaPayload,
    },
    Text {
        name: &'static str,
        value: String,
    },
}

impl FormPart {
    pub fn name(&self) -> &'static str {
        match self {
            FormPart::Blob { name, .. } | FormPart::Text { name, .. } => name,
        }
    }
}

/// A single detection attempt. Built fresh for every submission and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionRequest {
    payload: MediaPayload,
    kind: MediaKind,
    params: DetectionParams,
}

impl DetectionRequest {
    pub fn new(
        payload: MediaPayload,
        kind: MediaKind,
        params: DetectionParams,
    ) -> Result<Self, UserInputError> {
        params.validate()?;
        Ok(Self {
            payload,
            kind,
            params,
        })
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn payload(&self) -> &MediaPayload {
        &self.payload
    }

    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    /// Multipart parts in the order the API expects them.
    pub fn form_parts(&self) -> Vec<FormPart> {
        vec![
            FormPart::Blob {
                name: self.kind.field_name(),
                payload: self.payload.clone(),
            },
            FormPart::Text {
                name: "model_id",
                value: self.params.model_id.clone(),
            },
            FormPart::Text {
                name: "image_size",
                value: self.params.image_size.to_string(),
            },
            FormPart::Text {
                name: "conf_threshold",
                value: self.params.conf_threshold.to_string(),
            },
            FormPart::Text {
                name: "input_type",
                value: self.kind.to_string(),
            },
        ]
    }
}
