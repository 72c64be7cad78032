use crate::config::ApiConfig;
use crate::error::ValidationError;
use crate::mode::MediaKind;
use crate::response::DetectionResponse;

pub const DETAIL_PLACEHOLDER: &str = "Detection details will appear here...";
pub const SUMMARY_PLACEHOLDER: &str = "Category statistics will appear here...";
pub const DETAIL_PENDING: &str = "Click \"Start detection\" to analyse this file...";
pub const SUMMARY_PENDING: &str = "Waiting for detection...";

/// Which media surface is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Showing {
    #[default]
    Placeholder,
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelText {
    Placeholder(&'static str),
    /// Preformatted text, rendered with whitespace preserved.
    Text(String),
}

impl PanelText {
    pub fn as_str(&self) -> &str {
        match self {
            PanelText::Placeholder(s) => s,
            PanelText::Text(s) => s,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, PanelText::Placeholder(_))
    }
}

/// What a decoded response asks the display to do.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub kind: MediaKind,
    /// New source for the visible media element, if the response carried one.
    pub source: Option<String>,
    pub detection_text: Option<String>,
    pub category_summary: Option<String>,
}

impl RenderPlan {
    pub fn from_response(
        response: &DetectionResponse,
        config: &ApiConfig,
    ) -> Result<Self, ValidationError> {
        match response {
            DetectionResponse::Image(result) => Ok(Self {
                kind: MediaKind::Image,
                source: result.image.as_ref().map(|img| img.to_src()),
                detection_text: result.detection_text.clone(),
                category_summary: result.category_summary.clone(),
            }),
            DetectionResponse::Video(result) => Ok(Self {
                kind: MediaKind::Video,
                source: result.video.as_ref().map(|v| v.resolve(config)),
                detection_text: result.detection_text.clone(),
                category_summary: result.category_summary.clone(),
            }),
            DetectionResponse::Error(err) => Err(ValidationError::Rejected(err.message.clone())),
        }
    }
}

/// State of the result area: one image surface, one video surface and the
/// two text panels.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPanels {
    pub showing: Showing,
    pub image_src: Option<String>,
    pub video_src: Option<String>,
    pub detection_text: PanelText,
    pub category_summary: PanelText,
    /// Bumped whenever the video source changes so the view reloads and plays it.
    pub video_revision: u64,
}

impl Default for ResultPanels {
    fn default() -> Self {
        Self {
            showing: Showing::Placeholder,
            image_src: None,
            video_src: None,
            detection_text: PanelText::Placeholder(DETAIL_PLACEHOLDER),
            category_summary: PanelText::Placeholder(SUMMARY_PLACEHOLDER),
            video_revision: 0,
        }
    }
}

impl ResultPanels {
    pub fn reset(&mut self) {
        let revision = self.video_revision;
        *self = Self::default();
        self.video_revision = revision;
    }

    /// Shows a local preview of a freshly selected file.
    pub fn show_preview(&mut self, kind: MediaKind, url: String) {
        match kind {
            MediaKind::Image => {
                self.showing = Showing::Image;
                self.image_src = Some(url);
            }
            MediaKind::Video => {
                self.showing = Showing::Video;
                self.set_video(url);
            }
        }
        self.detection_text = PanelText::Placeholder(DETAIL_PENDING);
        self.category_summary = PanelText::Placeholder(SUMMARY_PENDING);
    }

    /// Applies a render plan. Absent text leaves the current panel content alone.
    /// Returns true when the video element has to be reloaded.
    pub fn apply(&mut self, plan: RenderPlan) -> bool {
        let mut reload = false;
        match plan.kind {
            MediaKind::Image => {
                self.showing = Showing::Image;
                if let Some(src) = plan.source {
                    self.image_src = Some(src);
                }
            }
            MediaKind::Video => {
                self.showing = Showing::Video;
                if let Some(src) = plan.source {
                    self.set_video(src);
                }
                reload = true;
            }
        }
        if let Some(text) = plan.detection_text {
            self.detection_text = PanelText::Text(text);
        }
        if let Some(text) = plan.category_summary {
            self.category_summary = PanelText::Text(text);
        }
        reload
    }

    fn set_video(&mut self, src: String) {
        self.video_src = Some(src);
        self.video_revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::{ErrorResult, ImageResult, ImageSource, VideoResult, VideoSource};

    fn config() -> ApiConfig {
        ApiConfig::new("http://127.0.0.1:7860")
    }

    #[test]
    fn embedded_image_becomes_data_uri() {
        let response = DetectionResponse::Image(ImageResult {
            image: Some(ImageSource::Embedded("QUJD".into())),
            detection_text: Some("text A".into()),
            category_summary: Some("text B".into()),
        });
        let mut panels = ResultPanels::default();
        panels.apply(RenderPlan::from_response(&response, &config()).unwrap());

        assert_eq!(panels.showing, Showing::Image);
        assert_eq!(panels.image_src.as_deref(), Some("data:image/jpeg;base64,QUJD"));
        assert_eq!(panels.detection_text, PanelText::Text("text A".into()));
        assert_eq!(panels.category_summary, PanelText::Text("text B".into()));
    }

    #[test]
    fn relative_video_resolves_against_base() {
        let response = DetectionResponse::Video(VideoResult {
            video: Some(VideoSource::from_reference("/video/out.mp4")),
            detection_text: Some("text A".into()),
            category_summary: Some("text B".into()),
        });
        let mut panels = ResultPanels::default();
        let reload = panels.apply(RenderPlan::from_response(&response, &config()).unwrap());

        assert!(reload);
        assert_eq!(panels.showing, Showing::Video);
        assert_eq!(
            panels.video_src.as_deref(),
            Some("http://127.0.0.1:7860/video/out.mp4")
        );
        assert_eq!(panels.video_revision, 1);
    }

    #[test]
    fn absent_text_keeps_existing_panel() {
        let mut panels = ResultPanels::default();
        panels.show_preview(MediaKind::Image, "blob:preview".into());

        panels.apply(RenderPlan {
            kind: MediaKind::Image,
            source: None,
            detection_text: None,
            category_summary: Some("2 recyclable".into()),
        });

        assert_eq!(panels.image_src.as_deref(), Some("blob:preview"));
        assert_eq!(panels.detection_text, PanelText::Placeholder(DETAIL_PENDING));
        assert_eq!(panels.category_summary.as_str(), "2 recyclable");
    }

    #[test]
    fn error_response_cannot_be_rendered() {
        let response = DetectionResponse::Error(ErrorResult {
            message: "bad model".into(),
        });
        assert_eq!(
            RenderPlan::from_response(&response, &config()),
            Err(ValidationError::Rejected("bad model".into()))
        );
    }

    #[test]
    fn reset_restores_placeholders() {
        let mut panels = ResultPanels::default();
        panels.show_preview(MediaKind::Video, "blob:clip".into());
        panels.reset();

        assert_eq!(panels.showing, Showing::Placeholder);
        assert!(panels.video_src.is_none());
        assert!(panels.detection_text.is_placeholder());
        assert_eq!(panels.video_revision, 1);
    }
}
