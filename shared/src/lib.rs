//! Browser-agnostic core of the waste classification client: request
//! assembly, response decoding, the in-flight guard, the live detection loop
//! and the result/notification state the UI renders from.

pub mod config;
pub mod error;
pub mod guard;
pub mod live;
pub mod mode;
pub mod notify;
pub mod orchestrator;
pub mod render;
pub mod request;
pub mod response;
pub mod session;

pub use config::ApiConfig;
pub use error::{ClientError, UserInputError, ValidationError};
pub use guard::{InFlight, InFlightGuard};
pub use live::{CameraHandle, FrameSource, LiveLoop, TickOutcome};
pub use mode::{InputMode, MediaKind};
pub use notify::{Notification, NotificationCenter, Severity};
pub use orchestrator::{Orchestrator, RawResponse, Timer, Transport};
pub use render::{PanelText, RenderPlan, ResultPanels, Showing};
pub use request::{DetectionParams, DetectionRequest, FormPart, MediaPayload};
pub use response::{DetectionResponse, ImageSource, VideoSource};
pub use session::SessionState;
