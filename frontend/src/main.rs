mod api;
mod camera;
mod components;

use std::rc::Rc;

use api::{BrowserTimer, FetchTransport};
use camera::Camera;
use components::handlers;
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_timers::callback::{Interval, Timeout};
use shared::{
    ApiConfig, ClientError, DetectionResponse, InputMode, LiveLoop, MediaPayload,
    NotificationCenter, Orchestrator, ResultPanels, SessionState, Severity, TickOutcome,
};
use web_sys::DragEvent;
use yew::prelude::*;

type ApiOrchestrator = Orchestrator<FetchTransport, BrowserTimer>;

// Yew msg components
pub enum Msg {
    // Inputs
    SwitchMode(InputMode),
    SetModelId(String),
    SetImageSize(u32),
    SetConfThreshold(f32),

    // File selection
    FileChosen(GlooFile),
    FileLoaded(u64, Result<MediaPayload, String>),
    SetDragging(bool),
    HandleDrop(DragEvent),

    // Detection
    Detect,
    DetectionFinished(InputMode, Result<DetectionResponse, ClientError>),

    // Live detection
    ToggleWebcam,
    WebcamOpened(Result<Camera, String>),
    LiveTick,
    LiveTickFinished(TickOutcome),

    // UI states
    Notify(String, Severity),
    HideNotification(u64),
    HealthChecked(Result<(), ClientError>),
}

// Main component
pub struct Model {
    orchestrator: Rc<ApiOrchestrator>,
    session: SessionState,
    panels: ResultPanels,
    notifications: NotificationCenter,
    notification_timeout: Option<Timeout>,
    live: LiveLoop<Camera, Interval>,
    preview_url: Option<ObjectUrl>,
    selected_name: Option<String>,
    loading: Option<&'static str>,
    is_dragging: bool,
    webcam_video: NodeRef,
    result_video: NodeRef,
    reload_video: bool,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let config = ApiConfig::compiled();
        log::info!("inference API at {}", config.base_url());

        let model = Self {
            orchestrator: Rc::new(Orchestrator::new(config, FetchTransport, BrowserTimer)),
            session: SessionState::new(),
            panels: ResultPanels::default(),
            notifications: NotificationCenter::new(),
            notification_timeout: None,
            live: LiveLoop::new(),
            preview_url: None,
            selected_name: None,
            loading: None,
            is_dragging: false,
            webcam_video: NodeRef::default(),
            result_video: NodeRef::default(),
            reload_video: false,
        };

        ctx.link().send_message(Msg::Notify(
            "Welcome to the waste sorting assistant!".into(),
            Severity::Info,
        ));
        handlers::check_health(&model, ctx);

        model
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            // Inputs
            Msg::SwitchMode(mode) => handlers::handle_switch_mode(self, mode),
            Msg::SetModelId(id) => {
                self.session.params.model_id = id;
                true
            }
            Msg::SetImageSize(size) => {
                self.session.params.image_size = size;
                true
            }
            Msg::SetConfThreshold(conf) => {
                self.session.params.conf_threshold = conf;
                true
            }

            // File selection
            Msg::FileChosen(file) => handlers::handle_file_chosen(self, ctx, file),
            Msg::FileLoaded(ticket, payload) => {
                handlers::handle_file_loaded(self, ctx, ticket, payload)
            }
            Msg::SetDragging(is_dragging) => {
                self.is_dragging = is_dragging;
                true
            }
            Msg::HandleDrop(event) => handlers::handle_drop(self, ctx, event),

            // Detection
            Msg::Detect => handlers::handle_detect(self, ctx),
            Msg::DetectionFinished(mode, result) => {
                handlers::handle_detection_finished(self, ctx, mode, result)
            }

            // Live detection
            Msg::ToggleWebcam => handlers::handle_toggle_webcam(self, ctx),
            Msg::WebcamOpened(result) => handlers::handle_webcam_opened(self, ctx, result),
            Msg::LiveTick => handlers::handle_live_tick(self, ctx),
            Msg::LiveTickFinished(outcome) => handlers::handle_live_tick_finished(self, outcome),

            // UI states
            Msg::Notify(message, severity) => {
                handlers::notify(self, ctx, message, severity);
                true
            }
            Msg::HideNotification(generation) => self.notifications.expire(generation),
            Msg::HealthChecked(result) => handlers::handle_health_checked(self, ctx, result),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { components::header::render_header() }
                { components::notification::render_notification(self) }

                <main class="main-content">
                    <section class="input-panel">
                        { components::settings::render_settings(self, ctx) }
                        { components::upload_section::render_upload_section(self, ctx) }
                    </section>
                    { components::results::render_results(self) }
                </main>

                { components::notification::render_loading_overlay(self) }

                <footer class="app-footer">
                    <p>{"Waste Sorting Assistant | Rust + WASM"}</p>
                </footer>
            </div>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        if std::mem::take(&mut self.reload_video) {
            components::results::reload_and_play(&self.result_video);
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
