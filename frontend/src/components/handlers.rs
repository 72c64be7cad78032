use super::super::{Model, Msg};
use crate::camera::Camera;
use gloo_file::{File as GlooFile, ObjectUrl};
use gloo_timers::callback::{Interval, Timeout};
use shared::notify::NOTIFICATION_TTL;
use shared::{
    ClientError, DetectionResponse, InputMode, MediaPayload, RenderPlan, Severity,
    TickOutcome, UserInputError,
};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, HtmlVideoElement};
use yew::prelude::*;

pub fn notify(model: &mut Model, ctx: &Context<Model>, message: String, severity: Severity) {
    let generation = model.notifications.show(message, severity);
    let link = ctx.link().clone();
    // Replacing the timeout cancels the previous one.
    model.notification_timeout = Some(Timeout::new(
        NOTIFICATION_TTL.as_millis() as u32,
        move || link.send_message(Msg::HideNotification(generation)),
    ));
}

fn notify_error(model: &mut Model, ctx: &Context<Model>, err: &ClientError) {
    notify(model, ctx, err.user_message(), err.severity());
}

pub fn check_health(model: &Model, ctx: &Context<Model>) {
    let orchestrator = model.orchestrator.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        let result = orchestrator.check_health().await;
        link.send_message(Msg::HealthChecked(result));
    });
}

pub fn handle_health_checked(
    model: &mut Model,
    ctx: &Context<Model>,
    result: Result<(), ClientError>,
) -> bool {
    match result {
        Ok(()) => {
            log::info!("API service reachable");
            notify(model, ctx, "Connected to the API service".into(), Severity::Success);
        }
        Err(ClientError::Http { status, body }) => {
            log::warn!("API health check returned {}: {}", status, body);
            notify(
                model,
                ctx,
                "API service is not ready, please check the backend".into(),
                Severity::Warning,
            );
        }
        Err(err) => {
            log::error!("API health check failed: {}", err);
            notify(
                model,
                ctx,
                "Cannot reach the API service, make sure the backend is running".into(),
                Severity::Error,
            );
        }
    }
    true
}

pub fn handle_switch_mode(model: &mut Model, mode: InputMode) -> bool {
    if !model.session.switch_mode(mode) {
        return false;
    }
    model.live.stop();
    reset_selection(model);
    true
}

fn reset_selection(model: &mut Model) {
    model.session.clear_selection();
    model.selected_name = None;
    model.panels.reset();
    model.preview_url = None;
}

pub fn handle_drop(model: &mut Model, ctx: &Context<Model>, event: DragEvent) -> bool {
    event.prevent_default();
    model.is_dragging = false;

    let file = event
        .data_transfer()
        .and_then(|data_transfer| data_transfer.files())
        .and_then(|file_list| file_list.item(0));
    if let Some(file) = file {
        return handle_file_chosen(model, ctx, GlooFile::from(file));
    }

    true
}

/// Validates the file against the current mode before any preview or read.
pub fn handle_file_chosen(model: &mut Model, ctx: &Context<Model>, file: GlooFile) -> bool {
    if model.orchestrator.is_busy() {
        log::debug!("ignoring file {} while a detection is running", file.name());
        return false;
    }

    let mime = file.raw_mime_type();
    if let Err(err) = model.session.check_file(&mime) {
        log::warn!("rejected file {} ({})", file.name(), mime);
        notify_error(model, ctx, &ClientError::from(err));
        return true;
    }

    let mode = model.session.mode();
    let ticket = model.session.begin_selection();
    model.selected_name = Some(file.name());

    // Dropping the old URL revokes it before the new one is assigned.
    model.preview_url = None;
    let preview = ObjectUrl::from(file.clone());
    model.panels.show_preview(mode.media_kind(), preview.to_string());
    model.preview_url = Some(preview);

    let link = ctx.link().clone();
    spawn_local(async move {
        let result = gloo_file::futures::read_as_bytes(&file)
            .await
            .map(|bytes| MediaPayload::new(bytes, file.raw_mime_type(), file.name()))
            .map_err(|err| err.to_string());
        link.send_message(Msg::FileLoaded(ticket, result));
    });

    true
}

/// Only the read for the latest pick lands; mode switches and newer picks
/// invalidate older tickets.
pub fn handle_file_loaded(
    model: &mut Model,
    ctx: &Context<Model>,
    ticket: u64,
    payload: Result<MediaPayload, String>,
) -> bool {
    match payload {
        Ok(payload) => {
            let name = payload.file_name.clone();
            match model.session.finish_selection(ticket, payload) {
                Ok(true) => notify(model, ctx, format!("Selected file: {}", name), Severity::Success),
                Ok(false) => return false,
                Err(err) => notify_error(model, ctx, &err.into()),
            }
        }
        Err(err) => {
            if !model.session.abandon_selection(ticket) {
                return false;
            }
            log::error!("failed to read file: {}", err);
            model.selected_name = None;
            notify(model, ctx, format!("Could not read the file: {}", err), Severity::Error);
        }
    }
    true
}

pub fn handle_detect(model: &mut Model, ctx: &Context<Model>) -> bool {
    if model.orchestrator.is_busy() {
        notify_error(model, ctx, &UserInputError::Busy.into());
        return true;
    }

    let mode = model.session.mode();
    if mode == InputMode::Webcam {
        return match model.live.camera() {
            Some(camera) => {
                spawn_tick(model, ctx, camera);
                false
            }
            None => {
                notify_error(model, ctx, &UserInputError::CameraNotStarted.into());
                true
            }
        };
    }

    if model.session.is_reading() {
        notify_error(model, ctx, &UserInputError::StillReading.into());
        return true;
    }

    let media = model.session.selected().cloned();
    if media.is_some() {
        model.loading = Some(match mode {
            InputMode::Video => "Processing video, this may take several minutes...",
            _ => "Detecting...",
        });
    }

    let orchestrator = model.orchestrator.clone();
    let params = model.session.params.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        let result = orchestrator.submit(mode, media, &params).await;
        link.send_message(Msg::DetectionFinished(mode, result));
    });

    true
}

pub fn handle_detection_finished(
    model: &mut Model,
    ctx: &Context<Model>,
    mode: InputMode,
    result: Result<DetectionResponse, ClientError>,
) -> bool {
    if matches!(result, Err(ClientError::UserInput(UserInputError::Busy))) {
        notify_error(model, ctx, &UserInputError::Busy.into());
        return true;
    }
    model.loading = None;

    if mode != model.session.mode() {
        log::info!("discarding {} result after mode switch", mode);
        return true;
    }

    let plan = result.and_then(|response| {
        RenderPlan::from_response(&response, model.orchestrator.config()).map_err(ClientError::from)
    });
    match plan {
        Ok(plan) => {
            apply_plan(model, plan);
            notify(model, ctx, "Detection complete!".into(), Severity::Success);
        }
        Err(err) => {
            log::error!("detection failed: {}", err);
            notify_error(model, ctx, &err);
        }
    }
    true
}

fn apply_plan(model: &mut Model, plan: RenderPlan) {
    if plan.source.is_some() {
        model.preview_url = None;
    }
    if model.panels.apply(plan) {
        model.reload_video = true;
    }
}

pub fn handle_toggle_webcam(model: &mut Model, ctx: &Context<Model>) -> bool {
    if !model.live.is_idle() {
        model.live.stop();
        notify(model, ctx, "Live detection stopped".into(), Severity::Info);
        return true;
    }

    let Some(video) = model.webcam_video.cast::<HtmlVideoElement>() else {
        log::error!("webcam video element is not mounted");
        return false;
    };
    model.live.begin();

    let link = ctx.link().clone();
    spawn_local(async move {
        let result = Camera::open(video).await;
        link.send_message(Msg::WebcamOpened(result));
    });

    true
}

pub fn handle_webcam_opened(
    model: &mut Model,
    ctx: &Context<Model>,
    result: Result<Camera, String>,
) -> bool {
    match result {
        Ok(camera) => {
            let link = ctx.link().clone();
            let period = model.orchestrator.config().live_interval.as_millis() as u32;
            let ticker = Interval::new(period, move || link.send_message(Msg::LiveTick));
            if model.live.activate(camera, ticker) {
                notify(
                    model,
                    ctx,
                    "Camera started, running live detection...".into(),
                    Severity::Success,
                );
            }
        }
        Err(err) => {
            log::error!("camera failed to start: {}", err);
            model.live.abort_start();
            notify(
                model,
                ctx,
                format!("Cannot access the camera: {}", err),
                Severity::Error,
            );
        }
    }
    true
}

pub fn handle_live_tick(model: &mut Model, ctx: &Context<Model>) -> bool {
    if model.orchestrator.is_busy() {
        return false;
    }
    if let Some(camera) = model.live.camera() {
        spawn_tick(model, ctx, camera);
    }
    false
}

fn spawn_tick(model: &Model, ctx: &Context<Model>, camera: Rc<Camera>) {
    let orchestrator = model.orchestrator.clone();
    let params = model.session.params.clone();
    let link = ctx.link().clone();
    spawn_local(async move {
        let outcome = orchestrator.poll_tick(&*camera, &params).await;
        link.send_message(Msg::LiveTickFinished(outcome));
    });
}

/// Renders live results inline; every failure stays in the log.
pub fn handle_live_tick_finished(model: &mut Model, outcome: TickOutcome) -> bool {
    match outcome {
        TickOutcome::Completed(response) => {
            if !model.live.is_active() {
                return false;
            }
            match RenderPlan::from_response(&response, model.orchestrator.config()) {
                Ok(plan) => {
                    apply_plan(model, plan);
                    true
                }
                Err(err) => {
                    log::warn!("live result not rendered: {}", err);
                    false
                }
            }
        }
        TickOutcome::Failed(err) => {
            log::warn!("live detection tick failed: {}", err);
            false
        }
        TickOutcome::Skipped | TickOutcome::NoFrame => false,
    }
}
