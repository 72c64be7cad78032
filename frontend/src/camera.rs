use async_trait::async_trait;
use futures::channel::oneshot;
use gloo_events::EventListener;
use shared::{CameraHandle, FrameSource, MediaPayload};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
    MediaStreamConstraints, MediaStreamTrack, MediaStreamTrackState,
};

const CAPTURE_WIDTH: u32 = 640;
const CAPTURE_HEIGHT: u32 = 480;
const JPEG_QUALITY: f64 = 0.8;
// HTMLMediaElement.HAVE_METADATA
const HAVE_METADATA: u16 = 1;

/// A live webcam stream attached to a `<video>` element. Dropping it stops
/// every track.
pub struct Camera {
    stream: MediaStream,
    video: HtmlVideoElement,
}

impl Camera {
    /// Requests the camera and resolves once the first frame's metadata is known.
    pub async fn open(video: HtmlVideoElement) -> Result<Camera, String> {
        let window = web_sys::window().ok_or("no window")?;
        let devices = window.navigator().media_devices().map_err(describe)?;

        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&video_constraints()?);
        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(describe)?;
        let stream: MediaStream = JsFuture::from(promise)
            .await
            .map_err(describe)?
            .dyn_into()
            .map_err(describe)?;

        video.set_src_object(Some(&stream));
        let camera = Camera { stream, video };
        camera.wait_for_metadata().await;
        log::info!(
            "camera ready at {}x{}",
            camera.video.video_width(),
            camera.video.video_height()
        );
        Ok(camera)
    }

    async fn wait_for_metadata(&self) {
        if self.video.ready_state() >= HAVE_METADATA {
            return;
        }
        let (tx, rx) = oneshot::channel();
        let _listener = EventListener::once(&self.video, "loadedmetadata", move |_| {
            let _ = tx.send(());
        });
        let _ = rx.await;
    }

    fn tracks(&self) -> impl Iterator<Item = MediaStreamTrack> {
        self.stream
            .get_tracks()
            .iter()
            .filter_map(|track| track.dyn_into::<MediaStreamTrack>().ok())
            .collect::<Vec<_>>()
            .into_iter()
    }
}

impl CameraHandle for Camera {
    fn active_tracks(&self) -> usize {
        self.tracks()
            .filter(|track| track.ready_state() == MediaStreamTrackState::Live)
            .count()
    }

    fn release(&self) {
        for track in self.tracks() {
            track.stop();
        }
        self.video.set_src_object(None);
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        self.release();
    }
}

#[async_trait(?Send)]
impl FrameSource for Camera {
    async fn capture_frame(&self) -> Option<MediaPayload> {
        if self.active_tracks() == 0 {
            return None;
        }
        let (width, height) = (self.video.video_width(), self.video.video_height());
        if width == 0 || height == 0 {
            return None;
        }

        let document = web_sys::window()?.document()?;
        let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
        canvas.set_width(width);
        canvas.set_height(height);
        let context: CanvasRenderingContext2d =
            canvas.get_context("2d").ok()??.dyn_into().ok()?;
        context
            .draw_image_with_html_video_element_and_dw_and_dh(
                &self.video,
                0.0,
                0.0,
                width as f64,
                height as f64,
            )
            .ok()?;

        let blob = canvas_to_jpeg(&canvas).await?;
        let bytes = gloo_file::futures::read_as_bytes(&gloo_file::Blob::from(blob))
            .await
            .ok()?;
        Some(MediaPayload::new(bytes, "image/jpeg", "webcam.jpg"))
    }
}

async fn canvas_to_jpeg(canvas: &HtmlCanvasElement) -> Option<web_sys::Blob> {
    let (tx, rx) = oneshot::channel();
    let callback = Closure::once(move |blob: JsValue| {
        let _ = tx.send(blob.dyn_into::<web_sys::Blob>().ok());
    });
    canvas
        .to_blob_with_type_and_encoder_options(
            callback.as_ref().unchecked_ref(),
            "image/jpeg",
            &JsValue::from_f64(JPEG_QUALITY),
        )
        .ok()?;
    rx.await.ok().flatten()
}

fn video_constraints() -> Result<JsValue, String> {
    let constraints = js_sys::Object::new();
    js_sys::Reflect::set(&constraints, &"width".into(), &CAPTURE_WIDTH.into()).map_err(describe)?;
    js_sys::Reflect::set(&constraints, &"height".into(), &CAPTURE_HEIGHT.into())
        .map_err(describe)?;
    Ok(constraints.into())
}

/// Best-effort human readable text for a JS exception.
pub fn describe(value: JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|err| String::from(err.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}
