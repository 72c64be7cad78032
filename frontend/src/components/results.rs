use super::super::Model;
use crate::camera::describe;
use shared::{PanelText, Showing};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlVideoElement;
use yew::prelude::*;

pub fn render_results(model: &Model) -> Html {
    let panels = &model.panels;
    let media = match panels.showing {
        Showing::Placeholder => html! {
            <div class="result-placeholder">
                <i class="fa-solid fa-image"></i>
                <p>{"Results will appear here"}</p>
            </div>
        },
        Showing::Image => html! {
            <img
                id="resultImage"
                class="result-media"
                src={panels.image_src.clone().unwrap_or_default()}
                alt="Detection result"
            />
        },
        Showing::Video => html! {
            <video
                id="resultVideo"
                class="result-media"
                ref={model.result_video.clone()}
                src={panels.video_src.clone().unwrap_or_default()}
                controls=true
            />
        },
    };

    html! {
        <section class="result-panel">
            <div class="result-media-container">{ media }</div>
            { render_panel("Detections", "detectionText", &panels.detection_text) }
            { render_panel("Category summary", "categorySummary", &panels.category_summary) }
        </section>
    }
}

fn render_panel(title: &str, id: &'static str, text: &PanelText) -> Html {
    html! {
        <div class="result-text">
            <h3>{ title }</h3>
            <pre
                {id}
                class={classes!(text.is_placeholder().then_some("placeholder"))}
                style="white-space: pre-wrap;"
            >
                { text.as_str() }
            </pre>
        </div>
    }
}

/// Reloads the result video after its source changed and starts playback.
/// Browsers may refuse autoplay; that is only logged.
pub fn reload_and_play(video: &NodeRef) {
    let Some(video) = video.cast::<HtmlVideoElement>() else {
        return;
    };
    video.load();
    match video.play() {
        Ok(promise) => spawn_local(async move {
            if let Err(err) = JsFuture::from(promise).await {
                log::info!("result video autoplay blocked: {}", describe(err));
            }
        }),
        Err(err) => log::info!("result video could not play: {}", describe(err)),
    }
}
