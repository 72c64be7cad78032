use super::super::Model;
use super::super::Msg;
use super::utils::{debounce, first_file};
use shared::InputMode;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(model: &Model, ctx: &Context<Model>) -> Html {
    let mode = model.session.mode();
    html! {
        <div class="upload-section">
            {
                if mode == InputMode::Webcam {
                    render_webcam_area(model, ctx)
                } else {
                    render_file_input_area(model, ctx)
                }
            }
        </div>
    }
}

fn render_file_input_area(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let mode = model.session.mode();
    let busy = model.loading.is_some();
    let reading = model.session.is_reading();

    let handle_change = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let file = input.files().as_ref().and_then(first_file);
        input.set_value("");
        file.map(Msg::FileChosen)
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(true)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::SetDragging(false)
    });

    let handle_drop = link.callback(Msg::HandleDrop);
    let trigger_file_input = Callback::from(move |_| {
        if busy {
            return;
        }
        let input = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id("fileInput"));
        if let Some(input) = input {
            if let Ok(html_input) = input.dyn_into::<web_sys::HtmlElement>() {
                html_input.click();
            }
        }
    });

    let detect = {
        let link = link.clone();
        debounce(300, move || link.send_message(Msg::Detect))
    };

    html! {
        <>
            <input
                type="file"
                id="fileInput"
                accept={mode.accept_attr()}
                style="display: none;"
                onchange={handle_change}
            />

            <div
                id="fileUploadArea"
                class={classes!(
                    "upload-area",
                    model.is_dragging.then_some("dragover"),
                    model.selected_name.is_some().then_some("has-file"),
                )}
                ondragover={handle_drag_over}
                ondragleave={handle_drag_leave}
                ondrop={handle_drop}
                onclick={debounce(300, {
                    let trigger_file_input = trigger_file_input.clone();
                    move || trigger_file_input.emit(())
                })}
            >
                <div class="upload-placeholder">
                    <i class="fa-solid fa-cloud-arrow-up"></i>
                    <p class="upload-text">
                        { model.selected_name.clone().unwrap_or_else(|| "Click or drag a file here".to_string()) }
                    </p>
                    <p class="upload-hint">{ mode.upload_hint() }</p>
                </div>
            </div>

            <button id="detectBtn" class="analyze-btn" onclick={detect} disabled={busy || reading}>
                {
                    if busy {
                        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Detecting..."}</> }
                    } else if reading {
                        html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Loading file..."}</> }
                    } else {
                        html! { <><i class="fa-solid fa-magnifying-glass"></i>{" Start detection"}</> }
                    }
                }
            </button>
        </>
    }
}

fn render_webcam_area(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let running = !model.live.is_idle();

    html! {
        <div id="webcamGroup" class="webcam-group">
            <video
                id="webcamVideo"
                ref={model.webcam_video.clone()}
                autoplay=true
                muted=true
                playsinline=true
            />
            <button
                id="webcamBtn"
                class="analyze-btn"
                onclick={debounce(300, {
                    let link = link.clone();
                    move || link.send_message(Msg::ToggleWebcam)
                })}
            >
                <i class={classes!("fa-solid", if running { "fa-stop" } else { "fa-video" })}></i>
                <span class="btn-text">
                    { if running { " Stop detection" } else { " Start live detection" } }
                </span>
            </button>
        </div>
    }
}
