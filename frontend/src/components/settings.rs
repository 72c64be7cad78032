use super::super::{Model, Msg};
use shared::InputMode;
use shared::request::{IMAGE_SIZE_RANGE, IMAGE_SIZE_STEP};
use strum::IntoEnumIterator;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

const MODEL_CHOICES: &[(&str, &str)] = &[
    ("yolov8n-garbage", "YOLOv8n (fast)"),
    ("yolov8s-garbage", "YOLOv8s (balanced)"),
    ("yolov8m-garbage", "YOLOv8m (accurate)"),
];

pub fn render_settings(model: &Model, ctx: &Context<Model>) -> Html {
    let link = ctx.link();
    let params = &model.session.params;
    let busy = model.loading.is_some();

    let on_model = link.callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::SetModelId(select.value())
    });
    let on_size = link.batch_callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        input.value().parse().ok().map(Msg::SetImageSize)
    });
    let on_conf = link.batch_callback(|e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        input.value().parse().ok().map(Msg::SetConfThreshold)
    });

    html! {
        <div class="settings">
            <div class="input-type-selector">
                { for InputMode::iter().map(|mode| html! {
                    <label key={mode.to_string()}>
                        <input
                            type="radio"
                            name="inputType"
                            value={mode.as_ref().to_string()}
                            checked={model.session.mode() == mode}
                            disabled={busy}
                            onchange={link.callback(move |_| Msg::SwitchMode(mode))}
                        />
                        <span class="radio-label-text">{ mode.label() }</span>
                    </label>
                })}
            </div>

            <label>{"Model"}</label>
            <select id="modelSelect" onchange={on_model}>
                { for MODEL_CHOICES.iter().map(|(id, label)| html! {
                    <option value={*id} selected={params.model_id == *id}>{ *label }</option>
                })}
            </select>

            <label>
                {"Image size: "}<span id="imageSizeValue">{ params.image_size }</span>
            </label>
            <input
                id="imageSize"
                type="range"
                min={IMAGE_SIZE_RANGE.0.to_string()}
                max={IMAGE_SIZE_RANGE.1.to_string()}
                step={IMAGE_SIZE_STEP.to_string()}
                value={params.image_size.to_string()}
                oninput={on_size}
            />

            <label>
                {"Confidence threshold: "}<span id="confValue">{ format!("{:.2}", params.conf_threshold) }</span>
            </label>
            <input
                id="confThreshold"
                type="range"
                min="0"
                max="1"
                step="0.05"
                value={params.conf_threshold.to_string()}
                oninput={on_conf}
            />
        </div>
    }
}
