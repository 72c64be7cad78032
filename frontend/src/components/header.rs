use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1><i class="fa-solid fa-recycle"></i> {" Waste Sorting Assistant"}</h1>
            <p class="subtitle">{"Upload a photo or video, or point your camera at the bin"}</p>
        </header>
    }
}
