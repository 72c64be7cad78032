use super::super::Model;
use yew::prelude::*;

pub fn render_notification(model: &Model) -> Html {
    match model.notifications.current() {
        Some(notification) => html! {
            <div
                id="notification"
                class={classes!("notification", "show", notification.severity.as_ref().to_string())}
                key={notification.generation.to_string()}
            >
                <span class="notification-icon">{ notification.severity.icon() }</span>
                <span class="notification-text">{ &notification.message }</span>
            </div>
        },
        None => html! { <div id="notification" class="notification"></div> },
    }
}

pub fn render_loading_overlay(model: &Model) -> Html {
    match model.loading {
        Some(text) => html! {
            <div id="loading-overlay" class="loading-overlay">
                <i class="fa-solid fa-spinner fa-spin fa-2x"></i>
                <p class="loading-text">{ text }</p>
            </div>
        },
        None => html! {},
    }
}
