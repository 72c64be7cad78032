use std::time::Duration;

use async_trait::async_trait;
use gloo_file::Blob;
use gloo_net::http::{Request, Response};
use shared::{ClientError, FormPart, RawResponse, Timer, Transport};
use wasm_bindgen::JsValue;
use web_sys::{AbortController, FormData};

/// `fetch`-backed transport. Dropping an in-progress call aborts it.
pub struct FetchTransport;

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn post_form(&self, url: &str, parts: Vec<FormPart>) -> Result<RawResponse, ClientError> {
        let form = build_form(&parts).map_err(js_error)?;
        let abort = AbortOnDrop::new()?;

        let request = Request::post(url)
            .abort_signal(Some(&abort.0.signal()))
            .body(form)
            .map_err(net_error)?;

        let response = request.send().await.map_err(net_error)?;
        read_response(response).await
    }

    async fn get(&self, url: &str) -> Result<RawResponse, ClientError> {
        let response = Request::get(url).send().await.map_err(net_error)?;
        read_response(response).await
    }
}

pub struct BrowserTimer;

#[async_trait(?Send)]
impl Timer for BrowserTimer {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}

struct AbortOnDrop(AbortController);

impl AbortOnDrop {
    fn new() -> Result<Self, ClientError> {
        AbortController::new().map(Self).map_err(js_error)
    }
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn build_form(parts: &[FormPart]) -> Result<FormData, JsValue> {
    let form = FormData::new()?;
    for part in parts {
        match part {
            FormPart::Blob { name, payload } => {
                let blob = Blob::new_with_options(&*payload.bytes, Some(payload.mime_type.as_str()));
                form.append_with_blob_and_filename(name, blob.as_ref(), &payload.file_name)?;
            }
            FormPart::Text { name, value } => form.append_with_str(name, value)?,
        }
    }
    Ok(form)
}

async fn read_response(response: Response) -> Result<RawResponse, ClientError> {
    let status = response.status();
    let body = if response.ok() {
        response.text().await.map_err(net_error)?
    } else {
        response.text().await.unwrap_or_default()
    };
    Ok(RawResponse::new(status, body))
}

fn net_error(err: gloo_net::Error) -> ClientError {
    ClientError::Network(err.to_string())
}

fn js_error(value: JsValue) -> ClientError {
    ClientError::Network(format!("{:?}", value))
}
