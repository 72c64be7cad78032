use std::time::Duration;

use async_trait::async_trait;
use futures::future::{Either, select};

use crate::config::ApiConfig;
use crate::error::{ClientError, UserInputError};
use crate::guard::InFlight;
use crate::mode::InputMode;
use crate::request::{DetectionParams, DetectionRequest, FormPart, MediaPayload};
use crate::response::DetectionResponse;

/// Status and body of an HTTP exchange, whatever the status.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP. Implementations abort the underlying request when the
/// returned future is dropped; connection failures map to `ClientError::Network`.
#[async_trait(?Send)]
pub trait Transport {
    async fn post_form(&self, url: &str, parts: Vec<FormPart>) -> Result<RawResponse, ClientError>;

    async fn get(&self, url: &str) -> Result<RawResponse, ClientError>;
}

#[async_trait(?Send)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}

/// Sequences detection requests against the inference API and owns the
/// in-flight slot shared by every trigger source.
pub struct Orchestrator<T, C> {
    config: ApiConfig,
    transport: T,
    timer: C,
    in_flight: InFlight,
}

impl<T: Transport, C: Timer> Orchestrator<T, C> {
    pub fn new(config: ApiConfig, transport: T, timer: C) -> Self {
        Self {
            config,
            transport,
            timer,
            in_flight: InFlight::new(),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_active()
    }

    /// Probes `GET /health`.
    pub async fn check_health(&self) -> Result<(), ClientError> {
        let response = self.transport.get(&self.config.health_url()).await?;
        if !response.is_success() {
            return Err(ClientError::Http {
                status: response.status,
                body: response.body,
            });
        }
        Ok(())
    }

    /// Submits one piece of media. Rejected with `Busy` while another request
    /// is outstanding. File modes are bounded by the configured timeout;
    /// webcam submissions are not.
    pub async fn submit(
        &self,
        mode: InputMode,
        media: Option<MediaPayload>,
        params: &DetectionParams,
    ) -> Result<DetectionResponse, ClientError> {
        let _guard = self
            .in_flight
            .try_acquire()
            .ok_or(UserInputError::Busy)?;

        let media = media.ok_or(match mode {
            InputMode::Webcam => UserInputError::NoFrame,
            InputMode::Image | InputMode::Video => UserInputError::NoFileSelected,
        })?;
        let request = DetectionRequest::new(media, mode.media_kind(), params.clone())?;
        let timeout = (!mode.is_streaming()).then_some(self.config.timeout);

        self.dispatch(&request, timeout).await
    }

    /// Sends an already-built request. Callers must hold the in-flight guard.
    pub(crate) async fn dispatch(
        &self,
        request: &DetectionRequest,
        timeout: Option<Duration>,
    ) -> Result<DetectionResponse, ClientError> {
        let url = self.config.predict_url();
        log::debug!(
            "POST {} ({} payload, {} bytes)",
            url,
            request.kind(),
            request.payload().len()
        );

        let send = self.transport.post_form(&url, request.form_parts());
        let response = match timeout {
            Some(limit) => match select(send, self.timer.sleep(limit)).await {
                Either::Left((response, _)) => response?,
                Either::Right(((), _abandoned)) => {
                    log::warn!("request to {} timed out after {:?}", url, limit);
                    return Err(ClientError::Timeout(limit));
                }
            },
            None => send.await?,
        };

        if !response.is_success() {
            return Err(ClientError::Http {
                status: response.status,
                body: response.body,
            });
        }

        let decoded = DetectionResponse::decode(&response.body, request.kind())?;
        Ok(decoded.into_result()?)
    }
}
