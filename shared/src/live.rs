use std::rc::Rc;

use async_trait::async_trait;

use crate::error::ClientError;
use crate::mode::MediaKind;
use crate::orchestrator::{Orchestrator, Timer, Transport};
use crate::request::{DetectionParams, DetectionRequest, MediaPayload};
use crate::response::DetectionResponse;

/// Produces still frames from a live capture device.
#[async_trait(?Send)]
pub trait FrameSource {
    /// Grabs the current frame, or `None` if the device has not produced one
    /// with non-zero dimensions yet (or has been released).
    async fn capture_frame(&self) -> Option<MediaPayload>;
}

/// Exclusive ownership of a hardware capture stream.
pub trait CameraHandle {
    fn active_tracks(&self) -> usize;

    /// Stops every track. Must be idempotent.
    fn release(&self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Another request was outstanding.
    Skipped,
    NoFrame,
    Completed(DetectionResponse),
    Failed(ClientError),
}

impl<T: Transport, C: Timer> Orchestrator<T, C> {
    /// One poll of the live loop: claim the slot, grab a frame, send it
    /// without a timeout. Failures are logged and handed back, never raised.
    pub async fn poll_tick<F: FrameSource + ?Sized>(
        &self,
        source: &F,
        params: &DetectionParams,
    ) -> TickOutcome {
        let Some(_guard) = self.in_flight().try_acquire() else {
            return TickOutcome::Skipped;
        };
        let Some(frame) = source.capture_frame().await else {
            return TickOutcome::NoFrame;
        };

        let result = match DetectionRequest::new(frame, MediaKind::Image, params.clone()) {
            Ok(request) => self.dispatch(&request, None).await,
            Err(err) => Err(err.into()),
        };
        match result {
            Ok(response) => TickOutcome::Completed(response),
            Err(err) => {
                log::debug!("live tick failed: {}", err);
                TickOutcome::Failed(err)
            }
        }
    }
}

enum LiveState<H, K> {
    Idle,
    /// Waiting for the camera to open and report its first frame metadata.
    Starting,
    Active { camera: Rc<H>, ticker: K },
}

/// Idle -> Starting -> Active -> Idle. `K` is whatever keeps the tick timer
/// alive; dropping it cancels the timer. Leaving `Active` by any route
/// releases the camera.
pub struct LiveLoop<H: CameraHandle, K> {
    state: LiveState<H, K>,
}

impl<H: CameraHandle, K> Default for LiveLoop<H, K> {
    fn default() -> Self {
        Self {
            state: LiveState::Idle,
        }
    }
}

impl<H: CameraHandle, K> LiveLoop<H, K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, LiveState::Idle)
    }

    pub fn is_starting(&self) -> bool {
        matches!(self.state, LiveState::Starting)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, LiveState::Active { .. })
    }

    /// Marks the camera as being acquired. Returns false unless idle.
    pub fn begin(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = LiveState::Starting;
        true
    }

    /// Installs an opened camera and its ticker. If the loop was stopped while
    /// the camera was opening, the camera is released at once and false returned.
    pub fn activate(&mut self, camera: H, ticker: K) -> bool {
        if !self.is_starting() {
            log::info!("camera arrived after live detection was cancelled, releasing");
            camera.release();
            return false;
        }
        self.state = LiveState::Active {
            camera: Rc::new(camera),
            ticker,
        };
        true
    }

    /// Abandons a start that failed before the camera opened.
    pub fn abort_start(&mut self) {
        if self.is_starting() {
            self.state = LiveState::Idle;
        }
    }

    pub fn camera(&self) -> Option<Rc<H>> {
        match &self.state {
            LiveState::Active { camera, .. } => Some(camera.clone()),
            _ => None,
        }
    }

    /// Returns to idle, cancelling the ticker and stopping every camera track.
    /// Returns true if the loop was doing anything.
    pub fn stop(&mut self) -> bool {
        match std::mem::replace(&mut self.state, LiveState::Idle) {
            LiveState::Idle => false,
            LiveState::Starting => true,
            LiveState::Active { camera, ticker } => {
                drop(ticker);
                camera.release();
                log::info!("live detection stopped");
                true
            }
        }
    }
}

impl<H: CameraHandle, K> Drop for LiveLoop<H, K> {
    fn drop(&mut self) {
        self.stop();
    }
}
