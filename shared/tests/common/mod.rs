#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use futures::channel::oneshot;
use shared::{
    ApiConfig, CameraHandle, ClientError, FormPart, FrameSource, MediaPayload, Orchestrator,
    RawResponse, Timer, Transport,
};

pub type Reply = Result<RawResponse, ClientError>;

pub enum Scripted {
    Now(Reply),
    Gated(oneshot::Receiver<Reply>),
    Never,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub url: String,
    pub fields: Vec<&'static str>,
}

/// Replays scripted replies and records every request it sees.
#[derive(Clone, Default)]
pub struct FakeTransport {
    script: Rc<RefCell<VecDeque<Scripted>>>,
    pub calls: Rc<RefCell<Vec<Call>>>,
    pub cancelled: Rc<Cell<usize>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, reply: Reply) -> &Self {
        self.script.borrow_mut().push_back(Scripted::Now(reply));
        self
    }

    pub fn ok(&self, body: &str) -> &Self {
        self.reply(Ok(RawResponse::new(200, body)))
    }

    pub fn gated(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.script.borrow_mut().push_back(Scripted::Gated(rx));
        tx
    }

    pub fn never(&self) -> &Self {
        self.script.borrow_mut().push_back(Scripted::Never);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    async fn play(&self, url: &str, fields: Vec<&'static str>) -> Reply {
        self.calls.borrow_mut().push(Call {
            url: url.to_string(),
            fields,
        });
        let next = self.script.borrow_mut().pop_front();
        let mut probe = CancelProbe {
            counter: self.cancelled.clone(),
            armed: true,
        };
        let reply = match next {
            Some(Scripted::Now(reply)) => reply,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ClientError::Network("gate dropped".into()))),
            Some(Scripted::Never) => futures::future::pending::<Reply>().await,
            None => Err(ClientError::Network("no scripted reply".into())),
        };
        probe.armed = false;
        reply
    }
}

struct CancelProbe {
    counter: Rc<Cell<usize>>,
    armed: bool,
}

impl Drop for CancelProbe {
    fn drop(&mut self) {
        if self.armed {
            self.counter.set(self.counter.get() + 1);
        }
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn post_form(&self, url: &str, parts: Vec<FormPart>) -> Reply {
        let fields = parts.iter().map(FormPart::name).collect();
        self.play(url, fields).await
    }

    async fn get(&self, url: &str) -> Reply {
        self.play(url, Vec::new()).await
    }
}

/// Fires immediately: any timed request loses the race unless already resolved.
pub struct InstantTimer;

#[async_trait(?Send)]
impl Timer for InstantTimer {
    async fn sleep(&self, _duration: Duration) {}
}

pub struct NeverTimer;

#[async_trait(?Send)]
impl Timer for NeverTimer {
    async fn sleep(&self, _duration: Duration) {
        futures::future::pending::<()>().await
    }
}

pub fn orchestrator<C: Timer>(transport: &FakeTransport, timer: C) -> Orchestrator<FakeTransport, C> {
    Orchestrator::new(
        ApiConfig::new("http://127.0.0.1:7860"),
        transport.clone(),
        timer,
    )
}

pub fn jpeg() -> MediaPayload {
    MediaPayload::new(vec![0xff, 0xd8, 0xff, 0xe0], "image/jpeg", "bottle.jpg")
}

pub fn mp4() -> MediaPayload {
    MediaPayload::new(vec![0u8; 32], "video/mp4", "street.mp4")
}

/// A camera with one video track that hands out a frame until released.
pub struct FakeCamera {
    pub tracks: Rc<Cell<usize>>,
    pub captures: Cell<usize>,
}

impl FakeCamera {
    pub fn open() -> Self {
        Self {
            tracks: Rc::new(Cell::new(1)),
            captures: Cell::new(0),
        }
    }
}

impl CameraHandle for FakeCamera {
    fn active_tracks(&self) -> usize {
        self.tracks.get()
    }

    fn release(&self) {
        self.tracks.set(0);
    }
}

#[async_trait(?Send)]
impl FrameSource for FakeCamera {
    async fn capture_frame(&self) -> Option<MediaPayload> {
        self.captures.set(self.captures.get() + 1);
        if self.tracks.get() == 0 {
            return None;
        }
        Some(MediaPayload::new(vec![0xff, 0xd8], "image/jpeg", "webcam.jpg"))
    }
}

/// Stands in for an interval handle; counts how often it was dropped.
pub struct TickerProbe(pub Rc<Cell<usize>>);

impl Drop for TickerProbe {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}
