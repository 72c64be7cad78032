mod common;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use common::*;
use futures::executor::{LocalPool, block_on};
use futures::task::LocalSpawnExt;
use serde_json::json;
use shared::{
    ClientError, DetectionParams, DetectionResponse, ImageSource, InputMode, MediaKind,
    RawResponse, TickOutcome, UserInputError, ValidationError,
};

fn image_body() -> String {
    json!({ "data": [{ "image": "QUJD" }, "2 bottles", "recyclable: 2"] }).to_string()
}

#[test]
fn image_submission_sends_expected_form() {
    let transport = FakeTransport::new();
    transport.ok(&image_body());
    let orch = orchestrator(&transport, NeverTimer);

    let response = block_on(orch.submit(InputMode::Image, Some(jpeg()), &DetectionParams::default()))
        .unwrap();

    let DetectionResponse::Image(result) = response else {
        panic!("expected an image result");
    };
    assert_eq!(result.image, Some(ImageSource::Embedded("QUJD".into())));
    assert_eq!(result.detection_text.as_deref(), Some("2 bottles"));

    let calls = transport.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].url, "http://127.0.0.1:7860/predict");
    assert_eq!(
        calls[0].fields,
        vec!["image", "model_id", "image_size", "conf_threshold", "input_type"]
    );
    assert!(!orch.is_busy());
}

#[test]
fn video_submission_uses_video_field() {
    let transport = FakeTransport::new();
    transport.ok(&json!({ "data": [null, "/video/out.mp4", "a", "b"] }).to_string());
    let orch = orchestrator(&transport, NeverTimer);

    let response =
        block_on(orch.submit(InputMode::Video, Some(mp4()), &DetectionParams::default())).unwrap();

    assert!(matches!(response, DetectionResponse::Video(_)));
    assert_eq!(transport.calls.borrow()[0].fields[0], "video");
}

#[test]
fn guard_is_released_on_every_exit_path() {
    let cases: Vec<(Reply, fn(&ClientError) -> bool)> = vec![
        (
            Ok(RawResponse::new(500, "boom")),
            |e| matches!(e, ClientError::Http { status: 500, body } if body == "boom"),
        ),
        (
            Ok(RawResponse::new(200, "{\"result\": 1}")),
            |e| matches!(e, ClientError::Validation(ValidationError::MissingData)),
        ),
        (
            Ok(RawResponse::new(200, "{\"error\": \"no model\"}")),
            |e| matches!(e, ClientError::Validation(ValidationError::Rejected(m)) if m == "no model"),
        ),
        (
            Ok(RawResponse::new(200, "not json")),
            |e| matches!(e, ClientError::Validation(ValidationError::InvalidJson(_))),
        ),
        (
            Err(ClientError::Network("connection refused".into())),
            |e| matches!(e, ClientError::Network(_)),
        ),
    ];

    for (reply, expected) in cases {
        let transport = FakeTransport::new();
        transport.reply(reply);
        let orch = orchestrator(&transport, NeverTimer);

        let err = block_on(orch.submit(InputMode::Image, Some(jpeg()), &DetectionParams::default()))
            .unwrap_err();

        assert!(expected(&err), "unexpected error: {:?}", err);
        assert!(!orch.is_busy());
    }
}

#[test]
fn slow_file_submission_times_out_and_aborts() {
    let transport = FakeTransport::new();
    transport.never();
    let orch = orchestrator(&transport, InstantTimer);

    let err = block_on(orch.submit(InputMode::Video, Some(mp4()), &DetectionParams::default()))
        .unwrap_err();

    assert_eq!(err, ClientError::Timeout(Duration::from_secs(300)));
    assert!(err.is_timeout());
    assert_eq!(transport.cancelled.get(), 1);
    assert!(!orch.is_busy());
}

#[test]
fn webcam_submission_has_no_timeout() {
    let transport = FakeTransport::new();
    let gate = transport.gated();
    let orch = Rc::new(orchestrator(&transport, InstantTimer));
    let outcome = Rc::new(RefCell::new(None));

    let mut pool = LocalPool::new();
    {
        let orch = orch.clone();
        let outcome = outcome.clone();
        pool.spawner()
            .spawn_local(async move {
                let result = orch
                    .submit(InputMode::Webcam, Some(jpeg()), &DetectionParams::default())
                    .await;
                *outcome.borrow_mut() = Some(result);
            })
            .unwrap();
    }
    pool.run_until_stalled();
    assert!(orch.is_busy());
    assert!(outcome.borrow().is_none());

    gate.send(Ok(RawResponse::new(200, image_body()))).unwrap();
    pool.run_until_stalled();

    assert!(matches!(
        outcome.borrow().as_ref(),
        Some(Ok(DetectionResponse::Image(_)))
    ));
    assert!(!orch.is_busy());
}

#[test]
fn second_submission_is_rejected_while_in_flight() {
    let transport = FakeTransport::new();
    let gate = transport.gated();
    let orch = Rc::new(orchestrator(&transport, NeverTimer));
    let first = Rc::new(RefCell::new(None));

    let mut pool = LocalPool::new();
    {
        let orch = orch.clone();
        let first = first.clone();
        pool.spawner()
            .spawn_local(async move {
                let result = orch
                    .submit(InputMode::Image, Some(jpeg()), &DetectionParams::default())
                    .await;
                *first.borrow_mut() = Some(result);
            })
            .unwrap();
    }
    pool.run_until_stalled();
    assert!(orch.is_busy());

    let second =
        pool.run_until(orch.submit(InputMode::Image, Some(jpeg()), &DetectionParams::default()));
    assert_eq!(second, Err(ClientError::UserInput(UserInputError::Busy)));

    let camera = FakeCamera::open();
    let tick = pool.run_until(orch.poll_tick(&camera, &DetectionParams::default()));
    assert_eq!(tick, TickOutcome::Skipped);
    assert_eq!(camera.captures.get(), 0);

    assert_eq!(transport.call_count(), 1);

    gate.send(Ok(RawResponse::new(200, image_body()))).unwrap();
    pool.run_until_stalled();
    assert!(matches!(first.borrow().as_ref(), Some(Ok(_))));
    assert!(!orch.is_busy());
}

#[test]
fn missing_media_is_rejected_before_dispatch() {
    let transport = FakeTransport::new();
    let orch = orchestrator(&transport, NeverTimer);

    let err = block_on(orch.submit(InputMode::Image, None, &DetectionParams::default())).unwrap_err();

    assert_eq!(err, ClientError::UserInput(UserInputError::NoFileSelected));
    assert_eq!(transport.call_count(), 0);
    assert!(!orch.is_busy());
}

#[test]
fn invalid_parameters_are_rejected_before_dispatch() {
    let transport = FakeTransport::new();
    let orch = orchestrator(&transport, NeverTimer);
    let params = DetectionParams {
        conf_threshold: -0.1,
        ..Default::default()
    };

    let err = block_on(orch.submit(InputMode::Image, Some(jpeg()), &params)).unwrap_err();

    assert!(matches!(
        err,
        ClientError::UserInput(UserInputError::InvalidParameter(_))
    ));
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn short_video_result_is_malformed() {
    let transport = FakeTransport::new();
    transport.ok(&json!({ "data": [null, "/video/out.mp4"] }).to_string());
    let orch = orchestrator(&transport, NeverTimer);

    let err =
        block_on(orch.submit(InputMode::Video, Some(mp4()), &DetectionParams::default())).unwrap_err();

    assert_eq!(
        err,
        ClientError::Validation(ValidationError::TooFewElements {
            kind: MediaKind::Video,
            expected: 4,
            found: 2,
        })
    );
}

#[test]
fn health_probe() {
    let transport = FakeTransport::new();
    transport
        .ok("{\"status\": \"ok\"}")
        .reply(Ok(RawResponse::new(503, "loading")))
        .reply(Err(ClientError::Network("refused".into())));
    let orch = orchestrator(&transport, NeverTimer);

    assert_eq!(block_on(orch.check_health()), Ok(()));
    assert_eq!(
        block_on(orch.check_health()),
        Err(ClientError::Http {
            status: 503,
            body: "loading".into()
        })
    );
    assert!(matches!(
        block_on(orch.check_health()),
        Err(ClientError::Network(_))
    ));
    assert_eq!(transport.calls.borrow()[0].url, "http://127.0.0.1:7860/health");
}
