//! Request lifecycle tests over an in-process transport.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use arts_api::{
    Client, Envelope, Error, ErrorKind, Failure, Form, Method, Request, RequestOptions, Response,
    TOKEN_MISSING, TransportError,
};
use assert2::{check, let_assert};
use bytes::Bytes;
use serde_json::{Value, json};
use tokio::sync::{Notify, mpsc};

/// Transport answering every call with a fixed response and recording what it saw.
#[derive(Clone)]
struct Recorder {
    requests: Arc<Mutex<Vec<Request<Bytes>>>>,
}

impl Recorder {
    fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn client(&self, status: u16, body: impl Into<Bytes>) -> Client {
        let requests = Arc::clone(&self.requests);
        let body = body.into();
        let service = tower::service_fn(move |request: Request<Bytes>| {
            requests.lock().expect("lock").push(request);
            let body = body.clone();
            async move {
                Ok::<_, TransportError>(Response::new(
                    status,
                    HashMap::from([("content-type".to_string(), "application/json".to_string())]),
                    body,
                ))
            }
        });

        Client::builder()
            .base_url("https://api.example.com/arts/")
            .transport(service)
            .build()
    }

    fn count(&self) -> usize {
        self.requests.lock().expect("lock").len()
    }

    fn request(&self, index: usize) -> Request<Bytes> {
        self.requests.lock().expect("lock")[index].clone()
    }
}

const OK_NULL: &str = r#"{"code":0,"msg":"ok","data":null}"#;

async fn get_json(client: &Client, path: &str, options: RequestOptions) -> arts_api::Result<Envelope<Value>> {
    client.engine().request_json(Method::Get, path, options).await
}

// ============================================================================
// Classification
// ============================================================================

#[tokio::test]
async fn success_envelope_resolves_to_envelope() {
    let recorder = Recorder::new();
    let client = recorder.client(200, r#"{"code":0,"msg":"ok","data":{"x":1}}"#);

    let envelope = get_json(&client, "/arts/health", RequestOptions::new())
        .await
        .expect("success");

    check!(envelope.code == 0);
    check!(envelope.msg == "ok");
    check!(envelope.data == json!({"x": 1}));
}

#[tokio::test]
async fn success_data_round_trips() {
    let data = json!({"list": [{"id": "w-1", "price": "12.50"}], "total": 1, "nested": {"a": [1, 2]}});
    let body = json!({"code": 0, "msg": "ok", "data": data}).to_string();
    let recorder = Recorder::new();
    let client = recorder.client(200, body);

    let envelope = get_json(&client, "/arts/work/list", RequestOptions::new())
        .await
        .expect("success");

    check!(serde_json::to_value(&envelope.data).expect("encode") == data);
}

#[tokio::test]
async fn float_codes_classify_like_integers() {
    let recorder = Recorder::new();
    let client = recorder.client(200, r#"{"code":0.0,"msg":"ok","data":1}"#);
    let envelope = get_json(&client, "/arts/health", RequestOptions::new())
        .await
        .expect("success");
    check!(envelope.data == json!(1));

    let client = recorder.client(200, r#"{"code":40001.0,"msg":"insufficient balance"}"#);
    let err = get_json(&client, "/arts/node/purchase", RequestOptions::new())
        .await
        .expect_err("business");
    check!(err.is_business());
    check!(err.code() == Some(40001));
}

#[tokio::test]
async fn non_zero_code_is_business_error() {
    let recorder = Recorder::new();
    let client = recorder.client(200, r#"{"code":40001,"msg":"insufficient balance","data":null}"#);

    let err = get_json(&client, "/arts/node/purchase", RequestOptions::new())
        .await
        .expect_err("business");

    let_assert!(Error::Business { code, message, .. } = &err);
    check!(*code == 40001);
    check!(message == "insufficient balance");
    insta::assert_snapshot!(err.to_string(), @"insufficient balance (code 40001)");
}

#[tokio::test]
async fn non_json_body_is_parse_error() {
    let recorder = Recorder::new();
    let client = recorder.client(200, "not json");

    let err = get_json(&client, "/arts/health", RequestOptions::new())
        .await
        .expect_err("parse");

    check!(err.kind() == ErrorKind::Parse);
    check!(err.data() == Some(&json!("not json")));
}

#[tokio::test]
async fn json_that_is_not_an_envelope_is_parse_error() {
    let recorder = Recorder::new();
    let client = recorder.client(200, r#"[{"code":0}]"#);

    let err = get_json(&client, "/arts/health", RequestOptions::new())
        .await
        .expect_err("parse");

    check!(err.is_parse());
    check!(err.message().contains("not a valid envelope"));
}

#[tokio::test]
async fn typed_data_mismatch_is_parse_error() {
    let recorder = Recorder::new();
    let client = recorder.client(200, r#"{"code":0,"msg":"ok","data":{"total":"many"}}"#);

    let err = client
        .engine()
        .request_json::<arts_api::modules::Page<u32>>(
            Method::Get,
            "/arts/node/list",
            RequestOptions::new(),
        )
        .await
        .expect_err("parse");

    check!(err.is_parse());
    check!(err.message().contains("total"));
}

#[tokio::test]
async fn error_status_with_envelope_is_http_error_with_envelope_fields() {
    let recorder = Recorder::new();
    let client = recorder.client(500, r#"{"code":500,"msg":"server error"}"#);

    let err = get_json(&client, "/arts/health", RequestOptions::new())
        .await
        .expect_err("http");

    let_assert!(Error::Http { status, code, message, .. } = &err);
    check!(*status == 500);
    check!(*code == 500);
    check!(message == "server error");
}

#[tokio::test]
async fn error_status_without_envelope_uses_status_text() {
    let recorder = Recorder::new();
    let client = recorder.client(404, "<html>nope</html>");

    let err = get_json(&client, "/arts/missing", RequestOptions::new())
        .await
        .expect_err("http");

    check!(err.status() == Some(404));
    check!(err.code() == Some(404));
    check!(err.message() == "Not Found");
    check!(err.data() == Some(&json!("<html>nope</html>")));
    insta::assert_snapshot!(
        err.to_string(),
        @"HTTP error 404 (code 404): Not Found (GET https://api.example.com/arts/missing)"
    );
}

// ============================================================================
// Authorizing
// ============================================================================

#[tokio::test]
async fn required_auth_without_token_makes_no_transport_call() {
    let recorder = Recorder::new();
    let client = recorder.client(200, OK_NULL);

    let err = get_json(&client, "/arts/user/info", RequestOptions::new().required())
        .await
        .expect_err("client");

    check!(err.kind() == ErrorKind::Client);
    check!(err.message() == TOKEN_MISSING);
    check!(err.url() == "https://api.example.com/arts/user/info");
    check!(recorder.count() == 0);
}

#[tokio::test]
async fn auth_modes_control_the_token_header() {
    let recorder = Recorder::new();
    let client = recorder.client(200, OK_NULL);
    client.set_token("t0k3n");

    get_json(&client, "/arts/a", RequestOptions::new().required()).await.expect("required");
    get_json(&client, "/arts/b", RequestOptions::new()).await.expect("optional");
    get_json(&client, "/arts/c", RequestOptions::new().no_auth()).await.expect("none");

    check!(recorder.request(0).header("Authorization") == Some("Bearer t0k3n"));
    check!(recorder.request(1).header("Authorization") == Some("Bearer t0k3n"));
    check!(recorder.request(2).header("Authorization").is_none());
}

#[tokio::test]
async fn optional_auth_without_token_sends_no_header() {
    let recorder = Recorder::new();
    let client = recorder.client(200, OK_NULL);

    get_json(&client, "/arts/work/list", RequestOptions::new()).await.expect("optional");

    check!(recorder.request(0).header("authorization").is_none());
}

#[tokio::test]
async fn language_override_beats_default() {
    let recorder = Recorder::new();
    let client = recorder.client(200, OK_NULL);
    client.set_language("zh-CN");

    get_json(&client, "/arts/a", RequestOptions::new()).await.expect("default");
    get_json(&client, "/arts/b", RequestOptions::new().language("en")).await.expect("override");
    client.clear_language();
    get_json(&client, "/arts/c", RequestOptions::new()).await.expect("none");

    check!(recorder.request(0).header("accept-language") == Some("zh-CN"));
    check!(recorder.request(1).header("accept-language") == Some("en"));
    check!(recorder.request(2).header("accept-language").is_none());
}

#[tokio::test]
async fn computed_headers_override_caller_headers() {
    let recorder = Recorder::new();
    let client = recorder.client(200, OK_NULL);
    client.set_token("real");

    let options = RequestOptions::new()
        .header("Authorization", "Bearer forged")
        .header("X-Device", "ios")
        .json(&json!({"a": 1}));
    client
        .engine()
        .request_json::<Value>(Method::Post, "/arts/user/invite", options)
        .await
        .expect("success");

    let request = recorder.request(0);
    check!(request.header("authorization") == Some("Bearer real"));
    check!(request.header("x-device") == Some("ios"));
    check!(request.header("content-type") == Some("application/json"));
    check!(request.body().map(|body| &body[..]) == Some(br#"{"a":1}"#.as_slice()));
}

#[tokio::test]
async fn multipart_sets_boundary_content_type() {
    let recorder = Recorder::new();
    let client = recorder.client(200, OK_NULL);

    let form = Form::with_boundary("XyZ").text("usage", "avatar");
    client
        .engine()
        .request_json::<Value>(Method::Post, "/arts/file/upload", RequestOptions::new().multipart(form))
        .await
        .expect("success");

    let request = recorder.request(0);
    check!(request.header("content-type") == Some("multipart/form-data; boundary=XyZ"));
    let_assert!(Some(body) = request.body());
    check!(String::from_utf8_lossy(body).contains("name=\"usage\""));
}

#[tokio::test]
async fn body_and_form_together_is_client_error_before_io() {
    let recorder = Recorder::new();
    let client = recorder.client(200, OK_NULL);

    let options = RequestOptions::new()
        .json(&json!({"a": 1}))
        .multipart(Form::new().text("b", "2"));
    let err = get_json(&client, "/arts/file/upload", options)
        .await
        .expect_err("client");

    check!(err.is_client());
    check!(recorder.count() == 0);
}

// ============================================================================
// Shared configuration
// ============================================================================

#[tokio::test]
async fn token_rotation_applies_to_later_calls_only() {
    let requests = Arc::new(Mutex::new(Vec::<Request<Bytes>>::new()));
    let gate = Arc::new(Notify::new());
    let (arrived_tx, mut arrived_rx) = mpsc::unbounded_channel::<()>();

    let service = {
        let requests = Arc::clone(&requests);
        let gate = Arc::clone(&gate);
        tower::service_fn(move |request: Request<Bytes>| {
            let slow = request.url().ends_with("/slow");
            requests.lock().expect("lock").push(request);
            let gate = Arc::clone(&gate);
            let arrived = arrived_tx.clone();
            async move {
                if slow {
                    let _ = arrived.send(());
                    gate.notified().await;
                }
                Ok::<_, TransportError>(Response::new(
                    200,
                    HashMap::new(),
                    Bytes::from_static(OK_NULL.as_bytes()),
                ))
            }
        })
    };
    let client = Client::builder()
        .base_url("https://api.example.com")
        .token("old")
        .transport(service)
        .build();

    let in_flight = tokio::spawn({
        let client = client.clone();
        async move { get_json(&client, "/arts/slow", RequestOptions::new().required()).await }
    });
    arrived_rx.recv().await.expect("first call reached the transport");

    client.set_token("new");
    get_json(&client, "/arts/fast", RequestOptions::new().required())
        .await
        .expect("second call");

    gate.notify_one();
    in_flight.await.expect("join").expect("first call");

    let requests = requests.lock().expect("lock");
    check!(requests[0].header("authorization") == Some("Bearer old"));
    check!(requests[1].header("authorization") == Some("Bearer new"));
}

#[tokio::test]
async fn base_url_is_deduplicated_and_rotatable() {
    let recorder = Recorder::new();
    let client = recorder.client(200, OK_NULL);

    get_json(&client, "/arts/work/list", RequestOptions::new().query(&json!({"page": 1, "tag": null})))
        .await
        .expect("success");
    client.set_base_url("https://staging.example.com/");
    get_json(&client, "work/list", RequestOptions::new().query(&json!({"tags": ["a", "b"]})))
        .await
        .expect("success");

    check!(recorder.request(0).url() == "https://api.example.com/arts/work/list?page=1");
    check!(recorder.request(1).url() == "https://staging.example.com/work/list?tags=a&tags=b");
}

#[tokio::test(start_paused = true)]
async fn timeout_is_a_network_error() {
    let service = tower::service_fn(|_request: Request<Bytes>| async {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok::<_, TransportError>(Response::new(200, HashMap::new(), Bytes::new()))
    });
    let client = Client::builder()
        .base_url("https://api.example.com")
        .timeout(Duration::from_millis(50))
        .transport(service)
        .build();

    let err = get_json(&client, "/arts/health", RequestOptions::new())
        .await
        .expect_err("timeout");

    check!(err.is_network());
    check!(err.is_timeout());
    insta::assert_snapshot!(err.message(), @"request timed out after 50ms");
}

#[tokio::test]
async fn transport_failure_is_a_network_error() {
    let service = tower::service_fn(|_request: Request<Bytes>| async {
        Err::<Response<Bytes>, _>(TransportError::connection("connection refused"))
    });
    let client = Client::builder()
        .base_url("https://api.example.com")
        .transport(service)
        .build();

    let err = get_json(&client, "/arts/health", RequestOptions::new())
        .await
        .expect_err("network");

    check!(err.is_network());
    check!(!err.is_timeout());
    check!(err.method() == Method::Get);
}

// ============================================================================
// Error formatter
// ============================================================================

#[tokio::test]
async fn custom_formatter_remaps_errors() {
    let requests = Arc::new(Mutex::new(0_usize));
    let counter = Arc::clone(&requests);
    let service = tower::service_fn(move |_request: Request<Bytes>| {
        *counter.lock().expect("lock") += 1;
        async {
            Ok::<_, TransportError>(Response::new(
                200,
                HashMap::new(),
                Bytes::from_static(br#"{"code":10002,"msg":"nonce expired","data":null}"#),
            ))
        }
    });

    let client = Client::builder()
        .base_url("https://api.example.com")
        .transport(service)
        .error_formatter(|mut failure: Failure| {
            if failure.code == Some(10002) {
                failure.message = "请重新签名".to_string();
            }
            Error::from(failure)
        })
        .build();

    let err = get_json(&client, "/arts/user/login", RequestOptions::new())
        .await
        .expect_err("business");

    check!(err.is_business());
    check!(err.message() == "请重新签名");
    check!(*requests.lock().expect("lock") == 1);
}
