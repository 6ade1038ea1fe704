//! Stub registrar and proxy servers on ephemeral ports

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;

use domainmap::registrar::RegistrarClient;
use domainmap::server::{router, AppState};

pub const AUTH: &str = "Basic dGVzdDp0ZXN0";

/// A request the stub registrar received
#[derive(Clone, Debug)]
pub struct Seen {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

/// Registrar stand-in that answers every request with one canned response
#[derive(Clone)]
pub struct StubRegistrar {
    status: StatusCode,
    body: &'static str,
    pub seen: Arc<Mutex<Vec<Seen>>>,
}

impl StubRegistrar {
    pub fn new(status: u16, body: &'static str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            body,
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

async fn stub_handler(
    State(stub): State<StubRegistrar>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    stub.seen.lock().unwrap().push(Seen {
        method,
        path: uri.path().to_string(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: String::from_utf8_lossy(&body).into_owned(),
    });
    (stub.status, [(CONTENT_TYPE, "application/json")], stub.body).into_response()
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{address}")
}

/// Start the stub registrar, returning its base URL
pub async fn spawn_registrar(stub: StubRegistrar) -> String {
    serve(Router::new().fallback(stub_handler).with_state(stub)).await
}

/// Start the proxy pointed at `registrar_url`, returning its base URL
pub async fn spawn_proxy(registrar_url: &str) -> String {
    let state = AppState::new(RegistrarClient::new(registrar_url, AUTH));
    serve(router(state)).await
}

/// Blocking HTTP call from a worker thread; returns (status, body)
pub async fn call(method: &str, url: String, body: Option<&'static str>) -> (u16, String) {
    let method = method.to_string();
    tokio::task::spawn_blocking(move || {
        let request = ureq::request(&method, &url).set("Content-Type", "application/json");
        let result = match body {
            Some(body) => request.send_string(body),
            None => request.call(),
        };
        match result {
            Ok(response) | Err(ureq::Error::Status(_, response)) => {
                (response.status(), response.into_string().unwrap())
            }
            Err(e) => panic!("request to {url} failed: {e}"),
        }
    })
    .await
    .unwrap()
}
