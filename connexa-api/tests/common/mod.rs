//! A stand-in Connexa backend on a random local port.
//!
//! Every request is recorded; the responder decides the status and body.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use serde_json::Value;

#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

type Responder = dyn Fn(&Recorded) -> (StatusCode, String) + Send + Sync;

struct Shared {
    requests: Mutex<Vec<Recorded>>,
    respond: Box<Responder>,
}

pub struct FakeServer {
    pub base: String,
    shared: Arc<Shared>,
}

impl FakeServer {
    pub async fn start(
        respond: impl Fn(&Recorded) -> (StatusCode, String) + Send + Sync + 'static,
    ) -> Self {
        let shared = Arc::new(Shared {
            requests: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        });
        let app = Router::new().fallback(handle).with_state(shared.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake backend");
        });
        Self {
            base: format!("http://{addr}"),
            shared,
        }
    }

    /// Answers every request with the same JSON value and status.
    pub async fn always(status: StatusCode, body: Value) -> Self {
        let body = body.to_string();
        Self::start(move |_| (status, body.clone())).await
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.shared.requests.lock().expect("requests").clone()
    }

    pub fn only_request(&self) -> Recorded {
        let mut requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request, got {requests:?}");
        requests.remove(0)
    }
}

async fn handle(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let recorded = Recorded {
        method,
        path: uri.path().to_string(),
        query,
        headers,
        body: serde_json::from_slice(&body).ok(),
    };
    let (status, text) = (shared.respond)(&recorded);
    shared.requests.lock().expect("requests").push(recorded);
    (status, [(header::CONTENT_TYPE, "application/json")], text)
}

pub fn application_json(id: &str, status: &str) -> Value {
    serde_json::json!({
        "id": id,
        "name": format!("Candidato {id}"),
        "email": format!("{id}@example.com"),
        "company": null,
        "motivation": "Quero participar do networking",
        "status": status,
        "createdAt": "2024-01-01T00:00:00.000Z"
    })
}

pub fn referral_json(id: &str, from: &str, to: &str) -> Value {
    serde_json::json!({
        "id": id,
        "fromMemberId": from,
        "toMemberId": to,
        "companyOrContact": "Empresa ABC",
        "description": "Indicação de cliente",
        "status": "NEW",
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z"
    })
}

pub fn meta_json(page: u32, limit: u32, total: u32, total_pages: u32) -> Value {
    serde_json::json!({ "page": page, "limit": limit, "total": total, "totalPages": total_pages })
}
