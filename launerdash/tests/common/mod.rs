//! In-process mock of the monitoring backend, served by axum on an ephemeral port.
#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use url::Url;

pub const USER: &str = "admin";
pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "tok-1";

#[derive(Clone, Default)]
pub struct Hits {
    pub login: Arc<AtomicUsize>,
    pub protected: Arc<AtomicUsize>,
}

impl Hits {
    pub fn login(&self) -> usize {
        self.login.load(Ordering::SeqCst)
    }

    pub fn protected(&self) -> usize {
        self.protected.load(Ordering::SeqCst)
    }
}

pub struct MockBackend {
    pub base: Url,
    pub hits: Hits,
}

pub async fn spawn_backend() -> MockBackend {
    let hits = Hits::default();
    let app = Router::new()
        .route("/api/login", post(login))
        .route("/api/current-usages", get(current_usages))
        .route("/api/cpu-usage", get(cpu_usage))
        .route("/api/memory-usage", get(memory_usage))
        .route("/api/last-60-minutes", get(last_hour))
        .route("/api/last-60-minutes-services", get(last_hour_services))
        .route("/api/boom", get(boom))
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve mock backend");
    });
    let base = Url::parse(&format!("http://{addr}/api")).expect("mock url");
    MockBackend { base, hits }
}

async fn login(State(hits): State<Hits>, Json(body): Json<Value>) -> Response {
    hits.login.fetch_add(1, Ordering::SeqCst);
    if body["username"] == USER && body["password"] == PASSWORD {
        Json(json!({ "access_token": TOKEN, "token_type": "bearer" })).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Incorrect username or password" })),
        )
            .into_response()
    }
}

// Counts every protected hit, authorized or not.
fn authorized(hits: &Hits, headers: &HeaderMap) -> bool {
    hits.protected.fetch_add(1, Ordering::SeqCst);
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn protected(hits: &Hits, headers: &HeaderMap, payload: Value) -> Response {
    if authorized(hits, headers) {
        Json(payload).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Could not validate credentials" })),
        )
            .into_response()
    }
}

async fn current_usages(State(hits): State<Hits>, headers: HeaderMap) -> Response {
    protected(
        &hits,
        &headers,
        json!({
            "cpu_values": {
                "total_usage": 42.5,
                "top_processes": [
                    { "name": "java", "cpu_percent": 20.0, "memory_percent": 5.0 },
                    { "name": "nginx", "cpu_percent": 2.5, "memory_percent": 1.0 }
                ],
                "last_hourly_avg": 30.0,
                "last_daily_avg": null,
                "last_weekly_avg": { "id": 3, "tipo": "weekly", "uso": 25.0 }
            },
            "mem_values": {
                "total_usage": 61.0,
                "top_processes": [
                    { "name": "java", "cpu_percent": 20.0, "memory_percent": 35.0 }
                ],
                "last_hourly_avg": null,
                "last_daily_avg": null,
                "last_weekly_avg": null
            }
        }),
    )
}

async fn cpu_usage(State(hits): State<Hits>, headers: HeaderMap) -> Response {
    protected(
        &hits,
        &headers,
        json!({
            "total_cpu_usage": 37.0,
            "top_processes": [
                { "pid": 101, "name": "java", "cpu_percent": 21.0 },
                { "name": "Other Processes", "cpu_percent": 16.0 }
            ],
            "last_hourly": 33.0,
            "last_daily": null,
            "last_weekly": null
        }),
    )
}

async fn memory_usage(State(hits): State<Hits>, headers: HeaderMap) -> Response {
    protected(
        &hits,
        &headers,
        json!({
            "total_memory_usage": 58.0,
            "top_processes": [
                { "pid": 101, "name": "java", "memory_percent": 30.0 }
            ]
        }),
    )
}

async fn last_hour(State(hits): State<Hits>, headers: HeaderMap) -> Response {
    protected(
        &hits,
        &headers,
        json!({
            "total_data": [
                ["10:00", { "cpu": 30.0, "memory": 55.0 }],
                { "time": "10:01", "cpu": 35.0, "memory": 56.0 }
            ],
            "cpu_data": [
                ["10:00", { "java": 20.0, "nginx": 3.0 }],
                ["10:01", { "java": 22.0 }]
            ],
            "memory_data": [
                ["10:00", { "java": 30.0 }]
            ]
        }),
    )
}

async fn last_hour_services(State(hits): State<Hits>, headers: HeaderMap) -> Response {
    protected(
        &hits,
        &headers,
        json!({
            "cpu": [["10:00", { "appserver": 12.0 }]],
            "memory": [["10:00", { "appserver": 18.0 }]]
        }),
    )
}

async fn boom(State(hits): State<Hits>, headers: HeaderMap) -> Response {
    if !authorized(&hits, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    (StatusCode::INTERNAL_SERVER_ERROR, "kaboom").into_response()
}
