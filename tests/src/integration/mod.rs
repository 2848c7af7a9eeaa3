//! Integration flows.
//!
//! Every flow runs the real dispatcher behind the real router, with the
//! in-memory store standing in for the content API.

pub mod client_sync;
pub mod http_flows;
pub mod properties;

#[cfg(test)]
pub(crate) mod support {
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use lg_01_document_store::{DocumentStore, InMemoryDocumentStore};
    use lg_03_dispatcher::{ActionDispatcher, DispatcherConfig};
    use lg_04_api_gateway::{build_router, GatewayConfig, GatewayMetrics, ACTION_PATH};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    pub const SECRET: &str = "match-day";

    pub fn dispatcher(store: &Arc<InMemoryDocumentStore>) -> ActionDispatcher {
        ActionDispatcher::new(
            Some(Arc::clone(store) as Arc<dyn DocumentStore>),
            Some(SECRET.to_string()),
            DispatcherConfig::default(),
        )
    }

    /// Router plus the store behind it.
    pub struct League {
        pub router: Router,
        pub store: Arc<InMemoryDocumentStore>,
        pub metrics: Arc<GatewayMetrics>,
    }

    impl League {
        pub fn new() -> Self {
            Self::with_store(Arc::new(InMemoryDocumentStore::new()))
        }

        pub fn with_store(store: Arc<InMemoryDocumentStore>) -> Self {
            let metrics = Arc::new(GatewayMetrics::new());
            let router = build_router(
                Arc::new(dispatcher(&store)),
                Arc::clone(&metrics),
                &GatewayConfig::default(),
            );
            Self {
                router,
                store,
                metrics,
            }
        }

        /// POST a raw body to the action endpoint.
        pub async fn post(&self, body: Value) -> (StatusCode, Value) {
            let request = Request::builder()
                .method(Method::POST)
                .uri(ACTION_PATH)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap();
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            (status, serde_json::from_slice(&bytes).unwrap())
        }

        /// Authenticated action; panics unless it succeeds.
        pub async fn ok(&self, action: &str, data: Option<Value>) -> Value {
            let (status, body) = self.call(action, data).await;
            assert_eq!(status, StatusCode::OK, "{action}: {body}");
            assert_eq!(body["success"], true);
            body
        }

        pub async fn call(&self, action: &str, data: Option<Value>) -> (StatusCode, Value) {
            let mut body = json!({ "action": action, "secret": SECRET });
            if let Some(data) = data {
                body["data"] = data;
            }
            self.post(body).await
        }

        pub async fn document(&self) -> Value {
            self.ok("get-data", None).await["data"].clone()
        }

        pub async fn register(&self, name: &str, group: &str) -> String {
            let body = self
                .ok(
                    "register-team",
                    Some(json!({ "name": name, "owner": "fan club", "group": group })),
                )
                .await;
            body["team"]["id"].as_str().unwrap().to_string()
        }

        pub async fn schedule(&self, home: &str, away: &str) -> String {
            let body = self
                .ok(
                    "schedule-match",
                    Some(json!({
                        "homeTeamId": home,
                        "awayTeamId": away,
                        "date": "2026-06-01T18:00:00Z",
                    })),
                )
                .await;
            body["match"]["id"].as_str().unwrap().to_string()
        }

        pub async fn play(&self, home: &str, away: &str, home_score: u32, away_score: u32) {
            let match_id = self.schedule(home, away).await;
            self.ok(
                "record-result",
                Some(json!({
                    "matchId": match_id,
                    "homeScore": home_score,
                    "awayScore": away_score,
                    "confirmed": true,
                })),
            )
            .await;
        }
    }

    /// Team object with `id` from a document.
    pub fn team<'a>(document: &'a Value, id: &str) -> &'a Value {
        document["teams"]
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["id"] == id)
            .unwrap()
    }
}
