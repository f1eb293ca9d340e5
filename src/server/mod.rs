//! HTTP adapter for event forms.
//!
//! The form front end calls these endpoints and applies the returned
//! field instructions itself.

mod handlers;
mod state;

use axum::Router;
use axum::routing::{get, post};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tracing::info;

pub use state::{AppState, AppWorkflow};

pub fn build_router(workflow: AppWorkflow) -> Router {
    let state = Arc::new(AppState {
        workflow: Mutex::new(workflow),
    });

    Router::new()
        .route("/api/locations", get(handlers::list_locations))
        .route("/api/locations/select", get(handlers::select_location))
        .route("/api/events/validate", post(handlers::validate_event))
        .route("/api/events/refill", post(handlers::refill_event))
        .route("/api/events/submit", post(handlers::submit_event))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, workflow: AppWorkflow) -> std::io::Result<()> {
    let app = build_router(workflow);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("event location server listening on http://{}", addr);
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::BuiltinFormats;
    use crate::location::JsonLocationStore;
    use crate::workflow::{EventFieldNames, LocationReuseWorkflow, WorkflowConfig};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn router() -> Router {
        build_router(LocationReuseWorkflow::new(
            JsonLocationStore::in_memory(),
            BuiltinFormats,
            EventFieldNames::default(),
            WorkflowConfig::default(),
        ))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn la_address() -> Value {
        json!({
            "country_code": "US",
            "administrative_area": "CA",
            "locality": "LA",
            "postal_code": "90001",
            "address_line1": "1 Main St"
        })
    }

    fn submit_body() -> Value {
        json!({
            "entity": {
                "kind": "instance",
                "values": { "field_events_custom_location": "other" },
                "addresses": { "field_events_custom_other_loc": la_address() }
            },
            "submission": { "remember": true, "address": la_address() }
        })
    }

    #[tokio::test]
    async fn test_empty_location_list() {
        let app = router();
        let (status, body) = send(&app, get("/api/locations")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_submit_then_list_and_select() {
        let app = router();

        let (status, body) = send(&app, post("/api/events/submit", submit_body())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "persisted");
        assert_eq!(body["location"]["title"], "1 Main St, LA, CA 90001");
        let id = body["location"]["id"].as_u64().unwrap();

        let (_, body) = send(&app, post("/api/events/submit", submit_body())).await;
        assert_eq!(body["status"], "skipped");
        assert_eq!(body["reason"], json!({ "already_saved": id }));

        let (_, body) = send(&app, get("/api/locations")).await;
        assert_eq!(body[0], json!({ "value": "_none", "label": "Select address" }));
        assert_eq!(body[1]["value"], id.to_string());

        let uri = format!("/api/locations/select?kind=series&value={}", id);
        let (status, body) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 6);
        assert_eq!(body[1]["field"], "field_other_location[0][address][locality]");
        assert_eq!(body[1]["value"], "LA");
    }

    #[tokio::test]
    async fn test_select_none_and_missing() {
        let app = router();
        let (status, body) = send(&app, get("/api/locations/select?value=_none")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().iter().all(|i| i["value"] == ""));

        let (status, _) = send(&app, get("/api/locations/select?value=99")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, get("/api/locations/select")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_refill_endpoint() {
        let app = router();
        let (_, body) = send(&app, post("/api/events/submit", submit_body())).await;
        let id = body["location"]["id"].as_u64().unwrap();

        let chosen = json!({ "kind": "instance", "submission": { "saved_location": id.to_string() } });
        let (status, body) = send(&app, post("/api/events/refill", chosen)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[3]["field"], "field_events_custom_other_loc[0][address][address_line1]");
        assert_eq!(body[3]["value"], "1 Main St");

        let unset = json!({ "kind": "instance", "submission": {} });
        let (status, body) = send(&app, post("/api/events/refill", unset)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().iter().all(|i| i["value"] == ""));
    }

    #[tokio::test]
    async fn test_submit_rejects_sparse_entity_address() {
        let app = router();
        let mut body = submit_body();
        body["entity"]["addresses"]["field_events_custom_other_loc"] = json!({ "country_code": "US" });
        let (status, body) = send(&app, post("/api/events/submit", body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "field_events_custom_other_loc");

        let (_, body) = send(&app, get("/api/locations")).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_validate_endpoint() {
        let app = router();
        let ok = json!({ "kind": "series", "submission": { "remember": true, "address": la_address() } });
        let (status, _) = send(&app, post("/api/events/validate", ok)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let sparse = json!({ "kind": "series", "submission": { "remember": true, "address": { "locality": "LA" } } });
        let (status, body) = send(&app, post("/api/events/validate", sparse)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "field_other_location");
        assert_eq!(body["code"], 422);
    }
}
