//! Inference request builder and lifecycle
//!
//! Idle -> Waiting -> {Success, Failure} -> Idle. The waiting sentinel is
//! published before the transport is called. No failure escapes
//! `request_geojson`; each one ends up in `response_message`.

use serde::{Deserialize, Serialize};
use crate::collection::PromptCollection;
use crate::envelope::{decode_response, GeometryPayload};
use crate::error::Error;
use crate::state::{MapViewport, StateStore, WAITING_MESSAGE};
use crate::transport::HttpTransport;
use crate::types::{BoundingBox, Prompt};

const NO_RESPONSE_TEXT: &str = "no response or uncaught exception!";

/// JSON body POSTed to the inference endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRequestBody {
    pub bbox: BoundingBox,
    pub prompt: Vec<Prompt>,
    pub zoom: u32,
    pub source_type: String,
}

impl InferenceRequestBody {
    /// Snapshot the collection into a request body
    pub fn new(
        bbox: BoundingBox,
        prompts: &PromptCollection,
        zoom: u32,
        source_type: impl Into<String>,
    ) -> Self {
        Self {
            bbox,
            prompt: prompts.as_slice().to_vec(),
            zoom,
            source_type: source_type.into(),
        }
    }

    pub fn from_viewport(
        viewport: &MapViewport,
        prompts: &PromptCollection,
        source_type: impl Into<String>,
    ) -> Self {
        Self::new(viewport.bbox, prompts, viewport.zoom, source_type)
    }
}

/// How a request ended
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// Status 200 with a decodable envelope; geometry may still be unparsed
    Completed(GeometryPayload),
    /// Failure already reported through `response_message`
    Failed,
}

impl RequestOutcome {
    pub fn payload(&self) -> Option<&GeometryPayload> {
        match self {
            RequestOutcome::Completed(payload) => Some(payload),
            RequestOutcome::Failed => None,
        }
    }
}

/// Send the request and fold the response into `store`
///
/// # Arguments
/// * `transport` - HTTP client
/// * `store` - UI state; navigation lock is left to the caller
/// * `body` - request body, serialized as-is
/// * `url` - inference endpoint
pub async fn request_geojson<T: HttpTransport>(
    transport: &T,
    store: &StateStore,
    body: &InferenceRequestBody,
    url: &str,
) -> RequestOutcome {
    store.set_response_message(WAITING_MESSAGE);

    let payload = match serde_json::to_string(body) {
        Ok(payload) => payload,
        Err(e) => return fail_with_status(store, "", &Error::Json(e)),
    };
    tracing::info!(
        url,
        prompts = body.prompt.len(),
        zoom = body.zoom,
        source_type = %body.source_type,
        "sending inference request"
    );

    let reply = match transport.post_json(url, payload).await {
        Ok(reply) => reply,
        Err(e) => return fail_with_status(store, "", &e),
    };

    if reply.is_ok() {
        match reply.body.and_then(|text| decode_response(&text, store)) {
            Ok(payload) => RequestOutcome::Completed(payload),
            Err(e) => fail_with_status(store, &reply.status_text, &e),
        }
    } else {
        match reply.body {
            Ok(text) => {
                tracing::error!(status = reply.status, body = %text, "inference request: status not 200");
                store.set_response_message(format!("error message response: {}...", text));
                RequestOutcome::Failed
            }
            Err(e) => fail_with_status(store, &reply.status_text, &e),
        }
    }
}

fn fail_with_status(store: &StateStore, status_text: &str, error: &Error) -> RequestOutcome {
    let status_text = if status_text.is_empty() {
        NO_RESPONSE_TEXT
    } else {
        status_text
    };
    tracing::error!(status_text, error = %error, "inference request failed");
    store.set_response_message(format!("error status response: {}...", status_text));
    RequestOutcome::Failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::transport::HttpReply;
    use crate::types::{LatLng, PointPrompt, PromptId, PromptLabel};
    use std::sync::Mutex;

    /// Replies with a canned response and records what it saw
    struct ScriptedTransport {
        store: StateStore,
        reply: Mutex<Option<Result<HttpReply>>>,
        seen_message: Mutex<Option<String>>,
        seen_request: Mutex<Option<(String, String)>>,
    }

    impl ScriptedTransport {
        fn new(store: &StateStore, reply: Result<HttpReply>) -> Self {
            Self {
                store: store.clone(),
                reply: Mutex::new(Some(reply)),
                seen_message: Mutex::new(None),
                seen_request: Mutex::new(None),
            }
        }
    }

    impl HttpTransport for ScriptedTransport {
        async fn post_json(&self, url: &str, body: String) -> Result<HttpReply> {
            *self.seen_message.lock().unwrap() = Some(self.store.response_message());
            *self.seen_request.lock().unwrap() = Some((url.to_string(), body));
            self.reply.lock().unwrap().take().expect("transport called twice")
        }
    }

    fn request_body() -> InferenceRequestBody {
        let prompts = PromptCollection::from_prompts(vec![Prompt::Point(PointPrompt {
            id: PromptId::Int(1108),
            coordinate: LatLng::new(46.16, 9.39),
            label: PromptLabel::Include,
        })]);
        InferenceRequestBody::new(
            BoundingBox::new(LatLng::new(46.0, 11.0), LatLng::new(44.0, 9.0)),
            &prompts,
            13,
            "OpenStreetMap",
        )
    }

    fn ok_envelope() -> String {
        let body = serde_json::json!({
            "duration_run": 1.5,
            "output": {
                "geojson": r#"{"type":"FeatureCollection","features":[]}"#,
                "n_predictions": 3,
                "n_shapes_geojson": 2
            }
        });
        serde_json::json!({ "body": body.to_string() }).to_string()
    }

    #[tokio::test]
    async fn test_waiting_before_transport_settles() {
        let store = StateStore::new();
        let transport = ScriptedTransport::new(&store, Ok(HttpReply::new(200, "OK", ok_envelope())));

        request_geojson(&transport, &store, &request_body(), "/infer_samgis").await;

        assert_eq!(transport.seen_message.lock().unwrap().as_deref(), Some("waiting..."));
    }

    #[tokio::test]
    async fn test_success_publishes_stats() {
        let store = StateStore::new();
        let transport = ScriptedTransport::new(&store, Ok(HttpReply::new(200, "OK", ok_envelope())));

        let outcome = request_geojson(&transport, &store, &request_body(), "/infer_samgis").await;

        assert_eq!(
            outcome,
            RequestOutcome::Completed(GeometryPayload::GeoJson(
                serde_json::json!({"type": "FeatureCollection", "features": []})
            ))
        );
        let state = store.snapshot();
        assert_eq!(state.duration, 1.5);
        assert_eq!(state.polygon_count, 2);
        assert_eq!(state.predicted_mask_count, 3);
        assert_eq!(state.response_message, "");
    }

    #[tokio::test]
    async fn test_sends_exact_body() {
        let store = StateStore::new();
        let transport = ScriptedTransport::new(&store, Ok(HttpReply::new(200, "OK", ok_envelope())));
        let body = request_body();

        request_geojson(&transport, &store, &body, "/infer_samgis").await;

        let (url, sent) = transport.seen_request.lock().unwrap().clone().unwrap();
        assert_eq!(url, "/infer_samgis");
        assert_eq!(sent, serde_json::to_string(&body).unwrap());
        let sent: serde_json::Value = serde_json::from_str(&sent).unwrap();
        assert_eq!(sent["bbox"]["ne"]["lat"], 46.0);
        assert_eq!(sent["prompt"][0]["type"], "point");
        assert_eq!(sent["prompt"][0]["data"]["lng"], 9.39);
        assert_eq!(sent["zoom"], 13);
        assert_eq!(sent["source_type"], "OpenStreetMap");
    }

    #[tokio::test]
    async fn test_non_200_uses_body_text() {
        let store = StateStore::new();
        let transport = ScriptedTransport::new(
            &store,
            Ok(HttpReply::new(500, "Internal Server Error", "Internal Server Error")),
        );

        let outcome = request_geojson(&transport, &store, &request_body(), "/infer_samgis").await;

        assert_eq!(outcome, RequestOutcome::Failed);
        assert_eq!(store.response_message(), "error message response: Internal Server Error...");
    }

    #[tokio::test]
    async fn test_body_read_failure_uses_status_text() {
        let store = StateStore::new();
        let reply = HttpReply {
            status: 200,
            status_text: "OK".to_string(),
            body: Err(Error::Transport("connection reset".to_string())),
        };
        let transport = ScriptedTransport::new(&store, Ok(reply));

        let outcome = request_geojson(&transport, &store, &request_body(), "/infer_samgis").await;

        assert_eq!(outcome, RequestOutcome::Failed);
        assert_eq!(store.response_message(), "error status response: OK...");
    }

    #[tokio::test]
    async fn test_missing_status_text_fallback() {
        let store = StateStore::new();
        let transport = ScriptedTransport::new(&store, Ok(HttpReply::new(200, "", "not json at all")));

        request_geojson(&transport, &store, &request_body(), "/infer_samgis").await;

        assert_eq!(
            store.response_message(),
            "error status response: no response or uncaught exception!..."
        );
    }

    #[tokio::test]
    async fn test_no_response_at_all() {
        let store = StateStore::new();
        let transport = ScriptedTransport::new(&store, Err(Error::Transport("refused".to_string())));

        let outcome = request_geojson(&transport, &store, &request_body(), "/infer_samgis").await;

        assert_eq!(outcome, RequestOutcome::Failed);
        assert!(store.response_message().contains("no response or uncaught exception!"));
    }

    #[tokio::test]
    async fn test_malformed_geojson_returns_text() {
        let store = StateStore::new();
        let body = serde_json::json!({
            "duration_run": 1.5,
            "output": {"geojson": "{broken", "n_predictions": 3, "n_shapes_geojson": 2}
        });
        let raw = serde_json::json!({ "body": body.to_string() }).to_string();
        let transport = ScriptedTransport::new(&store, Ok(HttpReply::new(200, "OK", raw)));

        let outcome = request_geojson(&transport, &store, &request_body(), "/infer_samgis").await;

        match outcome {
            RequestOutcome::Completed(GeometryPayload::Unparsed(text)) => {
                assert!(text.contains("SyntaxError"))
            }
            other => panic!("expected unparsed geometry, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_does_not_touch_navigation_lock() {
        let store = StateStore::new();
        let transport = ScriptedTransport::new(&store, Ok(HttpReply::new(200, "OK", ok_envelope())));

        request_geojson(&transport, &store, &request_body(), "/infer_samgis").await;

        assert!(!store.navigation_locked());
    }
}
