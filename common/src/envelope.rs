//! Inference response envelope
//!
//! The backend answers with three JSON layers:
//! HTTP JSON `{"body": <string>}` -> body string -> `output.geojson` string.
//!
//! Decoding happens in two stages with different failure handling:
//! - stage 1 (outer JSON + `body`): error is returned to the caller
//! - stage 2 (`output.geojson`): error is logged and handed back as text

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{self, Write};
use crate::error::{Error, Result};
use crate::state::StateStore;

/// Outer HTTP JSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub body: String,
}

/// Prediction output as produced by the model service
///
/// Field order follows the producer, the serialized form depends on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceOutput {
    pub n_predictions: u64,
    pub geojson: String,
    pub n_shapes_geojson: u64,
}

/// Decoded `body` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResponseBody {
    pub duration_run: f64,
    pub output: InferenceOutput,
}

/// Geometry handed back to the caller
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryPayload {
    /// Parsed GeoJSON object
    GeoJson(Value),
    /// `output.geojson` was not valid JSON; carries the error text
    Unparsed(String),
}

impl GeometryPayload {
    pub fn geojson(&self) -> Option<&Value> {
        match self {
            GeometryPayload::GeoJson(value) => Some(value),
            GeometryPayload::Unparsed(_) => None,
        }
    }
}

/// Stage 1: outer JSON and the JSON string in `body`
pub fn decode_envelope(raw: &str) -> Result<InferenceResponseBody> {
    let envelope: ResponseEnvelope = serde_json::from_str(raw)
        .map_err(|e| Error::Envelope(format!("response is not an envelope: {}", e)))?;
    serde_json::from_str(&envelope.body)
        .map_err(|e| Error::Envelope(format!("body field: {}", e)))
}

/// Stage 2: the GeoJSON string; never fails
pub fn decode_geojson(output: &InferenceOutput) -> GeometryPayload {
    match serde_json::from_str::<Value>(&output.geojson) {
        Ok(value) => GeometryPayload::GeoJson(value),
        Err(e) => {
            tracing::error!(error = %e, "output.geojson is not valid JSON");
            GeometryPayload::Unparsed(format!("SyntaxError: {}", e))
        }
    }
}

/// Decode a 200 response and publish its statistics
///
/// # Arguments
/// * `raw` - HTTP response body text
/// * `store` - receives duration/polygon/mask counters and the cleared message
///
/// # Returns
/// * `Ok(GeometryPayload::GeoJson)` - counters published, message set to `""`
/// * `Ok(GeometryPayload::Unparsed)` - geojson broken, state left untouched
/// * `Err` - envelope or `body` field could not be decoded
pub fn decode_response(raw: &str, store: &StateStore) -> Result<GeometryPayload> {
    let body = decode_envelope(raw)?;
    let payload = decode_geojson(&body.output);

    if let GeometryPayload::GeoJson(_) = payload {
        store.publish_stats(
            body.duration_run,
            body.output.n_shapes_geojson,
            body.output.n_predictions,
        );
        store.set_response_message("");
        tracing::info!(
            duration_run = body.duration_run,
            n_shapes_geojson = body.output.n_shapes_geojson,
            n_predictions = body.output.n_predictions,
            "inference response decoded"
        );
    }

    Ok(payload)
}

/// Producer side: serialize a response exactly as the model service does
///
/// The inner `body` string uses `", "` / `": "` separators and ASCII-only
/// escapes; the outer object is compact.
pub fn compose_envelope(duration_run: f64, output: &InferenceOutput) -> Result<String> {
    let body = InferenceResponseBody {
        duration_run,
        output: output.clone(),
    };

    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedAsciiFormatter);
    body.serialize(&mut ser)?;
    let body = String::from_utf8(buf)
        .map_err(|e| Error::Envelope(format!("body is not UTF-8: {}", e)))?;

    Ok(serde_json::to_string(&ResponseEnvelope { body })?)
}

/// `json.dumps` default layout
struct SpacedAsciiFormatter;

impl serde_json::ser::Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEOJSON: &str = r#"{"type":"FeatureCollection","features":[]}"#;

    fn envelope_for(body: &Value) -> String {
        serde_json::json!({ "body": body.to_string() }).to_string()
    }

    fn valid_body() -> Value {
        serde_json::json!({
            "duration_run": 1.5,
            "output": {"geojson": GEOJSON, "n_predictions": 3, "n_shapes_geojson": 2}
        })
    }

    // =============================================
    // decode_envelope
    // =============================================

    #[test]
    fn test_decode_envelope_valid() {
        let body = decode_envelope(&envelope_for(&valid_body())).unwrap();
        assert_eq!(body.duration_run, 1.5);
        assert_eq!(body.output.n_predictions, 3);
        assert_eq!(body.output.n_shapes_geojson, 2);
        assert_eq!(body.output.geojson, GEOJSON);
    }

    #[test]
    fn test_decode_envelope_not_json() {
        assert!(matches!(decode_envelope("<html>502</html>"), Err(Error::Envelope(_))));
    }

    #[test]
    fn test_decode_envelope_body_not_json() {
        let raw = r#"{"body": "not-valid-json"}"#;
        match decode_envelope(raw) {
            Err(Error::Envelope(msg)) => assert!(msg.contains("body field")),
            other => panic!("expected envelope error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_envelope_missing_output() {
        let raw = envelope_for(&serde_json::json!({"duration_run": 1.0}));
        assert!(decode_envelope(&raw).is_err());
    }

    // =============================================
    // decode_response
    // =============================================

    #[test]
    fn test_decode_response_publishes_stats() {
        let store = StateStore::new();
        store.set_response_message("waiting...");

        let payload = decode_response(&envelope_for(&valid_body()), &store).unwrap();

        assert_eq!(
            payload,
            GeometryPayload::GeoJson(serde_json::json!({"type": "FeatureCollection", "features": []}))
        );
        let state = store.snapshot();
        assert_eq!(state.duration, 1.5);
        assert_eq!(state.polygon_count, 2);
        assert_eq!(state.predicted_mask_count, 3);
        assert_eq!(state.response_message, "");
    }

    #[test]
    fn test_decode_response_malformed_geojson_returns_text() {
        let store = StateStore::new();
        store.set_response_message("waiting...");
        let body = serde_json::json!({
            "duration_run": 1.5,
            "output": {"geojson": "{not geojson", "n_predictions": 3, "n_shapes_geojson": 2}
        });

        let payload = decode_response(&envelope_for(&body), &store).unwrap();

        match payload {
            GeometryPayload::Unparsed(text) => assert!(text.contains("SyntaxError")),
            other => panic!("expected unparsed payload, got {:?}", other),
        }
        let state = store.snapshot();
        assert_eq!(state.polygon_count, 0);
        assert_eq!(state.response_message, "waiting...");
    }

    // =============================================
    // compose_envelope
    // =============================================

    #[test]
    fn test_compose_envelope_layout() {
        let output = InferenceOutput {
            n_predictions: 3,
            geojson: GEOJSON.to_string(),
            n_shapes_geojson: 2,
        };
        let raw = compose_envelope(1.5, &output).unwrap();
        let envelope: ResponseEnvelope = serde_json::from_str(&raw).unwrap();

        assert!(raw.starts_with(r#"{"body":"#));
        assert!(envelope
            .body
            .starts_with(r#"{"duration_run": 1.5, "output": {"n_predictions": 3, "geojson": "#));
        assert!(envelope.body.ends_with(r#", "n_shapes_geojson": 2}}"#));

        let decoded = decode_envelope(&raw).unwrap();
        assert_eq!(decoded.output, output);
    }

    #[test]
    fn test_compose_envelope_escapes_non_ascii() {
        let output = InferenceOutput {
            n_predictions: 1,
            geojson: r#"{"name":"Città"}"#.to_string(),
            n_shapes_geojson: 1,
        };
        let raw = compose_envelope(0.5, &output).unwrap();
        let envelope: ResponseEnvelope = serde_json::from_str(&raw).unwrap();
        assert!(envelope.body.contains("Citt\\u00e0"));
        assert_eq!(decode_envelope(&raw).unwrap().output.geojson, output.geojson);
    }
}
