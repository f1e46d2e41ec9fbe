//! Prompt geometry types
//!
//! Value types sent to the inference backend:
//! - LatLng / BoundingBox: geographic coordinates
//! - PointPrompt: include/exclude marker
//! - RectanglePrompt: inclusion region
//! - Prompt: tagged union of the two, discriminated by `type`

use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// North-east / south-west corners of a map region
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(rename = "ne")]
    pub north_east: LatLng,
    #[serde(rename = "sw")]
    pub south_west: LatLng,
}

impl BoundingBox {
    pub fn new(north_east: LatLng, south_west: LatLng) -> Self {
        Self { north_east, south_west }
    }
}

/// Shape identity assigned by the map widget
///
/// Opaque to this crate. Matching is strict: `Int(42)` and `Text("42")`
/// are different prompts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PromptId {
    Int(i64),
    Text(String),
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptId::Int(id) => write!(f, "{}", id),
            PromptId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for PromptId {
    fn from(id: i64) -> Self {
        PromptId::Int(id)
    }
}

impl From<&str> for PromptId {
    fn from(id: &str) -> Self {
        PromptId::Text(id.to_string())
    }
}

/// Point prompt polarity (serialized as 0/1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PromptLabel {
    Exclude = 0,
    Include = 1,
}

impl From<PromptLabel> for u8 {
    fn from(label: PromptLabel) -> Self {
        label as u8
    }
}

impl TryFrom<u8> for PromptLabel {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(PromptLabel::Exclude),
            1 => Ok(PromptLabel::Include),
            other => Err(format!("invalid prompt label {}, expected 0 or 1", other)),
        }
    }
}

impl fmt::Display for PromptLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// Include/exclude marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointPrompt {
    pub id: PromptId,
    #[serde(rename = "data")]
    pub coordinate: LatLng,
    pub label: PromptLabel,
}

/// Inclusion rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectanglePrompt {
    pub id: PromptId,
    #[serde(rename = "data")]
    pub bounds: BoundingBox,
}

/// A single spatial prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Prompt {
    Point(PointPrompt),
    Rectangle(RectanglePrompt),
}

impl Prompt {
    pub fn id(&self) -> &PromptId {
        match self {
            Prompt::Point(point) => &point.id,
            Prompt::Rectangle(rect) => &rect.id,
        }
    }

    /// Discriminant as it appears on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            Prompt::Point(_) => "point",
            Prompt::Rectangle(_) => "rectangle",
        }
    }
}
