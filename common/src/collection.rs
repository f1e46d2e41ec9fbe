//! Prompt collection manager
//!
//! Keeps the live prompt list in sync with the map widget's shape events.
//! Order is display order only: edits are applied as remove + append, so an
//! edited shape moves to the end of the table.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use crate::error::{Error, Result};
use crate::table::{project_all, TableRow};
use crate::types::{BoundingBox, LatLng, PointPrompt, Prompt, PromptId, PromptLabel, RectanglePrompt};

/// Shape kinds offered by the editor toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    #[serde(rename = "IncludeMarkerPrompt")]
    IncludeMarker,
    #[serde(rename = "ExcludeMarkerPrompt")]
    ExcludeMarker,
    #[serde(rename = "RectanglePrompt")]
    Rectangle,
}

impl ShapeKind {
    pub fn widget_name(&self) -> &'static str {
        match self {
            ShapeKind::IncludeMarker => "IncludeMarkerPrompt",
            ShapeKind::ExcludeMarker => "ExcludeMarkerPrompt",
            ShapeKind::Rectangle => "RectanglePrompt",
        }
    }

    /// Label for marker kinds, `None` for rectangles
    pub fn label(&self) -> Option<PromptLabel> {
        match self {
            ShapeKind::IncludeMarker => Some(PromptLabel::Include),
            ShapeKind::ExcludeMarker => Some(PromptLabel::Exclude),
            ShapeKind::Rectangle => None,
        }
    }
}

impl FromStr for ShapeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "IncludeMarkerPrompt" => Ok(ShapeKind::IncludeMarker),
            "ExcludeMarkerPrompt" => Ok(ShapeKind::ExcludeMarker),
            "RectanglePrompt" => Ok(ShapeKind::Rectangle),
            other => Err(Error::UnknownShape(other.to_string())),
        }
    }
}

/// Geometry payload carried by a widget event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShapeGeometry {
    Point(LatLng),
    Bounds(BoundingBox),
}

/// Shape created/edited event from the map widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeEvent {
    pub id: PromptId,
    pub shape: ShapeKind,
    pub geometry: ShapeGeometry,
}

impl ShapeEvent {
    /// Build the prompt this event describes
    pub fn to_prompt(&self) -> Result<Prompt> {
        match (self.shape.label(), self.geometry) {
            (Some(label), ShapeGeometry::Point(coordinate)) => Ok(Prompt::Point(PointPrompt {
                id: self.id.clone(),
                coordinate,
                label,
            })),
            (None, ShapeGeometry::Bounds(bounds)) => Ok(Prompt::Rectangle(RectanglePrompt {
                id: self.id.clone(),
                bounds,
            })),
            (Some(_), ShapeGeometry::Bounds(_)) => Err(Error::ShapeGeometry(format!(
                "{} id:{} carries bounds instead of a point",
                self.shape.widget_name(),
                self.id
            ))),
            (None, ShapeGeometry::Point(_)) => Err(Error::ShapeGeometry(format!(
                "{} id:{} carries a point instead of bounds",
                self.shape.widget_name(),
                self.id
            ))),
        }
    }
}

/// Any event the widget can emit, as recorded in a replay file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum WidgetEvent {
    Created(ShapeEvent),
    Edited(ShapeEvent),
    Removed { id: PromptId },
}

/// Ordered, id-keyed prompt list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptCollection {
    prompts: Vec<Prompt>,
}

impl PromptCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_prompts(prompts: Vec<Prompt>) -> Self {
        Self { prompts }
    }

    /// Append the prompt described by a shape-created event
    ///
    /// Returns the stored prompt so the caller can attach a popup to it.
    pub fn on_shape_created(&mut self, event: &ShapeEvent) -> Result<Prompt> {
        let prompt = event.to_prompt()?;
        tracing::debug!(id = %prompt.id(), kind = prompt.kind(), "prompt created");
        self.prompts.push(prompt.clone());
        Ok(prompt)
    }

    /// Replace the prompt with the event's id: remove, then append
    pub fn on_shape_edited(&mut self, event: &ShapeEvent) -> Result<Prompt> {
        // build first so a malformed event leaves the collection untouched
        let prompt = event.to_prompt()?;
        self.on_shape_removed(&event.id);
        tracing::debug!(id = %prompt.id(), kind = prompt.kind(), "prompt edited");
        self.prompts.push(prompt.clone());
        Ok(prompt)
    }

    /// Drop every prompt with this id; unknown ids are ignored
    pub fn on_shape_removed(&mut self, id: &PromptId) {
        let before = self.prompts.len();
        self.prompts.retain(|p| p.id() != id);
        if self.prompts.len() == before {
            tracing::debug!(id = %id, "remove ignored, id not in collection");
        }
    }

    /// Non-mutating removal
    pub fn without(&self, id: &PromptId) -> PromptCollection {
        Self {
            prompts: self.prompts.iter().filter(|p| p.id() != id).cloned().collect(),
        }
    }

    /// Dispatch a recorded widget event
    pub fn apply(&mut self, event: &WidgetEvent) -> Result<Option<Prompt>> {
        match event {
            WidgetEvent::Created(shape) => self.on_shape_created(shape).map(Some),
            WidgetEvent::Edited(shape) => self.on_shape_edited(shape).map(Some),
            WidgetEvent::Removed { id } => {
                self.on_shape_removed(id);
                Ok(None)
            }
        }
    }

    pub fn get(&self, id: &PromptId) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id() == id)
    }

    pub fn rows(&self) -> Vec<TableRow> {
        project_all(&self.prompts)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Prompt> {
        self.prompts.iter()
    }

    pub fn as_slice(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    pub fn clear(&mut self) {
        self.prompts.clear();
    }
}

/// Popup text the widget binds to a freshly drawn shape
pub fn popup_text(prompt: &Prompt) -> String {
    match prompt {
        Prompt::Point(point) => format!(
            "lat:{} lng:{} label:{} id:{}",
            point.coordinate.lat, point.coordinate.lng, point.label, point.id
        ),
        Prompt::Rectangle(rect) => format!("id:{}.", rect.id),
    }
}
