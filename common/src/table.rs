//! Table projections of the prompt collection
//!
//! Rows drop the `type` discriminant; rectangle rows flatten the bounds.

use serde::{Deserialize, Serialize};
use crate::types::{LatLng, Prompt, PromptId, PromptLabel};

/// Point table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRow {
    pub id: PromptId,
    #[serde(rename = "data")]
    pub coordinate: LatLng,
    pub label: PromptLabel,
}

/// Rectangle table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleRow {
    pub id: PromptId,
    #[serde(rename = "data_ne")]
    pub north_east: LatLng,
    #[serde(rename = "data_sw")]
    pub south_west: LatLng,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableRow {
    Point(PointRow),
    Rectangle(RectangleRow),
}

impl TableRow {
    pub fn id(&self) -> &PromptId {
        match self {
            TableRow::Point(row) => &row.id,
            TableRow::Rectangle(row) => &row.id,
        }
    }
}

/// Project a single prompt to its table row
pub fn to_table_row(prompt: &Prompt) -> TableRow {
    match prompt {
        Prompt::Point(point) => TableRow::Point(PointRow {
            id: point.id.clone(),
            coordinate: point.coordinate,
            label: point.label,
        }),
        Prompt::Rectangle(rect) => TableRow::Rectangle(RectangleRow {
            id: rect.id.clone(),
            north_east: rect.bounds.north_east,
            south_west: rect.bounds.south_west,
        }),
    }
}

/// Project every prompt, keeping collection order
pub fn project_all(prompts: &[Prompt]) -> Vec<TableRow> {
    prompts.iter().map(to_table_row).collect()
}

/// Split rows into the point table and the rectangle table
pub fn split_rows(rows: &[TableRow]) -> (Vec<&PointRow>, Vec<&RectangleRow>) {
    let mut points = Vec::new();
    let mut rectangles = Vec::new();
    for row in rows {
        match row {
            TableRow::Point(p) => points.push(p),
            TableRow::Rectangle(r) => rectangles.push(r),
        }
    }
    (points, rectangles)
}
