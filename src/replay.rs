//! Recorded widget events and saved prompt files

use crate::error::{Result, SamGisError};
use samgis_prompt_common::table::split_rows;
use samgis_prompt_common::{popup_text, PromptCollection, PromptLabel, TableRow, WidgetEvent};
use std::fmt::Write as _;
use std::path::Path;

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(SamGisError::FileNotFound(path.display().to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Load a JSON array of widget events
pub fn load_events(path: &Path) -> Result<Vec<WidgetEvent>> {
    let content = read_file(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load a saved prompt collection (the request `prompt` array)
pub fn load_prompts(path: &Path) -> Result<PromptCollection> {
    let content = read_file(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Apply events in order to an empty collection
///
/// Stops at the first event whose geometry does not match its shape kind.
pub fn replay_events(events: &[WidgetEvent]) -> Result<PromptCollection> {
    let mut prompts = PromptCollection::new();
    for (index, event) in events.iter().enumerate() {
        match prompts.apply(event)? {
            Some(prompt) => tracing::debug!(index, "{}", popup_text(&prompt)),
            None => tracing::debug!(index, "removed"),
        }
    }
    Ok(prompts)
}

fn label_cell(label: PromptLabel) -> String {
    let name = match label {
        PromptLabel::Include => "include",
        PromptLabel::Exclude => "exclude",
    };
    format!("{} ({})", label, name)
}

/// Render the point and rectangle tables as plain text
pub fn render_tables(rows: &[TableRow]) -> String {
    let (points, rectangles) = split_rows(rows);
    let mut out = String::new();

    let _ = writeln!(out, "points ({})", points.len());
    if !points.is_empty() {
        let _ = writeln!(out, "{:<16} {:>12} {:>12}  label", "id", "lat", "lng");
        for row in &points {
            let _ = writeln!(
                out,
                "{:<16} {:>12.6} {:>12.6}  {}",
                row.id.to_string(),
                row.coordinate.lat,
                row.coordinate.lng,
                label_cell(row.label)
            );
        }
    }

    let _ = writeln!(out, "rectangles ({})", rectangles.len());
    if !rectangles.is_empty() {
        let _ = writeln!(
            out,
            "{:<16} {:>12} {:>12} {:>12} {:>12}",
            "id", "ne_lat", "ne_lng", "sw_lat", "sw_lng"
        );
        for row in &rectangles {
            let _ = writeln!(
                out,
                "{:<16} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
                row.id.to_string(),
                row.north_east.lat,
                row.north_east.lng,
                row.south_west.lat,
                row.south_west.lng
            );
        }
    }

    out
}
