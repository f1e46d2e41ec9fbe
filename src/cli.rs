use clap::{Parser, Subcommand};
use samgis_prompt_common::basemap::{MAX_ZOOM, MIN_ZOOM};
use samgis_prompt_common::{BoundingBox, LatLng};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "samgis-prompt")]
#[command(about = "Draw-free SamGIS client: manage map prompts and send inference requests", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay recorded map widget events and print the prompt tables
    Replay {
        /// JSON array of widget events (created/edited/removed)
        #[arg(required = true)]
        events: PathBuf,

        /// Write the resulting prompt collection as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Send prompts to the inference endpoint
    Send {
        /// JSON array of prompts
        #[arg(short, long, conflicts_with = "events", required_unless_present = "events")]
        prompts: Option<PathBuf>,

        /// JSON array of widget events to replay before sending
        #[arg(short, long)]
        events: Option<PathBuf>,

        /// Map extent as ne_lat,ne_lng,sw_lat,sw_lng
        #[arg(short, long, value_parser = parse_bbox, allow_hyphen_values = true)]
        bbox: BoundingBox,

        /// Map zoom level
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(MIN_ZOOM as i64..=MAX_ZOOM as i64))]
        zoom: u32,

        /// Basemap provider name (source_type)
        #[arg(short, long)]
        source: Option<String>,

        /// Page query string; its `source` is used when --source is absent
        #[arg(short, long)]
        query: Option<String>,

        /// Inference endpoint (overrides config and SAMGIS_ENDPOINT)
        #[arg(long)]
        endpoint: Option<String>,

        /// Write the returned GeoJSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve a tile URL template to its provider name
    Basemap {
        /// Tile URL template of the active layer
        url: String,
    },

    /// Parse a page query string
    Query {
        /// e.g. "?source=OpenStreetMap&zoom=15"
        #[arg(allow_hyphen_values = true)]
        query: String,
    },

    /// Show or change configuration
    Config {
        /// Set the inference endpoint URL
        #[arg(long)]
        set_endpoint: Option<String>,

        /// Set the request timeout in seconds (0 = none)
        #[arg(long)]
        set_timeout: Option<u64>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

/// `ne_lat,ne_lng,sw_lat,sw_lng`
pub fn parse_bbox(value: &str) -> Result<BoundingBox, String> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|s| s.trim().parse::<f64>().map_err(|e| format!("'{}': {}", s.trim(), e)))
        .collect::<Result<_, _>>()?;

    match parts.as_slice() {
        [ne_lat, ne_lng, sw_lat, sw_lng] => Ok(BoundingBox::new(
            LatLng::new(*ne_lat, *ne_lng),
            LatLng::new(*sw_lat, *sw_lng),
        )),
        _ => Err(format!(
            "expected 4 comma separated numbers (ne_lat,ne_lng,sw_lat,sw_lng), got {}",
            parts.len()
        )),
    }
}
