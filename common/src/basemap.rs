//! Basemap resolution
//!
//! Maps the tile URL currently shown by the map back to its provider name.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const OPEN_STREET_MAP: &str = "OpenStreetMap";
pub const SATELLITE: &str = "OpenStreetMap.HOT";
pub const MAX_ZOOM: u8 = 20;
pub const MIN_ZOOM: u8 = 2;

/// Shown when no provider matches
pub const UNKNOWN_BASEMAP: &str = "-";

const OPEN_STREET_MAP_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const SATELLITE_URL: &str = "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";

/// Named tile source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileProvider {
    pub name: String,
    pub url: String,
}

impl TileProvider {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self { name: name.into(), url: url.into() }
    }
}

/// Provider name -> tile URL template, in lookup order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderTable(Vec<TileProvider>);

impl ProviderTable {
    pub fn new(providers: Vec<TileProvider>) -> Self {
        Self(providers)
    }

    /// OpenStreetMap + satellite
    pub fn builtin() -> Self {
        Self(vec![
            TileProvider::new(OPEN_STREET_MAP, OPEN_STREET_MAP_URL),
            TileProvider::new(SATELLITE, SATELLITE_URL),
        ])
    }

    pub fn url_for(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|p| p.name == name).map(|p| p.url.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TileProvider> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of a basemap lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedBasemap {
    Provider(String),
    Unknown,
}

impl ResolvedBasemap {
    pub fn provider(&self) -> Option<&str> {
        match self {
            ResolvedBasemap::Provider(name) => Some(name),
            ResolvedBasemap::Unknown => None,
        }
    }
}

impl fmt::Display for ResolvedBasemap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedBasemap::Provider(name) => f.write_str(name),
            ResolvedBasemap::Unknown => f.write_str(UNKNOWN_BASEMAP),
        }
    }
}

/// Find the provider whose URL template equals `current_url`
///
/// # Arguments
/// * `current_url` - URL template of the active tile layer
/// * `providers` - table scanned in order, first exact match wins
///
/// # Returns
/// `ResolvedBasemap::Unknown` for an empty URL, an empty table or no match
pub fn resolve(current_url: &str, providers: &ProviderTable) -> ResolvedBasemap {
    if current_url.is_empty() {
        return ResolvedBasemap::Unknown;
    }
    providers
        .iter()
        .find(|p| p.url == current_url)
        .map(|p| ResolvedBasemap::Provider(p.name.clone()))
        .unwrap_or(ResolvedBasemap::Unknown)
}
