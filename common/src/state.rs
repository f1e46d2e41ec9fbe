//! Observable UI state
//!
//! A single store owned by the UI controller. Request and decode code write
//! through it, the presentation layer reads snapshots or subscribes.

use std::sync::Arc;
use tokio::sync::watch;
use crate::types::BoundingBox;

/// Idle sentinel for `response_message`
pub const IDLE_MESSAGE: &str = "-";
/// In-flight sentinel for `response_message`
pub const WAITING_MESSAGE: &str = "waiting...";

const SEND_LABEL: &str = "send ML request";
const EMPTY_PROMPT_LABEL: &str = "Empty prompt (disabled)";

/// Current map extent and zoom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub bbox: BoundingBox,
    pub zoom: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    /// `-` idle, `waiting...` in flight, empty after success, error text otherwise
    pub response_message: String,
    pub duration: f64,
    pub polygon_count: u64,
    pub predicted_mask_count: u64,
    pub navigation_locked: bool,
    pub viewport: Option<MapViewport>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            response_message: IDLE_MESSAGE.to_string(),
            duration: 0.0,
            polygon_count: 0,
            predicted_mask_count: 0,
            navigation_locked: false,
            viewport: None,
        }
    }
}

impl UiState {
    pub fn is_waiting(&self) -> bool {
        self.response_message == WAITING_MESSAGE
    }
}

/// Cloneable handle to the shared UI state
#[derive(Debug, Clone)]
pub struct StateStore {
    tx: Arc<watch::Sender<UiState>>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(UiState::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> UiState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.tx.subscribe()
    }

    pub fn response_message(&self) -> String {
        self.tx.borrow().response_message.clone()
    }

    pub fn set_response_message(&self, message: impl Into<String>) {
        let message = message.into();
        self.tx.send_modify(|state| state.response_message = message);
    }

    /// Counters derived from a successful inference response
    pub fn publish_stats(&self, duration: f64, polygon_count: u64, predicted_mask_count: u64) {
        self.tx.send_modify(|state| {
            state.duration = duration;
            state.polygon_count = polygon_count;
            state.predicted_mask_count = predicted_mask_count;
        });
    }

    pub fn navigation_locked(&self) -> bool {
        self.tx.borrow().navigation_locked
    }

    pub fn set_navigation_locked(&self, locked: bool) {
        self.tx.send_modify(|state| state.navigation_locked = locked);
    }

    pub fn viewport(&self) -> Option<MapViewport> {
        self.tx.borrow().viewport
    }

    /// Called on map move/zoom end
    pub fn set_viewport(&self, viewport: MapViewport) {
        self.tx.send_modify(|state| state.viewport = Some(viewport));
    }
}

/// Text of the send button
pub fn submit_label(response_message: &str, prompt_count: usize) -> String {
    if response_message == WAITING_MESSAGE {
        return WAITING_MESSAGE.to_string();
    }
    if prompt_count == 0 {
        return EMPTY_PROMPT_LABEL.to_string();
    }
    if response_message.is_empty() || response_message == IDLE_MESSAGE {
        return SEND_LABEL.to_string();
    }
    response_message.to_string()
}

pub fn submit_enabled(response_message: &str, prompt_count: usize) -> bool {
    response_message != WAITING_MESSAGE && prompt_count > 0
}
