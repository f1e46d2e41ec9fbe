//! Prompt session controller
//!
//! Glue between widget events, the prompt collection, the UI state store and
//! the inference request. Owns the navigation lock around a submit.
//!
//! There is no single-flight guard: a second `submit` while one is pending
//! is only prevented by the UI disabling the send button.

use crate::collection::{PromptCollection, ShapeEvent, WidgetEvent};
use crate::error::{Error, Result};
use crate::request::{request_geojson, InferenceRequestBody, RequestOutcome};
use crate::state::{submit_enabled, submit_label, MapViewport, StateStore, IDLE_MESSAGE};
use crate::table::TableRow;
use crate::transport::HttpTransport;
use crate::types::{Prompt, PromptId};

pub struct PromptSession<T: HttpTransport> {
    transport: T,
    endpoint: String,
    store: StateStore,
    prompts: PromptCollection,
}

impl<T: HttpTransport> PromptSession<T> {
    pub fn new(transport: T, endpoint: impl Into<String>) -> Self {
        Self::with_store(transport, endpoint, StateStore::new())
    }

    pub fn with_store(transport: T, endpoint: impl Into<String>, store: StateStore) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            store,
            prompts: PromptCollection::new(),
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn prompts(&self) -> &PromptCollection {
        &self.prompts
    }

    pub fn rows(&self) -> Vec<TableRow> {
        self.prompts.rows()
    }

    pub fn shape_created(&mut self, event: &ShapeEvent) -> Result<Prompt> {
        self.store.set_response_message(IDLE_MESSAGE);
        self.prompts.on_shape_created(event)
    }

    pub fn shape_edited(&mut self, event: &ShapeEvent) -> Result<Prompt> {
        self.store.set_response_message(IDLE_MESSAGE);
        self.prompts.on_shape_edited(event)
    }

    pub fn shape_removed(&mut self, id: &PromptId) {
        self.store.set_response_message(IDLE_MESSAGE);
        self.prompts.on_shape_removed(id);
    }

    pub fn apply(&mut self, event: &WidgetEvent) -> Result<Option<Prompt>> {
        self.store.set_response_message(IDLE_MESSAGE);
        self.prompts.apply(event)
    }

    /// Replace the whole collection, e.g. from a saved prompt file
    pub fn load_prompts(&mut self, prompts: PromptCollection) {
        self.store.set_response_message(IDLE_MESSAGE);
        self.prompts = prompts;
    }

    /// Map moved or zoomed
    pub fn viewport_changed(&self, viewport: MapViewport) {
        self.store.set_viewport(viewport);
    }

    pub fn submit_label(&self) -> String {
        submit_label(&self.store.response_message(), self.prompts.len())
    }

    pub fn submit_enabled(&self) -> bool {
        submit_enabled(&self.store.response_message(), self.prompts.len())
    }

    /// Snapshot the prompts and run one inference round trip
    ///
    /// Navigation is locked for the duration of the request. The collection
    /// is kept as-is afterwards so the user can refine and resend.
    pub async fn submit(&self, source_type: &str) -> Result<RequestOutcome> {
        let viewport = self.store.viewport().ok_or(Error::MissingViewport)?;
        let body = InferenceRequestBody::from_viewport(&viewport, &self.prompts, source_type);

        self.store.set_navigation_locked(true);
        let outcome = request_geojson(&self.transport, &self.store, &body, &self.endpoint).await;
        self.store.set_navigation_locked(false);

        Ok(outcome)
    }
}
