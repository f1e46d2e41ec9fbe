//! SamGIS prompt core library
//!
//! UI-agnostic prompt lifecycle shared by the CLI and any map front end:
//! prompt model, collection manager, basemap lookup, request/response
//! protocol and observable UI state.

pub mod types;
pub mod table;
pub mod collection;
pub mod basemap;
pub mod query;
pub mod state;
pub mod envelope;
pub mod transport;
pub mod request;
pub mod session;
pub mod error;

pub use types::{BoundingBox, LatLng, PointPrompt, Prompt, PromptId, PromptLabel, RectanglePrompt};
pub use table::{project_all, to_table_row, TableRow};
pub use collection::{popup_text, PromptCollection, ShapeEvent, ShapeGeometry, ShapeKind, WidgetEvent};
pub use basemap::{resolve, ProviderTable, ResolvedBasemap, TileProvider};
pub use query::{parse_query, QueryParams};
pub use state::{MapViewport, StateStore, UiState, IDLE_MESSAGE, WAITING_MESSAGE};
pub use envelope::{compose_envelope, decode_envelope, decode_response, GeometryPayload, InferenceOutput};
pub use transport::{HttpReply, HttpTransport};
pub use request::{request_geojson, InferenceRequestBody, RequestOutcome};
pub use session::PromptSession;
pub use error::{Error, Result};
