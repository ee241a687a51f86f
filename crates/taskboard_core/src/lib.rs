//! Core logic for the task board.
//! Owns the entity store, the view lifecycle and the drag-and-drop protocol.

pub mod config;
pub mod host;
pub mod logging;
pub mod model;
pub mod store;
pub mod validation;
pub mod view;

pub use config::{BoardConfig, ConfigError, ConfigResult};
pub use host::memory::{MemoryDocument, TemplateNode};
pub use host::{
    DataTransfer, DropEffect, ElementHandle, EventHandler, EventKind, HostError, HostEvent,
    HostResult, InsertPosition, RenderHost, PLAIN_TEXT_KIND,
};
pub use logging::{default_log_level, init_logging, logging_status, LogSink};
pub use model::entity::{Entity, EntityId, EntityStatus, UnknownStatusError};
pub use store::observable::{Listener, ObservableStore};
pub use validation::{
    validate, validate_submission, Field, FieldError, FieldValue, FormRules, RawSubmission,
    Submission, Validatable, ValidationError,
};
pub use view::board::Board;
pub use view::form::{InputForm, INVALID_INPUT_NOTICE};
pub use view::item::ItemView;
pub use view::list::{ListView, DROPPABLE_CLASS};
pub use view::{Component, DragSource, DragTarget, Mount};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
