//! Rendering host contracts.
//!
//! # Responsibility
//! - Describe the DOM-like surface views render into: templates, element
//!   lookup, text/class/input mutation, event listeners, user notices.
//! - Keep views independent from any concrete document implementation.
//!
//! # Invariants
//! - Handles are opaque; only the host that issued one can resolve it.
//! - Event handlers run synchronously inside `dispatch`, to completion.
//!
//! # See also
//! - `memory::MemoryDocument` for the in-process implementation.

pub mod event;
pub mod memory;

pub use event::{DataTransfer, DropEffect, EventHandler, EventKind, HostEvent, PLAIN_TEXT_KIND};

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type HostResult<T> = Result<T, HostError>;

/// Opaque reference to one element owned by a `RenderHost`.
///
/// `generation` tells a live element apart from a freed one whose slot
/// was reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    pub(crate) key: usize,
    pub(crate) generation: u32,
}

/// Where a freshly instantiated element goes inside its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Before the host's first child.
    Start,
    /// After the host's last child.
    End,
}

/// Failures reported by the rendering host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    TemplateNotFound(String),
    ElementNotFound(String),
    UnknownHandle(usize),
    InvalidSelector(String),
    NoMatch { selector: String },
    NotAnInput(usize),
}

impl Display for HostError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TemplateNotFound(id) => write!(f, "template not found: `{id}`"),
            Self::ElementNotFound(id) => write!(f, "element not found: `#{id}`"),
            Self::UnknownHandle(key) => write!(f, "unknown element handle: {key}"),
            Self::InvalidSelector(selector) => write!(f, "invalid selector: `{selector}`"),
            Self::NoMatch { selector } => write!(f, "no element matches `{selector}`"),
            Self::NotAnInput(key) => write!(f, "element {key} is not an input"),
        }
    }
}

impl Error for HostError {}

/// DOM-like collaborator every view renders through.
pub trait RenderHost {
    /// Deep-clones a template's content and returns its first element, detached.
    fn instantiate(&self, template_id: &str) -> HostResult<ElementHandle>;
    /// Finds an element attached to the document by its id.
    fn element_by_id(&self, id: &str) -> HostResult<ElementHandle>;
    fn set_element_id(&self, element: ElementHandle, id: &str) -> HostResult<()>;
    fn insert(
        &self,
        host: ElementHandle,
        element: ElementHandle,
        position: InsertPosition,
    ) -> HostResult<()>;
    /// First descendant matching `#id` or a tag name, depth-first.
    fn query(&self, root: ElementHandle, selector: &str) -> HostResult<ElementHandle>;
    fn set_text(&self, element: ElementHandle, text: &str) -> HostResult<()>;
    fn text(&self, element: ElementHandle) -> HostResult<String>;
    fn toggle_class(&self, element: ElementHandle, class: &str, on: bool) -> HostResult<()>;
    fn has_class(&self, element: ElementHandle, class: &str) -> HostResult<bool>;
    /// Removes every child of `element` and frees the removed subtrees.
    /// Handles to freed elements resolve to `HostError::UnknownHandle`.
    fn clear_children(&self, element: ElementHandle) -> HostResult<()>;
    fn input_value(&self, element: ElementHandle) -> HostResult<String>;
    fn set_input_value(&self, element: ElementHandle, value: &str) -> HostResult<()>;
    fn listen(
        &self,
        element: ElementHandle,
        kind: EventKind,
        handler: EventHandler,
    ) -> HostResult<()>;
    /// Shows a blocking notice to the user.
    fn notify_user(&self, message: &str);
}
