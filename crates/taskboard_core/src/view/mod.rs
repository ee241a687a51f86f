//! Board views.
//!
//! # Responsibility
//! - Share one mount lifecycle across every renderable view.
//! - Define the drag source/target capabilities the views implement.
//!
//! # Invariants
//! - A view wires its listeners exactly once, during construction.
//! - Views never mutate entities directly; all changes go through the store.

pub mod board;
pub mod form;
pub mod item;
pub mod list;

use crate::host::{DataTransfer, ElementHandle, HostResult, InsertPosition, RenderHost};
use std::rc::Rc;

/// Element cloned from a template and attached to a host element.
pub struct Mount {
    host: Rc<dyn RenderHost>,
    element: ElementHandle,
}

impl Mount {
    /// Instantiates `template_id`, optionally assigns `element_id`, and inserts
    /// the element into the element with id `host_id` at `position`.
    pub fn new(
        host: Rc<dyn RenderHost>,
        template_id: &str,
        host_id: &str,
        position: InsertPosition,
        element_id: Option<&str>,
    ) -> HostResult<Self> {
        let host_element = host.element_by_id(host_id)?;
        let element = host.instantiate(template_id)?;
        if let Some(id) = element_id {
            host.set_element_id(element, id)?;
        }
        host.insert(host_element, element, position)?;
        Ok(Self { host, element })
    }

    pub fn host(&self) -> &Rc<dyn RenderHost> {
        &self.host
    }

    pub fn element(&self) -> ElementHandle {
        self.element
    }

    /// First descendant of this view's element matching `selector`.
    pub fn query(&self, selector: &str) -> HostResult<ElementHandle> {
        self.host.query(self.element, selector)
    }
}

/// Lifecycle every concrete view supplies.
pub trait Component {
    fn mount(&self) -> &Mount;
    /// Registers event listeners. Called once, at construction.
    fn configure(&self) -> HostResult<()>;
    /// Paints the initial content.
    fn render_content(&self) -> HostResult<()>;
}

/// Runs the construction-time lifecycle: listeners first, then paint.
pub(crate) fn activate<C: Component + ?Sized>(component: &C) -> HostResult<()> {
    component.configure()?;
    component.render_content()
}

/// Origin side of a drag.
pub trait DragSource {
    /// Writes the payload and allowed effect into `transfer`.
    fn begin_transfer(&self, transfer: &mut DataTransfer);
    fn on_transfer_end(&self);
}

/// Receiving side of a drag.
pub trait DragTarget {
    fn can_accept(&self, payload_kind: &str) -> bool;
    fn on_enter(&self);
    fn on_leave(&self);
    fn on_accept(&self, payload: &str);
}
