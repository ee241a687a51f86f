//! Status list view and drop target.
//!
//! # Invariants
//! - The rendered items are exactly the store entities whose status equals
//!   the list status, in store order.
//! - Every store notification re-renders the whole list.

use crate::host::memory::{APP_HOST_ID, LIST_TEMPLATE_ID};
use crate::host::{
    ElementHandle, EventKind, HostEvent, HostResult, InsertPosition, RenderHost, PLAIN_TEXT_KIND,
};
use crate::model::entity::{Entity, EntityId, EntityStatus};
use crate::store::observable::{Listener, ObservableStore};
use crate::view::item::ItemView;
use crate::view::{activate, Component, DragTarget, Mount};
use log::{debug, error};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Class set on the list while an acceptable drag hovers over it.
pub const DROPPABLE_CLASS: &str = "droppable";

/// Renders the entities of one status bucket.
pub struct ListView {
    this: Weak<ListView>,
    mount: Mount,
    status: EntityStatus,
    store: Rc<ObservableStore>,
    filtered: RefCell<Vec<Entity>>,
    items: RefCell<Vec<Rc<ItemView>>>,
}

impl ListView {
    /// Appends the list for `status` to the app host and subscribes it to `store`.
    pub fn new(
        host: Rc<dyn RenderHost>,
        store: Rc<ObservableStore>,
        status: EntityStatus,
    ) -> HostResult<Rc<Self>> {
        let element_id = format!("{status}-entities");
        let mount = Mount::new(
            host,
            LIST_TEMPLATE_ID,
            APP_HOST_ID,
            InsertPosition::End,
            Some(&element_id),
        )?;
        let view = Rc::new_cyclic(|this| Self {
            this: this.clone(),
            mount,
            status,
            store,
            filtered: RefCell::new(Vec::new()),
            items: RefCell::new(Vec::new()),
        });
        activate(&*view)?;
        Ok(view)
    }

    pub fn status(&self) -> EntityStatus {
        self.status
    }

    /// Entities currently shown, in store order.
    pub fn filtered(&self) -> Vec<Entity> {
        self.filtered.borrow().clone()
    }

    pub fn item_count(&self) -> usize {
        self.items.borrow().len()
    }

    /// Id of the inner `ul` items are appended to.
    pub fn list_id(&self) -> String {
        format!("{}-entities-list", self.status)
    }

    pub fn list_element(&self) -> HostResult<ElementHandle> {
        self.mount.query("ul")
    }

    fn render_entities(&self, snapshot: Vec<Entity>) -> HostResult<()> {
        let filtered: Vec<Entity> = snapshot
            .into_iter()
            .filter(|entity| entity.status == self.status)
            .collect();

        let host = self.mount.host();
        host.clear_children(self.list_element()?)?;
        self.items.borrow_mut().clear();

        let list_id = self.list_id();
        let mut items = Vec::with_capacity(filtered.len());
        for entity in &filtered {
            items.push(ItemView::new(Rc::clone(host), &list_id, entity.clone())?);
        }

        debug!(
            "event=list_render module=view status=ok list={} items={}",
            self.status,
            items.len()
        );
        *self.filtered.borrow_mut() = filtered;
        *self.items.borrow_mut() = items;
        Ok(())
    }

    fn set_droppable(&self, on: bool) {
        let result = self
            .list_element()
            .and_then(|list| self.mount.host().toggle_class(list, DROPPABLE_CLASS, on));
        if let Err(err) = result {
            error!(
                "event=list_highlight module=view status=error list={} error={err}",
                self.status
            );
        }
    }
}

impl Component for ListView {
    fn mount(&self) -> &Mount {
        &self.mount
    }

    fn configure(&self) -> HostResult<()> {
        let host = self.mount.host();
        let element = self.mount.element();

        let this = self.this.clone();
        host.listen(
            element,
            EventKind::DragOver,
            Rc::new(move |event: &mut HostEvent| {
                let Some(view) = this.upgrade() else {
                    return;
                };
                let acceptable = event
                    .transfer
                    .as_ref()
                    .and_then(|transfer| transfer.first_type())
                    .is_some_and(|kind| view.can_accept(kind));
                if acceptable {
                    event.prevent_default();
                    view.on_enter();
                }
            }),
        )?;

        let this = self.this.clone();
        host.listen(
            element,
            EventKind::DragLeave,
            Rc::new(move |_event: &mut HostEvent| {
                if let Some(view) = this.upgrade() {
                    view.on_leave();
                }
            }),
        )?;

        let this = self.this.clone();
        host.listen(
            element,
            EventKind::Drop,
            Rc::new(move |event: &mut HostEvent| {
                let Some(view) = this.upgrade() else {
                    return;
                };
                let payload = event
                    .transfer
                    .as_ref()
                    .and_then(|transfer| transfer.get_data(PLAIN_TEXT_KIND))
                    .map(str::to_string);
                match payload {
                    Some(payload) => view.on_accept(&payload),
                    None => debug!(
                        "event=list_drop module=view status=skipped reason=no_payload list={}",
                        view.status
                    ),
                }
            }),
        )?;

        let this = self.this.clone();
        let listener: Listener = Rc::new(move |snapshot: Vec<Entity>| {
            let Some(view) = this.upgrade() else {
                return;
            };
            if let Err(err) = view.render_entities(snapshot) {
                error!(
                    "event=list_render module=view status=error list={} error={err}",
                    view.status
                );
            }
        });
        self.store.subscribe(listener);
        Ok(())
    }

    fn render_content(&self) -> HostResult<()> {
        let host = self.mount.host();
        let list = self.list_element()?;
        host.set_element_id(list, &self.list_id())?;
        host.set_text(
            self.mount.query("h2")?,
            &format!("{} PROJECTS", self.status.label()),
        )?;
        self.render_entities(self.store.snapshot())
    }
}

impl DragTarget for ListView {
    fn can_accept(&self, payload_kind: &str) -> bool {
        payload_kind == PLAIN_TEXT_KIND
    }

    fn on_enter(&self) {
        self.set_droppable(true);
    }

    fn on_leave(&self) {
        self.set_droppable(false);
    }

    fn on_accept(&self, payload: &str) {
        self.set_droppable(false);
        match payload.trim().parse::<EntityId>() {
            Ok(id) => self.store.move_status(id, self.status),
            Err(_) => debug!(
                "event=list_drop module=view status=skipped reason=bad_payload list={}",
                self.status
            ),
        }
    }
}
