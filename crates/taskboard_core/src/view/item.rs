//! Single entity view and drag source.

use crate::host::memory::ITEM_TEMPLATE_ID;
use crate::host::{
    DataTransfer, DropEffect, EventKind, HostEvent, HostResult, InsertPosition, RenderHost,
    PLAIN_TEXT_KIND,
};
use crate::model::entity::Entity;
use crate::view::{activate, Component, DragSource, Mount};
use log::debug;
use std::rc::{Rc, Weak};

/// Renders one entity as a list entry that can be dragged.
pub struct ItemView {
    this: Weak<ItemView>,
    mount: Mount,
    entity: Entity,
}

impl ItemView {
    /// Appends a new item for `entity` to the element with id `host_id`.
    pub fn new(host: Rc<dyn RenderHost>, host_id: &str, entity: Entity) -> HostResult<Rc<Self>> {
        let element_id = entity.id.to_string();
        let mount = Mount::new(
            host,
            ITEM_TEMPLATE_ID,
            host_id,
            InsertPosition::End,
            Some(&element_id),
        )?;
        let view = Rc::new_cyclic(|this| Self {
            this: this.clone(),
            mount,
            entity,
        });
        activate(&*view)?;
        Ok(view)
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }
}

impl Component for ItemView {
    fn mount(&self) -> &Mount {
        &self.mount
    }

    fn configure(&self) -> HostResult<()> {
        let host = self.mount.host();
        let element = self.mount.element();

        let this = self.this.clone();
        host.listen(
            element,
            EventKind::DragStart,
            Rc::new(move |event: &mut HostEvent| {
                if let Some(view) = this.upgrade() {
                    view.begin_transfer(event.transfer.get_or_insert_with(DataTransfer::new));
                }
            }),
        )?;

        let this = self.this.clone();
        host.listen(
            element,
            EventKind::DragEnd,
            Rc::new(move |_event: &mut HostEvent| {
                if let Some(view) = this.upgrade() {
                    view.on_transfer_end();
                }
            }),
        )
    }

    fn render_content(&self) -> HostResult<()> {
        let host = self.mount.host();
        host.set_text(self.mount.query("h2")?, &self.entity.title)?;
        host.set_text(self.mount.query("p")?, &self.entity.description)?;
        host.set_text(
            self.mount.query("h3")?,
            &format!("{} assigned", self.entity.assignee_label()),
        )
    }
}

impl DragSource for ItemView {
    fn begin_transfer(&self, transfer: &mut DataTransfer) {
        transfer.set_data(PLAIN_TEXT_KIND, &self.entity.id.to_string());
        transfer.effect_allowed = DropEffect::Move;
        debug!(
            "event=drag_start module=view status=ok id={} from={}",
            self.entity.id, self.entity.status
        );
    }

    fn on_transfer_end(&self) {
        debug!("event=drag_end module=view status=ok id={}", self.entity.id);
    }
}
