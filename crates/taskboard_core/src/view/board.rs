//! Board composition root.

use crate::host::{HostResult, RenderHost};
use crate::model::entity::EntityStatus;
use crate::store::observable::ObservableStore;
use crate::validation::FormRules;
use crate::view::form::InputForm;
use crate::view::list::ListView;
use log::info;
use std::rc::Rc;

/// The mounted form and both status lists, sharing one store.
pub struct Board {
    pub form: Rc<InputForm>,
    pub active: Rc<ListView>,
    pub finished: Rc<ListView>,
}

impl Board {
    /// Mounts the form, then the `Active` list, then the `Finished` list.
    pub fn mount(
        host: Rc<dyn RenderHost>,
        store: Rc<ObservableStore>,
        rules: FormRules,
    ) -> HostResult<Self> {
        let form = InputForm::new(Rc::clone(&host), Rc::clone(&store), rules)?;
        let active = ListView::new(Rc::clone(&host), Rc::clone(&store), EntityStatus::Active)?;
        let finished = ListView::new(host, store, EntityStatus::Finished)?;
        info!("event=board_mount module=view status=ok lists=2");
        Ok(Self {
            form,
            active,
            finished,
        })
    }

    pub fn list(&self, status: EntityStatus) -> &Rc<ListView> {
        match status {
            EntityStatus::Active => &self.active,
            EntityStatus::Finished => &self.finished,
        }
    }
}
