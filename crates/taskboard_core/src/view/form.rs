//! Entity input form.
//!
//! # Responsibility
//! - Read the three raw field values on submit and validate them.
//! - Ask the store to create an entity when validation passes.
//!
//! # Invariants
//! - The host's default submit handling is always suppressed.
//! - Inputs are cleared after every submit, accepted or not.
//! - A rejected submit raises exactly one user notice and no store change.

use crate::host::memory::{APP_HOST_ID, INPUT_TEMPLATE_ID};
use crate::host::{ElementHandle, EventKind, HostEvent, HostResult, InsertPosition, RenderHost};
use crate::model::entity::EntityId;
use crate::store::observable::ObservableStore;
use crate::validation::{validate_submission, FormRules, RawSubmission};
use crate::view::{activate, Component, Mount};
use log::{error, warn};
use std::rc::{Rc, Weak};

/// Notice shown when a submission is rejected.
pub const INVALID_INPUT_NOTICE: &str = "Invalid input, please try again!";
/// Element id assigned to the mounted form.
pub const FORM_ELEMENT_ID: &str = "user-input";

/// Form that produces new entities.
pub struct InputForm {
    this: Weak<InputForm>,
    mount: Mount,
    store: Rc<ObservableStore>,
    rules: FormRules,
    title_input: ElementHandle,
    description_input: ElementHandle,
    people_input: ElementHandle,
}

impl InputForm {
    /// Inserts the form at the start of the app host.
    pub fn new(
        host: Rc<dyn RenderHost>,
        store: Rc<ObservableStore>,
        rules: FormRules,
    ) -> HostResult<Rc<Self>> {
        let mount = Mount::new(
            host,
            INPUT_TEMPLATE_ID,
            APP_HOST_ID,
            InsertPosition::Start,
            Some(FORM_ELEMENT_ID),
        )?;
        let title_input = mount.query("#title")?;
        let description_input = mount.query("#description")?;
        let people_input = mount.query("#people")?;
        let view = Rc::new_cyclic(|this| Self {
            this: this.clone(),
            mount,
            store,
            rules,
            title_input,
            description_input,
            people_input,
        });
        activate(&*view)?;
        Ok(view)
    }

    /// Types `raw` into the three inputs.
    pub fn fill(&self, raw: &RawSubmission) -> HostResult<()> {
        let host = self.mount.host();
        host.set_input_value(self.title_input, &raw.title)?;
        host.set_input_value(self.description_input, &raw.description)?;
        host.set_input_value(self.people_input, &raw.assignee_count)
    }

    /// Current raw input values.
    pub fn raw_values(&self) -> HostResult<RawSubmission> {
        let host = self.mount.host();
        Ok(RawSubmission {
            title: host.input_value(self.title_input)?,
            description: host.input_value(self.description_input)?,
            assignee_count: host.input_value(self.people_input)?,
        })
    }

    /// Handles one submit event. Returns the created id, if any.
    pub fn submit(&self, event: &mut HostEvent) -> HostResult<Option<EntityId>> {
        event.prevent_default();
        let raw = self.raw_values()?;

        let created = match validate_submission(&raw, &self.rules) {
            Ok(submission) => Some(self.store.add(
                submission.title,
                submission.description,
                submission.assignee_count,
            )),
            Err(err) => {
                let fields: Vec<&str> = err.fields.iter().map(|e| e.field.as_str()).collect();
                warn!(
                    "event=form_submit module=view status=rejected fields={}",
                    fields.join(",")
                );
                self.mount.host().notify_user(INVALID_INPUT_NOTICE);
                None
            }
        };

        self.clear_inputs()?;
        Ok(created)
    }

    fn clear_inputs(&self) -> HostResult<()> {
        self.fill(&RawSubmission::default())
    }
}

impl Component for InputForm {
    fn mount(&self) -> &Mount {
        &self.mount
    }

    fn configure(&self) -> HostResult<()> {
        let this = self.this.clone();
        self.mount.host().listen(
            self.mount.element(),
            EventKind::Submit,
            Rc::new(move |event: &mut HostEvent| {
                let Some(form) = this.upgrade() else {
                    return;
                };
                if let Err(err) = form.submit(event) {
                    error!("event=form_submit module=view status=error error={err}");
                }
            }),
        )
    }

    fn render_content(&self) -> HostResult<()> {
        Ok(())
    }
}
