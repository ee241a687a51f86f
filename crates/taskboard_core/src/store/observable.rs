//! Observable entity store.
//!
//! # Responsibility
//! - Append new entities and apply status transitions.
//! - Notify subscribers, in subscription order, with a fresh snapshot.
//!
//! # Invariants
//! - Insertion order is preserved; status changes never reorder entities.
//! - Unknown ids and same-status moves are silent no-ops without notification.
//! - Mutations requested during a notification round are queued and applied
//!   after that round completes, in request order.
//! - A round aborted by a panicking listener discards whatever it queued.

use crate::model::entity::{Entity, EntityId, EntityStatus};
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Subscriber callback. Receives its own copy of the full sequence.
pub type Listener = Rc<dyn Fn(Vec<Entity>)>;

enum Mutation {
    Append(Entity),
    SetStatus { id: EntityId, status: EntityStatus },
}

/// Single-threaded publish/subscribe store over the entity sequence.
///
/// Construct once at startup and share it as `Rc<ObservableStore>` with every
/// view that reads or mutates board state.
pub struct ObservableStore {
    entities: RefCell<Vec<Entity>>,
    listeners: RefCell<Vec<Listener>>,
    pending: RefCell<VecDeque<Mutation>>,
    dispatching: Cell<bool>,
}

impl Default for ObservableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObservableStore {
    pub fn new() -> Self {
        Self {
            entities: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            pending: RefCell::new(VecDeque::new()),
            dispatching: Cell::new(false),
        }
    }

    /// Appends a subscriber. The same listener may be registered repeatedly
    /// and then runs once per registration.
    pub fn subscribe(&self, listener: Listener) {
        self.listeners.borrow_mut().push(listener);
    }

    /// Creates an `Active` entity at the end of the sequence and returns its id.
    ///
    /// Inputs are stored as given; validation happens before this call.
    pub fn add(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        assignee_count: u32,
    ) -> EntityId {
        let entity = Entity::new(title, description, assignee_count);
        let id = entity.id;
        self.apply(Mutation::Append(entity));
        id
    }

    /// Moves the entity with `id` to `status` in place.
    ///
    /// Does nothing when `id` is unknown or the entity already has `status`.
    pub fn move_status(&self, id: EntityId, status: EntityStatus) {
        self.apply(Mutation::SetStatus { id, status });
    }

    /// Returns a copy of the current sequence.
    pub fn snapshot(&self) -> Vec<Entity> {
        self.entities.borrow().clone()
    }

    pub fn get(&self, id: EntityId) -> Option<Entity> {
        self.entities
            .borrow()
            .iter()
            .find(|entity| entity.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entities.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.borrow().is_empty()
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn apply(&self, mutation: Mutation) {
        self.pending.borrow_mut().push_back(mutation);
        if self.dispatching.get() {
            debug!(
                "event=store_mutation_deferred module=store status=ok queued={}",
                self.pending.borrow().len()
            );
            return;
        }

        let _round = DispatchGuard::enter(self);
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(mutation) = next else {
                break;
            };
            if self.commit(mutation) {
                self.notify();
            }
        }
    }

    /// Applies one mutation. Returns whether the sequence changed.
    fn commit(&self, mutation: Mutation) -> bool {
        match mutation {
            Mutation::Append(entity) => {
                info!(
                    "event=entity_added module=store status=ok id={} assignees={}",
                    entity.id, entity.assignee_count
                );
                self.entities.borrow_mut().push(entity);
                true
            }
            Mutation::SetStatus { id, status } => {
                let mut entities = self.entities.borrow_mut();
                match entities.iter_mut().find(|entity| entity.id == id) {
                    None => {
                        debug!("event=entity_move module=store status=skipped reason=not_found id={id}");
                        false
                    }
                    Some(entity) if entity.status == status => {
                        debug!(
                            "event=entity_move module=store status=skipped reason=same_status id={id} to={status}"
                        );
                        false
                    }
                    Some(entity) => {
                        info!(
                            "event=entity_move module=store status=ok id={id} from={} to={status}",
                            entity.status
                        );
                        entity.status = status;
                        true
                    }
                }
            }
        }
    }

    fn notify(&self) {
        // Listeners may subscribe or read the store while running.
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in &listeners {
            let snapshot = self.snapshot();
            listener(snapshot);
        }
    }
}

/// Ends a dispatch run, also when a listener panics.
struct DispatchGuard<'a> {
    store: &'a ObservableStore,
}

impl<'a> DispatchGuard<'a> {
    fn enter(store: &'a ObservableStore) -> Self {
        store.dispatching.set(true);
        Self { store }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            if let Ok(mut pending) = self.store.pending.try_borrow_mut() {
                let discarded = pending.len();
                pending.clear();
                if discarded > 0 {
                    warn!(
                        "event=store_mutation_discarded module=store status=error reason=listener_panic count={discarded}"
                    );
                }
            }
        }
        self.store.dispatching.set(false);
    }
}
