//! Host events and drag transfer payloads.

use std::rc::Rc;

/// Payload kind carried by board drags: one plain-text entity id.
pub const PLAIN_TEXT_KIND: &str = "text/plain";

/// Event kinds views listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Submit,
    DragStart,
    DragEnd,
    DragOver,
    DragLeave,
    Drop,
}

/// Effect a drag source allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropEffect {
    #[default]
    None,
    Move,
}

/// Data carried by one drag operation, keyed by payload kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTransfer {
    entries: Vec<(String, String)>,
    pub effect_allowed: DropEffect,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `kind`, replacing an earlier value of the same kind.
    pub fn set_data(&mut self, kind: &str, value: &str) {
        match self.entries.iter_mut().find(|(existing, _)| existing == kind) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((kind.to_string(), value.to_string())),
        }
    }

    pub fn get_data(&self, kind: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == kind)
            .map(|(_, value)| value.as_str())
    }

    /// Payload kinds in the order they were set.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(kind, _)| kind.as_str())
    }

    pub fn first_type(&self) -> Option<&str> {
        self.types().next()
    }
}

/// One event travelling through the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEvent {
    pub kind: EventKind,
    pub transfer: Option<DataTransfer>,
    default_prevented: bool,
}

impl HostEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            transfer: None,
            default_prevented: false,
        }
    }

    pub fn with_transfer(kind: EventKind, transfer: DataTransfer) -> Self {
        Self {
            kind,
            transfer: Some(transfer),
            default_prevented: false,
        }
    }

    /// Suppresses the host's default handling (form submission, drop refusal).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Listener registered on an element.
pub type EventHandler = Rc<dyn Fn(&mut HostEvent)>;

#[cfg(test)]
mod tests {
    use super::{DataTransfer, PLAIN_TEXT_KIND};

    #[test]
    fn set_data_replaces_same_kind_and_keeps_order() {
        let mut transfer = DataTransfer::new();
        transfer.set_data(PLAIN_TEXT_KIND, "first");
        transfer.set_data("text/uri-list", "https://example.invalid");
        transfer.set_data(PLAIN_TEXT_KIND, "second");

        assert_eq!(transfer.get_data(PLAIN_TEXT_KIND), Some("second"));
        assert_eq!(transfer.first_type(), Some(PLAIN_TEXT_KIND));
        assert_eq!(transfer.types().count(), 2);
        assert_eq!(transfer.get_data("application/json"), None);
    }
}
