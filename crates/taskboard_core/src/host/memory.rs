//! In-memory rendering host.
//!
//! # Responsibility
//! - Provide a document tree, template registry and listener table that
//!   behave like the browser surface the board views are written against.
//! - Record user notices instead of blocking, so callers can inspect them.
//!
//! # Invariants
//! - Node 0 is the document body; an element is attached when its parent
//!   chain reaches the body.
//! - `clear_children` frees the removed subtrees, listeners included; their
//!   slots are recycled and stale handles resolve to `UnknownHandle`.
//! - No `RefCell` borrow is held while an event handler runs.

use crate::host::event::{EventHandler, EventKind, HostEvent};
use crate::host::{ElementHandle, HostError, HostResult, InsertPosition, RenderHost};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;
use std::rc::Rc;

static ID_SELECTOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([A-Za-z][A-Za-z0-9_-]*)$").expect("valid id selector regex"));
static TAG_SELECTOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9]*$").expect("valid tag selector regex"));

const BODY: usize = 0;

/// Template id of the entity input form.
pub const INPUT_TEMPLATE_ID: &str = "entity-input";
/// Template id of one status list.
pub const LIST_TEMPLATE_ID: &str = "entity-list";
/// Template id of one entity item.
pub const ITEM_TEMPLATE_ID: &str = "single-entity";
/// Id of the element all board views attach to.
pub const APP_HOST_ID: &str = "app";

/// Static markup stored in a template and cloned on `instantiate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateNode {
    tag: String,
    id: Option<String>,
    text: String,
    children: Vec<TemplateNode>,
}

impl TemplateNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn child(mut self, child: TemplateNode) -> Self {
        self.children.push(child);
        self
    }
}

struct Node {
    tag: String,
    id: Option<String>,
    text: String,
    classes: BTreeSet<String>,
    value: Option<String>,
    parent: Option<usize>,
    children: Vec<usize>,
    listeners: Vec<(EventKind, EventHandler)>,
}

impl Node {
    fn new(tag: &str) -> Self {
        let is_input = matches!(tag, "input" | "textarea");
        Self {
            tag: tag.to_string(),
            id: None,
            text: String::new(),
            classes: BTreeSet::new(),
            value: is_input.then(String::new),
            parent: None,
            children: Vec::new(),
            listeners: Vec::new(),
        }
    }
}

/// Arena slot. `node` is `None` once freed; `generation` bumps on every free.
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Default)]
struct DocumentTree {
    slots: Vec<Slot>,
    free: Vec<usize>,
    templates: HashMap<String, TemplateNode>,
    notices: Vec<String>,
}

impl DocumentTree {
    fn handle(&self, key: usize) -> ElementHandle {
        ElementHandle {
            key,
            generation: self.slots[key].generation,
        }
    }

    fn resolve(&self, handle: ElementHandle) -> HostResult<usize> {
        match self.slots.get(handle.key) {
            Some(slot) if slot.generation == handle.generation && slot.node.is_some() => {
                Ok(handle.key)
            }
            _ => Err(HostError::UnknownHandle(handle.key)),
        }
    }

    fn node(&self, handle: ElementHandle) -> HostResult<&Node> {
        let key = self.resolve(handle)?;
        Ok(self.at(key))
    }

    fn node_mut(&mut self, handle: ElementHandle) -> HostResult<&mut Node> {
        let key = self.resolve(handle)?;
        Ok(self.at_mut(key))
    }

    /// Live node at `key`. Keys reachable through parent/child links are live.
    fn at(&self, key: usize) -> &Node {
        match &self.slots[key].node {
            Some(node) => node,
            None => unreachable!("tree link points at freed slot {key}"),
        }
    }

    fn at_mut(&mut self, key: usize) -> &mut Node {
        match &mut self.slots[key].node {
            Some(node) => node,
            None => unreachable!("tree link points at freed slot {key}"),
        }
    }

    fn alloc(&mut self, node: Node) -> usize {
        match self.free.pop() {
            Some(key) => {
                self.slots[key].node = Some(node);
                key
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        }
    }

    /// Frees `key` and its whole subtree. The caller unlinks it from its parent.
    fn free_subtree(&mut self, key: usize) {
        let Some(node) = self.slots[key].node.take() else {
            return;
        };
        self.slots[key].generation = self.slots[key].generation.wrapping_add(1);
        for child in node.children {
            self.free_subtree(child);
        }
        // Pushed last so the next allocation reuses the subtree root's slot.
        self.free.push(key);
    }

    fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    fn build(&mut self, template: &TemplateNode) -> usize {
        let mut node = Node::new(&template.tag);
        node.id = template.id.clone();
        node.text = template.text.clone();
        let key = self.alloc(node);
        for child in &template.children {
            let child_key = self.build(child);
            self.at_mut(child_key).parent = Some(key);
            self.at_mut(key).children.push(child_key);
        }
        key
    }

    fn is_attached(&self, mut key: usize) -> bool {
        loop {
            if key == BODY {
                return true;
            }
            match self.at(key).parent {
                Some(parent) => key = parent,
                None => return false,
            }
        }
    }

    fn detach(&mut self, key: usize) {
        if let Some(parent) = self.at_mut(key).parent.take() {
            self.at_mut(parent).children.retain(|child| *child != key);
        }
    }

    fn find_descendant(&self, root: usize, matches: &dyn Fn(&Node) -> bool) -> Option<usize> {
        for &child in &self.at(root).children {
            if matches(self.at(child)) {
                return Some(child);
            }
            if let Some(found) = self.find_descendant(child, matches) {
                return Some(found);
            }
        }
        None
    }

    fn write_outline(&self, key: usize, depth: usize, out: &mut String) {
        let node = self.at(key);
        let _ = write!(out, "{}<{}", "  ".repeat(depth), node.tag);
        if let Some(id) = &node.id {
            let _ = write!(out, "#{id}");
        }
        for class in &node.classes {
            let _ = write!(out, ".{class}");
        }
        out.push('>');
        if !node.text.is_empty() {
            let _ = write!(out, " {}", node.text);
        }
        if let Some(value) = &node.value {
            let _ = write!(out, " value={value:?}");
        }
        out.push('\n');
        for &child in &node.children {
            self.write_outline(child, depth + 1, out);
        }
    }
}

/// Shared-handle document. Clones refer to the same tree.
#[derive(Clone)]
pub struct MemoryDocument {
    tree: Rc<RefCell<DocumentTree>>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Creates a document containing only an empty body.
    pub fn new() -> Self {
        let mut tree = DocumentTree::default();
        tree.alloc(Node::new("body"));
        Self {
            tree: Rc::new(RefCell::new(tree)),
        }
    }

    /// Creates a document with the `app` host and the three board templates.
    pub fn with_board_templates() -> Self {
        let document = Self::new();
        document.append_to_body(&TemplateNode::new("div").with_id(APP_HOST_ID));
        document.add_template(
            INPUT_TEMPLATE_ID,
            TemplateNode::new("form")
                .child(
                    TemplateNode::new("div")
                        .child(TemplateNode::new("label").with_text("Title"))
                        .child(TemplateNode::new("input").with_id("title")),
                )
                .child(
                    TemplateNode::new("div")
                        .child(TemplateNode::new("label").with_text("Description"))
                        .child(TemplateNode::new("textarea").with_id("description")),
                )
                .child(
                    TemplateNode::new("div")
                        .child(TemplateNode::new("label").with_text("People"))
                        .child(TemplateNode::new("input").with_id("people")),
                )
                .child(TemplateNode::new("button").with_text("ADD PROJECT")),
        );
        document.add_template(
            LIST_TEMPLATE_ID,
            TemplateNode::new("section")
                .child(TemplateNode::new("header").child(TemplateNode::new("h2")))
                .child(TemplateNode::new("ul")),
        );
        document.add_template(
            ITEM_TEMPLATE_ID,
            TemplateNode::new("li")
                .child(TemplateNode::new("h2"))
                .child(TemplateNode::new("h3"))
                .child(TemplateNode::new("p")),
        );
        document
    }

    pub fn add_template(&self, template_id: &str, content: TemplateNode) {
        self.tree
            .borrow_mut()
            .templates
            .insert(template_id.to_string(), content);
    }

    /// Builds `markup` and appends it to the body.
    pub fn append_to_body(&self, markup: &TemplateNode) -> ElementHandle {
        let mut tree = self.tree.borrow_mut();
        let key = tree.build(markup);
        tree.at_mut(key).parent = Some(BODY);
        tree.at_mut(BODY).children.push(key);
        tree.handle(key)
    }

    /// Delivers `event` to `target`, then to each ancestor in turn.
    pub fn dispatch(&self, target: ElementHandle, event: &mut HostEvent) -> HostResult<()> {
        let handlers: Vec<EventHandler> = {
            let tree = self.tree.borrow();
            let mut handlers = Vec::new();
            let mut cursor = Some(tree.resolve(target)?);
            while let Some(key) = cursor {
                let node = tree.at(key);
                handlers.extend(
                    node.listeners
                        .iter()
                        .filter(|(kind, _)| *kind == event.kind)
                        .map(|(_, handler)| Rc::clone(handler)),
                );
                cursor = node.parent;
            }
            handlers
        };
        for handler in handlers {
            handler(event);
        }
        Ok(())
    }

    /// Drains notices raised through `notify_user`, oldest first.
    pub fn take_notices(&self) -> Vec<String> {
        std::mem::take(&mut self.tree.borrow_mut().notices)
    }

    pub fn children(&self, element: ElementHandle) -> HostResult<Vec<ElementHandle>> {
        let tree = self.tree.borrow();
        Ok(tree
            .node(element)?
            .children
            .iter()
            .map(|key| tree.handle(*key))
            .collect())
    }

    pub fn element_id(&self, element: ElementHandle) -> HostResult<Option<String>> {
        Ok(self.tree.borrow().node(element)?.id.clone())
    }

    /// Returns whether `element` is live and reachable from the body.
    pub fn is_attached(&self, element: ElementHandle) -> bool {
        let tree = self.tree.borrow();
        tree.resolve(element)
            .map(|key| tree.is_attached(key))
            .unwrap_or(false)
    }

    /// Number of allocated elements, attached or not.
    pub fn live_nodes(&self) -> usize {
        self.tree.borrow().live_count()
    }

    /// Indented text rendering of everything attached to the body.
    pub fn outline(&self) -> String {
        let tree = self.tree.borrow();
        let mut out = String::new();
        tree.write_outline(BODY, 0, &mut out);
        out
    }
}

impl RenderHost for MemoryDocument {
    fn instantiate(&self, template_id: &str) -> HostResult<ElementHandle> {
        let mut tree = self.tree.borrow_mut();
        let template = tree
            .templates
            .get(template_id)
            .cloned()
            .ok_or_else(|| HostError::TemplateNotFound(template_id.to_string()))?;
        let key = tree.build(&template);
        Ok(tree.handle(key))
    }

    fn element_by_id(&self, id: &str) -> HostResult<ElementHandle> {
        let tree = self.tree.borrow();
        tree.find_descendant(BODY, &|node: &Node| node.id.as_deref() == Some(id))
            .map(|key| tree.handle(key))
            .ok_or_else(|| HostError::ElementNotFound(id.to_string()))
    }

    fn set_element_id(&self, element: ElementHandle, id: &str) -> HostResult<()> {
        self.tree.borrow_mut().node_mut(element)?.id = Some(id.to_string());
        Ok(())
    }

    fn insert(
        &self,
        host: ElementHandle,
        element: ElementHandle,
        position: InsertPosition,
    ) -> HostResult<()> {
        let mut tree = self.tree.borrow_mut();
        let host_key = tree.resolve(host)?;
        let element_key = tree.resolve(element)?;
        tree.detach(element_key);
        tree.at_mut(element_key).parent = Some(host_key);
        let children = &mut tree.at_mut(host_key).children;
        match position {
            InsertPosition::Start => children.insert(0, element_key),
            InsertPosition::End => children.push(element_key),
        }
        Ok(())
    }

    fn query(&self, root: ElementHandle, selector: &str) -> HostResult<ElementHandle> {
        let tree = self.tree.borrow();
        let root_key = tree.resolve(root)?;
        let found = if let Some(captures) = ID_SELECTOR_RE.captures(selector) {
            let id = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
            tree.find_descendant(root_key, &|node: &Node| node.id.as_deref() == Some(id))
        } else if TAG_SELECTOR_RE.is_match(selector) {
            tree.find_descendant(root_key, &|node: &Node| node.tag == selector)
        } else {
            return Err(HostError::InvalidSelector(selector.to_string()));
        };
        found
            .map(|key| tree.handle(key))
            .ok_or_else(|| HostError::NoMatch {
                selector: selector.to_string(),
            })
    }

    fn set_text(&self, element: ElementHandle, text: &str) -> HostResult<()> {
        self.tree.borrow_mut().node_mut(element)?.text = text.to_string();
        Ok(())
    }

    fn text(&self, element: ElementHandle) -> HostResult<String> {
        Ok(self.tree.borrow().node(element)?.text.clone())
    }

    fn toggle_class(&self, element: ElementHandle, class: &str, on: bool) -> HostResult<()> {
        let mut tree = self.tree.borrow_mut();
        let classes = &mut tree.node_mut(element)?.classes;
        if on {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
        Ok(())
    }

    fn has_class(&self, element: ElementHandle, class: &str) -> HostResult<bool> {
        Ok(self.tree.borrow().node(element)?.classes.contains(class))
    }

    fn clear_children(&self, element: ElementHandle) -> HostResult<()> {
        let mut tree = self.tree.borrow_mut();
        let children = std::mem::take(&mut tree.node_mut(element)?.children);
        for child in children {
            tree.free_subtree(child);
        }
        Ok(())
    }

    fn input_value(&self, element: ElementHandle) -> HostResult<String> {
        self.tree
            .borrow()
            .node(element)?
            .value
            .clone()
            .ok_or(HostError::NotAnInput(element.key))
    }

    fn set_input_value(&self, element: ElementHandle, value: &str) -> HostResult<()> {
        let mut tree = self.tree.borrow_mut();
        match tree.node_mut(element)?.value.as_mut() {
            Some(slot) => {
                *slot = value.to_string();
                Ok(())
            }
            None => Err(HostError::NotAnInput(element.key)),
        }
    }

    fn listen(
        &self,
        element: ElementHandle,
        kind: EventKind,
        handler: EventHandler,
    ) -> HostResult<()> {
        self.tree
            .borrow_mut()
            .node_mut(element)?
            .listeners
            .push((kind, handler));
        Ok(())
    }

    fn notify_user(&self, message: &str) {
        self.tree.borrow_mut().notices.push(message.to_string());
    }
}
