use std::{
    cell::RefCell,
    collections::HashMap,
    rc::{Rc, Weak},
};

use thiserror::Error;
use tracing::{debug, trace};

use super::{DragEvent, DragEventKind};

/// Identifier of an element in a [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Registration handle returned by [`Document::add_listener`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Native listener invoked while an event propagates through its element.
pub type Listener = Rc<dyn Fn(&mut DragEvent)>;

/// Errors raised while building the element tree.
#[derive(Debug, Error)]
pub enum HostError {
    /// The element does not exist (never created, or already removed).
    #[error("Unknown element {0:?}")]
    UnknownElement(ElementId),
    /// Appending the child would make an element its own ancestor.
    #[error("Appending {child:?} under {parent:?} would create a cycle")]
    WouldCycle { parent: ElementId, child: ElementId },
}

struct Node {
    label: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    draggable: bool,
}

struct Registration {
    id: ListenerId,
    element: ElementId,
    kind: DragEventKind,
    listener: Listener,
}

#[derive(Default)]
struct Tree {
    nodes: HashMap<ElementId, Node>,
    listeners: Vec<Registration>,
    next_element: u32,
    next_listener: u64,
}

impl Tree {
    fn node(&self, id: ElementId) -> Result<&Node, HostError> {
        self.nodes.get(&id).ok_or(HostError::UnknownElement(id))
    }

    fn is_ancestor_or_self(&self, ancestor: ElementId, mut node: ElementId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.nodes.get(&node).and_then(|n| n.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn detach(&mut self, child: ElementId) {
        let parent = self.nodes.get_mut(&child).and_then(|node| node.parent.take());
        if let Some(parent) = parent.and_then(|parent| self.nodes.get_mut(&parent)) {
            parent.children.retain(|id| *id != child);
        }
    }

    fn path(&self, target: ElementId) -> Vec<ElementId> {
        let mut path = Vec::new();
        let mut current = Some(target);
        while let Some(id) = current {
            let Some(node) = self.nodes.get(&id) else {
                break;
            };
            path.push(id);
            current = node.parent;
        }
        path
    }
}

/// Element tree with per-element drag listeners and bubbling dispatch.
///
/// Cloning yields another handle to the same tree. The tree is single-threaded;
/// listeners run with no internal borrow held, so they may freely query or
/// mutate the document.
#[derive(Clone, Default)]
pub struct Document {
    tree: Rc<RefCell<Tree>>,
}

/// Non-owning handle to a [`Document`], held by listeners stored inside it.
#[derive(Clone)]
pub struct WeakDocument {
    tree: Weak<RefCell<Tree>>,
}

impl WeakDocument {
    pub fn upgrade(&self) -> Option<Document> {
        self.tree.upgrade().map(|tree| Document { tree })
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn downgrade(&self) -> WeakDocument {
        WeakDocument {
            tree: Rc::downgrade(&self.tree),
        }
    }

    /// Create a detached element.
    pub fn create_element(&self, label: impl Into<String>) -> ElementId {
        let mut tree = self.tree.borrow_mut();
        let id = ElementId(tree.next_element);
        tree.next_element += 1;
        tree.nodes.insert(
            id,
            Node {
                label: label.into(),
                parent: None,
                children: Vec::new(),
                draggable: false,
            },
        );
        id
    }

    /// Move `child` (with its subtree) under `parent`.
    pub fn append_child(&self, parent: ElementId, child: ElementId) -> Result<(), HostError> {
        let mut tree = self.tree.borrow_mut();
        tree.node(parent)?;
        tree.node(child)?;
        if tree.is_ancestor_or_self(child, parent) {
            return Err(HostError::WouldCycle { parent, child });
        }
        tree.detach(child);
        if let Some(node) = tree.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = tree.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Remove an element, its descendants, and every listener registered on them.
    pub fn remove_element(&self, id: ElementId) -> Result<(), HostError> {
        let mut tree = self.tree.borrow_mut();
        tree.node(id)?;
        tree.detach(id);
        let mut pending = vec![id];
        let mut removed = Vec::new();
        while let Some(next) = pending.pop() {
            if let Some(node) = tree.nodes.remove(&next) {
                pending.extend(node.children);
                removed.push(next);
            }
        }
        tree.listeners
            .retain(|registration| !removed.contains(&registration.element));
        debug!("Removed {} element(s) rooted at {:?}", removed.len(), id);
        Ok(())
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.tree.borrow().nodes.contains_key(&id)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.tree.borrow().nodes.get(&id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: ElementId) -> Vec<ElementId> {
        self.tree
            .borrow()
            .nodes
            .get(&id)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    pub fn label(&self, id: ElementId) -> Option<String> {
        self.tree.borrow().nodes.get(&id).map(|node| node.label.clone())
    }

    /// True when `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: ElementId, node: ElementId) -> bool {
        self.tree.borrow().is_ancestor_or_self(ancestor, node)
    }

    /// Propagation path for an event dispatched at `target`: the target first,
    /// then each ancestor up to the root.
    pub fn propagation_path(&self, target: ElementId) -> Vec<ElementId> {
        self.tree.borrow().path(target)
    }

    pub fn set_draggable(&self, id: ElementId, draggable: bool) {
        if let Some(node) = self.tree.borrow_mut().nodes.get_mut(&id) {
            node.draggable = draggable;
        }
    }

    pub fn is_draggable(&self, id: ElementId) -> bool {
        self.tree
            .borrow()
            .nodes
            .get(&id)
            .is_some_and(|node| node.draggable)
    }

    /// Register `listener` for `kind` events reaching `element`.
    pub fn add_listener(
        &self,
        element: ElementId,
        kind: DragEventKind,
        listener: Listener,
    ) -> Result<ListenerId, HostError> {
        let mut tree = self.tree.borrow_mut();
        tree.node(element)?;
        let id = ListenerId(tree.next_listener);
        tree.next_listener += 1;
        tree.listeners.push(Registration {
            id,
            element,
            kind,
            listener,
        });
        Ok(id)
    }

    /// Unregister a listener; returns false when it was already gone.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut tree = self.tree.borrow_mut();
        let before = tree.listeners.len();
        tree.listeners.retain(|registration| registration.id != id);
        tree.listeners.len() != before
    }

    pub fn listener_count(&self, element: ElementId) -> usize {
        self.tree
            .borrow()
            .listeners
            .iter()
            .filter(|registration| registration.element == element)
            .count()
    }

    fn is_registered(&self, id: ListenerId) -> bool {
        self.tree
            .borrow()
            .listeners
            .iter()
            .any(|registration| registration.id == id)
    }

    /// Dispatch `event` at its target and bubble it towards the root.
    ///
    /// Every listener on an element runs before propagation is checked, so
    /// `stop_propagation` only affects ancestors. Listeners removed by an
    /// earlier listener during the same dispatch are skipped. The event is
    /// returned so the caller can read the transfer record and flags.
    pub fn dispatch(&self, mut event: DragEvent) -> DragEvent {
        let path = self.propagation_path(event.target);
        if path.is_empty() {
            debug!(
                "Dropping {} for unknown element {:?}",
                event.kind.name(),
                event.target
            );
            return event;
        }
        for element in path {
            let listeners = {
                let tree = self.tree.borrow();
                tree.listeners
                    .iter()
                    .filter(|registration| {
                        registration.element == element && registration.kind == event.kind
                    })
                    .map(|registration| (registration.id, Rc::clone(&registration.listener)))
                    .collect::<Vec<_>>()
            };
            event.current_target = Some(element);
            for (id, listener) in listeners {
                if self.is_registered(id) {
                    listener(&mut event);
                }
            }
            if event.propagation_stopped() {
                trace!(
                    "{} propagation stopped at {:?}",
                    event.kind.name(),
                    element
                );
                break;
            }
        }
        event.current_target = None;
        event
    }
}
