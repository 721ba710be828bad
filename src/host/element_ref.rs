use std::{cell::Cell, rc::Rc};

use super::ElementId;

/// Attachment handle handed out by a binding and filled in by the host once
/// the element exists.
///
/// Bindings read the handle when they mount; an empty handle at that point
/// makes the mount a silent no-op.
#[derive(Clone, Debug, Default)]
pub struct ElementRef {
    slot: Rc<Cell<Option<ElementId>>>,
}

impl ElementRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, element: ElementId) {
        self.slot.set(Some(element));
    }

    pub fn clear(&self) {
        self.slot.set(None);
    }

    pub fn get(&self) -> Option<ElementId> {
        self.slot.get()
    }

    pub fn is_bound(&self) -> bool {
        self.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_slot() {
        let handle = ElementRef::new();
        let host_side = handle.clone();
        assert!(!handle.is_bound());
        host_side.bind(ElementId::from_raw(4));
        assert_eq!(handle.get(), Some(ElementId::from_raw(4)));
        host_side.clear();
        assert!(handle.get().is_none());
    }
}
