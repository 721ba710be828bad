use std::{cell::RefCell, rc::Rc};

use dropkit::dnd::{DragKind, DragSourceConfig, DropTargetConfig};
use dropkit::host::{DragEvent, DragEventKind, ElementId};

/// Payload used by the scenario tests.
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub id: &'static str,
}

pub fn card(id: &'static str) -> Card {
    Card { id }
}

/// Shared, ordered log of callback invocations.
#[derive(Clone, Default)]
pub struct Recorder {
    entries: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    pub fn push(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Source config whose callbacks log `"<label>:start:<id>"` and friends.
    pub fn source(&self, label: &'static str, kind: DragKind) -> DragSourceConfig<Card> {
        let (start, end, cancel) = (self.clone(), self.clone(), self.clone());
        DragSourceConfig::new(kind)
            .on_start(move |_, item| start.push(format!("{label}:start:{}", id_of(item))))
            .on_end(move |_, item| end.push(format!("{label}:end:{}", id_of(item))))
            .on_cancel(move |_, item| cancel.push(format!("{label}:cancel:{}", id_of(item))))
    }

    /// Target config logging every callback with the target's label.
    pub fn target(&self, label: &'static str, accept: DragKind) -> DropTargetConfig<Card> {
        let (enter, over, leave, dropped) = (self.clone(), self.clone(), self.clone(), self.clone());
        DropTargetConfig::new(accept)
            .on_enter(move |_, item, _| enter.push(format!("{label}:enter:{}", id_of(item))))
            .on_over(move |_, item, _| over.push(format!("{label}:over:{}", id_of(item))))
            .on_leave(move |_, item, _| leave.push(format!("{label}:leave:{}", id_of(item))))
            .on_drop(move |_, item, _| dropped.push(format!("{label}:drop:{}", id_of(item))))
    }
}

fn id_of(item: Option<&Card>) -> &'static str {
    item.map_or("-", |card| card.id)
}

pub fn event(kind: DragEventKind, target: ElementId) -> DragEvent {
    DragEvent::new(kind, target)
}
