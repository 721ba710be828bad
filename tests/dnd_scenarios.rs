mod support;

use dropkit::dnd::{DndScope, DragKind, DragSource, DragState, DropTarget};
use dropkit::host::{Document, DragEventKind, DropEffect, ElementId};
use support::recorder::{Card, Recorder, card, event};

const CARD: DragKind = DragKind::new(0b01);
const TAG: DragKind = DragKind::new(0b10);

/// Board with a root, two sibling sources, and a drop zone holding a child slot.
struct Board {
    document: Document,
    scope: DndScope<Card>,
    log: Recorder,
    root: ElementId,
    source_a: ElementId,
    source_b: ElementId,
    zone: ElementId,
    slot: ElementId,
}

impl Board {
    fn new() -> Self {
        let document = Document::new();
        let root = document.create_element("root");
        let source_a = document.create_element("source-a");
        let source_b = document.create_element("source-b");
        let zone = document.create_element("zone");
        let slot = document.create_element("slot");
        for (parent, child) in [
            (root, source_a),
            (root, source_b),
            (root, zone),
            (zone, slot),
        ] {
            document.append_child(parent, child).expect("attach element");
        }
        Self {
            document,
            scope: DndScope::new(),
            log: Recorder::default(),
            root,
            source_a,
            source_b,
            zone,
            slot,
        }
    }

    fn mount_source(
        &self,
        label: &'static str,
        element: ElementId,
        kind: DragKind,
        id: &'static str,
    ) -> DragSource<Card> {
        let mut source = self
            .scope
            .drag_source(self.log.source(label, kind).item(card(id)));
        source.element_ref().bind(element);
        source.mount(&self.document);
        source
    }

    fn mount_target(
        &self,
        label: &'static str,
        element: ElementId,
        accept: DragKind,
    ) -> DropTarget<Card> {
        let mut target = self.scope.drop_target(self.log.target(label, accept));
        target.element_ref().bind(element);
        target.mount(&self.document);
        target
    }

    fn fire(&self, kind: DragEventKind, element: ElementId) -> dropkit::host::DragEvent {
        self.document.dispatch(event(kind, element))
    }
}

#[test]
fn accepted_drop_runs_callbacks_in_order_and_resets_context() {
    let board = Board::new();
    let _source = board.mount_source("src", board.source_a, CARD, "A");
    let target = board.mount_target("zone", board.zone, CARD);

    let start = board.fire(DragEventKind::DragStart, board.source_a);
    assert_eq!(start.data_transfer.effect_allowed, DropEffect::Move);
    let snapshot = board.scope.snapshot();
    assert_eq!(snapshot.state, DragState::Dragging);
    assert_eq!(snapshot.kind, CARD);
    assert_eq!(snapshot.item, Some(card("A")));
    assert!(board.document.is_draggable(board.source_a));

    board.fire(DragEventKind::DragEnter, board.zone);
    assert!(target.is_over());
    let over = board.fire(DragEventKind::DragOver, board.zone);
    assert!(over.default_prevented());
    assert!(over.propagation_stopped());
    assert_eq!(over.data_transfer.drop_effect, DropEffect::Move);

    let dropped = board.fire(DragEventKind::Drop, board.zone);
    assert!(dropped.default_prevented());
    assert_eq!(board.scope.state(), DragState::Dropped);
    assert!(!target.is_over());

    let end = board.fire(DragEventKind::DragEnd, board.source_a);
    assert!(end.default_prevented());
    assert_eq!(
        board.log.entries(),
        vec![
            "src:start:A",
            "zone:enter:A",
            "zone:over:A",
            "zone:drop:A",
            "src:end:A"
        ]
    );
    assert!(board.scope.snapshot().is_terminal());
}

#[test]
fn rejected_kind_cancels_then_ends() {
    let board = Board::new();
    let _source = board.mount_source("src", board.source_a, TAG, "B");
    let target = board.mount_target("zone", board.zone, CARD);

    board.fire(DragEventKind::DragStart, board.source_a);
    let enter = board.fire(DragEventKind::DragEnter, board.zone);
    assert!(!enter.default_prevented());
    assert!(!target.is_over());
    let over = board.fire(DragEventKind::DragOver, board.zone);
    assert!(!over.default_prevented());
    board.fire(DragEventKind::DragEnd, board.source_a);

    assert_eq!(
        board.log.entries(),
        vec!["src:start:B", "src:cancel:B", "src:end:B"]
    );
    let snapshot = board.scope.snapshot();
    assert_eq!(snapshot.state, DragState::Cancelled);
    assert_eq!(snapshot.kind, DragKind::RESET);
    assert_eq!(snapshot.item, None);
}

#[test]
fn nested_enter_and_leave_collapse_to_one_pair() {
    let board = Board::new();
    let _source = board.mount_source("src", board.source_a, CARD, "A");
    let target = board.mount_target("zone", board.zone, CARD);

    board.fire(DragEventKind::DragStart, board.source_a);
    board.fire(DragEventKind::DragEnter, board.zone);
    board.fire(DragEventKind::DragEnter, board.slot);
    assert_eq!(target.depth(), 2);
    board.fire(DragEventKind::DragLeave, board.zone);
    assert!(target.is_over());
    board.fire(DragEventKind::DragLeave, board.slot);
    assert_eq!(target.depth(), 0);
    board.fire(DragEventKind::DragLeave, board.zone);
    assert_eq!(target.depth(), 0);

    let entries = board.log.entries();
    assert_eq!(entries.iter().filter(|e| e.as_str() == "zone:enter:A").count(), 1);
    assert_eq!(entries.iter().filter(|e| e.as_str() == "zone:leave:A").count(), 1);
}

#[test]
fn acceptance_does_not_depend_on_mount_order() {
    fn outcome(cards_first: bool) -> Vec<String> {
        let board = Board::new();
        let lane = board.document.create_element("lane");
        board.document.append_child(board.root, lane).expect("attach lane");
        let _source = board.mount_source("src", board.source_a, CARD, "A");
        let (_first, _second) = if cards_first {
            (
                board.mount_target("cards", board.zone, CARD),
                board.mount_target("tags", lane, TAG),
            )
        } else {
            let tags = board.mount_target("tags", lane, TAG);
            (board.mount_target("cards", board.zone, CARD), tags)
        };
        board.fire(DragEventKind::DragStart, board.source_a);
        for element in [board.zone, lane] {
            board.fire(DragEventKind::DragEnter, element);
            board.fire(DragEventKind::Drop, element);
        }
        board.fire(DragEventKind::DragEnd, board.source_a);
        board.log.entries()
    }

    assert_eq!(outcome(true), outcome(false));
    assert_eq!(
        outcome(true),
        vec!["src:start:A", "cards:enter:A", "cards:drop:A", "src:end:A"]
    );
}

#[test]
fn second_drag_start_overwrites_the_context() {
    let board = Board::new();
    let _a = board.mount_source("a", board.source_a, CARD, "A");
    let _b = board.mount_source("b", board.source_b, TAG, "B");

    board.fire(DragEventKind::DragStart, board.source_a);
    board.fire(DragEventKind::DragStart, board.source_b);

    let snapshot = board.scope.snapshot();
    assert_eq!(snapshot.kind, TAG);
    assert_eq!(snapshot.item, Some(card("B")));
    assert_eq!(snapshot.state, DragState::Dragging);
}

#[test]
fn disabled_bindings_stay_inert() {
    let board = Board::new();
    let mut source = board
        .scope
        .drag_source(board.log.source("src", CARD).item(card("A")).disable(true));
    source.element_ref().bind(board.source_a);
    source.mount(&board.document);
    assert!(!source.is_mounted());
    assert_eq!(board.document.listener_count(board.source_a), 0);

    board.fire(DragEventKind::DragStart, board.source_a);
    assert_eq!(board.scope.state(), DragState::None);
    let end = board.fire(DragEventKind::DragEnd, board.source_a);
    assert!(!end.default_prevented());
    assert!(board.log.entries().is_empty());
    assert_eq!(board.scope.state(), DragState::None);

    let _live = board.mount_source("live", board.source_b, CARD, "B");
    let mut target = board
        .scope
        .drop_target(board.log.target("zone", CARD).disable(true));
    target.element_ref().bind(board.zone);
    target.mount(&board.document);
    board.fire(DragEventKind::DragStart, board.source_b);
    board.fire(DragEventKind::DragEnter, board.zone);
    board.fire(DragEventKind::Drop, board.zone);
    board.fire(DragEventKind::DragEnd, board.source_b);

    assert_eq!(
        board.log.entries(),
        vec!["live:start:B", "live:cancel:B", "live:end:B"]
    );
}

#[test]
fn missing_element_reference_skips_mount() {
    let board = Board::new();
    let mut source = board.scope.drag_source(board.log.source("src", CARD));
    source.mount(&board.document);
    assert!(!source.is_mounted());

    let mut target = board.scope.drop_target(board.log.target("zone", CARD));
    target.mount(&board.document);
    assert!(!target.is_mounted());
}

#[test]
fn dropping_a_source_detaches_listeners_and_resets() {
    let board = Board::new();
    let source = board.mount_source("src", board.source_a, CARD, "A");
    let target = board.mount_target("zone", board.zone, CARD);
    board.fire(DragEventKind::DragStart, board.source_a);
    board.fire(DragEventKind::DragEnter, board.zone);

    drop(source);
    assert_eq!(board.document.listener_count(board.source_a), 0);
    assert!(!board.document.is_draggable(board.source_a));
    assert!(board.scope.snapshot().is_terminal());

    board.log.clear();
    board.fire(DragEventKind::DragEnd, board.source_a);
    assert!(board.log.entries().is_empty());

    drop(target);
    assert_eq!(board.document.listener_count(board.zone), 0);
    assert!(board.scope.snapshot().is_terminal());
}

#[test]
fn dropping_a_target_leaves_the_drag_running() {
    let board = Board::new();
    let _source = board.mount_source("src", board.source_a, CARD, "A");
    let target = board.mount_target("zone", board.zone, CARD);
    board.fire(DragEventKind::DragStart, board.source_a);
    board.fire(DragEventKind::DragEnter, board.zone);

    drop(target);
    assert_eq!(board.scope.state(), DragState::Dragging);
    board.fire(DragEventKind::Drop, board.zone);
    board.fire(DragEventKind::DragEnd, board.source_a);
    assert_eq!(
        board.log.entries(),
        vec!["src:start:A", "zone:enter:A", "src:cancel:A", "src:end:A"]
    );
    let snapshot = board.scope.snapshot();
    assert!(snapshot.is_terminal());
    assert_eq!(snapshot.state, DragState::Cancelled);
    assert_eq!(snapshot.kind, DragKind::RESET);
    assert_eq!(snapshot.item, None);
}

#[test]
fn inner_source_claims_drag_start() {
    let board = Board::new();
    let _outer = board.mount_source("outer", board.zone, TAG, "outer");
    let _inner = board.mount_source("inner", board.slot, CARD, "inner");

    board.fire(DragEventKind::DragStart, board.slot);
    assert_eq!(board.scope.kind(), CARD);
    assert_eq!(board.scope.item(), Some(card("inner")));
    assert_eq!(board.log.entries(), vec!["inner:start:inner"]);
}

#[test]
fn inner_target_shields_outer_when_it_accepts() {
    let board = Board::new();
    let _source = board.mount_source("src", board.source_a, CARD, "A");
    let outer = board.mount_target("outer", board.zone, CARD);
    let inner = board.mount_target("inner", board.slot, CARD);

    board.fire(DragEventKind::DragStart, board.source_a);
    board.fire(DragEventKind::DragEnter, board.slot);
    board.fire(DragEventKind::Drop, board.slot);

    assert!(!outer.is_over());
    assert_eq!(inner.depth(), 0);
    assert_eq!(
        board.log.entries(),
        vec!["src:start:A", "inner:enter:A", "inner:drop:A"]
    );
}

#[test]
fn rejecting_inner_target_lets_outer_receive_the_drop() {
    let board = Board::new();
    let _source = board.mount_source("src", board.source_a, CARD, "A");
    let _outer = board.mount_target("outer", board.zone, CARD);
    let _inner = board.mount_target("inner", board.slot, TAG);

    board.fire(DragEventKind::DragStart, board.source_a);
    board.fire(DragEventKind::DragEnter, board.slot);
    board.fire(DragEventKind::Drop, board.slot);
    board.fire(DragEventKind::DragEnd, board.source_a);

    assert_eq!(
        board.log.entries(),
        vec!["src:start:A", "outer:enter:A", "outer:drop:A", "src:end:A"]
    );
}

#[test]
fn separate_scopes_do_not_see_each_other() {
    let board = Board::new();
    let _source = board.mount_source("src", board.source_a, CARD, "A");
    let other: DndScope<Card> = DndScope::new();
    let mut foreign = other.drop_target(board.log.target("foreign", CARD));
    foreign.element_ref().bind(board.zone);
    foreign.mount(&board.document);

    board.fire(DragEventKind::DragStart, board.source_a);
    board.fire(DragEventKind::DragEnter, board.zone);
    board.fire(DragEventKind::Drop, board.zone);

    assert!(!board.scope.same_scope(&other));
    assert_eq!(other.state(), DragState::None);
    assert_eq!(board.scope.state(), DragState::Dragging);
    assert_eq!(board.log.entries(), vec!["src:start:A"]);
}

#[test]
fn transition_log_follows_the_gesture() {
    let board = Board::new();
    let _source = board.mount_source("src", board.source_a, CARD, "A");
    let _target = board.mount_target("zone", board.zone, CARD);

    board.fire(DragEventKind::DragStart, board.source_a);
    board.fire(DragEventKind::Drop, board.zone);
    board.fire(DragEventKind::DragEnd, board.source_a);

    let steps: Vec<(DragState, DragState)> = board
        .scope
        .transitions()
        .iter()
        .map(|t| (t.from, t.to))
        .collect();
    assert_eq!(
        steps,
        vec![
            (DragState::None, DragState::Dragging),
            (DragState::Dragging, DragState::Dropped),
            (DragState::Dropped, DragState::Cancelled),
        ]
    );
}
