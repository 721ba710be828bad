//! Demo window: draggable property rows, nested drop zones, and a floating
//! inspector panel showing the shared drag context.

use std::{cell::RefCell, rc::Rc};

use eframe::egui::{self, Color32, Pos2, Rect, RichText, Sense, Stroke, StrokeKind, Vec2};
use tracing::warn;

use crate::config::DndSettings;
use crate::dnd::{
    DndScope, DragKind, DragSource, DragSourceConfig, DragState, DropTarget, DropTargetConfig,
};
use crate::egui_host::{EguiDragDriver, GestureOutcome};
use crate::host::{Document, ElementId};
use crate::panel::{DraggablePanel, show_panel};

/// Property rows holding plain values.
pub const FIELD: DragKind = DragKind::new(1);
/// Colour swatches.
pub const SWATCH: DragKind = DragKind::new(2);

/// Payload carried by the demo's drag sources.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyItem {
    pub name: String,
    pub kind: DragKind,
}

struct Row {
    item: PropertyItem,
    element: ElementId,
    _source: DragSource<PropertyItem>,
}

struct Zone {
    title: &'static str,
    element: ElementId,
    parent: Option<usize>,
    last_drop: Rc<RefCell<Option<String>>>,
    target: DropTarget<PropertyItem>,
}

/// eframe application wiring the drag-and-drop runtime to egui.
pub struct DemoApp {
    driver: EguiDragDriver,
    scope: DndScope<PropertyItem>,
    root: ElementId,
    rows: Vec<Row>,
    zones: Vec<Zone>,
    panel: DraggablePanel,
    status: Rc<RefCell<String>>,
}

impl DemoApp {
    pub fn new(settings: DndSettings) -> Self {
        let document = Document::new();
        let scope = DndScope::new();
        let root = document.create_element("root");
        let status = Rc::new(RefCell::new(String::from("Drag a property onto a zone")));

        let rows: Vec<Row> = [
            ("opacity", FIELD),
            ("label", FIELD),
            ("background", SWATCH),
            ("border", SWATCH),
        ]
        .into_iter()
        .filter_map(|(name, kind)| {
            let item = PropertyItem {
                name: name.to_string(),
                kind,
            };
            build_row(&document, &scope, root, &settings, item, &status)
        })
        .collect();

        let mut zones: Vec<Zone> = Vec::new();
        for (title, accept, parent) in [
            ("Inspector (fields + swatches)", FIELD | SWATCH, None),
            ("Swatch well (swatches only)", SWATCH, Some(0)),
            ("Numeric fields", FIELD, None),
        ] {
            let parent_element = parent.map_or(root, |idx: usize| zones[idx].element);
            match build_zone(&document, &scope, parent_element, &settings, title, accept) {
                Some(mut zone) => {
                    zone.parent = parent;
                    zones.push(zone);
                }
                None => warn!("Failed to build drop zone {title}"),
            }
        }

        Self {
            driver: EguiDragDriver::new(document),
            scope,
            root,
            rows,
            zones,
            panel: DraggablePanel::with_settings(
                Pos2::new(520.0, 60.0),
                Vec2::new(300.0, 220.0),
                &settings.panel,
            ),
            status,
        }
    }

    fn draw_rows(&mut self, ui: &mut egui::Ui) {
        ui.heading("Properties");
        ui.add_space(6.0);
        for row in &self.rows {
            let (rect, _) = ui.allocate_exact_size(Vec2::new(180.0, 26.0), Sense::hover());
            self.driver.register(row.element, rect);
            let fill = if row.item.kind == SWATCH {
                Color32::from_rgb(82, 54, 96)
            } else {
                Color32::from_rgb(40, 72, 96)
            };
            ui.painter().rect_filled(rect, 4.0, fill);
            ui.painter().text(
                rect.left_center() + egui::vec2(8.0, 0.0),
                egui::Align2::LEFT_CENTER,
                &row.item.name,
                egui::FontId::proportional(14.0),
                Color32::WHITE,
            );
            ui.add_space(4.0);
        }
    }

    fn draw_zones(&mut self, ui: &mut egui::Ui) {
        ui.heading("Drop zones");
        ui.add_space(6.0);
        let mut rects: Vec<Rect> = Vec::with_capacity(self.zones.len());
        for zone in &self.zones {
            let rect = match zone.parent.and_then(|idx| rects.get(idx).copied()) {
                Some(parent) => Rect::from_min_size(
                    parent.min + Vec2::new(16.0, 40.0),
                    Vec2::new(parent.width() - 32.0, 70.0),
                ),
                None => ui.allocate_exact_size(Vec2::new(300.0, 130.0), Sense::hover()).0,
            };
            rects.push(rect);
            self.driver.register(zone.element, rect);
            let stroke = if zone.target.is_over() {
                Stroke::new(2.0, Color32::from_rgb(90, 176, 255))
            } else {
                Stroke::new(1.0, Color32::GRAY)
            };
            ui.painter().rect_stroke(rect, 6.0, stroke, StrokeKind::Inside);
            let last = zone.last_drop.borrow().clone().unwrap_or_default();
            ui.painter().text(
                rect.left_top() + egui::vec2(8.0, 8.0),
                egui::Align2::LEFT_TOP,
                format!("{}  {}", zone.title, last),
                egui::FontId::proportional(13.0),
                Color32::LIGHT_GRAY,
            );
            if zone.parent.is_none() {
                ui.add_space(8.0);
            }
        }
    }

    fn draw_inspector(&mut self, ctx: &egui::Context) {
        let snapshot = self.scope.snapshot();
        let transitions = self.scope.transitions();
        show_panel(ctx, "context_inspector", &mut self.panel, "Drag context", |ui| {
            ui.label(format!("state: {:?}", snapshot.state));
            ui.label(format!("kind: {:?}", snapshot.kind));
            let item = snapshot
                .item
                .as_ref()
                .map_or_else(|| "none".to_string(), |item| item.name.clone());
            ui.label(format!("item: {item}"));
            ui.separator();
            for transition in transitions.iter().rev().take(6) {
                ui.label(
                    RichText::new(format!("{:?} → {:?}", transition.from, transition.to))
                        .small()
                        .color(Color32::GRAY),
                );
            }
        });
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.driver.begin_frame();
        egui::CentralPanel::default().show(ctx, |ui| {
            self.driver.register(self.root, ui.max_rect());
            ui.label(self.status.borrow().as_str());
            ui.add_space(8.0);
            ui.horizontal_top(|ui| {
                ui.vertical(|ui| self.draw_rows(ui));
                ui.add_space(40.0);
                ui.vertical(|ui| self.draw_zones(ui));
            });
        });
        self.draw_inspector(ctx);
        if let Some(GestureOutcome::Escaped) = self.driver.end_frame(ctx) {
            *self.status.borrow_mut() = "Drag cancelled with Escape".to_string();
        }
        if self.driver.is_dragging() {
            ctx.request_repaint();
        }
    }
}

fn build_row(
    document: &Document,
    scope: &DndScope<PropertyItem>,
    root: ElementId,
    settings: &DndSettings,
    item: PropertyItem,
    status: &Rc<RefCell<String>>,
) -> Option<Row> {
    let element = document.create_element(item.name.clone());
    if let Err(err) = document.append_child(root, element) {
        warn!("Cannot attach row {}: {err}", item.name);
        return None;
    }
    let (on_cancel, on_end) = (Rc::clone(status), Rc::clone(status));
    let ended_scope = scope.clone();
    let mut source = scope.drag_source(
        DragSourceConfig::new(item.kind)
            .item(item.clone())
            .with_settings(&settings.drag)
            .on_cancel(move |_, item| {
                if let Some(item) = item {
                    *on_cancel.borrow_mut() = format!("{} was not accepted", item.name);
                }
            })
            .on_end(move |_, item| {
                // Runs before the source resets the context, so the outcome is still visible.
                if let Some(item) = item
                    && ended_scope.state() == DragState::Dropped
                {
                    *on_end.borrow_mut() = format!("{} dropped", item.name);
                }
            }),
    );
    source.element_ref().bind(element);
    source.mount(document);
    Some(Row {
        item,
        element,
        _source: source,
    })
}

fn build_zone(
    document: &Document,
    scope: &DndScope<PropertyItem>,
    parent: ElementId,
    settings: &DndSettings,
    title: &'static str,
    accept: DragKind,
) -> Option<Zone> {
    let element = document.create_element(title);
    if let Err(err) = document.append_child(parent, element) {
        warn!("Cannot attach zone {title}: {err}");
        return None;
    }
    let last_drop = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&last_drop);
    let mut target = scope.drop_target(
        DropTargetConfig::new(accept)
            .with_settings(&settings.drag)
            .on_drop(move |_, item: Option<&PropertyItem>, _| {
                if let Some(item) = item {
                    *sink.borrow_mut() = Some(format!("← {}", item.name));
                }
            }),
    );
    target.set_trace_over(settings.drag.trace_over_events);
    target.element_ref().bind(element);
    target.mount(document);
    Some(Zone {
        title,
        element,
        parent: None,
        last_drop,
        target,
    })
}
