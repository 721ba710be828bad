use eframe::egui::{self, Align2, Area, Color32, FontId, Frame, Id, Order, Sense, Stroke};

use super::DraggablePanel;

const HEADER_FILL: Color32 = Color32::from_rgb(38, 52, 66);
const BODY_FILL: Color32 = Color32::from_rgb(24, 30, 38);

/// Draw `panel` as a floating area whose header strip moves it.
///
/// The frame has no outer margin, so the header allocation coincides with
/// [`DraggablePanel::header_rect`] and pointer positions can be fed to the
/// tracker unchanged.
pub fn show_panel<R>(
    ctx: &egui::Context,
    id: impl Into<Id>,
    panel: &mut DraggablePanel,
    title: &str,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    panel.set_bounds(Some(ctx.viewport_rect()));
    let header_size = panel.header_rect().size();
    let size = panel.rect().size();
    Area::new(id.into())
        .order(Order::Foreground)
        .fixed_pos(panel.origin())
        .show(ctx, |ui| {
            Frame::new()
                .fill(BODY_FILL)
                .stroke(Stroke::new(1.0, Color32::from_rgb(47, 111, 177)))
                .corner_radius(6.0)
                .show(ui, |ui| {
                    ui.set_min_size(size);
                    ui.set_max_width(size.x);
                    let (rect, response) = ui.allocate_exact_size(header_size, Sense::drag());
                    ui.painter().rect_filled(rect, 4.0, HEADER_FILL);
                    ui.painter().text(
                        rect.left_center() + egui::vec2(8.0, 0.0),
                        Align2::LEFT_CENTER,
                        title,
                        FontId::proportional(13.0),
                        Color32::WHITE,
                    );
                    track_header_drag(panel, &response);
                    ui.add_space(4.0);
                    add_contents(ui)
                })
                .inner
        })
        .inner
}

fn track_header_drag(panel: &mut DraggablePanel, response: &egui::Response) {
    let pointer = response.interact_pointer_pos();
    if response.drag_started() {
        if let Some(pos) = pointer {
            panel.pointer_down(pos);
        }
    } else if response.dragged() {
        if let Some(pos) = pointer {
            panel.pointer_move(pos);
        }
    }
    if response.drag_stopped() {
        panel.pointer_up();
    }
}
