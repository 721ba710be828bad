use crate::host::DropEffect;

pub(super) const MIN_HEADER_HEIGHT: f32 = 8.0;

pub(super) fn default_true() -> bool {
    true
}

pub(super) fn default_effect() -> DropEffect {
    DropEffect::Move
}

pub(super) fn default_preview_offset() -> [f32; 2] {
    [0.0, 0.0]
}

pub(super) fn default_header_height() -> f32 {
    24.0
}

pub(super) fn clamp_header_height(value: f32) -> f32 {
    if value.is_finite() {
        value.max(MIN_HEADER_HEIGHT)
    } else {
        default_header_height()
    }
}
