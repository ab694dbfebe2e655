//! Alignment helpers shared by the flow and table engines.

use arrange_core::{AnchorStyles, Rect, Size};

/// Stretch `size` on every axis anchored at both ends, never exceeding
/// `within`.
#[must_use]
pub fn stretch(size: Size, within: Size, anchor: AnchorStyles) -> Size {
    let width = if anchor.stretches_horizontally() {
        within.width
    } else {
        size.width
    };
    let height = if anchor.stretches_vertically() {
        within.height
    } else {
        size.height
    };
    Size::new(width, height).intersect(within)
}

/// Position `size` horizontally inside `within`: right-anchored sizes sit at
/// the right edge, sizes free on both sides are centered.
#[must_use]
pub fn h_align(size: Size, within: Rect, anchor: AnchorStyles) -> Rect {
    let mut rect = within;
    if anchor.right {
        rect.x += within.width - size.width;
    } else if anchor.is_horizontally_free() {
        rect.x += (within.width - size.width) / 2;
    }
    rect.width = size.width;
    rect
}

/// Position `size` vertically inside `within`.
#[must_use]
pub fn v_align(size: Size, within: Rect, anchor: AnchorStyles) -> Rect {
    let mut rect = within;
    if anchor.bottom {
        rect.y += within.height - size.height;
    } else if anchor.is_vertically_free() {
        rect.y += (within.height - size.height) / 2;
    }
    rect.height = size.height;
    rect
}

/// Align `size` inside `within` on both axes.
#[must_use]
pub fn align(size: Size, within: Rect, anchor: AnchorStyles) -> Rect {
    v_align(size, h_align(size, within, anchor), anchor)
}

/// Stretch, then align. This is how an element is fitted into a flow row or
/// a table cell.
#[must_use]
pub fn align_and_stretch(size: Size, within: Rect, anchor: AnchorStyles) -> Rect {
    align(stretch(size, within.size(), anchor), within, anchor)
}
