//! The default engine: docking, then anchoring, then auto-sizing.
//!
//! Docked children consume edge strips of the container's display rectangle
//! in z-order, back to front, so the first docked child is outermost.
//! Anchored children keep the edge offsets captured in their [`AnchorInfo`]
//! when their bounds were last set by a caller.

use crate::element::{AnchorInfo, ElementId, ElementKind};
use crate::engine::{LayoutEngine, LayoutEventArgs, LayoutPlan, LayoutReason};
use crate::transaction::LayoutTransaction;
use crate::tree::LayoutTree;
use arrange_core::{AnchorStyles, AutoSizeMode, BoundsSpecified, DockStyle, LayoutError, Rect, Size};

/// Anchor and dock layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLayout;

impl LayoutEngine for DefaultLayout {
    fn name(&self) -> &'static str {
        "default"
    }

    fn plan(&self, tree: &LayoutTree, container: ElementId, _args: &LayoutEventArgs) -> LayoutPlan {
        if tree.children(container).is_empty() {
            let mut plan = LayoutPlan::new();
            plan.parent_needs_layout = tree.auto_size(container);
            return plan;
        }
        Pass::new(tree, container, false).commit()
    }

    fn preferred_size(&self, tree: &LayoutTree, container: ElementId, _proposed: Size) -> Size {
        Pass::new(tree, container, true).measure()
    }

    fn init_layout(&self, tree: &mut LayoutTree, child: ElementId, specified: BoundsSpecified) {
        if !specified.is_none() && tree.layout_state(child).needs_anchor_layout() {
            update_anchor_info(tree, child);
        }
    }
}

/// Which sub-passes a container needs.
#[derive(Debug, Clone, Copy, Default)]
struct Needs {
    dock: bool,
    anchor: bool,
    auto_size: bool,
}

/// One layout or measure pass over a container.
///
/// `docked` holds the bounds of docked children; `cached` holds the bounds
/// the anchor and auto-size sub-passes computed. Neither touches the tree.
struct Pass<'a> {
    tree: &'a LayoutTree,
    container: ElementId,
    measure: bool,
    docked: LayoutPlan,
    cached: LayoutPlan,
}

impl<'a> Pass<'a> {
    fn new(tree: &'a LayoutTree, container: ElementId, measure: bool) -> Self {
        Self {
            tree,
            container,
            measure,
            docked: LayoutPlan::new(),
            cached: LayoutPlan::new(),
        }
    }

    fn needs(&self) -> Needs {
        let mut needs = Needs::default();
        for &child in self.tree.children(self.container) {
            let state = self.tree.layout_state(child);
            needs.dock |= self.is_docked(child);
            needs.anchor |= state.needs_anchor_layout();
            needs.auto_size |= state.auto_sized_and_anchored();
        }
        needs
    }

    fn is_docked(&self, id: ElementId) -> bool {
        self.tree.layout_state(id).needs_dock_layout() && self.tree.participates_in_layout(id)
    }

    fn cached_bounds(&self, id: ElementId) -> Rect {
        self.cached.bounds_or_current(self.tree, id)
    }

    fn set_cached(&mut self, id: ElementId, bounds: Rect) {
        if bounds != self.cached_bounds(id) {
            self.cached.place(id, bounds);
        }
    }

    fn commit(mut self) -> LayoutPlan {
        let needs = self.needs();
        if needs.dock {
            self.layout_docked();
        }
        if needs.anchor {
            self.layout_anchored();
        }
        if needs.auto_size {
            self.layout_auto_sized();
        }

        let tree = self.tree;
        let auto_size = tree.auto_size(self.container);
        let display = tree.display_rectangle(self.container);
        let mut plan = self.docked;
        // an auto-sized container that has not been sized yet would squash
        // every anchored child to nothing
        if !(auto_size && (display.width == 0 || display.height == 0)) {
            plan.extend(self.cached);
        }

        let mut extent = Size::ZERO;
        for &child in tree.children(self.container) {
            if tree.participates_in_layout(child) {
                let bounds = plan.bounds_or_current(tree, child);
                extent = extent.union(Size::new(bounds.right(), bounds.bottom()));
            }
        }
        plan.layout_bounds = Some(extent);
        plan.parent_needs_layout = auto_size;
        plan
    }

    fn measure(mut self) -> Size {
        let needs = self.needs();
        let docked = if needs.dock {
            self.layout_docked()
        } else {
            Size::ZERO
        };
        if needs.auto_size {
            self.layout_auto_sized();
        }

        let anchored = self.anchor_preferred_size();
        let padding = self.tree.padding(self.container);
        docked.union(Size::new(
            anchored.width - padding.left,
            anchored.height - padding.top,
        ))
    }

    // =========================================================================
    // Docking
    // =========================================================================

    /// Returns the space docked children need (measure mode only).
    fn layout_docked(&mut self) -> Size {
        let tree = self.tree;
        let mut remaining = if self.measure {
            Rect::ZERO
        } else {
            tree.display_rectangle(self.container)
        };
        let mut preferred = Size::ZERO;
        let mut document_host = None;

        for &child in tree.children(self.container) {
            if !self.is_docked(child) {
                continue;
            }
            let dock = tree.layout_state(child).dock;
            let bounds = match dock {
                DockStyle::Top | DockStyle::Bottom => {
                    let mut size = self.docked_size(child, Size::new(remaining.width, 1));
                    size.width = if self.measure {
                        size.width.max(remaining.width)
                    } else {
                        remaining.width
                    };
                    let y = if dock == DockStyle::Top {
                        remaining.y
                    } else {
                        remaining.bottom() - size.height
                    };
                    Rect::new(remaining.x, y, size.width, size.height)
                }
                DockStyle::Left | DockStyle::Right => {
                    let mut size = self.docked_size(child, Size::new(1, remaining.height));
                    size.height = if self.measure {
                        size.height.max(remaining.height)
                    } else {
                        remaining.height
                    };
                    let x = if dock == DockStyle::Left {
                        remaining.x
                    } else {
                        remaining.right() - size.width
                    };
                    Rect::new(x, remaining.y, size.width, size.height)
                }
                DockStyle::Fill => {
                    if tree.kind(child) == ElementKind::DocumentHost {
                        debug_assert!(document_host.is_none(), "more than one document host");
                        document_host = Some(child);
                        continue;
                    }
                    remaining
                }
                DockStyle::None => continue,
            };

            let taken = self.place_docked(child, bounds, dock, &mut preferred, &mut remaining);
            match dock {
                DockStyle::Top => {
                    remaining.y += taken.height;
                    remaining.height -= taken.height;
                }
                DockStyle::Bottom => remaining.height -= taken.height,
                DockStyle::Left => {
                    remaining.x += taken.width;
                    remaining.width -= taken.width;
                }
                DockStyle::Right => remaining.width -= taken.width,
                DockStyle::Fill | DockStyle::None => {}
            }
        }

        if let Some(host) = document_host {
            if !self.measure {
                self.set_cached(host, remaining);
            }
        }
        preferred
    }

    fn docked_size(&self, id: ElementId, constraint: Size) -> Size {
        if self.tree.auto_size(id) {
            self.tree.preferred_size(id, constraint)
        } else {
            self.tree.bounds(id).size()
        }
    }

    /// Record a docked child and return the size it actually takes.
    fn place_docked(
        &mut self,
        id: ElementId,
        bounds: Rect,
        dock: DockStyle,
        preferred: &mut Size,
        remaining: &mut Rect,
    ) -> Size {
        if !self.measure {
            let size = self.tree.node(id).constrain_size(bounds.size());
            self.docked.place(id, bounds.with_size(size));
            return size;
        }

        let mut needed = Size::new(
            (bounds.width - remaining.width).max(0),
            (bounds.height - remaining.height).max(0),
        );
        match dock {
            DockStyle::Top | DockStyle::Bottom => needed.width = 0,
            DockStyle::Left | DockStyle::Right => needed.height = 0,
            DockStyle::Fill | DockStyle::None => {}
        }

        if dock != DockStyle::Fill {
            *preferred = *preferred + needed;
            remaining.width += needed.width;
            remaining.height += needed.height;
        } else if self.tree.auto_size(id) {
            let size = self.tree.preferred_size(id, needed);
            remaining.width += size.width;
            remaining.height += size.height;
            *preferred = *preferred + size;
        }
        self.tree.bounds(id).size()
    }

    // =========================================================================
    // Anchoring
    // =========================================================================

    fn layout_anchored(&mut self) {
        let tree = self.tree;
        let display = tree.display_rectangle(self.container);
        if tree.auto_size(self.container) && (display.width == 0 || display.height == 0) {
            return;
        }
        for &child in tree.children(self.container) {
            if tree.layout_state(child).needs_anchor_layout() {
                let bounds = self.anchored_bounds(child, display);
                self.set_cached(child, bounds);
            }
        }
    }

    fn anchored_bounds(&self, id: ElementId, display: Rect) -> Rect {
        let tree = self.tree;
        let info = tree
            .anchor_info(id)
            .or_else(|| capture_anchor_info(tree, id, None))
            .unwrap_or_default();
        let anchor = tree.layout_state(id).anchor();

        let mut left = info.left + display.x;
        let mut top = info.top + display.y;
        let mut right = info.right + display.x;
        let mut bottom = info.bottom + display.y;

        if anchor.right {
            right += display.width;
            if !anchor.left {
                left += display.width;
            }
        } else if !anchor.left {
            let center = display.width / 2;
            right += center;
            left += center;
        }

        if anchor.bottom {
            bottom += display.height;
            if !anchor.top {
                top += display.height;
            }
        } else if !anchor.top {
            let center = display.height / 2;
            bottom += center;
            top += center;
        }

        if self.measure {
            // the display rectangle is empty here; push the trailing edges
            // back into positive space
            let cached = self.cached_bounds(id);
            let actual = tree.bounds(id);

            if right < left || cached.width != actual.width || cached.x != actual.x {
                if cached != actual {
                    left = left.abs().max(cached.x.abs());
                }
                right = left + actual.width.max(cached.width) + right.abs();
            } else {
                left = if left > 0 { left } else { actual.x };
                right = if right > 0 {
                    right
                } else {
                    actual.right() + right.abs()
                };
            }

            if bottom < top || cached.height != actual.height || cached.y != actual.y {
                if cached != actual {
                    top = top.abs().max(cached.y.abs());
                }
                bottom = top + actual.height.max(cached.height) + bottom.abs();
            } else {
                top = if top > 0 { top } else { actual.y };
                bottom = if bottom > 0 {
                    bottom
                } else {
                    actual.bottom() + bottom.abs()
                };
            }
        } else {
            right = right.max(left);
            bottom = bottom.max(top);
        }

        Rect::new(left, top, right - left, bottom - top)
    }

    fn anchor_preferred_size(&self) -> Size {
        let tree = self.tree;
        let mut size = Size::ZERO;
        for &child in tree.children(self.container) {
            if self.is_docked(child) || !tree.participates_in_layout(child) {
                continue;
            }
            let anchor = tree.layout_state(child).anchor();
            let space = self.cached_bounds(child).inflate(tree.margin(child));

            // left-anchored children must not be clipped; right-anchored ones
            // would only be stretched by a larger container
            if anchor.left && !anchor.right {
                size.width = size.width.max(space.right());
            }
            if !anchor.bottom {
                size.height = size.height.max(space.bottom());
            }
            if anchor.right {
                let dest = self.anchored_bounds(child, Rect::ZERO);
                size.width = if dest.width < 0 {
                    size.width.max(space.right() + dest.width)
                } else {
                    size.width.max(dest.right())
                };
            }
            if anchor.bottom {
                let dest = self.anchored_bounds(child, Rect::ZERO);
                size.height = if dest.height < 0 {
                    size.height.max(space.bottom() + dest.height)
                } else {
                    size.height.max(dest.bottom())
                };
            }
        }
        size
    }

    // =========================================================================
    // Auto-sizing
    // =========================================================================

    fn layout_auto_sized(&mut self) {
        let tree = self.tree;
        for &child in tree.children(self.container) {
            let state = tree.layout_state(child);
            if !state.auto_sized_and_anchored() {
                continue;
            }
            let bounds = self.cached_bounds(child);
            let anchor = state.anchor();

            let mut proposed = Size::UNBOUNDED;
            if anchor.stretches_horizontally() {
                proposed.width = bounds.width;
            }
            if anchor.stretches_vertically() {
                proposed.height = bounds.height;
            }
            let preferred = tree.preferred_size(child, proposed);

            let grown = match state.auto_size_mode {
                AutoSizeMode::GrowAndShrink => growth_bounds(anchor, bounds, preferred),
                AutoSizeMode::GrowOnly => {
                    if bounds.width < preferred.width || bounds.height < preferred.height {
                        growth_bounds(anchor, bounds, bounds.size().union(preferred))
                    } else {
                        bounds
                    }
                }
            };
            if grown != bounds {
                self.set_cached(child, grown);
            }
        }
    }
}

/// Resize `old` to `size`, growing towards the left (upwards) when anchored
/// only on the right (bottom).
fn growth_bounds(anchor: AnchorStyles, old: Rect, size: Size) -> Rect {
    let mut location = old.location();
    if anchor.right && !anchor.left {
        location.x -= size.width - old.width;
    }
    if anchor.bottom && !anchor.top {
        location.y -= size.height - old.height;
    }
    Rect::from_parts(location, size)
}

/// Edge offsets of `id` relative to its container, or `None` when it has no
/// container. `previous` feeds the DPI rescale compatibility shim.
fn capture_anchor_info(
    tree: &LayoutTree,
    id: ElementId,
    previous: Option<AnchorInfo>,
) -> Option<AnchorInfo> {
    let parent = tree.parent(id)?;
    let previous = previous.unwrap_or_default();
    let compat = tree.options().dpi_rescale_compat;
    let bounds = tree.bounds(id);
    let display = tree.display_rectangle(parent);
    let anchor = tree.layout_state(id).anchor();

    let mut info = AnchorInfo {
        left: bounds.x - display.x,
        top: bounds.y - display.y,
        right: bounds.right() - display.x,
        bottom: bounds.bottom() - display.y,
    };

    let width = display.width;
    if anchor.right {
        if compat && info.right - width > 0 && previous.right < 0 {
            info.right = previous.right;
            if !anchor.left {
                info.left = previous.right - bounds.width;
            }
        } else {
            info.right -= width;
            if !anchor.left {
                info.left -= width;
            }
        }
    } else if !anchor.left {
        info.right -= width / 2;
        info.left -= width / 2;
    }

    let height = display.height;
    if anchor.bottom {
        if compat && info.bottom - height > 0 && previous.bottom < 0 {
            info.bottom = previous.bottom;
            if !anchor.top {
                info.top = previous.bottom - bounds.height;
            }
        } else {
            info.bottom -= height;
            if !anchor.top {
                info.top -= height;
            }
        }
    } else if !anchor.top {
        info.bottom -= height / 2;
        info.top -= height / 2;
    }

    Some(info)
}

/// Recapture the anchor offsets of `id` from its current bounds.
pub(crate) fn update_anchor_info(tree: &mut LayoutTree, id: ElementId) {
    let previous = tree.anchor_info(id);
    if let Some(info) = capture_anchor_info(tree, id, previous) {
        tracing::trace!("{} anchor info {:?}", id, info);
        tree.node_mut(id).anchor_info = Some(info);
    }
}

impl LayoutTree {
    /// Docked edge of an element.
    #[must_use]
    pub fn dock(&self, id: ElementId) -> DockStyle {
        self.node(id).state.dock
    }

    /// Anchored edges of an element. Docked elements report top-left.
    #[must_use]
    pub fn anchor(&self, id: ElementId) -> AnchorStyles {
        self.node(id).state.anchor()
    }

    /// Dock an element to an edge of its container, or undock it with
    /// [`DockStyle::None`], which restores the bounds it had before docking.
    pub fn set_dock(&mut self, id: ElementId, dock: DockStyle) -> Result<(), LayoutError> {
        let el = self.check(id)?;
        if el.state.dock == dock {
            return Ok(());
        }
        let was_docked = el.state.needs_dock_layout() && el.visible;
        let parent = el.parent;
        self.node_mut(id).state.dock = dock;

        let mut tx = LayoutTransaction::new(self, parent, Some(id), LayoutReason::Dock);
        let specified = tx.specified_bounds(id);
        if dock == DockStyle::None {
            if was_docked {
                tx.set_bounds_core(id, specified, BoundsSpecified::NONE);
                if tx.layout_state(id).needs_anchor_layout() {
                    update_anchor_info(&mut tx, id);
                }
            }
        } else {
            tx.set_bounds_core(id, specified, BoundsSpecified::ALL);
        }
        Ok(())
    }

    /// Anchor an element to edges of its container. A docked element is
    /// undocked first.
    pub fn set_anchor(&mut self, id: ElementId, anchor: AnchorStyles) -> Result<(), LayoutError> {
        let el = self.check(id)?;
        let old = el.state.anchor();
        if old == anchor {
            return Ok(());
        }
        if el.state.needs_dock_layout() {
            self.set_dock(id, DockStyle::None)?;
        }

        self.node_mut(id).state.anchor = anchor;
        if self.layout_state(id).needs_anchor_layout() {
            update_anchor_info(self, id);
        } else {
            self.node_mut(id).anchor_info = None;
        }

        if let Some(parent) = self.parent(id) {
            let released = (old.right && !anchor.right) || (old.bottom && !anchor.bottom);
            // releasing a trailing edge can make the margin count towards the
            // container's preferred size
            if let Some(grandparent) = self.parent(parent) {
                self.do_layout_if(released, Some(grandparent), id, LayoutReason::Anchor)?;
            }
            self.do_layout(Some(parent), id, LayoutReason::Anchor)?;
        }
        Ok(())
    }

    /// Scale captured anchor offsets, e.g. after the host changed DPI.
    pub fn scale_anchor_info(&mut self, id: ElementId, factor: (f32, f32)) -> Result<(), LayoutError> {
        let el = self.check_mut(id)?;
        if let Some(info) = el.anchor_info.as_mut() {
            let (width, height) = (f64::from(factor.0), f64::from(factor.1));
            info.left = (f64::from(info.left) * width).round() as i32;
            info.top = (f64::from(info.top) * height).round() as i32;
            info.right = (f64::from(info.right) * width).round() as i32;
            info.bottom = (f64::from(info.bottom) * height).round() as i32;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::LayoutOptions;
    use arrange_core::{Content, Padding, Point};

    fn container(tree: &mut LayoutTree, width: i32, height: i32) -> ElementId {
        let root = tree.create("root");
        tree.set_bounds(root, Rect::new(0, 0, width, height), BoundsSpecified::ALL)
            .unwrap();
        root
    }

    fn child(tree: &mut LayoutTree, parent: ElementId, bounds: Rect) -> ElementId {
        let id = tree.create("child");
        tree.set_bounds(id, bounds, BoundsSpecified::ALL).unwrap();
        tree.add_child(parent, id).unwrap();
        id
    }

    // =========================================================================
    // Docking
    // =========================================================================

    #[test]
    fn test_four_docks_in_order() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, 200, 100);
        let top = child(&mut tree, root, Rect::new(0, 0, 10, 20));
        let left = child(&mut tree, root, Rect::new(0, 0, 30, 10));
        let bottom = child(&mut tree, root, Rect::new(0, 0, 10, 15));
        let fill = child(&mut tree, root, Rect::new(0, 0, 5, 5));
        tree.set_dock(top, DockStyle::Top).unwrap();
        tree.set_dock(left, DockStyle::Left).unwrap();
        tree.set_dock(bottom, DockStyle::Bottom).unwrap();
        tree.set_dock(fill, DockStyle::Fill).unwrap();

        assert_eq!(tree.bounds(top), Rect::new(0, 0, 200, 20));
        assert_eq!(tree.bounds(left), Rect::new(0, 20, 30, 80));
        assert_eq!(tree.bounds(bottom), Rect::new(30, 85, 170, 15));
        assert_eq!(tree.bounds(fill), Rect::new(30, 20, 170, 65));
    }

    #[test]
    fn test_dock_right_respects_padding() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, 100, 50);
        tree.set_padding(root, Padding::all(5)).unwrap();
        let right = child(&mut tree, root, Rect::new(0, 0, 20, 1));
        tree.set_dock(right, DockStyle::Right).unwrap();
        assert_eq!(tree.bounds(right), Rect::new(75, 5, 20, 40));
    }

    #[test]
    fn test_undock_restores_specified_bounds() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, 200, 100);
        let a = child(&mut tree, root, Rect::new(10, 10, 40, 30));
        tree.set_dock(a, DockStyle::Fill).unwrap();
        assert_eq!(tree.bounds(a), Rect::new(0, 0, 200, 100));
        tree.set_dock(a, DockStyle::None).unwrap();
        assert_eq!(tree.bounds(a), Rect::new(10, 10, 40, 30));
    }

    #[test]
    fn test_docked_min_size_shrinks_remaining() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, 100, 100);
        let top = child(&mut tree, root, Rect::new(0, 0, 10, 10));
        tree.set_minimum_size(top, Size::new(0, 30)).unwrap();
        let fill = child(&mut tree, root, Rect::ZERO);
        tree.set_dock(top, DockStyle::Top).unwrap();
        tree.set_dock(fill, DockStyle::Fill).unwrap();
        assert_eq!(tree.bounds(fill), Rect::new(0, 30, 100, 70));
    }

    #[test]
    fn test_document_host_takes_final_remaining_area() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, 100, 100);
        let host = child(&mut tree, root, Rect::ZERO);
        tree.set_kind(host, ElementKind::DocumentHost).unwrap();
        let top = child(&mut tree, root, Rect::new(0, 0, 1, 25));
        tree.set_dock(host, DockStyle::Fill).unwrap();
        tree.set_dock(top, DockStyle::Top).unwrap();
        assert_eq!(tree.bounds(host), Rect::new(0, 25, 100, 75));
    }

    #[test]
    fn test_auto_sized_dock_uses_preferred_height() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, 100, 100);
        let top = child(&mut tree, root, Rect::ZERO);
        tree.set_content(top, Content::wrap(10, 8, 15)).unwrap();
        tree.set_auto_size(top, true).unwrap();
        tree.set_dock(top, DockStyle::Top).unwrap();
        // 100px fits ten items per row
        assert_eq!(tree.bounds(top), Rect::new(0, 0, 100, 16));
    }

    #[test]
    fn test_dock_preferred_size() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, 100, 100);
        let top = child(&mut tree, root, Rect::new(0, 0, 50, 20));
        let left = child(&mut tree, root, Rect::new(0, 0, 30, 60));
        tree.set_dock(top, DockStyle::Top).unwrap();
        tree.set_dock(left, DockStyle::Left).unwrap();
        let before = (tree.bounds(top), tree.bounds(left));

        // a top strip needs only its height, a left strip only its width
        let size = tree.preferred_size(root, Size::ZERO);
        assert_eq!(size, Size::new(30, 20));
        assert_eq!((tree.bounds(top), tree.bounds(left)), before);
    }

    // =========================================================================
    // Anchoring
    // =========================================================================

    #[test]
    fn test_right_bottom_anchor_follows_edges() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, 100, 100);
        let a = child(&mut tree, root, Rect::new(80, 80, 15, 15));
        tree.set_anchor(a, AnchorStyles::BOTTOM | AnchorStyles::RIGHT)
            .unwrap();
        assert_eq!(
            tree.anchor_info(a),
            Some(AnchorInfo {
                left: -20,
                top: -20,
                right: -5,
                bottom: -5
            })
        );

        tree.set_size(root, Size::new(200, 150)).unwrap();
        assert_eq!(tree.bounds(a), Rect::new(180, 130, 15, 15));
    }

    #[test]
    fn test_stretch_and_collapse() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, 100, 50);
        let a = child(&mut tree, root, Rect::new(10, 0, 70, 10));
        tree.set_anchor(a, AnchorStyles::TOP_LEFT | AnchorStyles::RIGHT)
            .unwrap();
        tree.set_size(root, Size::new(150, 50)).unwrap();
        assert_eq!(tree.bounds(a).width, 120);
        tree.set_size(root, Size::new(20, 50)).unwrap();
        assert_eq!(tree.bounds(a), Rect::new(10, 0, 0, 10));
    }

    #[test]
    fn test_unanchored_axis_keeps_center() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, 100, 100);
        let a = child(&mut tree, root, Rect::new(40, 40, 20, 20));
        tree.set_anchor(a, AnchorStyles::NONE).unwrap();
        tree.set_size(root, Size::new(200, 300)).unwrap();
        assert_eq!(tree.bounds(a), Rect::new(90, 140, 20, 20));
    }

    #[test]
    fn test_anchor_undocks() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, 100, 100);
        let a = child(&mut tree, root, Rect::new(5, 5, 10, 10));
        tree.set_dock(a, DockStyle::Top).unwrap();
        tree.set_anchor(a, AnchorStyles::TOP | AnchorStyles::RIGHT)
            .unwrap();
        assert_eq!(tree.dock(a), DockStyle::None);
        assert_eq!(tree.bounds(a), Rect::new(5, 5, 10, 10));
    }

    #[test]
    fn test_anchor_preferred_size_includes_margin() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, 100, 100);
        let a = child(&mut tree, root, Rect::new(10, 10, 30, 20));
        tree.set_margin(a, Padding::all(3)).unwrap();
        assert_eq!(tree.preferred_size(root, Size::ZERO), Size::new(43, 33));
    }

    #[test]
    fn test_right_anchored_preferred_size_keeps_offset() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, 100, 100);
        let a = child(&mut tree, root, Rect::new(80, 0, 15, 10));
        tree.set_anchor(a, AnchorStyles::TOP | AnchorStyles::RIGHT)
            .unwrap();
        // 80px to the left of the child and 5px to its right
        assert_eq!(tree.preferred_size(root, Size::ZERO).width, 100);
    }

    #[test]
    fn test_scale_anchor_info() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, 100, 100);
        let a = child(&mut tree, root, Rect::new(80, 80, 15, 15));
        tree.set_anchor(a, AnchorStyles::BOTTOM | AnchorStyles::RIGHT)
            .unwrap();
        tree.scale_anchor_info(a, (2.0, 1.5)).unwrap();
        assert_eq!(
            tree.anchor_info(a),
            Some(AnchorInfo {
                left: -40,
                top: -30,
                right: -10,
                bottom: -8
            })
        );
    }

    #[test]
    fn test_dpi_compat_keeps_previous_offset() {
        let mut tree = LayoutTree::with_options(LayoutOptions {
            dpi_rescale_compat: true,
            ..LayoutOptions::default()
        });
        let root = container(&mut tree, 100, 100);
        let a = child(&mut tree, root, Rect::new(80, 0, 15, 10));
        tree.set_anchor(a, AnchorStyles::TOP | AnchorStyles::RIGHT)
            .unwrap();

        // moved past the right edge by the host: the old offset wins
        tree.set_location(a, Point::new(120, 0)).unwrap();
        let info = tree.anchor_info(a).unwrap();
        assert_eq!((info.left, info.right), (-20, -5));
    }

    #[test]
    fn test_without_compat_offset_follows_bounds() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, 100, 100);
        let a = child(&mut tree, root, Rect::new(80, 0, 15, 10));
        tree.set_anchor(a, AnchorStyles::TOP | AnchorStyles::RIGHT)
            .unwrap();
        tree.set_location(a, Point::new(120, 0)).unwrap();
        let info = tree.anchor_info(a).unwrap();
        assert_eq!((info.left, info.right), (20, 35));
    }

    // =========================================================================
    // Auto-sizing
    // =========================================================================

    #[test]
    fn test_auto_size_grows_left_when_right_anchored() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, 100, 100);
        let a = child(&mut tree, root, Rect::new(80, 10, 10, 10));
        tree.set_anchor(a, AnchorStyles::TOP | AnchorStyles::RIGHT)
            .unwrap();
        tree.set_content(a, Content::fixed(30, 10)).unwrap();
        tree.set_auto_size(a, true).unwrap();
        assert_eq!(tree.bounds(a), Rect::new(60, 10, 30, 10));
    }

    #[test]
    fn test_grow_only_never_shrinks() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, 100, 100);
        let a = child(&mut tree, root, Rect::new(0, 0, 50, 50));
        tree.set_content(a, Content::fixed(20, 20)).unwrap();
        tree.set_auto_size(a, true).unwrap();
        assert_eq!(tree.bounds(a).size(), Size::new(50, 50));

        tree.set_auto_size_mode(a, AutoSizeMode::GrowAndShrink).unwrap();
        assert_eq!(tree.bounds(a).size(), Size::new(20, 20));
    }

    #[test]
    fn test_auto_size_off_restores_specified() {
        let mut tree = LayoutTree::new();
        let root = container(&mut tree, 100, 100);
        let a = child(&mut tree, root, Rect::new(0, 0, 10, 10));
        tree.set_content(a, Content::fixed(40, 40)).unwrap();
        tree.set_auto_size(a, true).unwrap();
        assert_eq!(tree.bounds(a).size(), Size::new(40, 40));
        tree.set_auto_size(a, false).unwrap();
        assert_eq!(tree.bounds(a).size(), Size::new(10, 10));
    }

    #[test]
    fn test_growth_bounds_directions() {
        let old = Rect::new(50, 50, 10, 10);
        let anchor = AnchorStyles::BOTTOM | AnchorStyles::RIGHT;
        assert_eq!(growth_bounds(anchor, old, Size::new(20, 30)), Rect::new(40, 30, 20, 30));
        assert_eq!(
            growth_bounds(AnchorStyles::TOP_LEFT, old, Size::new(20, 30)),
            Rect::new(50, 50, 20, 30)
        );
    }
}
