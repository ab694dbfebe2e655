//! Flow layout: children packed into rows that wrap when full.
//!
//! Every direction is laid out as left-to-right rows. Vertical directions
//! flip the coordinates of the container and its children, mirrored
//! directions reflect the packed bounds across the row. [`FlowTransform`]
//! carries both.

use crate::element::{ElementId, EngineKind, FlowSettings};
use crate::engine::{LayoutEngine, LayoutEventArgs, LayoutPlan, LayoutReason};
use crate::tree::LayoutTree;
use crate::utils::align_and_stretch;
use arrange_core::{AnchorStyles, FlowDirection, LayoutError, Padding, Rect, Size};

/// Flow layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowLayout;

impl LayoutEngine for FlowLayout {
    fn name(&self) -> &'static str {
        "flow"
    }

    fn plan(&self, tree: &LayoutTree, container: ElementId, _args: &LayoutEventArgs) -> LayoutPlan {
        let display = tree.display_rectangle(container);
        let packer = Packer::new(tree, container, display);
        let mut plan = LayoutPlan::new();
        let size = packer.pack(display, Some(&mut plan));
        plan.layout_bounds = Some(size);
        plan.parent_needs_layout = tree.auto_size(container);
        plan
    }

    fn preferred_size(&self, tree: &LayoutTree, container: ElementId, proposed: Size) -> Size {
        let bounds = Rect::from_size(proposed);
        let packer = Packer::new(tree, container, bounds);
        let size = packer.pack(bounds, None);
        if size.width > proposed.width || size.height > proposed.height {
            // elements measured before the one that did not fit may move
            // once the row is wide enough
            return packer.pack(Rect::from_size(size), None);
        }
        size
    }
}

/// Maps the canonical left-to-right packing space to container space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowTransform {
    /// Rows run top to bottom: swap x and y
    pub vertical: bool,
    /// Rows fill from the trailing edge
    pub mirrored: bool,
    /// The container is right to left
    pub right_to_left: bool,
}

impl FlowTransform {
    /// Transform for a flow direction inside a container.
    #[must_use]
    pub const fn new(direction: FlowDirection, right_to_left: bool) -> Self {
        Self {
            vertical: direction.is_vertical(),
            mirrored: direction.is_mirrored(),
            right_to_left,
        }
    }

    /// Size in packing space.
    #[must_use]
    pub const fn size(&self, size: Size) -> Size {
        size.flip_if(self.vertical)
    }

    /// Margin in packing space.
    #[must_use]
    pub const fn padding(&self, padding: Padding) -> Padding {
        if self.vertical {
            padding.flip()
        } else {
            padding
        }
    }

    /// The anchor that aligns an element across its row: top, bottom,
    /// stretched (top and bottom) or centered (none).
    #[must_use]
    pub const fn row_anchor(&self, anchor: AnchorStyles) -> AnchorStyles {
        let (stretch, leading, trailing) = if self.vertical {
            (anchor.stretches_horizontally(), anchor.left, anchor.right)
        } else {
            (anchor.stretches_vertically(), anchor.top, anchor.bottom)
        };
        if stretch {
            AnchorStyles::new(true, true, false, false)
        } else if leading {
            AnchorStyles::TOP
        } else if trailing {
            AnchorStyles::BOTTOM
        } else {
            AnchorStyles::NONE
        }
    }

    /// Bring packed bounds back into container space. `display` is the
    /// container's display rectangle in packing space and `margin` the
    /// element's margin in packing space.
    #[must_use]
    pub const fn to_container(&self, bounds: Rect, margin: Padding, display: Rect) -> Rect {
        let mut bounds = bounds;
        if self.mirrored {
            bounds.x = display.right() - bounds.x - bounds.width + margin.left - margin.right;
        }
        if self.right_to_left {
            if self.vertical {
                bounds.y = display.bottom() - bounds.bottom();
            } else {
                bounds.x = display.right() - bounds.right();
            }
        }
        bounds.flip_if(self.vertical)
    }
}

/// One flow pass over a container.
struct Packer<'a> {
    tree: &'a LayoutTree,
    container: ElementId,
    transform: FlowTransform,
    wrap: bool,
    /// Display rectangle in packing space, before any no-wrap widening
    display: Rect,
}

impl<'a> Packer<'a> {
    fn new(tree: &'a LayoutTree, container: ElementId, display: Rect) -> Self {
        let settings = tree.flow_settings(container);
        let transform = FlowTransform::new(settings.direction, tree.right_to_left(container));
        Self {
            tree,
            container,
            transform,
            wrap: settings.wrap_contents,
            display: display.flip_if(transform.vertical),
        }
    }

    /// Pack every child into rows inside `display`; with a plan, also
    /// record the bounds of each child. Returns the size the rows take.
    fn pack(&self, display: Rect, mut plan: Option<&mut LayoutPlan>) -> Size {
        let mut display = display.flip_if(self.transform.vertical);
        if !self.wrap {
            // an infinitely wide container never wraps
            display.width = i32::MAX - display.x;
        }

        let count = self.tree.children(self.container).len();
        let mut size = Size::ZERO;
        let mut start = 0;
        while start < count {
            let available = Rect::new(
                display.x,
                display.y,
                display.width,
                display.height - size.height,
            );
            let (row, end) = self.row(start, count, available, None);
            debug_assert!(self.wrap || end == count, "unwrapped flow broke a row");

            if let Some(plan) = plan.as_deref_mut() {
                let bounds = Rect::new(display.x, display.y + size.height, row.width, row.height);
                self.row(start, end, bounds, Some(plan));
            }
            size.width = size.width.max(row.width);
            size.height += row.height;
            start = end;
        }
        self.transform.size(size)
    }

    /// Lay out children `start..end` in one row. Returns the row size and
    /// the index of the first child that belongs to the next row.
    fn row(
        &self,
        start: usize,
        end: usize,
        bounds: Rect,
        mut plan: Option<&mut LayoutPlan>,
    ) -> (Size, usize) {
        let tree = self.tree;
        let children = tree.children(self.container);
        let mut location = bounds.location();
        let mut row = Size::ZERO;
        let mut laid_out = 0;
        let mut break_index = start;
        let mut break_on_next = false;

        let mut i = start;
        while i < end {
            let child = children[i];
            if !tree.participates_in_layout(child) {
                i += 1;
                break_index += 1;
                continue;
            }

            let margin = self.transform.padding(tree.margin(child));
            let anchor = self
                .transform
                .row_anchor(tree.layout_state(child).unified_anchor());
            let preferred = if tree.auto_size(child) {
                let mut constraint = Size::new(i32::MAX, bounds.height - margin.vertical());
                if i == start {
                    // the first element of a row may take the whole row
                    constraint.width = bounds.width - row.width - margin.horizontal();
                }
                let constraint = Size::new(1, 1).union(constraint);
                self.transform
                    .size(tree.preferred_size(child, self.transform.size(constraint)))
            } else {
                let mut size = self.transform.size(tree.specified_bounds(child).size());
                if anchor.stretches_vertically() {
                    size.height = 0;
                }
                size.height = size
                    .height
                    .max(self.transform.size(tree.minimum_size(child)).height);
                size
            };
            let required = preferred + margin.size();

            if let Some(plan) = plan.as_deref_mut() {
                let cell = Rect::from_parts(location, Size::new(required.width, bounds.height))
                    .deflate(margin);
                let placed = align_and_stretch(preferred, cell, anchor);
                plan.place(child, self.transform.to_container(placed, margin, self.display));
            }

            location.x += required.width;
            // an element wider than the row still gets a row of its own
            if laid_out > 0 && location.x > bounds.right() {
                break;
            }
            row.width = location.x - bounds.x;
            row.height = row.height.max(required.height);

            if self.wrap {
                if break_on_next {
                    break;
                }
                if i + 1 < end && tree.layout_state(child).flow_break {
                    if laid_out == 0 {
                        break_on_next = true;
                    } else {
                        break_index += 1;
                        break;
                    }
                }
            }
            laid_out += 1;
            i += 1;
            break_index += 1;
        }
        (row, break_index)
    }
}

impl LayoutTree {
    fn check_flow(&self, id: ElementId) -> Result<(), LayoutError> {
        if self.check(id)?.engine == EngineKind::Flow {
            Ok(())
        } else {
            Err(LayoutError::WrongEngine {
                id: id.0,
                expected: "flow",
            })
        }
    }

    /// Set the direction rows are filled in.
    pub fn set_flow_direction(&mut self, id: ElementId, direction: FlowDirection) -> Result<(), LayoutError> {
        self.check_flow(id)?;
        self.node_mut(id).flow.direction = direction;
        self.do_layout(Some(id), id, LayoutReason::FlowDirection)
    }

    /// Choose whether full rows wrap.
    pub fn set_wrap_contents(&mut self, id: ElementId, wrap: bool) -> Result<(), LayoutError> {
        self.check_flow(id)?;
        self.node_mut(id).flow.wrap_contents = wrap;
        self.do_layout(Some(id), id, LayoutReason::WrapContents)
    }

    /// Replace every flow setting at once.
    pub fn set_flow_settings(&mut self, id: ElementId, settings: FlowSettings) -> Result<(), LayoutError> {
        self.check_flow(id)?;
        self.node_mut(id).flow = settings;
        self.do_layout(Some(id), id, LayoutReason::FlowDirection)
    }

    /// End the flow row after this element.
    pub fn set_flow_break(&mut self, id: ElementId, value: bool) -> Result<(), LayoutError> {
        let el = self.check_mut(id)?;
        if el.state.flow_break != value {
            el.state.flow_break = value;
            self.relayout_parent(id, LayoutReason::FlowBreak);
        }
        Ok(())
    }
}
