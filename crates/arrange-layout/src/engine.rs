//! The layout engine strategy interface and the placement plan it produces.

use crate::element::{ElementId, EngineKind};
use crate::table::TableGrid;
use crate::tree::LayoutTree;
use crate::{default::DefaultLayout, flow::FlowLayout, table::TableLayout};
use arrange_core::{BoundsSpecified, Rect, Size};
use indexmap::IndexMap;
use std::fmt;

/// Why a layout pass was requested. Diagnostic only, except that some
/// reasons also invalidate a table's cached cell assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutReason {
    /// Bounds changed
    Bounds,
    /// Dock changed
    Dock,
    /// Anchor changed
    Anchor,
    /// Auto-size flag or mode changed
    AutoSize,
    /// Margin changed
    Margin,
    /// Padding changed
    Padding,
    /// Minimum size changed
    MinimumSize,
    /// Maximum size changed
    MaximumSize,
    /// Visibility changed
    Visible,
    /// Z-order changed
    ChildIndex,
    /// Parent changed
    Parent,
    /// A child was added or removed
    Children,
    /// Table row count changed
    Rows,
    /// Table column count changed
    Columns,
    /// Table row styles changed
    RowStyles,
    /// Table column styles changed
    ColumnStyles,
    /// Table grow style changed
    GrowStyle,
    /// Table cell border changed
    CellBorder,
    /// Flow direction changed
    FlowDirection,
    /// Flow wrapping changed
    WrapContents,
    /// Flow break flag changed
    FlowBreak,
    /// Table cell position or span changed
    Cell,
    /// Right-to-left flag changed
    RightToLeft,
    /// A child's preferred size may have changed
    PreferredSize,
    /// Leaf content changed
    Content,
    /// Layout engine changed
    Engine,
    /// Deferred work after resuming or a reentrant request
    Resume,
    /// Requested directly by the host
    Explicit,
}

impl LayoutReason {
    /// True for changes that make a table's cell assignment stale.
    #[must_use]
    pub const fn invalidates_table_cache(self) -> bool {
        matches!(
            self,
            Self::ChildIndex
                | Self::Parent
                | Self::Visible
                | Self::Children
                | Self::Rows
                | Self::Columns
                | Self::RowStyles
                | Self::ColumnStyles
                | Self::Cell
                | Self::GrowStyle
        )
    }
}

impl fmt::Display for LayoutReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bounds => "bounds",
            Self::Dock => "dock",
            Self::Anchor => "anchor",
            Self::AutoSize => "auto_size",
            Self::Margin => "margin",
            Self::Padding => "padding",
            Self::MinimumSize => "minimum_size",
            Self::MaximumSize => "maximum_size",
            Self::Visible => "visible",
            Self::ChildIndex => "child_index",
            Self::Parent => "parent",
            Self::Children => "children",
            Self::Rows => "rows",
            Self::Columns => "columns",
            Self::RowStyles => "row_styles",
            Self::ColumnStyles => "column_styles",
            Self::GrowStyle => "grow_style",
            Self::CellBorder => "cell_border",
            Self::FlowDirection => "flow_direction",
            Self::WrapContents => "wrap_contents",
            Self::FlowBreak => "flow_break",
            Self::Cell => "cell",
            Self::RightToLeft => "right_to_left",
            Self::PreferredSize => "preferred_size",
            Self::Content => "content",
            Self::Engine => "engine",
            Self::Resume => "resume",
            Self::Explicit => "explicit",
        };
        f.write_str(name)
    }
}

/// Arguments of a layout request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEventArgs {
    /// The element whose change caused the request, if any
    pub affected: Option<ElementId>,
    /// Why layout was requested
    pub reason: LayoutReason,
}

impl LayoutEventArgs {
    /// Create layout arguments.
    #[must_use]
    pub const fn new(affected: Option<ElementId>, reason: LayoutReason) -> Self {
        Self { affected, reason }
    }
}

/// Bounds an engine wants to give the children of one container.
///
/// Engines build a plan without touching the tree. Committing a layout
/// applies it; measuring folds it into a size and drops it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutPlan {
    placements: IndexMap<ElementId, Rect>,
    pub(crate) layout_bounds: Option<Size>,
    pub(crate) table: Option<TableGrid>,
    pub(crate) parent_needs_layout: bool,
}

impl LayoutPlan {
    /// Create an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the bounds of `id`, replacing any earlier entry but keeping
    /// its original position in the plan.
    pub fn place(&mut self, id: ElementId, bounds: Rect) {
        self.placements.insert(id, bounds);
    }

    /// Planned bounds of `id`, if any.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<Rect> {
        self.placements.get(&id).copied()
    }

    /// Planned bounds of `id`, falling back to its current bounds.
    #[must_use]
    pub fn bounds_or_current(&self, tree: &LayoutTree, id: ElementId) -> Rect {
        self.get(id).unwrap_or_else(|| tree.bounds(id))
    }

    /// Placements in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, Rect)> + '_ {
        self.placements.iter().map(|(id, rect)| (*id, *rect))
    }

    /// Number of placed elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// True when nothing is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Move every placement of `other` into this plan.
    pub fn extend(&mut self, other: Self) {
        self.placements.extend(other.placements);
    }

    /// Whether the container's own parent should lay out again after this
    /// plan is applied.
    #[must_use]
    pub const fn parent_needs_layout(&self) -> bool {
        self.parent_needs_layout
    }

    pub(crate) fn into_placements(self) -> IndexMap<ElementId, Rect> {
        self.placements
    }
}

/// A layout strategy.
///
/// Engines hold no state of their own: everything they need lives on the
/// container and its children in the [`LayoutTree`].
pub trait LayoutEngine: fmt::Debug + Sync {
    /// Short name, used in diagnostics.
    fn name(&self) -> &'static str;

    /// Compute the bounds of the children of `container` without changing
    /// anything.
    fn plan(&self, tree: &LayoutTree, container: ElementId, args: &LayoutEventArgs) -> LayoutPlan;

    /// Preferred size of the container's content for a constraint that has
    /// already had the container's padding removed.
    fn preferred_size(&self, tree: &LayoutTree, container: ElementId, proposed: Size) -> Size;

    /// Called after the bounds of `child` were set by someone other than
    /// this engine.
    fn init_layout(&self, tree: &mut LayoutTree, child: ElementId, specified: BoundsSpecified) {
        let _ = (tree, child, specified);
    }

    /// Lay out the children of `container`. Returns true when the
    /// container's parent should lay out again because the container's
    /// preferred size may have changed.
    fn layout(&self, tree: &mut LayoutTree, container: ElementId, args: &LayoutEventArgs) -> bool {
        let plan = self.plan(tree, container, args);
        tree.apply_plan(container, plan)
    }
}

impl EngineKind {
    /// The engine implementing this strategy.
    #[must_use]
    pub fn engine(self) -> &'static dyn LayoutEngine {
        match self {
            Self::Default => &DefaultLayout,
            Self::Flow => &FlowLayout,
            Self::Table => &TableLayout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_place_overwrites_in_place() {
        let mut plan = LayoutPlan::new();
        plan.place(ElementId(2), Rect::new(0, 0, 1, 1));
        plan.place(ElementId(1), Rect::new(1, 1, 1, 1));
        plan.place(ElementId(2), Rect::new(5, 5, 5, 5));
        let order: Vec<_> = plan.iter().collect();
        assert_eq!(
            order,
            vec![
                (ElementId(2), Rect::new(5, 5, 5, 5)),
                (ElementId(1), Rect::new(1, 1, 1, 1))
            ]
        );
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_table_cache_reasons() {
        assert!(LayoutReason::Visible.invalidates_table_cache());
        assert!(LayoutReason::ColumnStyles.invalidates_table_cache());
        assert!(!LayoutReason::Bounds.invalidates_table_cache());
        assert!(!LayoutReason::Margin.invalidates_table_cache());
    }

    #[test]
    fn test_engine_names() {
        assert_eq!(EngineKind::Default.engine().name(), "default");
        assert_eq!(EngineKind::Flow.engine().name(), "flow");
        assert_eq!(EngineKind::Table.engine().name(), "table");
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(LayoutReason::ChildIndex.to_string(), "child_index");
    }
}
