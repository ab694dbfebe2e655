//! Arranged elements: the per-node state the engines read and write.

use crate::table::TableState;
use arrange_core::{
    AnchorStyles, AutoSizeMode, DockStyle, FlowDirection, LayoutError, Measure, Padding, Rect,
    Size,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to an element in a [`LayoutTree`](crate::LayoutTree).
///
/// Ids are never reused, so a handle to a removed element stays invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u64);

impl ElementId {
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What sort of element this is, as far as docking is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// An ordinary element
    #[default]
    Normal,
    /// A multi-document host. When docked `Fill` it takes whatever area is
    /// left after every other docked sibling.
    DocumentHost,
}

/// The layout strategy a container applies to its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Anchoring and docking
    #[default]
    Default,
    /// Wrapped rows or columns
    Flow,
    /// Rows and columns with styles and spans
    Table,
}

/// Layout flags of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutState {
    /// Size to the preferred size
    pub auto_size: bool,
    /// How auto-sizing reacts to a shrinking preferred size
    pub auto_size_mode: AutoSizeMode,
    /// Docked edge; `None` means anchoring applies
    pub dock: DockStyle,
    /// Anchored edges (meaningful only when not docked)
    pub anchor: AnchorStyles,
    /// In a flow container, start a new row after this element
    pub flow_break: bool,
    /// The element sizes itself; the anchor engine leaves its size alone
    pub self_auto_size: bool,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            auto_size: false,
            auto_size_mode: AutoSizeMode::GrowOnly,
            dock: DockStyle::None,
            anchor: AnchorStyles::TOP_LEFT,
            flow_break: false,
            self_auto_size: false,
        }
    }
}

impl LayoutState {
    /// Effective anchor. A docked element reports the default anchor.
    #[must_use]
    pub const fn anchor(&self) -> AnchorStyles {
        if matches!(self.dock, DockStyle::None) {
            self.anchor
        } else {
            AnchorStyles::TOP_LEFT
        }
    }

    /// Docking and anchoring expressed as one anchor value.
    #[must_use]
    pub const fn unified_anchor(&self) -> AnchorStyles {
        if matches!(self.dock, DockStyle::None) {
            self.anchor
        } else {
            self.dock.to_anchor()
        }
    }

    /// True when the anchor engine has to move or size this element.
    #[must_use]
    pub fn needs_anchor_layout(&self) -> bool {
        self.dock == DockStyle::None && (self.anchor != AnchorStyles::TOP_LEFT || self.auto_size)
    }

    /// True when the element is docked.
    #[must_use]
    pub fn needs_dock_layout(&self) -> bool {
        self.dock != DockStyle::None
    }

    /// True when the anchor engine should resize this element to its
    /// preferred size.
    #[must_use]
    pub fn auto_sized_and_anchored(&self) -> bool {
        !self.self_auto_size && self.auto_size && self.dock == DockStyle::None
    }
}

/// Edge offsets captured when an element was anchored.
///
/// Each value is relative to the container's display rectangle at capture
/// time: `left`/`top` from its origin, and `right`/`bottom` from its trailing
/// edge when anchored there (so usually negative), from its origin when
/// anchored only to the leading edge, or from its midpoint when the axis is
/// unanchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AnchorInfo {
    /// Left offset
    pub left: i32,
    /// Top offset
    pub top: i32,
    /// Right offset
    pub right: i32,
    /// Bottom offset
    pub bottom: i32,
}

/// Requested table placement of a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CellSettings {
    /// Requested row, or -1 for automatic placement
    pub row: i32,
    /// Requested column, or -1 for automatic placement
    pub column: i32,
    /// Rows spanned (at least 1)
    pub row_span: i32,
    /// Columns spanned (at least 1)
    pub column_span: i32,
}

impl Default for CellSettings {
    fn default() -> Self {
        Self {
            row: -1,
            column: -1,
            row_span: 1,
            column_span: 1,
        }
    }
}

impl CellSettings {
    /// Check positions (>= -1) and spans (>= 1).
    pub fn validate(&self) -> Result<(), LayoutError> {
        arrange_core::ensure_at_least("row", self.row, -1)?;
        arrange_core::ensure_at_least("column", self.column, -1)?;
        arrange_core::ensure_at_least("row_span", self.row_span, 1)?;
        arrange_core::ensure_at_least("column_span", self.column_span, 1)?;
        Ok(())
    }

    /// Both a row and a column were requested.
    #[must_use]
    pub const fn is_absolutely_positioned(&self) -> bool {
        self.row >= 0 && self.column >= 0
    }
}

/// Settings of a flow container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowSettings {
    /// Packing direction
    pub direction: FlowDirection,
    /// Wrap to a new row when the current one is full
    pub wrap_contents: bool,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            direction: FlowDirection::LeftToRight,
            wrap_contents: true,
        }
    }
}

/// Suspend/resume bookkeeping of a container.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Suspension {
    pub(crate) count: u32,
    pub(crate) pending: bool,
    pub(crate) in_pass: bool,
}

/// One node of the tree.
#[derive(Debug)]
pub(crate) struct Element {
    pub(crate) name: String,
    pub(crate) kind: ElementKind,
    pub(crate) engine: EngineKind,
    pub(crate) bounds: Rect,
    /// `None` means "same as `bounds`"
    pub(crate) specified_bounds: Option<Rect>,
    pub(crate) padding: Padding,
    pub(crate) margin: Padding,
    pub(crate) minimum_size: Size,
    pub(crate) maximum_size: Size,
    pub(crate) state: LayoutState,
    pub(crate) visible: bool,
    pub(crate) right_to_left: bool,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) content: Option<Box<dyn Measure>>,
    pub(crate) anchor_info: Option<AnchorInfo>,
    pub(crate) cell: CellSettings,
    pub(crate) flow: FlowSettings,
    pub(crate) table: TableState,
    pub(crate) layout_bounds: Size,
    pub(crate) suspension: Suspension,
}

impl Element {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            kind: ElementKind::Normal,
            engine: EngineKind::Default,
            bounds: Rect::ZERO,
            specified_bounds: None,
            padding: Padding::ZERO,
            margin: Padding::ZERO,
            minimum_size: Size::ZERO,
            maximum_size: Size::ZERO,
            state: LayoutState::default(),
            visible: true,
            right_to_left: false,
            parent: None,
            children: Vec::new(),
            content: None,
            anchor_info: None,
            cell: CellSettings::default(),
            flow: FlowSettings::default(),
            table: TableState::default(),
            layout_bounds: Size::ZERO,
            suspension: Suspension::default(),
        }
    }

    pub(crate) fn specified_bounds(&self) -> Rect {
        self.specified_bounds.unwrap_or(self.bounds)
    }

    pub(crate) fn display_rectangle(&self) -> Rect {
        Rect::from_size(self.bounds.size()).deflate(self.padding)
    }

    /// Apply min/max limits and forbid negative extents.
    pub(crate) fn constrain_size(&self, size: Size) -> Size {
        size.constrain(self.minimum_size, self.maximum_size).non_negative()
    }

    pub(crate) fn is_container(&self) -> bool {
        !self.children.is_empty()
    }
}
