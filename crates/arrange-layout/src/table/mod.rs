//! Table layout: children placed in a grid of styled rows and columns.
//!
//! A pass first assigns every visible child a cell (see [`assign`]), then
//! sizes the rows and columns from the children and the styles (see
//! [`sizing`]), and finally fits each child into its cell. The cell
//! assignment is cached on the container until a change makes it stale.

mod assign;
mod sizing;

use self::assign::{assign, Assignment, CellInfo};
use self::sizing::Sizing;
use crate::element::{CellSettings, ElementId, EngineKind};
use crate::engine::{LayoutEngine, LayoutEventArgs, LayoutPlan, LayoutReason};
use crate::tree::LayoutTree;
use arrange_core::{
    CellBorderStyle, DockStyle, LayoutError, Size, SizeType, TableGrowStyle, TableStyle,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Settings of a table container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// Configured number of columns (0 = derived)
    pub column_count: usize,
    /// Configured number of rows (0 = derived)
    pub row_count: usize,
    /// What happens when the configured grid is too small
    pub grow_style: TableGrowStyle,
    /// Column styles, by index; missing entries auto-size
    pub column_styles: Vec<TableStyle>,
    /// Row styles, by index; missing entries auto-size
    pub row_styles: Vec<TableStyle>,
    /// Border drawn around and between cells
    pub cell_border: CellBorderStyle,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            column_count: 0,
            row_count: 0,
            grow_style: TableGrowStyle::AddRows,
            column_styles: Vec::new(),
            row_styles: Vec::new(),
            cell_border: CellBorderStyle::None,
        }
    }
}

impl TableSettings {
    /// Style sizes must be finite and not negative.
    pub fn validate(&self) -> Result<(), LayoutError> {
        for style in self.column_styles.iter().chain(&self.row_styles) {
            if !style.size.is_finite() || style.size < 0.0 {
                return Err(LayoutError::InvalidArgument {
                    name: "style size",
                    value: style.size as i32,
                    minimum: 0,
                });
            }
        }
        Ok(())
    }

    fn border(&self) -> i32 {
        self.cell_border.border_width()
    }
}

/// Cell a child was assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPosition {
    /// Column index
    pub column: usize,
    /// Row index
    pub row: usize,
}

/// Outcome of a committed table pass.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TableGrid {
    assignment: Assignment,
    columns: Vec<i32>,
    rows: Vec<i32>,
}

/// Per-container table data: settings plus the last committed grid.
#[derive(Debug, Default)]
pub(crate) struct TableState {
    pub(crate) settings: TableSettings,
    grid: Option<TableGrid>,
    /// The cell assignment of `grid` no longer matches the children
    stale: bool,
}

impl TableState {
    pub(crate) fn invalidate(&mut self) {
        self.stale = true;
    }

    pub(crate) fn commit(&mut self, grid: TableGrid) {
        self.grid = Some(grid);
        self.stale = false;
    }

    fn assignment(&self) -> Option<&Assignment> {
        if self.stale {
            return None;
        }
        self.grid.as_ref().map(|grid| &grid.assignment)
    }
}

/// Table layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableLayout;

impl LayoutEngine for TableLayout {
    fn name(&self) -> &'static str {
        "table"
    }

    fn plan(&self, tree: &LayoutTree, container: ElementId, _args: &LayoutEventArgs) -> LayoutPlan {
        let mut plan = LayoutPlan::new();
        let state = &tree.node(container).table;
        let settings = &state.settings;
        let assignment = match state.assignment() {
            Some(cached) => Cow::Borrowed(cached),
            None => {
                let fresh = tree.assign_cells(container);
                // setters reject changes that leave a fixed-size table unplaceable
                debug_assert!(fresh.is_ok(), "table {container} cannot place its children: {fresh:?}");
                match fresh {
                    Ok(fresh) => Cow::Owned(fresh),
                    Err(err) => {
                        tracing::warn!("table {} left unarranged: {}", container, err);
                        return plan;
                    }
                }
            }
        };

        let border = settings.border();
        let display = tree.display_rectangle(container);
        let total = Size::new((display.width - border).max(1), (display.height - border).max(1));
        let mut sizing = Sizing::new(
            tree,
            &assignment,
            &settings.column_styles,
            &settings.row_styles,
            settings.column_count,
            border,
        );
        let used = sizing.apply_styles(total, false, false);
        sizing.expand_last(used, total);
        sizing.place(display, tree.right_to_left(container), &mut plan);

        let columns: Vec<i32> = sizing.columns.iter().map(|s| s.min_size).collect();
        let rows: Vec<i32> = sizing.rows.iter().map(|s| s.min_size).collect();
        tracing::trace!("table {} columns {:?} rows {:?}", container, columns, rows);
        plan.layout_bounds = Some(Size::new(
            columns.iter().sum::<i32>() + border,
            rows.iter().sum::<i32>() + border,
        ));
        plan.table = Some(TableGrid {
            assignment: assignment.into_owned(),
            columns,
            rows,
        });
        plan.parent_needs_layout = tree.auto_size(container);
        plan
    }

    fn preferred_size(&self, tree: &LayoutTree, container: ElementId, proposed: Size) -> Size {
        let settings = &tree.node(container).table.settings;
        // measuring never uses or fills the cached assignment
        let assignment = tree.assign_cells(container);
        debug_assert!(assignment.is_ok(), "table {container} cannot place its children: {assignment:?}");
        let Ok(assignment) = assignment else {
            return Size::ZERO;
        };
        let border = settings.border();

        let mut column_styles = Cow::Borrowed(settings.column_styles.as_slice());
        if let Some(first) = settings
            .column_styles
            .first()
            .filter(|s| settings.column_count == 1 && s.size_type == SizeType::Absolute)
        {
            // the only column is as wide as the room the container has
            let display = tree.display_rectangle(container).size();
            let room = (display.width - 2 * border).max(1);
            let width = first.size.max(proposed.width.min(room) as f32);
            column_styles.to_mut()[0] = TableStyle::absolute(width);
        }

        let inner = Size::new((proposed.width - border).max(1), (proposed.height - border).max(1));
        let mut sizing = Sizing::new(
            tree,
            &assignment,
            &column_styles,
            &settings.row_styles,
            settings.column_count,
            border,
        );
        let size = sizing.apply_styles(
            inner,
            !honors_constraint(tree, container, true, inner),
            !honors_constraint(tree, container, false, inner),
        );
        size + Size::new(border, border)
    }
}

/// A table docked or anchored to both edges of an axis by a default-engine
/// parent sizes its percent strips to the constraint on that axis instead
/// of to their content.
fn honors_constraint(tree: &LayoutTree, container: ElementId, horizontal: bool, proposed: Size) -> bool {
    let length = if horizontal { proposed.width } else { proposed.height };
    if length >= i32::from(i16::MAX) {
        return false;
    }
    let Some(parent) = tree.parent(container) else {
        return false;
    };
    if tree.engine(parent) != EngineKind::Default {
        return false;
    }
    let state = tree.layout_state(container);
    match (state.dock, horizontal) {
        (DockStyle::Fill, _) => true,
        (DockStyle::Top | DockStyle::Bottom, true) => true,
        (DockStyle::Left | DockStyle::Right, false) => true,
        (DockStyle::None, true) => state.anchor.stretches_horizontally(),
        (DockStyle::None, false) => state.anchor.stretches_vertically(),
        _ => false,
    }
}

impl LayoutTree {
    fn table_cells(&self, container: ElementId) -> Vec<CellInfo> {
        self.node(container)
            .children
            .iter()
            .copied()
            .filter(|&child| self.participates_in_layout(child))
            .map(|child| CellInfo::new(child, self.node(child).cell))
            .collect()
    }

    fn assign_cells(&self, container: ElementId) -> Result<Assignment, LayoutError> {
        let assignment = assign(self.table_cells(container), &self.node(container).table.settings)?;
        tracing::trace!(
            "assigned {} cells to {}x{}",
            assignment.cells.len(),
            assignment.columns,
            assignment.rows
        );
        Ok(assignment)
    }

    /// Fixed-size tables must have room for every child.
    pub(crate) fn validate_table(&self, id: ElementId) -> Result<(), LayoutError> {
        let el = self.check(id)?;
        if el.engine != EngineKind::Table || el.table.settings.grow_style != TableGrowStyle::FixedSize {
            return Ok(());
        }
        self.assign_cells(id).map(|_| ())
    }

    fn check_table(&self, id: ElementId) -> Result<(), LayoutError> {
        if self.check(id)?.engine == EngineKind::Table {
            Ok(())
        } else {
            Err(LayoutError::WrongEngine {
                id: id.0,
                expected: "table",
            })
        }
    }

    /// Settings of a table container.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in the tree.
    #[must_use]
    pub fn table_settings(&self, id: ElementId) -> &TableSettings {
        &self.node(id).table.settings
    }

    /// Change the settings of a table and lay it out. The change is undone
    /// when the children no longer fit.
    fn update_table(
        &mut self,
        id: ElementId,
        reason: LayoutReason,
        update: impl FnOnce(&mut TableSettings),
    ) -> Result<(), LayoutError> {
        self.check_table(id)?;
        let state = &mut self.node_mut(id).table;
        let previous = state.settings.clone();
        update(&mut state.settings);
        state.invalidate();
        let result = state.settings.validate().and_then(|()| self.validate_table(id));
        if let Err(err) = result {
            let state = &mut self.node_mut(id).table;
            state.settings = previous;
            state.invalidate();
            return Err(err);
        }
        self.do_layout(Some(id), id, reason)
    }

    /// Replace every table setting at once.
    pub fn set_table_settings(&mut self, id: ElementId, settings: TableSettings) -> Result<(), LayoutError> {
        self.update_table(id, LayoutReason::Columns, |current| *current = settings)
    }

    /// Set the configured column count.
    pub fn set_column_count(&mut self, id: ElementId, count: i32) -> Result<(), LayoutError> {
        let count = to_count("column_count", count)?;
        self.update_table(id, LayoutReason::Columns, |s| s.column_count = count)
    }

    /// Set the configured row count.
    pub fn set_row_count(&mut self, id: ElementId, count: i32) -> Result<(), LayoutError> {
        let count = to_count("row_count", count)?;
        self.update_table(id, LayoutReason::Rows, |s| s.row_count = count)
    }

    /// Choose how the grid grows when children do not fit.
    pub fn set_grow_style(&mut self, id: ElementId, grow_style: TableGrowStyle) -> Result<(), LayoutError> {
        self.update_table(id, LayoutReason::GrowStyle, |s| s.grow_style = grow_style)
    }

    /// Replace the column styles.
    pub fn set_column_styles(&mut self, id: ElementId, styles: Vec<TableStyle>) -> Result<(), LayoutError> {
        self.update_table(id, LayoutReason::ColumnStyles, |s| s.column_styles = styles)
    }

    /// Replace the row styles.
    pub fn set_row_styles(&mut self, id: ElementId, styles: Vec<TableStyle>) -> Result<(), LayoutError> {
        self.update_table(id, LayoutReason::RowStyles, |s| s.row_styles = styles)
    }

    /// Set the border drawn around and between cells.
    pub fn set_cell_border_style(&mut self, id: ElementId, border: CellBorderStyle) -> Result<(), LayoutError> {
        self.update_table(id, LayoutReason::CellBorder, |s| s.cell_border = border)
    }

    /// Request a cell for `child`. Rejected when the child's fixed-size
    /// table has no room for it.
    pub fn set_cell(&mut self, child: ElementId, cell: CellSettings) -> Result<(), LayoutError> {
        cell.validate()?;
        let el = self.check_mut(child)?;
        if el.cell == cell {
            return Ok(());
        }
        let previous = std::mem::replace(&mut el.cell, cell);
        if let Some(parent) = el.parent {
            self.node_mut(parent).table.invalidate();
            if let Err(err) = self.validate_table(parent) {
                self.node_mut(child).cell = previous;
                self.node_mut(parent).table.invalidate();
                return Err(err);
            }
        }
        self.relayout_parent(child, LayoutReason::Cell);
        Ok(())
    }

    /// Request a row and column for `child`; -1 leaves an axis automatic.
    pub fn set_cell_position(&mut self, child: ElementId, column: i32, row: i32) -> Result<(), LayoutError> {
        let cell = CellSettings {
            column,
            row,
            ..self.check(child)?.cell
        };
        self.set_cell(child, cell)
    }

    /// Set how many columns and rows `child` spans.
    pub fn set_cell_span(&mut self, child: ElementId, column_span: i32, row_span: i32) -> Result<(), LayoutError> {
        let cell = CellSettings {
            column_span,
            row_span,
            ..self.check(child)?.cell
        };
        self.set_cell(child, cell)
    }

    /// Column widths of the last table pass. Each width includes the border
    /// that precedes the column.
    pub fn column_widths(&self, id: ElementId) -> Result<Vec<i32>, LayoutError> {
        self.check_table(id)?;
        Ok(self.committed_strips(id, |grid| &grid.columns))
    }

    /// Row heights of the last table pass, border included like
    /// [`column_widths`](Self::column_widths).
    pub fn row_heights(&self, id: ElementId) -> Result<Vec<i32>, LayoutError> {
        self.check_table(id)?;
        Ok(self.committed_strips(id, |grid| &grid.rows))
    }

    fn committed_strips(&self, id: ElementId, strips: impl Fn(&TableGrid) -> &Vec<i32>) -> Vec<i32> {
        self.node(id).table.grid.as_ref().map(|grid| strips(grid).clone()).unwrap_or_default()
    }

    /// The first child, in child order, whose span covers the cell.
    pub fn element_at(&self, id: ElementId, column: usize, row: usize) -> Result<Option<ElementId>, LayoutError> {
        let assignment = self.current_assignment(id)?;
        Ok(assignment
            .cells
            .iter()
            .find(|cell| cell.covers(column, row))
            .map(|cell| cell.id))
    }

    /// The cell `child` starts in, if its container is a table and the child
    /// takes part in layout.
    pub fn cell_position(&self, child: ElementId) -> Result<Option<CellPosition>, LayoutError> {
        let Some(parent) = self.check(child)?.parent else {
            return Ok(None);
        };
        if self.node(parent).engine != EngineKind::Table {
            return Ok(None);
        }
        let assignment = self.current_assignment(parent)?;
        Ok(assignment
            .cells
            .iter()
            .find(|cell| cell.id == child)
            .map(|cell| CellPosition {
                column: cell.column,
                row: cell.row,
            }))
    }

    fn current_assignment(&self, id: ElementId) -> Result<Cow<'_, Assignment>, LayoutError> {
        self.check_table(id)?;
        match self.node(id).table.assignment() {
            Some(cached) => Ok(Cow::Borrowed(cached)),
            None => self.assign_cells(id).map(Cow::Owned),
        }
    }
}

fn to_count(name: &'static str, value: i32) -> Result<usize, LayoutError> {
    let value = arrange_core::ensure_at_least(name, value, 0)?;
    Ok(usize::try_from(value).unwrap_or(0))
}
