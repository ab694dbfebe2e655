//! Cell assignment: the row and column each child starts in.
//!
//! Children with both a row and a column ("fixed" cells) are placed at their
//! requested position, or as close after it as the grid allows. Every other
//! child flows into the next free cell. The two queues are merged so that a
//! flow child only goes first when it lands before the next fixed cell.

use super::TableSettings;
use crate::element::{CellSettings, ElementId};
use arrange_core::{LayoutError, TableGrowStyle};
use std::collections::VecDeque;

/// Requested and assigned placement of one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CellInfo {
    pub(crate) id: ElementId,
    /// Requested (row, column), only for fixed cells
    pub(crate) position: Option<(usize, usize)>,
    pub(crate) row_span: usize,
    pub(crate) column_span: usize,
    pub(crate) row: usize,
    pub(crate) column: usize,
}

impl CellInfo {
    pub(crate) fn new(id: ElementId, cell: CellSettings) -> Self {
        let position = cell
            .is_absolutely_positioned()
            .then(|| (to_index(cell.row), to_index(cell.column)));
        Self {
            id,
            position,
            row_span: to_index(cell.row_span).max(1),
            column_span: to_index(cell.column_span).max(1),
            row: 0,
            column: 0,
        }
    }

    /// True when the cell covers (`column`, `row`).
    pub(crate) const fn covers(&self, column: usize, row: usize) -> bool {
        self.column <= column
            && column < self.column + self.column_span
            && self.row <= row
            && row < self.row + self.row_span
    }
}

fn to_index(value: i32) -> usize {
    usize::try_from(value).unwrap_or(0)
}

/// Result of placing every participating child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Assignment {
    /// Participating children in child order
    pub(crate) cells: Vec<CellInfo>,
    pub(crate) columns: usize,
    pub(crate) rows: usize,
}

/// Cells taken by row-spanning children, indexed by (column, rows below the
/// cursor row). Rows scroll off the front as the cursor moves down.
#[derive(Debug, Default)]
struct ReservationGrid {
    rows: VecDeque<Vec<bool>>,
}

impl ReservationGrid {
    fn is_reserved(&self, column: usize, row_offset: usize) -> bool {
        self.rows
            .get(row_offset)
            .and_then(|row| row.get(column))
            .copied()
            .unwrap_or(false)
    }

    fn reserve(&mut self, column: usize, row_offset: usize) {
        debug_assert!(!self.is_reserved(column, row_offset), "cell reserved twice");
        while self.rows.len() <= row_offset {
            self.rows.push_back(Vec::new());
        }
        let row = &mut self.rows[row_offset];
        if column >= row.len() {
            row.resize(column + 1, false);
        }
        row[column] = true;
    }

    /// Reserve the rows of `cell` below its first one, up to `row_stop` and
    /// `column_stop` (exclusive).
    fn reserve_all(&mut self, cell: &CellInfo, row_stop: usize, column_stop: usize) {
        for offset in 1..row_stop.saturating_sub(cell.row) {
            for column in cell.column..column_stop {
                self.reserve(column, offset);
            }
        }
    }

    fn advance_row(&mut self) {
        self.rows.pop_front();
    }

    fn advance_rows(&mut self, count: usize) {
        for _ in 0..count {
            self.advance_row();
        }
    }
}

/// Place `cells` for `settings`. Only fixed-size tables can fail.
pub(crate) fn assign(
    mut cells: Vec<CellInfo>,
    settings: &TableSettings,
) -> Result<Assignment, LayoutError> {
    let required: usize = cells.iter().map(|c| c.row_span * c.column_span).sum();
    let (min_columns, min_rows) = cells
        .iter()
        .filter_map(|c| c.position.map(|(row, column)| (column + c.column_span, row + c.row_span)))
        .fold((0, 0), |(cols, rows), (c, r)| (cols.max(c), rows.max(r)));

    let mut fixed: Vec<usize> = (0..cells.len()).filter(|&i| cells[i].position.is_some()).collect();
    fixed.sort_by_key(|&i| cells[i].position);

    let (mut max_columns, mut max_rows) = (settings.column_count, settings.row_count);
    match settings.grow_style {
        TableGrowStyle::FixedSize => {
            if required > max_columns.saturating_mul(max_rows) {
                return Err(LayoutError::TableFull {
                    required,
                    columns: max_columns,
                    rows: max_rows,
                });
            }
            if min_columns > max_columns {
                return Err(LayoutError::SpanExceedsGrid {
                    axis: "column",
                    span: min_columns,
                    count: max_columns,
                });
            }
            if min_rows > max_rows {
                return Err(LayoutError::SpanExceedsGrid {
                    axis: "row",
                    span: min_rows,
                    count: max_rows,
                });
            }
            max_columns = max_columns.max(1);
            max_rows = max_rows.max(1);
        }
        TableGrowStyle::AddRows => max_rows = 0,
        TableGrowStyle::AddColumns => max_columns = 0,
    }

    let (columns_limit, rows_limit, used) = if max_columns > 0 {
        let rows_limit = if max_rows == 0 { usize::MAX } else { max_rows };
        let used = place(&mut cells, &fixed, max_columns, rows_limit);
        (max_columns, rows_limit, used)
    } else if max_rows > 0 {
        // rows are fixed: find the fewest columns that hold everything
        let mut estimate = required.div_ceil(max_rows).max(min_columns).max(1);
        loop {
            if let Some(used) = place(&mut cells, &fixed, estimate, max_rows) {
                break (estimate, max_rows, Some(used));
            }
            estimate += 1;
        }
    } else {
        let columns = min_columns.max(1);
        let used = place(&mut cells, &fixed, columns, usize::MAX);
        (columns, usize::MAX, used)
    };

    let Some((used_columns, used_rows)) = used else {
        // the requested positions leave gaps that the remaining cells cannot use
        return Err(LayoutError::TableFull {
            required,
            columns: settings.column_count,
            rows: settings.row_count,
        });
    };

    let (columns, rows) = match settings.grow_style {
        TableGrowStyle::FixedSize => (columns_limit, rows_limit),
        TableGrowStyle::AddRows => (columns_limit, settings.row_count.max(used_rows)),
        TableGrowStyle::AddColumns => {
            let rows = if rows_limit == usize::MAX { used_rows } else { rows_limit };
            (settings.column_count.max(used_columns), rows)
        }
    };
    tracing::trace!("assigned {} cells to {}x{}", cells.len(), columns, rows);
    Ok(Assignment {
        cells,
        columns,
        rows,
    })
}

/// Merge the flow and fixed queues into a `max_columns` wide grid. Returns
/// the columns and rows used, or `None` when a cell would start at or past
/// `max_rows`.
fn place(
    cells: &mut [CellInfo],
    fixed: &[usize],
    max_columns: usize,
    max_rows: usize,
) -> Option<(usize, usize)> {
    debug_assert!(max_columns > 0);
    let flow: Vec<usize> = (0..cells.len()).filter(|&i| cells[i].position.is_none()).collect();
    let mut flow = flow.into_iter().peekable();
    let mut fixed = fixed.iter().copied().peekable();
    let mut grid = ReservationGrid::default();
    let (mut row, mut column) = (0, 0);
    let (mut used_columns, mut used_rows) = (0, 0);

    loop {
        let next_flow = flow.peek().copied();
        let next_fixed = fixed.peek().copied();

        // try the flow cell at the cursor first
        let mut column_stop = column;
        if let Some(f) = next_flow {
            let cell = &mut cells[f];
            cell.row = row;
            cell.column = column;
            column_stop = advance_until_fits(max_columns, &grid, cell);
            if cell.row >= max_rows {
                return None;
            }
        }

        let row_stop;
        match (next_flow, next_fixed) {
            (Some(f), x)
                if x.map_or(true, |x| {
                    !cursor_past(&cells[x], cells[f].row, column_stop)
                        && !overlaps_reserved(&cells[x], &grid, row)
                }) =>
            {
                let cell = &cells[f];
                grid.advance_rows(cell.row - row);
                row = cell.row;
                row_stop = (row + cell.row_span).min(max_rows);
                grid.reserve_all(cell, row_stop, column_stop);
                flow.next();
            }
            (_, Some(x)) => {
                if column >= max_columns {
                    column = 0;
                    row += 1;
                    grid.advance_row();
                }
                let cell = &mut cells[x];
                let (want_row, want_column) = cell.position.unwrap_or_default();
                cell.row = want_row.min(max_rows - 1);
                cell.column = want_column.min(max_columns - 1);
                if row > cell.row {
                    cell.column = column;
                } else if row == cell.row {
                    cell.column = cell.column.max(column);
                }
                cell.row = cell.row.max(row);

                let skipped = cell.row - row;
                grid.advance_rows(skipped);
                advance_until_fits(max_columns, &grid, cell);
                if cell.row >= max_rows {
                    return None;
                }
                grid.advance_rows(cell.row - row - skipped);
                row = cell.row;

                column_stop = (cell.column + cell.column_span).min(max_columns);
                row_stop = (cell.row + cell.row_span).min(max_rows);
                grid.reserve_all(cell, row_stop, column_stop);
                fixed.next();
            }
            _ => break,
        }

        column = column_stop;
        used_rows = used_rows.max(row_stop);
        used_columns = used_columns.max(column_stop);
    }
    Some((used_columns, used_rows))
}

/// Move `cell` right and down until its first row is free. Returns the
/// column after its last one.
fn advance_until_fits(max_columns: usize, grid: &ReservationGrid, cell: &mut CellInfo) -> usize {
    let first_row = cell.row;
    loop {
        let stop = column_stop(max_columns, cell);
        if !skip_reserved(max_columns, grid, cell, stop, cell.row - first_row) {
            return stop;
        }
    }
}

/// Wrap `cell` to the next row when it does not fit in this one.
fn column_stop(max_columns: usize, cell: &mut CellInfo) -> usize {
    let stop = cell.column + cell.column_span;
    if stop <= max_columns {
        return stop;
    }
    if cell.column != 0 {
        cell.column = 0;
        cell.row += 1;
    }
    // a span wider than the grid is truncated
    cell.column_span.min(max_columns)
}

/// If any column of `cell` is reserved, move it past the reserved run and
/// return true.
fn skip_reserved(
    max_columns: usize,
    grid: &ReservationGrid,
    cell: &mut CellInfo,
    stop: usize,
    row_offset: usize,
) -> bool {
    let Some(hit) = (cell.column..stop).find(|&c| grid.is_reserved(c, row_offset)) else {
        return false;
    };
    cell.column = hit + 1;
    while cell.column < max_columns && grid.is_reserved(cell.column, row_offset) {
        cell.column += 1;
    }
    true
}

/// The cursor already passed the requested position of a fixed cell.
fn cursor_past(fixed: &CellInfo, row: usize, column: usize) -> bool {
    let (want_row, want_column) = fixed.position.unwrap_or_default();
    want_row < row || (want_row == row && want_column < column)
}

/// The requested area of a fixed cell collides with earlier cells.
fn overlaps_reserved(fixed: &CellInfo, grid: &ReservationGrid, current_row: usize) -> bool {
    let (want_row, want_column) = fixed.position.unwrap_or_default();
    if want_row < current_row {
        return true;
    }
    let first = want_row - current_row;
    (first..first + fixed.row_span).any(|offset| {
        (want_column..want_column + fixed.column_span).any(|c| grid.is_reserved(c, offset))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn flow_cell(id: u64) -> CellInfo {
        CellInfo::new(ElementId(id), CellSettings::default())
    }

    fn cell_at(id: u64, row: i32, column: i32) -> CellInfo {
        CellInfo::new(
            ElementId(id),
            CellSettings {
                row,
                column,
                ..CellSettings::default()
            },
        )
    }

    fn spanning(id: u64, column_span: i32, row_span: i32) -> CellInfo {
        CellInfo::new(
            ElementId(id),
            CellSettings {
                row_span,
                column_span,
                ..CellSettings::default()
            },
        )
    }

    fn settings(columns: usize, rows: usize, grow_style: TableGrowStyle) -> TableSettings {
        TableSettings {
            column_count: columns,
            row_count: rows,
            grow_style,
            ..TableSettings::default()
        }
    }

    fn starts(assignment: &Assignment) -> Vec<(usize, usize)> {
        assignment.cells.iter().map(|c| (c.row, c.column)).collect()
    }

    // =========================================================================
    // Reservation grid
    // =========================================================================

    #[test]
    fn test_reservation_grid_scrolls() {
        let mut grid = ReservationGrid::default();
        grid.reserve(2, 1);
        assert!(grid.is_reserved(2, 1));
        assert!(!grid.is_reserved(2, 0));
        assert!(!grid.is_reserved(9, 9));
        grid.advance_row();
        assert!(grid.is_reserved(2, 0));
    }

    #[test]
    fn test_reserve_all_skips_first_row() {
        let mut grid = ReservationGrid::default();
        let mut cell = spanning(1, 2, 3);
        cell.column = 1;
        grid.reserve_all(&cell, 3, 3);
        assert!(!grid.is_reserved(1, 0));
        assert!(grid.is_reserved(1, 1) && grid.is_reserved(2, 2));
        assert!(!grid.is_reserved(0, 1));
    }

    // =========================================================================
    // Flow placement
    // =========================================================================

    #[test]
    fn test_flow_fills_rows() {
        let cells = (0..5).map(flow_cell).collect();
        let a = assign(cells, &settings(2, 0, TableGrowStyle::AddRows)).unwrap();
        assert_eq!(starts(&a), vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0)]);
        assert_eq!((a.columns, a.rows), (2, 3));
    }

    #[test]
    fn test_configured_rows_are_kept() {
        let a = assign(vec![flow_cell(0)], &settings(2, 4, TableGrowStyle::AddRows)).unwrap();
        assert_eq!((a.columns, a.rows), (2, 4));
    }

    #[test]
    fn test_no_counts_stacks_vertically() {
        let cells = (0..3).map(flow_cell).collect();
        let a = assign(cells, &settings(0, 0, TableGrowStyle::AddRows)).unwrap();
        assert_eq!(starts(&a), vec![(0, 0), (1, 0), (2, 0)]);
        assert_eq!((a.columns, a.rows), (1, 3));
    }

    #[test]
    fn test_add_columns_grows_columns() {
        let cells = (0..5).map(flow_cell).collect();
        let a = assign(cells, &settings(0, 2, TableGrowStyle::AddColumns)).unwrap();
        // three columns are enough for five cells in two rows
        assert_eq!((a.columns, a.rows), (3, 2));
        assert_eq!(starts(&a), vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_row_span_reserves_cells_below() {
        let cells = vec![spanning(0, 1, 2), flow_cell(1), flow_cell(2), flow_cell(3)];
        let a = assign(cells, &settings(2, 0, TableGrowStyle::AddRows)).unwrap();
        assert_eq!(starts(&a), vec![(0, 0), (0, 1), (1, 1), (2, 0)]);
    }

    #[test]
    fn test_wide_span_wraps_and_truncates() {
        let cells = vec![flow_cell(0), spanning(1, 2, 1), spanning(2, 5, 1)];
        let a = assign(cells, &settings(2, 0, TableGrowStyle::AddRows)).unwrap();
        assert_eq!(starts(&a), vec![(0, 0), (1, 0), (2, 0)]);
        assert_eq!(a.columns, 2);
    }

    // =========================================================================
    // Fixed placement
    // =========================================================================

    #[test]
    fn test_fixed_cell_keeps_position() {
        let cells = vec![flow_cell(0), cell_at(1, 1, 1), flow_cell(2), flow_cell(3)];
        let a = assign(cells, &settings(2, 2, TableGrowStyle::AddRows)).unwrap();
        assert_eq!(starts(&a), vec![(0, 0), (1, 1), (0, 1), (1, 0)]);
    }

    #[test]
    fn test_fixed_cells_sorted_by_position() {
        let cells = vec![cell_at(0, 1, 0), cell_at(1, 0, 1), flow_cell(2)];
        let a = assign(cells, &settings(2, 2, TableGrowStyle::AddRows)).unwrap();
        assert_eq!(starts(&a), vec![(1, 0), (0, 1), (0, 0)]);
    }

    #[test]
    fn test_colliding_fixed_cell_moves_forward() {
        let cells = vec![cell_at(0, 0, 0), cell_at(1, 0, 0)];
        let a = assign(cells, &settings(2, 2, TableGrowStyle::AddRows)).unwrap();
        assert_eq!(starts(&a), vec![(0, 0), (0, 1)]);
    }

    #[test]
    fn test_fixed_position_clamped_to_grid() {
        let a = assign(vec![cell_at(0, 0, 7)], &settings(3, 0, TableGrowStyle::AddRows)).unwrap();
        assert_eq!(starts(&a), vec![(0, 2)]);
    }

    #[test]
    fn test_flow_cell_avoids_fixed_row_span() {
        let mut tall = cell_at(0, 0, 1);
        tall.row_span = 2;
        let cells = vec![tall, flow_cell(1), flow_cell(2), flow_cell(3)];
        let a = assign(cells, &settings(2, 0, TableGrowStyle::AddRows)).unwrap();
        assert_eq!(starts(&a), vec![(0, 1), (0, 0), (1, 0), (2, 0)]);
    }

    // =========================================================================
    // Fixed size
    // =========================================================================

    #[test]
    fn test_fixed_size_full() {
        let cells = (0..5).map(flow_cell).collect();
        let err = assign(cells, &settings(2, 2, TableGrowStyle::FixedSize)).unwrap_err();
        assert_eq!(
            err,
            LayoutError::TableFull {
                required: 5,
                columns: 2,
                rows: 2
            }
        );
    }

    #[test]
    fn test_fixed_size_span_too_wide() {
        let mut wide = cell_at(0, 0, 1);
        wide.column_span = 2;
        let err = assign(vec![wide], &settings(2, 2, TableGrowStyle::FixedSize)).unwrap_err();
        assert_eq!(
            err,
            LayoutError::SpanExceedsGrid {
                axis: "column",
                span: 3,
                count: 2
            }
        );
    }

    #[test]
    fn test_fixed_size_fragmented_grid() {
        // two cells would fit by count, but the spanning one no longer fits
        let cells = vec![cell_at(0, 0, 0), spanning(1, 2, 1), flow_cell(2)];
        let err = assign(cells, &settings(2, 2, TableGrowStyle::FixedSize)).unwrap_err();
        assert!(matches!(err, LayoutError::TableFull { .. }));
    }

    #[test]
    fn test_fixed_size_uses_configured_counts() {
        let a = assign(vec![flow_cell(0)], &settings(3, 2, TableGrowStyle::FixedSize)).unwrap();
        assert_eq!((a.columns, a.rows), (3, 2));
    }

    #[test]
    fn test_covers() {
        let mut cell = spanning(0, 2, 2);
        cell.row = 1;
        cell.column = 1;
        assert!(cell.covers(2, 2));
        assert!(!cell.covers(0, 1));
        assert!(!cell.covers(3, 1));
    }

    // =========================================================================
    // Property tests
    // =========================================================================

    proptest! {
        #[test]
        fn prop_assigned_cells_never_overlap(
            specs in prop::collection::vec((0i32..3, 0i32..3, 1i32..3, 1i32..3, any::<bool>()), 1..10),
            columns in 1usize..4,
        ) {
            let cells: Vec<CellInfo> = specs
                .iter()
                .enumerate()
                .map(|(i, &(row, column, row_span, column_span, fixed))| {
                    let settings = CellSettings {
                        row: if fixed { row } else { -1 },
                        column: if fixed { column } else { -1 },
                        row_span,
                        column_span,
                    };
                    CellInfo::new(ElementId(i as u64), settings)
                })
                .collect();
            let a = assign(cells, &settings(columns, 0, TableGrowStyle::AddRows)).unwrap();
            prop_assert!(a.columns >= 1);
            let area = |c: &CellInfo| {
                let column_stop = (c.column + c.column_span).min(a.columns);
                let row_stop = c.row + c.row_span;
                (c.column, c.row, column_stop, row_stop)
            };
            for (i, x) in a.cells.iter().enumerate() {
                let (x0, y0, x1, y1) = area(x);
                prop_assert!(x0 < a.columns);
                prop_assert!(y1 <= a.rows);
                for y in &a.cells[i + 1..] {
                    let (u0, v0, u1, v1) = area(y);
                    let disjoint = x1 <= u0 || u1 <= x0 || y1 <= v0 || v1 <= y0;
                    prop_assert!(disjoint, "{:?} overlaps {:?}", x, y);
                }
            }
        }
    }
}
