//! Strip sizing and cell bounds.
//!
//! Each axis is sized in two steps. Children first push their minimum and
//! maximum extents into the strips they span, narrowest spans first. The
//! leftover space is then handed to percent strips and to auto-sized
//! strips, following the row and column styles.

use super::assign::{Assignment, CellInfo};
use crate::element::ElementId;
use crate::engine::LayoutPlan;
use crate::tree::LayoutTree;
use crate::utils::align_and_stretch;
use arrange_core::{Rect, Size, SizeType, TableStyle};

/// Minimum and maximum extent of one row or column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Strip {
    pub(crate) min_size: i32,
    pub(crate) max_size: i32,
    /// Some cell starts in this strip
    pub(crate) is_start: bool,
}

/// Which end of a strip a distribution pass fills.
#[derive(Debug, Clone, Copy)]
enum Bound {
    Min,
    Max,
}

impl Bound {
    fn get(self, strip: &Strip) -> i32 {
        match self {
            Self::Min => strip.min_size,
            Self::Max => strip.max_size,
        }
    }

    fn get_mut(self, strip: &mut Strip) -> &mut i32 {
        match self {
            Self::Min => &mut strip.min_size,
            Self::Max => &mut strip.max_size,
        }
    }
}

fn size_type(styles: &[TableStyle], index: usize) -> SizeType {
    styles.get(index).map_or(SizeType::AutoSize, |style| style.size_type)
}

fn is_absolute(styles: &[TableStyle], index: usize) -> bool {
    size_type(styles, index) == SizeType::Absolute
}

/// Absolute strips start at their size, everything else at zero.
fn initialize_strips(strips: &mut [Strip], styles: &[TableStyle]) {
    for (i, strip) in strips.iter_mut().enumerate() {
        let size = match styles.get(i) {
            Some(style) if style.size_type == SizeType::Absolute => style.size.round() as i32,
            _ => 0,
        };
        *strip = Strip {
            min_size: size,
            max_size: size,
            is_start: false,
        };
    }
}

/// Sum of the minimum sizes of `span` strips from `start`.
pub(crate) fn sum_strips(strips: &[Strip], start: usize, span: usize) -> i32 {
    strips.iter().skip(start).take(span).map(|s| s.min_size).sum()
}

/// Make strips `start..stop` at least `min` (and `max`) long in total.
fn distribute_size(
    styles: &[TableStyle],
    strips: &mut [Strip],
    (start, stop): (usize, usize),
    (min, max): (i32, i32),
    border: i32,
) {
    distribute_bound(styles, strips, start, stop, min, Bound::Min, border);
    distribute_bound(styles, strips, start, stop, max, Bound::Max, border);
}

fn distribute_bound(
    styles: &[TableStyle],
    strips: &mut [Strip],
    start: usize,
    mut stop: usize,
    desired: i32,
    bound: Bound,
    border: i32,
) {
    // borders between the spanned strips count towards the length
    let span = i32::try_from(stop - start).unwrap_or(i32::MAX);
    let desired = (desired - border * (span - 1)).max(0);

    let mut current = 0;
    let mut empty = 0;
    for i in start..stop {
        let size = bound.get(&strips[i]);
        if !is_absolute(styles, i) && size == 0 {
            empty += 1;
        }
        current += size;
    }
    let missing = desired - current;
    if missing <= 0 {
        return;
    }

    if empty == 0 {
        // everything already has a size: grow the last percent strip, or
        // failing that the last non-absolute one
        if let Some(last_percent) =
            (start..stop).rev().find(|&i| size_type(styles, i) == SizeType::Percent)
        {
            stop = last_percent + 1;
        }
        let Some(i) = (start..stop).rev().find(|&i| !is_absolute(styles, i)) else {
            return;
        };
        if i + 1 < strips.len() && !strips[i + 1].is_start && !is_absolute(styles, i + 1) {
            // take what we can from the next strip, which no cell starts in
            let next = bound.get_mut(&mut strips[i + 1]);
            *next -= (*next).min(missing);
        }
        *bound.get_mut(&mut strips[i]) += missing;
    } else {
        let mut share = missing / empty;
        let mut seen = 0;
        for i in start..stop {
            let size = bound.get_mut(&mut strips[i]);
            if !is_absolute(styles, i) && *size == 0 {
                seen += 1;
                if seen == empty {
                    // rounding goes to the last empty strip
                    share = missing - share * (empty - 1);
                }
                *size += share;
            }
        }
    }
}

/// Hand out the space left in `available` according to `styles`. Returns the
/// length used. With `fit_content`, percent strips are sized so that their
/// content fits instead of sharing `available`.
fn distribute_styles(
    border: i32,
    styles: &[TableStyle],
    strips: &mut [Strip],
    available: i32,
    fit_content: bool,
) -> i32 {
    let mut used = 0;
    let mut total_percent = 0.0f32;
    let mut percent_space = 0.0f32;
    let mut other_space = 0.0f32;
    let mut has_auto = false;

    for (i, strip) in strips.iter_mut().enumerate() {
        match styles.get(i) {
            Some(style) if style.size_type == SizeType::Percent => {
                total_percent += style.size;
                percent_space += strip.min_size as f32;
            }
            Some(style) => {
                other_space += strip.min_size as f32;
                has_auto |= style.size_type == SizeType::AutoSize;
            }
            None => has_auto = true,
        }
        strip.max_size += border;
        strip.min_size += border;
        used += strip.min_size;
    }

    let remaining = available - used;
    if total_percent > 0.0 {
        if fit_content {
            // inverse of the percent formula: the table width at which each
            // percent strip would get its current size; the widest wins
            let mut widest = 0;
            for (i, strip) in strips.iter().enumerate() {
                let Some(style) = styles.get(i).filter(|s| s.size_type == SizeType::Percent) else {
                    continue;
                };
                if style.size > 0.0 {
                    let width = (strip.min_size as f32 * total_percent / style.size).round() as i32;
                    widest = widest.max(width);
                }
                used -= strip.min_size;
            }
            used += widest;
        } else {
            if percent_space > available as f32 - other_space {
                percent_space = (available as f32 - other_space).max(0.0);
            }
            if remaining > 0 {
                percent_space += remaining as f32;
            } else if remaining < 0 {
                percent_space =
                    available as f32 - other_space - (strips.len() as f32 * border as f32);
            }

            let mut allocated = 0;
            let mut last_percent = None;
            for (i, strip) in strips.iter_mut().enumerate() {
                let Some(style) = styles.get(i).filter(|s| s.size_type == SizeType::Percent) else {
                    continue;
                };
                let size = (style.size * percent_space / total_percent) as i32;
                used += size + border - strip.min_size;
                strip.min_size = size + border;
                allocated += size;
                last_percent = Some(i);
            }
            let rounding = percent_space as i32 - allocated;
            if let Some(i) = last_percent.filter(|_| rounding > 0) {
                strips[i].min_size += rounding;
                used += rounding;
            }
        }
    }

    let mut remaining = available - used;
    if has_auto && remaining > 0 {
        for (i, strip) in strips.iter_mut().enumerate() {
            if size_type(styles, i) != SizeType::AutoSize {
                continue;
            }
            let delta = (strip.max_size - strip.min_size).min(remaining);
            if delta > 0 {
                used += delta;
                remaining -= delta;
                strip.min_size += delta;
            }
        }
    }
    used
}

/// Row and column sizing of one table pass.
pub(crate) struct Sizing<'a> {
    tree: &'a LayoutTree,
    assignment: &'a Assignment,
    column_styles: &'a [TableStyle],
    row_styles: &'a [TableStyle],
    /// Configured column count
    column_count: usize,
    border: i32,
    pub(crate) columns: Vec<Strip>,
    pub(crate) rows: Vec<Strip>,
}

impl<'a> Sizing<'a> {
    pub(crate) fn new(
        tree: &'a LayoutTree,
        assignment: &'a Assignment,
        column_styles: &'a [TableStyle],
        row_styles: &'a [TableStyle],
        column_count: usize,
        border: i32,
    ) -> Self {
        Self {
            tree,
            assignment,
            column_styles,
            row_styles,
            column_count,
            border,
            columns: vec![Strip::default(); assignment.columns],
            rows: vec![Strip::default(); assignment.rows],
        }
    }

    /// What a child asks for: its preferred size when auto-sized, otherwise
    /// the size it was given.
    fn element_size(&self, id: ElementId, proposed: Size) -> Size {
        if self.tree.auto_size(id) {
            self.tree.preferred_size(id, proposed)
        } else {
            self.tree.specified_bounds(id).size()
        }
    }

    /// Size every strip for `proposed`. `fit_width` and `fit_height` size
    /// percent strips to their content on that axis instead of sharing the
    /// proposed length. Returns the space used.
    pub(crate) fn apply_styles(&mut self, proposed: Size, fit_width: bool, fit_height: bool) -> Size {
        initialize_strips(&mut self.columns, self.column_styles);
        initialize_strips(&mut self.rows, self.row_styles);
        for cell in &self.assignment.cells {
            if let Some(strip) = self.columns.get_mut(cell.column) {
                strip.is_start = true;
            }
            if let Some(strip) = self.rows.get_mut(cell.row) {
                strip.is_start = true;
            }
        }
        let width = self.inflate_columns(proposed, fit_width);
        let expand_width = (proposed.width - width).max(0);
        let height = self.inflate_rows(proposed, expand_width, fit_height);
        Size::new(width, height)
    }

    fn inflate_columns(&mut self, proposed: Size, fit_content: bool) -> i32 {
        let assignment = self.assignment;
        let mut cells: Vec<&CellInfo> = assignment.cells.iter().collect();
        cells.sort_by_key(|c| c.column_span);

        for cell in cells {
            if cell.column_span == 1 && is_absolute(self.column_styles, cell.column) {
                continue;
            }
            let (min, max) = if cell.column_span == 1
                && cell.row_span == 1
                && is_absolute(self.row_styles, cell.row)
            {
                // the height is known: one measurement is enough. It is
                // truncated here although the row strip itself is rounded.
                let height = self.row_styles[cell.row].size as i32;
                let width = self.element_size(cell.id, Size::new(0, height)).width;
                (width, width)
            } else {
                (
                    self.element_size(cell.id, Size::new(1, 0)).width,
                    self.element_size(cell.id, Size::ZERO).width,
                )
            };
            let margin = self.tree.margin(cell.id).horizontal();
            let stop = (cell.column + cell.column_span).min(self.columns.len());
            distribute_size(
                self.column_styles,
                &mut self.columns,
                (cell.column, stop),
                (min + margin, max + margin),
                self.border,
            );
        }

        let width = distribute_styles(
            self.border,
            self.column_styles,
            &mut self.columns,
            proposed.width,
            fit_content,
        );
        if fit_content && width > proposed.width && proposed.width > 1 {
            return width - self.shrink_percent_columns(width - proposed.width);
        }
        width
    }

    /// Take up to `overflow` back from percent columns, in proportion to
    /// their percentages. Returns the amount taken.
    fn shrink_percent_columns(&mut self, overflow: i32) -> i32 {
        let mut total_percent = 0.0f32;
        let mut allocated = 0;
        for (i, strip) in self.columns.iter().enumerate() {
            if let Some(style) = self.column_styles.get(i).filter(|s| s.size_type == SizeType::Percent) {
                total_percent += style.size;
                allocated += strip.min_size;
            }
        }
        let steal = overflow.min(allocated);
        if total_percent <= 0.0 {
            return steal;
        }
        for (i, strip) in self.columns.iter_mut().enumerate() {
            if let Some(style) = self.column_styles.get(i).filter(|s| s.size_type == SizeType::Percent) {
                strip.min_size -= (style.size / total_percent * steal as f32) as i32;
            }
        }
        steal
    }

    fn inflate_rows(&mut self, proposed: Size, expand_width: i32, fit_content: bool) -> i32 {
        let assignment = self.assignment;
        let mut cells: Vec<&CellInfo> = assignment.cells.iter().collect();
        cells.sort_by_key(|c| c.row_span);
        let percent_columns = self
            .column_styles
            .iter()
            .filter(|s| s.size_type == SizeType::Percent)
            .count();

        for cell in cells {
            if cell.row_span == 1 && is_absolute(self.row_styles, cell.row) {
                continue;
            }
            let mut width = sum_strips(&self.columns, cell.column, cell.column_span);
            // the last column grows by whatever the table has left over
            if !fit_content
                && cell.column + cell.column_span >= self.column_count
                && percent_columns < 2
            {
                width += expand_width;
            }
            let margin = self.tree.margin(cell.id);
            let height = self
                .element_size(cell.id, Size::new(width - margin.horizontal(), 0))
                .height
                + margin.vertical();
            let stop = (cell.row + cell.row_span).min(self.rows.len());
            distribute_size(
                self.row_styles,
                &mut self.rows,
                (cell.row, stop),
                (height, height),
                self.border,
            );
        }
        distribute_styles(
            self.border,
            self.row_styles,
            &mut self.rows,
            proposed.height,
            fit_content,
        )
    }

    /// Give the last column and row whatever `total` has beyond `used`.
    pub(crate) fn expand_last(&mut self, used: Size, total: Size) {
        if let Some(last) = self.columns.last_mut() {
            if total.width > used.width {
                last.min_size += total.width - used.width;
            }
        }
        if let Some(last) = self.rows.last_mut() {
            if total.height > used.height {
                last.min_size += total.height - used.height;
            }
        }
    }

    /// Fit every child into its cell inside `display`.
    pub(crate) fn place(&self, display: Rect, right_to_left: bool, plan: &mut LayoutPlan) {
        let border = self.border;
        let mut cells: Vec<&CellInfo> = self.assignment.cells.iter().collect();
        cells.sort_by_key(|c| (c.row, c.column));

        let mut top = display.y + border;
        let (mut row, mut column, mut offset) = (0, 0, 0);
        for cell in cells {
            if row != cell.row {
                top += sum_strips(&self.rows, row, cell.row - row);
                row = cell.row;
                column = 0;
                offset = 0;
            }
            if column < cell.column {
                offset += sum_strips(&self.columns, column, cell.column - column);
                column = cell.column;
            }
            let width = sum_strips(&self.columns, column, cell.column_span);
            let height = sum_strips(&self.rows, row, cell.row_span);
            column = (column + cell.column_span).min(self.columns.len());

            let x = if right_to_left {
                display.right() - offset - width
            } else {
                display.x + border + offset
            };
            offset += width;

            let mut margin = self.tree.margin(cell.id);
            if right_to_left {
                std::mem::swap(&mut margin.left, &mut margin.right);
            }
            let mut cell_bounds = Rect::new(x, top, width - border, height - border).deflate(margin);
            cell_bounds.width = cell_bounds.width.max(1);
            cell_bounds.height = cell_bounds.height.max(1);

            let anchor = self.tree.layout_state(cell.id).unified_anchor();
            let size = self.element_size(cell.id, cell_bounds.size());
            let mut bounds = align_and_stretch(size, cell_bounds, anchor);
            bounds.width = bounds.width.min(cell_bounds.width);
            bounds.height = bounds.height.min(cell_bounds.height);
            if right_to_left {
                bounds.x = cell_bounds.x + (cell_bounds.right() - bounds.right());
            }
            plan.place(cell.id, bounds);
        }
    }
}
