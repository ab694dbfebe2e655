//! Intrinsic sizing of leaf content.

use crate::geometry::Size;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Something that knows its own preferred size under a proposed constraint.
///
/// `proposed` has already had zero components replaced by `i32::MAX`, so an
/// implementation only ever sees real limits or the unbounded sentinel.
/// Implementations must be pure: the same input always gives the same size.
pub trait Measure: fmt::Debug + Send {
    /// Preferred size of the content, excluding padding.
    fn measure(&self, proposed: Size) -> Size;
}

/// Built-in content descriptions, usable from declarative trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    /// Always the same size, whatever the constraint
    Fixed {
        /// Intrinsic width
        width: i32,
        /// Intrinsic height
        height: i32,
    },
    /// `count` equal items wrapped into as many rows as the proposed width
    /// requires (at least one item per row), like words in a paragraph.
    Wrap {
        /// Width of one item
        item_width: i32,
        /// Height of one item
        item_height: i32,
        /// Number of items
        count: u32,
    },
}

impl Content {
    /// Fixed-size content.
    #[must_use]
    pub const fn fixed(width: i32, height: i32) -> Self {
        Self::Fixed { width, height }
    }

    /// Wrapping content.
    #[must_use]
    pub const fn wrap(item_width: i32, item_height: i32, count: u32) -> Self {
        Self::Wrap {
            item_width,
            item_height,
            count,
        }
    }
}

impl Measure for Content {
    fn measure(&self, proposed: Size) -> Size {
        match *self {
            Self::Fixed { width, height } => Size::new(width, height),
            Self::Wrap {
                item_width,
                item_height,
                count,
            } => {
                if count == 0 || item_width <= 0 {
                    return Size::ZERO;
                }
                let count = i32::try_from(count).unwrap_or(i32::MAX);
                let per_row = (proposed.width / item_width).clamp(1, count);
                let rows = (count + per_row - 1) / per_row;
                Size::new(
                    per_row.saturating_mul(item_width),
                    rows.saturating_mul(item_height),
                )
            }
        }
    }
}
