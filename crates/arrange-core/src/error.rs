//! Error types for layout configuration.
//!
//! Every error here is raised at the point of mutation. Layout passes
//! themselves never fail.

use thiserror::Error;

/// Errors raised when a layout property is set to an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// An integer did not name a variant of the target enum.
    #[error("invalid value {value} for {type_name}")]
    InvalidEnumValue {
        /// Enum being parsed
        type_name: &'static str,
        /// Rejected value
        value: i32,
    },

    /// A string did not name a variant of the target enum.
    #[error("unknown {type_name} name: {name}")]
    UnknownName {
        /// Enum being parsed
        type_name: &'static str,
        /// Rejected name
        name: String,
    },

    /// A numeric argument was outside its allowed range.
    #[error("invalid {name}: {value} (must be at least {minimum})")]
    InvalidArgument {
        /// Argument name
        name: &'static str,
        /// Rejected value
        value: i32,
        /// Smallest accepted value
        minimum: i32,
    },

    /// A fixed-size table cannot hold all of its children.
    #[error("table is full: {required} cells required but only {columns}x{rows} available")]
    TableFull {
        /// Cells the children need
        required: usize,
        /// Configured columns
        columns: usize,
        /// Configured rows
        rows: usize,
    },

    /// A child's span does not fit in a fixed-size table.
    #[error("cell span {span} exceeds the {axis} count {count} of a fixed-size table")]
    SpanExceedsGrid {
        /// "column" or "row"
        axis: &'static str,
        /// Required extent along the axis
        span: usize,
        /// Configured strips along the axis
        count: usize,
    },

    /// An element id did not refer to a live element.
    #[error("unknown element: {0}")]
    UnknownElement(u64),

    /// Parenting would make an element its own ancestor.
    #[error("element {child} cannot be added under its own descendant {parent}")]
    CyclicParent {
        /// Element being added
        child: u64,
        /// Requested container
        parent: u64,
    },

    /// A table or flow operation was applied to an element with another engine.
    #[error("element {id} does not use the {expected} layout engine")]
    WrongEngine {
        /// Element id
        id: u64,
        /// Engine the operation needs
        expected: &'static str,
    },
}

impl LayoutError {
    /// Shorthand for a range check on a counted property.
    pub(crate) const fn below_minimum(name: &'static str, value: i32, minimum: i32) -> Self {
        Self::InvalidArgument {
            name,
            value,
            minimum,
        }
    }
}

/// Check that `value >= minimum`.
pub fn ensure_at_least(name: &'static str, value: i32, minimum: i32) -> Result<i32, LayoutError> {
    if value < minimum {
        Err(LayoutError::below_minimum(name, value, minimum))
    } else {
        Ok(value)
    }
}
