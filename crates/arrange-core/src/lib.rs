#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
//! Core types shared by the arrange layout engines.
//!
//! This crate provides the value types every engine works with:
//! - Integer geometry: [`Point`], [`Size`], [`Rect`], [`Padding`]
//! - Anchoring and docking: [`AnchorStyles`], [`DockStyle`], [`BoundsSpecified`]
//! - Flow and table styles: [`FlowDirection`], [`TableStyle`], [`TableGrowStyle`]
//! - Leaf content sizing: [`Measure`], [`Content`]
//! - Configuration errors: [`LayoutError`]

mod error;
mod geometry;
mod measure;
mod style;

pub use error::{ensure_at_least, LayoutError};
pub use geometry::{Padding, Point, Rect, Size};
pub use measure::{Content, Measure};
pub use style::{
    AnchorStyles, AutoSizeMode, BoundsSpecified, CellBorderStyle, DockStyle, FlowDirection,
    SizeType, TableGrowStyle, TableStyle,
};
