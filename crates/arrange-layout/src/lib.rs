#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::map_unwrap_or)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::similar_names)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::manual_div_ceil)]
#![allow(clippy::doc_markdown)]
//! Layout engines for trees of arranged elements.
//!
//! Elements live in a [`LayoutTree`] arena and are addressed by
//! [`ElementId`]. Every container picks one strategy for its children:
//!
//! - **Default**: docking to the container edges and anchoring to them
//! - **Flow**: rows that wrap, in any of four directions
//! - **Table**: a grid of absolute, percent and auto-sized rows and columns
//!
//! Layout runs synchronously whenever a change requires it, unless the
//! container is suspended. [`LayoutTransaction`] batches changes into one
//! pass. Measuring through [`LayoutTree::preferred_size`] never moves
//! anything.
//!
//! ```
//! use arrange_core::{BoundsSpecified, DockStyle, Rect};
//! use arrange_layout::LayoutTree;
//!
//! let mut tree = LayoutTree::new();
//! let window = tree.create("window");
//! tree.set_bounds(window, Rect::new(0, 0, 300, 200), BoundsSpecified::ALL).unwrap();
//! let toolbar = tree.create("toolbar");
//! tree.set_bounds(toolbar, Rect::new(0, 0, 10, 30), BoundsSpecified::ALL).unwrap();
//! tree.add_child(window, toolbar).unwrap();
//! tree.set_dock(toolbar, DockStyle::Top).unwrap();
//! assert_eq!(tree.bounds(toolbar), Rect::new(0, 0, 300, 30));
//! ```

mod cache;
mod default;
mod element;
mod engine;
mod flow;
mod options;
mod table;
mod transaction;
mod tree;
mod utils;

pub use cache::{CacheKey, PreferredSizeCache};
pub use default::DefaultLayout;
pub use element::{
    AnchorInfo, CellSettings, ElementId, ElementKind, EngineKind, FlowSettings, LayoutState,
};
pub use engine::{LayoutEngine, LayoutEventArgs, LayoutPlan, LayoutReason};
pub use flow::{FlowLayout, FlowTransform};
pub use options::LayoutOptions;
pub use table::{CellPosition, TableLayout, TableSettings};
pub use transaction::LayoutTransaction;
pub use tree::LayoutTree;
pub use utils::{align, align_and_stretch, h_align, stretch, v_align};
