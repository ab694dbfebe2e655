//! Declarative YAML and JSON descriptions of layout trees.
//!
//! A description names the tree-wide [`LayoutOptions`](arrange_layout::LayoutOptions)
//! and a root element with its children:
//!
//! ```
//! let loaded = arrange_yaml::load_tree(
//!     r"
//! root:
//!   name: window
//!   bounds: { x: 0, y: 0, width: 300, height: 200 }
//!   children:
//!     - name: status
//!       dock: bottom
//!       bounds: { x: 0, y: 0, width: 10, height: 20 }
//! ",
//! )
//! .unwrap();
//! let status = loaded.get("status").unwrap();
//! assert_eq!(loaded.tree.bounds(status).y, 180);
//! ```

mod document;
mod error;
mod loader;

pub use document::{
    anchor_from_edges, CellDocument, Edge, ElementDocument, FlowDocument, LayoutDocument,
    TableDocument, TreeDocument,
};
pub use error::ParseError;
pub use loader::{build, load_tree, load_tree_json, LoadedTree};
