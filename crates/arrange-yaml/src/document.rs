//! Document types of a tree description.

use arrange_core::{
    AnchorStyles, AutoSizeMode, CellBorderStyle, Content, Padding, Rect, Size, TableGrowStyle,
    TableStyle,
};
use arrange_layout::{CellSettings, ElementKind, LayoutOptions, TableSettings};
use serde::{Deserialize, Serialize};

/// A whole tree: tree-wide options plus the root element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeDocument {
    /// Layout options
    #[serde(default)]
    pub options: LayoutOptions,
    /// The root element
    pub root: ElementDocument,
}

impl TreeDocument {
    /// Parse a document from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml_ng::Error> {
        serde_yaml_ng::from_str(yaml)
    }

    /// Parse a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the document to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml_ng::Error> {
        serde_yaml_ng::to_string(self)
    }
}

/// One element and its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementDocument {
    /// Unique name, used to look the element up after loading
    pub name: Option<String>,
    /// Initial bounds
    pub bounds: Rect,
    /// Inner padding
    pub padding: Padding,
    /// Outer margin
    pub margin: Padding,
    /// Minimum size (zero components mean no limit)
    pub min_size: Size,
    /// Maximum size (zero components mean no limit)
    pub max_size: Size,
    /// Hidden elements take no part in layout
    pub visible: bool,
    /// Size to the preferred size
    pub auto_size: bool,
    /// Whether auto-sizing may shrink the element
    pub auto_size_mode: Option<AutoSizeMode>,
    /// Docked edge, by name (`top`, `fill`, ...)
    pub dock: Option<String>,
    /// Anchored edges; absent means top and left
    pub anchor: Option<Vec<Edge>>,
    /// End a flow row after this element
    pub flow_break: bool,
    /// Leaf content with an intrinsic size
    pub content: Option<Content>,
    /// Strategy for the children, written as `default` or a one-key map
    /// such as `{ table: {...} }`
    #[serde(with = "serde_yaml_ng::with::singleton_map")]
    pub layout: LayoutDocument,
    /// Requested cell in a table container
    pub cell: Option<CellDocument>,
    /// Lay out children from the right
    pub right_to_left: bool,
    /// Element kind
    pub kind: ElementKind,
    /// Children, back to front
    pub children: Vec<ElementDocument>,
}

impl Default for ElementDocument {
    fn default() -> Self {
        Self {
            name: None,
            bounds: Rect::ZERO,
            padding: Padding::ZERO,
            margin: Padding::ZERO,
            min_size: Size::ZERO,
            max_size: Size::ZERO,
            visible: true,
            auto_size: false,
            auto_size_mode: None,
            dock: None,
            anchor: None,
            flow_break: false,
            content: None,
            layout: LayoutDocument::Default,
            cell: None,
            right_to_left: false,
            kind: ElementKind::Normal,
            children: Vec::new(),
        }
    }
}

/// An edge an element can be anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// Top edge
    Top,
    /// Bottom edge
    Bottom,
    /// Left edge
    Left,
    /// Right edge
    Right,
}

impl Edge {
    /// The anchor with only this edge set.
    #[must_use]
    pub const fn anchor(self) -> AnchorStyles {
        match self {
            Self::Top => AnchorStyles::TOP,
            Self::Bottom => AnchorStyles::BOTTOM,
            Self::Left => AnchorStyles::LEFT,
            Self::Right => AnchorStyles::RIGHT,
        }
    }
}

/// Union of the listed edges.
#[must_use]
pub fn anchor_from_edges(edges: &[Edge]) -> AnchorStyles {
    edges
        .iter()
        .fold(AnchorStyles::NONE, |anchor, edge| anchor.with(edge.anchor()))
}

/// Layout strategy of a container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDocument {
    /// Docking and anchoring
    #[default]
    Default,
    /// Wrapped rows
    Flow(FlowDocument),
    /// Rows and columns
    Table(TableDocument),
}

/// Flow settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowDocument {
    /// Direction by name (`left_to_right`, `top_down`, ...)
    pub direction: String,
    /// Wrap full rows
    pub wrap: bool,
}

impl Default for FlowDocument {
    fn default() -> Self {
        Self {
            direction: "left_to_right".to_string(),
            wrap: true,
        }
    }
}

/// Table settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDocument {
    /// Column count (0 = derived)
    pub columns: usize,
    /// Row count (0 = derived)
    pub rows: usize,
    /// Grow style when the grid is too small
    pub grow: TableGrowStyle,
    /// Column styles
    pub column_styles: Vec<TableStyle>,
    /// Row styles
    pub row_styles: Vec<TableStyle>,
    /// Cell border
    pub border: CellBorderStyle,
}

impl From<&TableDocument> for TableSettings {
    fn from(doc: &TableDocument) -> Self {
        Self {
            column_count: doc.columns,
            row_count: doc.rows,
            grow_style: doc.grow,
            column_styles: doc.column_styles.clone(),
            row_styles: doc.row_styles.clone(),
            cell_border: doc.border,
        }
    }
}

/// Requested table cell; omitted fields keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellDocument {
    /// Row, or -1 for automatic
    pub row: i32,
    /// Column, or -1 for automatic
    pub column: i32,
    /// Rows spanned
    pub row_span: i32,
    /// Columns spanned
    pub column_span: i32,
}

impl Default for CellDocument {
    fn default() -> Self {
        let cell = CellSettings::default();
        Self {
            row: cell.row,
            column: cell.column,
            row_span: cell.row_span,
            column_span: cell.column_span,
        }
    }
}

impl From<CellDocument> for CellSettings {
    fn from(doc: CellDocument) -> Self {
        Self {
            row: doc.row,
            column: doc.column,
            row_span: doc.row_span,
            column_span: doc.column_span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrange_core::{FlowDirection, SizeType};

    const EXAMPLE_YAML: &str = r"
options:
  cache_preferred_sizes: false
root:
  name: window
  bounds: { x: 0, y: 0, width: 300, height: 200 }
  padding: { left: 4, top: 4, right: 4, bottom: 4 }
  children:
    - name: toolbar
      dock: top
      bounds: { x: 0, y: 0, width: 10, height: 30 }
    - name: grid
      dock: fill
      layout:
        table:
          columns: 2
          column_styles:
            - { size_type: percent, size: 30 }
            - { size_type: percent, size: 70 }
      children:
        - name: label
          anchor: [left, right]
          content: { type: fixed, width: 40, height: 12 }
          auto_size: true
          cell: { row: 0, column: 1 }
";

    #[test]
    fn test_parse_document() {
        let doc = TreeDocument::from_yaml(EXAMPLE_YAML).unwrap();
        assert!(!doc.options.cache_preferred_sizes);
        assert_eq!(doc.root.name.as_deref(), Some("window"));
        assert_eq!(doc.root.bounds, Rect::new(0, 0, 300, 200));
        assert_eq!(doc.root.children.len(), 2);
        assert_eq!(doc.root.children[0].dock.as_deref(), Some("top"));
    }

    #[test]
    fn test_parse_table_layout() {
        let doc = TreeDocument::from_yaml(EXAMPLE_YAML).unwrap();
        let LayoutDocument::Table(table) = &doc.root.children[1].layout else {
            panic!("expected a table layout");
        };
        assert_eq!(table.columns, 2);
        assert_eq!(table.grow, TableGrowStyle::AddRows);
        assert_eq!(table.column_styles[1].size_type, SizeType::Percent);

        let settings = TableSettings::from(table);
        assert_eq!(settings.column_count, 2);
        assert_eq!(settings.cell_border, CellBorderStyle::None);
    }

    #[test]
    fn test_element_defaults() {
        let doc = TreeDocument::from_yaml(EXAMPLE_YAML).unwrap();
        let label = &doc.root.children[1].children[0];
        assert!(label.visible);
        assert_eq!(label.layout, LayoutDocument::Default);
        assert_eq!(label.kind, ElementKind::Normal);
        assert_eq!(
            CellSettings::from(label.cell.unwrap()),
            CellSettings {
                row: 0,
                column: 1,
                row_span: 1,
                column_span: 1
            }
        );
        assert_eq!(label.content, Some(Content::fixed(40, 12)));
    }

    #[test]
    fn test_anchor_edges() {
        let anchor = anchor_from_edges(&[Edge::Left, Edge::Right]);
        assert!(anchor.stretches_horizontally());
        assert!(!anchor.top);
        assert_eq!(anchor_from_edges(&[]), AnchorStyles::NONE);
    }

    #[test]
    fn test_flow_layout_forms() {
        let doc: ElementDocument = serde_yaml_ng::from_str("layout: { flow: { direction: top-down } }").unwrap();
        let LayoutDocument::Flow(flow) = doc.layout else {
            panic!("expected a flow layout");
        };
        assert!(flow.wrap);
        assert_eq!(flow.direction.parse::<FlowDirection>().unwrap(), FlowDirection::TopDown);

        let doc: ElementDocument = serde_json::from_str(r#"{"layout": "default"}"#).unwrap();
        assert_eq!(doc.layout, LayoutDocument::Default);
    }

    #[test]
    fn test_layout_written_as_single_key_map() {
        let doc: ElementDocument =
            serde_yaml_ng::from_str("layout: { table: { columns: 2, grow: fixed_size } }").unwrap();
        let LayoutDocument::Table(table) = &doc.layout else {
            panic!("expected a table layout");
        };
        assert_eq!(table.columns, 2);
        assert_eq!(table.grow, TableGrowStyle::FixedSize);

        let doc: ElementDocument = serde_yaml_ng::from_str("layout: default").unwrap();
        assert_eq!(doc.layout, LayoutDocument::Default);

        let doc = ElementDocument {
            layout: LayoutDocument::Flow(FlowDocument::default()),
            ..ElementDocument::default()
        };
        let yaml = serde_yaml_ng::to_string(&doc).unwrap();
        assert!(yaml.contains("flow:"));
        assert!(!yaml.contains('!'));
        assert_eq!(serde_yaml_ng::from_str::<ElementDocument>(&yaml).unwrap(), doc);
    }

    #[test]
    fn test_roundtrip() {
        let doc = TreeDocument::from_yaml(EXAMPLE_YAML).unwrap();
        let yaml = doc.to_yaml().unwrap();
        assert_eq!(TreeDocument::from_yaml(&yaml).unwrap(), doc);
    }
}
