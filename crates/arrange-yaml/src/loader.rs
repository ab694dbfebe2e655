//! Building a [`LayoutTree`] from a [`TreeDocument`].

use crate::document::{anchor_from_edges, ElementDocument, LayoutDocument, TreeDocument};
use crate::error::ParseError;
use arrange_core::{BoundsSpecified, DockStyle, FlowDirection};
use arrange_layout::{ElementId, EngineKind, FlowSettings, LayoutReason, LayoutTree, TableSettings};
use indexmap::IndexMap;

/// A tree built from a description.
#[derive(Debug)]
pub struct LoadedTree {
    /// The laid out tree
    pub tree: LayoutTree,
    /// The root element
    pub root: ElementId,
    /// Named elements, in document order
    pub names: IndexMap<String, ElementId>,
}

impl LoadedTree {
    /// Id of the element called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ElementId> {
        self.names.get(name).copied()
    }
}

/// Build and lay out the tree described by a YAML document.
///
/// # Errors
///
/// Returns an error if the YAML is invalid, a name is used twice or the
/// tree rejects a value.
pub fn load_tree(yaml: &str) -> Result<LoadedTree, ParseError> {
    build(&TreeDocument::from_yaml(yaml)?)
}

/// Build and lay out the tree described by a JSON document.
///
/// # Errors
///
/// Returns an error if the JSON is invalid, a name is used twice or the
/// tree rejects a value.
pub fn load_tree_json(json: &str) -> Result<LoadedTree, ParseError> {
    build(&TreeDocument::from_json(json)?)
}

/// Build and lay out the tree of an already parsed document.
///
/// Every element is suspended while it is built. They resume children
/// first, so each container lays out once its content is complete.
///
/// # Errors
///
/// Returns an error if a name is used twice or the tree rejects a value.
pub fn build(doc: &TreeDocument) -> Result<LoadedTree, ParseError> {
    let mut builder = Builder {
        tree: LayoutTree::with_options(doc.options),
        names: IndexMap::new(),
        suspended: Vec::new(),
    };
    let root = builder.element(&doc.root, None)?;
    let Builder {
        mut tree,
        names,
        suspended,
    } = builder;

    for &id in suspended.iter().rev() {
        tree.resume_layout(id, true)?;
    }
    tree.perform_layout(root, None, LayoutReason::Explicit)?;
    tracing::debug!("loaded {} elements, {} named", tree.len(), names.len());
    Ok(LoadedTree { tree, root, names })
}

struct Builder {
    tree: LayoutTree,
    names: IndexMap<String, ElementId>,
    /// Elements in creation order (parents before children)
    suspended: Vec<ElementId>,
}

impl Builder {
    fn element(&mut self, doc: &ElementDocument, parent: Option<ElementId>) -> Result<ElementId, ParseError> {
        let name = doc.name.clone().unwrap_or_default();
        let id = self.tree.create(name.clone());
        self.tree.suspend_layout(id)?;
        self.suspended.push(id);
        if !name.is_empty() && self.names.insert(name.clone(), id).is_some() {
            return Err(ParseError::Validation(format!("duplicate element name '{name}'")));
        }

        self.layout(id, &doc.layout)?;
        let tree = &mut self.tree;
        tree.set_bounds(id, doc.bounds, BoundsSpecified::ALL)?;
        tree.set_padding(id, doc.padding)?;
        tree.set_margin(id, doc.margin)?;
        tree.set_minimum_size(id, doc.min_size)?;
        tree.set_maximum_size(id, doc.max_size)?;
        tree.set_kind(id, doc.kind)?;
        tree.set_right_to_left(id, doc.right_to_left)?;
        if let Some(content) = doc.content {
            tree.set_content(id, content)?;
        }

        if let Some(parent) = parent {
            tree.add_child(parent, id)?;
            if let Some(cell) = doc.cell {
                tree.set_cell(id, cell.into())?;
            }
        }
        tree.set_visible(id, doc.visible)?;
        if let Some(mode) = doc.auto_size_mode {
            tree.set_auto_size_mode(id, mode)?;
        }
        tree.set_auto_size(id, doc.auto_size)?;
        tree.set_flow_break(id, doc.flow_break)?;
        if let Some(edges) = &doc.anchor {
            tree.set_anchor(id, anchor_from_edges(edges))?;
        }
        if let Some(dock) = &doc.dock {
            tree.set_dock(id, dock.parse::<DockStyle>()?)?;
        }

        for child in &doc.children {
            self.element(child, Some(id))?;
        }
        Ok(id)
    }

    fn layout(&mut self, id: ElementId, layout: &LayoutDocument) -> Result<(), ParseError> {
        match layout {
            LayoutDocument::Default => {}
            LayoutDocument::Flow(flow) => {
                self.tree.set_engine(id, EngineKind::Flow)?;
                let settings = FlowSettings {
                    direction: flow.direction.parse::<FlowDirection>()?,
                    wrap_contents: flow.wrap,
                };
                self.tree.set_flow_settings(id, settings)?;
            }
            LayoutDocument::Table(table) => {
                self.tree.set_engine(id, EngineKind::Table)?;
                self.tree.set_table_settings(id, TableSettings::from(table))?;
            }
        }
        Ok(())
    }
}
