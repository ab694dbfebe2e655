//! Batching layout requests.

use crate::element::ElementId;
use crate::engine::{LayoutEventArgs, LayoutReason};
use crate::tree::LayoutTree;
use arrange_core::LayoutError;
use std::ops::{Deref, DerefMut};

/// A scope in which a container does not lay out.
///
/// Creating a transaction drops the cached preferred sizes of the element
/// causing the change and of the container, suspends the container and
/// queues one layout request. Dropping it resumes the container, which then
/// runs exactly one pass if this was the outermost suspension. The tree is
/// reachable through the transaction while it is open.
///
/// ```
/// use arrange_core::{BoundsSpecified, Rect};
/// use arrange_layout::{LayoutReason, LayoutTree};
///
/// let mut tree = LayoutTree::new();
/// let root = tree.create("root");
/// let child = tree.create("child");
/// tree.add_child(root, child).unwrap();
/// {
///     let mut tx = tree.transaction(root, Some(child), LayoutReason::Bounds).unwrap();
///     tx.set_bounds(child, Rect::new(0, 0, 10, 10), BoundsSpecified::ALL).unwrap();
///     assert!(tx.is_layout_suspended(root));
/// }
/// assert!(!tree.is_layout_suspended(root));
/// ```
#[derive(Debug)]
pub struct LayoutTransaction<'a> {
    tree: &'a mut LayoutTree,
    container: Option<ElementId>,
}

impl<'a> LayoutTransaction<'a> {
    /// Ids must be live; public entry points check them first.
    pub(crate) fn new(
        tree: &'a mut LayoutTree,
        container: Option<ElementId>,
        cause: Option<ElementId>,
        reason: LayoutReason,
    ) -> Self {
        if let Some(cause) = cause {
            tree.invalidate_preferred(cause);
        }
        if let Some(container) = container {
            tree.node_mut(container).suspension.count += 1;
            tree.invalidate_preferred(container);
            tree.request_layout(container, LayoutEventArgs::new(cause, reason));
        }
        Self { tree, container }
    }

    /// The suspended container, if any.
    #[must_use]
    pub const fn container(&self) -> Option<ElementId> {
        self.container
    }
}

impl Deref for LayoutTransaction<'_> {
    type Target = LayoutTree;

    fn deref(&self) -> &Self::Target {
        self.tree
    }
}

impl DerefMut for LayoutTransaction<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.tree
    }
}

impl Drop for LayoutTransaction<'_> {
    fn drop(&mut self) {
        if let Some(container) = self.container {
            // the container may have been removed inside the transaction
            if self.tree.resume_layout(container, true).is_err() {
                tracing::warn!("transaction container {} vanished", container);
            }
        }
    }
}

impl LayoutTree {
    /// Like [`transaction`](Self::transaction), but only suspends and lays
    /// out `container` when `condition` holds. Otherwise only the cached
    /// preferred size of `cause` is dropped.
    pub fn transaction_if(
        &mut self,
        condition: bool,
        container: ElementId,
        cause: Option<ElementId>,
        reason: LayoutReason,
    ) -> Result<LayoutTransaction<'_>, LayoutError> {
        if condition {
            return self.transaction(container, cause, reason);
        }
        if let Some(cause) = cause {
            self.check(cause)?;
        }
        Ok(LayoutTransaction::new(self, None, cause, reason))
    }

    /// Lay out `container` now because `cause` changed.
    pub fn do_layout(
        &mut self,
        container: Option<ElementId>,
        cause: ElementId,
        reason: LayoutReason,
    ) -> Result<(), LayoutError> {
        self.check(cause)?;
        self.invalidate_preferred(cause);
        if let Some(container) = container {
            self.check(container)?;
            self.invalidate_preferred(container);
            self.request_layout(container, LayoutEventArgs::new(Some(cause), reason));
        }
        Ok(())
    }

    /// [`do_layout`](Self::do_layout) when `condition` holds; otherwise just
    /// drop the cached preferred size of `cause`.
    pub fn do_layout_if(
        &mut self,
        condition: bool,
        container: Option<ElementId>,
        cause: ElementId,
        reason: LayoutReason,
    ) -> Result<(), LayoutError> {
        if condition {
            return self.do_layout(container, cause, reason);
        }
        self.check(cause)?;
        self.invalidate_preferred(cause);
        Ok(())
    }
}
