//! The element arena and the arranged-element surface the engines work on.
//!
//! Every mutation goes through `&mut LayoutTree`, runs at most one layout
//! pass per affected container, and reports bad input as a [`LayoutError`]
//! before anything changes. Measuring only needs `&LayoutTree`.

use crate::cache::{CacheKey, PreferredSizeCache};
use crate::element::{
    AnchorInfo, CellSettings, Element, ElementId, ElementKind, EngineKind, FlowSettings,
    LayoutState,
};
use crate::engine::{LayoutEventArgs, LayoutPlan, LayoutReason};
use crate::options::LayoutOptions;
use crate::transaction::LayoutTransaction;
use arrange_core::{
    AutoSizeMode, BoundsSpecified, LayoutError, Measure, Padding, Point, Rect, Size,
};
use std::cell::{Ref, RefCell};

/// An arena of arranged elements.
///
/// Readers such as [`LayoutTree::bounds`] take ids the caller got from this
/// tree and panic on a removed or foreign id, like slice indexing. Mutators
/// return [`LayoutError::UnknownElement`] instead.
#[derive(Debug, Default)]
pub struct LayoutTree {
    slots: Vec<Option<Element>>,
    options: LayoutOptions,
    cache: RefCell<PreferredSizeCache>,
}

impl LayoutTree {
    /// Create an empty tree with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tree.
    #[must_use]
    pub fn with_options(options: LayoutOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Tree-wide options.
    #[must_use]
    pub const fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Replace the options. Cached preferred sizes are dropped.
    pub fn set_options(&mut self, options: LayoutOptions) {
        self.options = options;
        self.cache.get_mut().clear();
    }

    /// Create a detached element with empty bounds.
    pub fn create(&mut self, name: impl Into<String>) -> ElementId {
        let id = ElementId(self.slots.len() as u64);
        self.slots.push(Some(Element::new(name.into())));
        id
    }

    /// True when `id` refers to a live element.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.slots.get(id.index()).is_some_and(Option::is_some)
    }

    /// Number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// True when the tree holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Preferred-size cache statistics.
    #[must_use]
    pub fn cache(&self) -> Ref<'_, PreferredSizeCache> {
        self.cache.borrow()
    }

    pub(crate) fn node(&self, id: ElementId) -> &Element {
        match self.slots.get(id.index()).and_then(Option::as_ref) {
            Some(element) => element,
            None => panic!("unknown element {id}"),
        }
    }

    pub(crate) fn node_mut(&mut self, id: ElementId) -> &mut Element {
        match self.slots.get_mut(id.index()).and_then(Option::as_mut) {
            Some(element) => element,
            None => panic!("unknown element {id}"),
        }
    }

    pub(crate) fn check(&self, id: ElementId) -> Result<&Element, LayoutError> {
        self.slots
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(LayoutError::UnknownElement(id.0))
    }

    pub(crate) fn check_mut(&mut self, id: ElementId) -> Result<&mut Element, LayoutError> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(LayoutError::UnknownElement(id.0))
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Element name.
    #[must_use]
    pub fn name(&self, id: ElementId) -> &str {
        &self.node(id).name
    }

    /// Current bounds, relative to the parent's origin.
    #[must_use]
    pub fn bounds(&self, id: ElementId) -> Rect {
        self.node(id).bounds
    }

    /// The bounds last requested by a caller, as opposed to those computed
    /// by docking, anchoring or a container engine.
    #[must_use]
    pub fn specified_bounds(&self, id: ElementId) -> Rect {
        self.node(id).specified_bounds()
    }

    /// Content area after padding, relative to the element's own origin.
    #[must_use]
    pub fn display_rectangle(&self, id: ElementId) -> Rect {
        self.node(id).display_rectangle()
    }

    /// Interior inset.
    #[must_use]
    pub fn padding(&self, id: ElementId) -> Padding {
        self.node(id).padding
    }

    /// Exterior inset.
    #[must_use]
    pub fn margin(&self, id: ElementId) -> Padding {
        self.node(id).margin
    }

    /// Minimum size (zero components mean no limit).
    #[must_use]
    pub fn minimum_size(&self, id: ElementId) -> Size {
        self.node(id).minimum_size
    }

    /// Maximum size (zero components mean no limit).
    #[must_use]
    pub fn maximum_size(&self, id: ElementId) -> Size {
        self.node(id).maximum_size
    }

    /// Layout flags.
    #[must_use]
    pub fn layout_state(&self, id: ElementId) -> LayoutState {
        self.node(id).state
    }

    /// Whether the element sizes itself to its preferred size.
    #[must_use]
    pub fn auto_size(&self, id: ElementId) -> bool {
        self.node(id).state.auto_size
    }

    /// Own visibility flag.
    #[must_use]
    pub fn is_visible(&self, id: ElementId) -> bool {
        self.node(id).visible
    }

    /// Whether the parent's engine takes this element into account.
    #[must_use]
    pub fn participates_in_layout(&self, id: ElementId) -> bool {
        self.node(id).visible
    }

    /// Container of this element.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id).parent
    }

    /// Children in z-order; index 0 is the back.
    #[must_use]
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        &self.node(id).children
    }

    /// Element kind.
    #[must_use]
    pub fn kind(&self, id: ElementId) -> ElementKind {
        self.node(id).kind
    }

    /// Layout strategy applied to the element's children.
    #[must_use]
    pub fn engine(&self, id: ElementId) -> EngineKind {
        self.node(id).engine
    }

    /// Captured anchor offsets, if anchoring is in effect.
    #[must_use]
    pub fn anchor_info(&self, id: ElementId) -> Option<AnchorInfo> {
        self.node(id).anchor_info
    }

    /// Requested table cell of this element.
    #[must_use]
    pub fn cell(&self, id: ElementId) -> CellSettings {
        self.node(id).cell
    }

    /// Flow settings of this container.
    #[must_use]
    pub fn flow_settings(&self, id: ElementId) -> FlowSettings {
        self.node(id).flow
    }

    /// Whether the container lays out right to left.
    #[must_use]
    pub fn right_to_left(&self, id: ElementId) -> bool {
        self.node(id).right_to_left
    }

    /// Extent of the content placed by the last committed pass.
    #[must_use]
    pub fn layout_bounds(&self, id: ElementId) -> Size {
        self.node(id).layout_bounds
    }

    /// True while `suspend_layout` calls outnumber `resume_layout` calls.
    #[must_use]
    pub fn is_layout_suspended(&self, id: ElementId) -> bool {
        self.node(id).suspension.count > 0
    }

    /// True when `ancestor` is `id` or one of its containers.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(el) = current {
            if el == ancestor {
                return true;
            }
            current = self.node(el).parent;
        }
        false
    }

    // =========================================================================
    // Preferred size
    // =========================================================================

    /// Size the element would like to have under `proposed`.
    ///
    /// A zero component of `proposed` means unconstrained on that axis. The
    /// result includes padding, respects min/max size and never changes any
    /// bounds.
    #[must_use]
    pub fn preferred_size(&self, id: ElementId, proposed: Size) -> Size {
        let el = self.node(id);
        let mut proposed = proposed.zero_to_unbounded();
        if el.maximum_size.width > 0 {
            proposed.width = proposed.width.min(el.maximum_size.width);
        }
        if el.maximum_size.height > 0 {
            proposed.height = proposed.height.min(el.maximum_size.height);
        }

        let key = CacheKey {
            element: id,
            proposed,
        };
        if self.options.cache_preferred_sizes {
            if let Some(size) = self.cache.borrow_mut().get(key) {
                return size;
            }
        }

        let size = self.compute_preferred_size(el, id, proposed);
        if self.options.cache_preferred_sizes {
            self.cache.borrow_mut().insert(key, size);
        }
        size
    }

    fn compute_preferred_size(&self, el: &Element, id: ElementId, proposed: Size) -> Size {
        let padding = el.padding.size();
        let size = if el.is_container() {
            el.engine.engine().preferred_size(self, id, proposed - padding) + padding
        } else if let Some(content) = &el.content {
            content.measure((proposed - padding).non_negative()) + padding
        } else {
            el.specified_bounds().size()
        };
        el.constrain_size(size)
    }

    /// Drop cached preferred sizes of `id` and every container above it.
    pub(crate) fn invalidate_preferred(&self, id: ElementId) {
        let mut cache = self.cache.borrow_mut();
        let mut current = Some(id);
        while let Some(el) = current {
            cache.invalidate(el);
            current = self.node(el).parent;
        }
    }

    // =========================================================================
    // Bounds
    // =========================================================================

    /// Set the bounds of an element.
    ///
    /// `specified` records which components the caller asked for. Components
    /// that change without being specified are remembered in the specified
    /// bounds so that removing a dock or auto-size can restore them.
    pub fn set_bounds(
        &mut self,
        id: ElementId,
        bounds: Rect,
        specified: BoundsSpecified,
    ) -> Result<(), LayoutError> {
        self.check(id)?;
        self.set_bounds_core(id, bounds, specified);
        Ok(())
    }

    /// Move an element, keeping its size.
    pub fn set_location(&mut self, id: ElementId, location: Point) -> Result<(), LayoutError> {
        let size = self.check(id)?.bounds.size();
        self.set_bounds_core(id, Rect::from_parts(location, size), BoundsSpecified::LOCATION);
        Ok(())
    }

    /// Resize an element, keeping its location.
    pub fn set_size(&mut self, id: ElementId, size: Size) -> Result<(), LayoutError> {
        let location = self.check(id)?.bounds.location();
        self.set_bounds_core(id, Rect::from_parts(location, size), BoundsSpecified::SIZE);
        Ok(())
    }

    pub(crate) fn set_bounds_core(&mut self, id: ElementId, bounds: Rect, specified: BoundsSpecified) {
        let el = self.node(id);
        let bounds = bounds.with_size(el.constrain_size(bounds.size()));
        let old = el.bounds;
        let parent = el.parent;
        let has_children = el.is_container();

        self.update_specified_bounds(id, bounds, specified);
        if bounds != old {
            self.node_mut(id).bounds = bounds;
            self.invalidate_preferred(id);
        }

        if !specified.is_none() {
            if let Some(parent) = parent {
                let engine = self.node(parent).engine.engine();
                engine.init_layout(self, id, specified);
            }
        }

        if bounds.size() != old.size() && has_children {
            self.request_layout(id, LayoutEventArgs::new(Some(id), LayoutReason::Bounds));
        }

        if !specified.is_none() && bounds != old {
            if let Some(parent) = parent {
                self.request_layout(parent, LayoutEventArgs::new(Some(id), LayoutReason::Bounds));
            }
        }
    }

    fn update_specified_bounds(&mut self, id: ElementId, bounds: Rect, specified: BoundsSpecified) {
        let el = self.node_mut(id);
        let original = el.specified_bounds();
        let x_kept = !specified.x && bounds.x != original.x;
        let y_kept = !specified.y && bounds.y != original.y;
        let width_kept = !specified.width && bounds.width != original.width;
        let height_kept = !specified.height && bounds.height != original.height;

        if x_kept || y_kept || width_kept || height_kept {
            el.specified_bounds = Some(Rect::new(
                if x_kept { original.x } else { bounds.x },
                if y_kept { original.y } else { bounds.y },
                if width_kept { original.width } else { bounds.width },
                if height_kept { original.height } else { bounds.height },
            ));
        } else {
            el.specified_bounds = None;
        }
    }

    /// Apply a plan computed by the engine of `container`.
    pub(crate) fn apply_plan(&mut self, container: ElementId, mut plan: LayoutPlan) -> bool {
        let parent_needs_layout = plan.parent_needs_layout;
        if let Some(size) = plan.layout_bounds {
            self.node_mut(container).layout_bounds = size;
        }
        if let Some(grid) = plan.table.take() {
            self.node_mut(container).table.commit(grid);
        }
        for (id, bounds) in plan.into_placements() {
            debug_assert_eq!(self.node(id).parent, Some(container), "plan places a non-child");
            tracing::trace!("{} -> {:?}", id, bounds);
            self.set_bounds_core(id, bounds, BoundsSpecified::NONE);
        }
        parent_needs_layout
    }

    // =========================================================================
    // Layout requests
    // =========================================================================

    /// Ask `id` to lay out its children. `affected` names the element whose
    /// change caused the request; `reason` is diagnostic except that some
    /// reasons also drop a table's cached cell assignment.
    ///
    /// While the element is suspended or already laying out, the request is
    /// remembered and served later.
    pub fn perform_layout(
        &mut self,
        id: ElementId,
        affected: Option<ElementId>,
        reason: LayoutReason,
    ) -> Result<(), LayoutError> {
        self.check(id)?;
        if let Some(affected) = affected {
            self.check(affected)?;
        }
        self.request_layout(id, LayoutEventArgs::new(affected, reason));
        Ok(())
    }

    pub(crate) fn request_layout(&mut self, id: ElementId, args: LayoutEventArgs) {
        let el = self.node_mut(id);
        if args.reason.invalidates_table_cache() {
            el.table.invalidate();
        }
        if el.suspension.count > 0 || el.suspension.in_pass {
            el.suspension.pending = true;
            tracing::debug!("layout of {} deferred ({})", id, args.reason);
            return;
        }

        if self.run_layout(id, &args) {
            if let Some(parent) = self.node(id).parent {
                self.request_layout(
                    parent,
                    LayoutEventArgs::new(Some(id), LayoutReason::PreferredSize),
                );
            }
        }
    }

    fn run_layout(&mut self, id: ElementId, args: &LayoutEventArgs) -> bool {
        let engine = self.node(id).engine.engine();
        self.node_mut(id).suspension.in_pass = true;
        tracing::debug!(
            "layout {} ({}) start: reason={} children={}",
            id,
            engine.name(),
            args.reason,
            self.node(id).children.len()
        );

        let mut parent_needs_layout = engine.layout(self, id, args);
        let mut follow_ups = 0;
        while self.node(id).suspension.pending && follow_ups < self.options.max_follow_up_passes {
            self.node_mut(id).suspension.pending = false;
            follow_ups += 1;
            tracing::debug!("layout {} follow-up pass {}", id, follow_ups);
            let resume = LayoutEventArgs::new(None, LayoutReason::Resume);
            parent_needs_layout |= engine.layout(self, id, &resume);
        }

        let suspension = &mut self.node_mut(id).suspension;
        suspension.in_pass = false;
        suspension.pending = false;
        tracing::debug!("layout {} done", id);
        parent_needs_layout
    }

    /// Stop `id` from laying out until a matching [`resume_layout`](Self::resume_layout).
    /// Calls nest.
    pub fn suspend_layout(&mut self, id: ElementId) -> Result<(), LayoutError> {
        self.check_mut(id)?.suspension.count += 1;
        Ok(())
    }

    /// Undo one [`suspend_layout`](Self::suspend_layout). When the last
    /// suspension ends, `perform` is set and a request arrived meanwhile,
    /// exactly one pass runs.
    pub fn resume_layout(&mut self, id: ElementId, perform: bool) -> Result<(), LayoutError> {
        let suspension = &mut self.check_mut(id)?.suspension;
        debug_assert!(suspension.count > 0, "resume_layout without suspend_layout");
        suspension.count = suspension.count.saturating_sub(1);
        if suspension.count == 0 && perform && suspension.pending {
            suspension.pending = false;
            self.request_layout(id, LayoutEventArgs::new(None, LayoutReason::Resume));
        }
        Ok(())
    }

    /// Start a batch of changes to `container`; see [`LayoutTransaction`].
    pub fn transaction(
        &mut self,
        container: ElementId,
        cause: Option<ElementId>,
        reason: LayoutReason,
    ) -> Result<LayoutTransaction<'_>, LayoutError> {
        self.check(container)?;
        if let Some(cause) = cause {
            self.check(cause)?;
        }
        Ok(LayoutTransaction::new(self, Some(container), cause, reason))
    }

    /// Relayout `id` after a change to itself.
    pub(crate) fn relayout_self(&mut self, id: ElementId, reason: LayoutReason) {
        self.invalidate_preferred(id);
        self.request_layout(id, LayoutEventArgs::new(Some(id), reason));
    }

    /// Relayout the container of `id` after a change to `id`.
    pub(crate) fn relayout_parent(&mut self, id: ElementId, reason: LayoutReason) {
        self.invalidate_preferred(id);
        if let Some(parent) = self.node(id).parent {
            self.request_layout(parent, LayoutEventArgs::new(Some(id), reason));
        }
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Append `child` to the children of `parent` (on top of the z-order),
    /// detaching it from any previous container.
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), LayoutError> {
        self.check(parent)?;
        let old_parent = self.check(child)?.parent;
        if self.is_ancestor(child, parent) {
            return Err(LayoutError::CyclicParent {
                child: child.0,
                parent: parent.0,
            });
        }
        if old_parent == Some(parent) {
            return Ok(());
        }

        let old_index = old_parent.and_then(|old| self.index_of(old, child));
        if let Some(old) = old_parent {
            self.unlink(old, child);
        }
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).table.invalidate();

        if let Err(err) = self.validate_table(parent) {
            self.unlink(parent, child);
            if let (Some(old), Some(index)) = (old_parent, old_index) {
                self.node_mut(old).children.insert(index, child);
                self.node_mut(child).parent = Some(old);
                self.node_mut(old).table.invalidate();
            }
            return Err(err);
        }

        tracing::debug!("{} added to {}", child, parent);
        if let Some(old) = old_parent {
            self.invalidate_preferred(old);
            self.request_layout(old, LayoutEventArgs::new(Some(child), LayoutReason::Children));
        }
        self.invalidate_preferred(parent);
        let engine = self.node(parent).engine.engine();
        engine.init_layout(self, child, BoundsSpecified::ALL);
        self.request_layout(parent, LayoutEventArgs::new(Some(child), LayoutReason::Parent));
        Ok(())
    }

    /// Remove `child` from its container. The element stays alive.
    pub fn detach(&mut self, child: ElementId) -> Result<(), LayoutError> {
        let Some(parent) = self.check(child)?.parent else {
            return Ok(());
        };
        self.invalidate_preferred(parent);
        self.unlink(parent, child);
        self.node_mut(child).anchor_info = None;
        self.request_layout(parent, LayoutEventArgs::new(None, LayoutReason::Children));
        Ok(())
    }

    /// Detach `id` and drop it together with all its descendants.
    pub fn remove(&mut self, id: ElementId) -> Result<(), LayoutError> {
        self.detach(id)?;
        let mut stack = vec![id];
        let cache = self.cache.get_mut();
        while let Some(current) = stack.pop() {
            if let Some(el) = self.slots.get_mut(current.index()).and_then(Option::take) {
                cache.invalidate(current);
                stack.extend(el.children);
            }
        }
        Ok(())
    }

    /// Move `child` to position `index` in its container's z-order.
    /// Out-of-range indexes move it to the top. Rejected, with the order
    /// unchanged, when a fixed-size table can no longer place its children.
    pub fn set_child_index(&mut self, child: ElementId, index: usize) -> Result<(), LayoutError> {
        let Some(parent) = self.check(child)?.parent else {
            return Ok(());
        };
        let Some(current) = self.index_of(parent, child) else {
            return Ok(());
        };
        let children = &mut self.node_mut(parent).children;
        let index = index.min(children.len() - 1);
        if index == current {
            return Ok(());
        }
        children.remove(current);
        children.insert(index, child);
        self.node_mut(parent).table.invalidate();
        if let Err(err) = self.validate_table(parent) {
            let children = &mut self.node_mut(parent).children;
            children.remove(index);
            children.insert(current, child);
            self.node_mut(parent).table.invalidate();
            return Err(err);
        }
        self.invalidate_preferred(parent);
        self.request_layout(parent, LayoutEventArgs::new(Some(child), LayoutReason::ChildIndex));
        Ok(())
    }

    fn index_of(&self, parent: ElementId, child: ElementId) -> Option<usize> {
        self.node(parent).children.iter().position(|&c| c == child)
    }

    fn unlink(&mut self, parent: ElementId, child: ElementId) {
        let el = self.node_mut(parent);
        el.children.retain(|&c| c != child);
        el.table.invalidate();
        self.node_mut(child).parent = None;
    }

    // =========================================================================
    // Element properties
    // =========================================================================

    /// Rename an element.
    pub fn set_name(&mut self, id: ElementId, name: impl Into<String>) -> Result<(), LayoutError> {
        self.check_mut(id)?.name = name.into();
        Ok(())
    }

    /// Set the interior inset.
    pub fn set_padding(&mut self, id: ElementId, padding: Padding) -> Result<(), LayoutError> {
        let el = self.check_mut(id)?;
        let padding = padding.non_negative();
        if el.padding != padding {
            el.padding = padding;
            self.relayout_self(id, LayoutReason::Padding);
        }
        Ok(())
    }

    /// Set the exterior inset.
    pub fn set_margin(&mut self, id: ElementId, margin: Padding) -> Result<(), LayoutError> {
        let el = self.check_mut(id)?;
        let margin = margin.non_negative();
        if el.margin != margin {
            el.margin = margin;
            self.relayout_parent(id, LayoutReason::Margin);
        }
        Ok(())
    }

    /// Set the minimum size. A conflicting maximum is raised to match and
    /// the current bounds grow if needed.
    pub fn set_minimum_size(&mut self, id: ElementId, size: Size) -> Result<(), LayoutError> {
        let el = self.check_mut(id)?;
        let size = size.non_negative();
        if el.minimum_size == size {
            return Ok(());
        }
        el.minimum_size = size;
        if el.maximum_size.width > 0 && el.maximum_size.width < size.width {
            el.maximum_size.width = size.width;
        }
        if el.maximum_size.height > 0 && el.maximum_size.height < size.height {
            el.maximum_size.height = size.height;
        }
        self.enforce_size_limits(id);
        self.relayout_parent(id, LayoutReason::MinimumSize);
        Ok(())
    }

    /// Set the maximum size. A conflicting minimum is lowered to match and
    /// the current bounds shrink if needed.
    pub fn set_maximum_size(&mut self, id: ElementId, size: Size) -> Result<(), LayoutError> {
        let el = self.check_mut(id)?;
        let size = size.non_negative();
        if el.maximum_size == size {
            return Ok(());
        }
        el.maximum_size = size;
        if size.width > 0 {
            el.minimum_size.width = el.minimum_size.width.min(size.width);
        }
        if size.height > 0 {
            el.minimum_size.height = el.minimum_size.height.min(size.height);
        }
        self.enforce_size_limits(id);
        self.relayout_parent(id, LayoutReason::MaximumSize);
        Ok(())
    }

    fn enforce_size_limits(&mut self, id: ElementId) {
        let el = self.node(id);
        let size = el.constrain_size(el.bounds.size());
        if size != el.bounds.size() {
            let bounds = el.bounds.with_size(size);
            self.set_bounds_core(id, bounds, BoundsSpecified::SIZE);
        }
    }

    /// Show or hide an element. Hidden elements are ignored by their
    /// container's engine.
    pub fn set_visible(&mut self, id: ElementId, visible: bool) -> Result<(), LayoutError> {
        let el = self.check_mut(id)?;
        if el.visible == visible {
            return Ok(());
        }
        el.visible = visible;
        let parent = el.parent;
        if let Some(parent) = parent {
            self.node_mut(parent).table.invalidate();
            if let Err(err) = self.validate_table(parent) {
                self.node_mut(id).visible = !visible;
                self.node_mut(parent).table.invalidate();
                return Err(err);
            }
        }
        self.relayout_parent(id, LayoutReason::Visible);
        Ok(())
    }

    /// Turn auto-sizing on or off. Turning it off restores the bounds the
    /// caller last specified.
    pub fn set_auto_size(&mut self, id: ElementId, auto_size: bool) -> Result<(), LayoutError> {
        let el = self.check_mut(id)?;
        if el.state.auto_size == auto_size {
            return Ok(());
        }
        el.state.auto_size = auto_size;
        let parent = el.parent;
        if !auto_size {
            let specified = self.node(id).specified_bounds();
            self.set_bounds_core(id, specified, BoundsSpecified::NONE);
        } else if let Some(parent) = parent {
            let engine = self.node(parent).engine.engine();
            engine.init_layout(self, id, BoundsSpecified::SIZE);
        }
        self.relayout_parent(id, LayoutReason::AutoSize);
        Ok(())
    }

    /// Choose how auto-sizing treats a shrinking preferred size.
    pub fn set_auto_size_mode(&mut self, id: ElementId, mode: AutoSizeMode) -> Result<(), LayoutError> {
        let el = self.check_mut(id)?;
        if el.state.auto_size_mode != mode {
            el.state.auto_size_mode = mode;
            self.relayout_parent(id, LayoutReason::AutoSize);
        }
        Ok(())
    }

    /// Mark the element as sizing itself, which keeps the anchor engine from
    /// resizing it even when it auto-sizes.
    pub fn set_self_auto_size(&mut self, id: ElementId, value: bool) -> Result<(), LayoutError> {
        let el = self.check_mut(id)?;
        if el.state.self_auto_size != value {
            el.state.self_auto_size = value;
            self.relayout_parent(id, LayoutReason::AutoSize);
        }
        Ok(())
    }

    /// Give a leaf element intrinsic content.
    pub fn set_content<M: Measure + 'static>(&mut self, id: ElementId, content: M) -> Result<(), LayoutError> {
        self.check_mut(id)?.content = Some(Box::new(content));
        self.relayout_parent(id, LayoutReason::Content);
        Ok(())
    }

    /// Remove a leaf element's intrinsic content.
    pub fn clear_content(&mut self, id: ElementId) -> Result<(), LayoutError> {
        if self.check_mut(id)?.content.take().is_some() {
            self.relayout_parent(id, LayoutReason::Content);
        }
        Ok(())
    }

    /// Set the element kind.
    pub fn set_kind(&mut self, id: ElementId, kind: ElementKind) -> Result<(), LayoutError> {
        let el = self.check_mut(id)?;
        if el.kind != kind {
            el.kind = kind;
            self.relayout_parent(id, LayoutReason::Dock);
        }
        Ok(())
    }

    /// Choose the engine that lays out this element's children.
    pub fn set_engine(&mut self, id: ElementId, engine: EngineKind) -> Result<(), LayoutError> {
        let el = self.check_mut(id)?;
        if el.engine == engine {
            return Ok(());
        }
        let previous = el.engine;
        el.engine = engine;
        el.table.invalidate();
        if let Err(err) = self.validate_table(id) {
            self.node_mut(id).engine = previous;
            return Err(err);
        }
        let children = self.node(id).children.clone();
        for child in children {
            engine.engine().init_layout(self, child, BoundsSpecified::ALL);
        }
        self.relayout_self(id, LayoutReason::Engine);
        Ok(())
    }

    /// Lay out children from the right (flow and table engines).
    pub fn set_right_to_left(&mut self, id: ElementId, value: bool) -> Result<(), LayoutError> {
        let el = self.check_mut(id)?;
        if el.right_to_left != value {
            el.right_to_left = value;
            self.relayout_self(id, LayoutReason::RightToLeft);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrange_core::Content;

    fn tree_with_child() -> (LayoutTree, ElementId, ElementId) {
        let mut tree = LayoutTree::new();
        let root = tree.create("root");
        let child = tree.create("child");
        tree.set_bounds(root, Rect::new(0, 0, 100, 100), BoundsSpecified::ALL)
            .unwrap();
        tree.add_child(root, child).unwrap();
        (tree, root, child)
    }

    #[test]
    fn test_create_and_lookup() {
        let mut tree = LayoutTree::new();
        let a = tree.create("a");
        assert!(tree.contains(a));
        assert_eq!(tree.name(a), "a");
        assert_eq!(tree.bounds(a), Rect::ZERO);
        assert!(!tree.contains(ElementId(99)));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_unknown_element_errors() {
        let mut tree = LayoutTree::new();
        let err = tree.set_visible(ElementId(5), false).unwrap_err();
        assert_eq!(err, LayoutError::UnknownElement(5));
    }

    #[test]
    fn test_bounds_clamped_by_min_max() {
        let (mut tree, _, child) = tree_with_child();
        tree.set_minimum_size(child, Size::new(20, 0)).unwrap();
        tree.set_maximum_size(child, Size::new(0, 30)).unwrap();
        tree.set_bounds(child, Rect::new(0, 0, 5, 50), BoundsSpecified::ALL)
            .unwrap();
        assert_eq!(tree.bounds(child).size(), Size::new(20, 30));
    }

    #[test]
    fn test_negative_size_clamped() {
        let (mut tree, _, child) = tree_with_child();
        tree.set_bounds(child, Rect::new(3, 4, -10, -1), BoundsSpecified::ALL)
            .unwrap();
        assert_eq!(tree.bounds(child), Rect::new(3, 4, 0, 0));
    }

    #[test]
    fn test_specified_bounds_survive_engine_placement() {
        let (mut tree, _, child) = tree_with_child();
        tree.set_bounds(child, Rect::new(10, 10, 40, 20), BoundsSpecified::ALL)
            .unwrap();
        tree.set_bounds(child, Rect::new(0, 0, 100, 20), BoundsSpecified::NONE)
            .unwrap();
        assert_eq!(tree.specified_bounds(child), Rect::new(10, 10, 40, 20));

        tree.set_bounds(child, Rect::new(5, 5, 50, 50), BoundsSpecified::ALL)
            .unwrap();
        assert_eq!(tree.specified_bounds(child), Rect::new(5, 5, 50, 50));
    }

    #[test]
    fn test_minimum_raises_conflicting_maximum() {
        let (mut tree, _, child) = tree_with_child();
        tree.set_maximum_size(child, Size::new(10, 10)).unwrap();
        tree.set_minimum_size(child, Size::new(20, 5)).unwrap();
        assert_eq!(tree.maximum_size(child), Size::new(20, 10));
        assert_eq!(tree.bounds(child).size(), Size::new(20, 5));
    }

    #[test]
    fn test_cyclic_parent_rejected() {
        let (mut tree, root, child) = tree_with_child();
        let err = tree.add_child(child, root).unwrap_err();
        assert!(matches!(err, LayoutError::CyclicParent { .. }));
        assert!(tree.add_child(root, root).is_err());
        assert_eq!(tree.parent(root), None);
    }

    #[test]
    fn test_reparent_moves_child() {
        let (mut tree, root, child) = tree_with_child();
        let other = tree.create("other");
        tree.add_child(root, other).unwrap();
        tree.add_child(other, child).unwrap();
        assert_eq!(tree.children(root), &[other]);
        assert_eq!(tree.parent(child), Some(other));
    }

    #[test]
    fn test_set_child_index() {
        let (mut tree, root, a) = tree_with_child();
        let b = tree.create("b");
        let c = tree.create("c");
        tree.add_child(root, b).unwrap();
        tree.add_child(root, c).unwrap();
        tree.set_child_index(c, 0).unwrap();
        assert_eq!(tree.children(root), &[c, a, b]);
        tree.set_child_index(c, 99).unwrap();
        assert_eq!(tree.children(root), &[a, b, c]);
    }

    #[test]
    fn test_remove_drops_subtree() {
        let (mut tree, root, child) = tree_with_child();
        let grandchild = tree.create("gc");
        tree.add_child(child, grandchild).unwrap();
        tree.remove(child).unwrap();
        assert!(!tree.contains(child));
        assert!(!tree.contains(grandchild));
        assert!(tree.children(root).is_empty());
    }

    // =========================================================================
    // Preferred size
    // =========================================================================

    #[test]
    fn test_leaf_preferred_size_is_specified_size() {
        let (mut tree, _, child) = tree_with_child();
        tree.set_bounds(child, Rect::new(0, 0, 30, 20), BoundsSpecified::ALL)
            .unwrap();
        assert_eq!(tree.preferred_size(child, Size::ZERO), Size::new(30, 20));
    }

    #[test]
    fn test_content_preferred_size_adds_padding() {
        let (mut tree, _, child) = tree_with_child();
        tree.set_content(child, Content::fixed(40, 10)).unwrap();
        tree.set_padding(child, Padding::all(2)).unwrap();
        assert_eq!(tree.preferred_size(child, Size::ZERO), Size::new(44, 14));
    }

    #[test]
    fn test_preferred_size_respects_maximum() {
        let (mut tree, _, child) = tree_with_child();
        tree.set_content(child, Content::wrap(10, 10, 10)).unwrap();
        tree.set_maximum_size(child, Size::new(35, 0)).unwrap();
        // the maximum also caps the width proposed to the content
        assert_eq!(tree.preferred_size(child, Size::ZERO), Size::new(30, 40));
    }

    #[test]
    fn test_preferred_size_is_cached_and_invalidated() {
        let (mut tree, _, child) = tree_with_child();
        tree.set_content(child, Content::fixed(40, 10)).unwrap();
        let _ = tree.preferred_size(child, Size::ZERO);
        let _ = tree.preferred_size(child, Size::ZERO);
        assert_eq!(tree.cache().hits(), 1);

        tree.set_padding(child, Padding::all(1)).unwrap();
        assert_eq!(tree.preferred_size(child, Size::ZERO), Size::new(42, 12));
    }

    #[test]
    fn test_cache_can_be_disabled() {
        let mut tree = LayoutTree::with_options(LayoutOptions {
            cache_preferred_sizes: false,
            ..LayoutOptions::default()
        });
        let a = tree.create("a");
        tree.set_content(a, Content::fixed(1, 1)).unwrap();
        let _ = tree.preferred_size(a, Size::ZERO);
        let _ = tree.preferred_size(a, Size::ZERO);
        assert!(tree.cache().is_empty());
        assert_eq!(tree.cache().hits(), 0);
    }

    // =========================================================================
    // Suspend / resume
    // =========================================================================

    #[test]
    fn test_suspended_layout_runs_once_on_resume() {
        let (mut tree, root, child) = tree_with_child();
        tree.set_bounds(child, Rect::new(0, 0, 10, 10), BoundsSpecified::ALL)
            .unwrap();
        tree.suspend_layout(root).unwrap();
        tree.suspend_layout(root).unwrap();
        tree.set_auto_size(child, true).unwrap();
        tree.set_content(child, Content::fixed(30, 30)).unwrap();
        assert_eq!(tree.bounds(child).size(), Size::new(10, 10));

        tree.resume_layout(root, true).unwrap();
        assert!(tree.is_layout_suspended(root));
        assert_eq!(tree.bounds(child).size(), Size::new(10, 10));

        tree.resume_layout(root, true).unwrap();
        assert!(!tree.is_layout_suspended(root));
        assert_eq!(tree.bounds(child).size(), Size::new(30, 30));
    }

    #[test]
    fn test_resume_without_perform_keeps_request() {
        let (mut tree, root, child) = tree_with_child();
        tree.suspend_layout(root).unwrap();
        tree.set_auto_size(child, true).unwrap();
        tree.set_content(child, Content::fixed(30, 30)).unwrap();
        tree.resume_layout(root, false).unwrap();
        assert_eq!(tree.bounds(child).size(), Size::ZERO);

        tree.perform_layout(root, None, LayoutReason::Explicit).unwrap();
        assert_eq!(tree.bounds(child).size(), Size::new(30, 30));
    }
}
