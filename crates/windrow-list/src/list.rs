#![forbid(unsafe_code)]

//! The list control: visible-set diffing, instance recycling, selection,
//! focus and scrolling.
//!
//! State is split across two locks. The property mutex holds the cheap
//! scalar state (measures, offset, viewport, selection, focus); the layout
//! rwlock holds the visible set, the window planner and the separator
//! track. Lock order is layout before props, and neither lock is held while
//! an update or notification callback runs, so those collaborators may
//! re-enter the control (for a different item) without deadlocking. The one
//! exception is the item factory, which runs under the layout write lock and
//! must not call back into the control.

use crate::separator::{Separator, SeparatorTrack};
use crate::{ItemView, Key};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use windrow_core::{MeasureModel, Orientation, Pool, Pos, Size, WindowPlanner};

/// Shared handle to one pooled item instance.
pub type Slot<T> = Arc<Mutex<T>>;

type LengthFn = dyn Fn() -> usize + Send + Sync;
type CreateFn<T> = dyn Fn() -> T + Send + Sync;
type UpdateFn<T> = dyn Fn(usize, &mut T) + Send + Sync;
type IndexFn = dyn Fn(usize) + Send + Sync;
type OffsetFn = dyn Fn(f32) + Send + Sync;

const DEFAULT_SPACING: f32 = 4.0;
const DEFAULT_SEPARATOR_THICKNESS: f32 = 1.0;

/// External collaborators. All optional; a missing one degrades the
/// behavior it backs, never the control as a whole.
struct Hooks<T> {
    length: Option<Arc<LengthFn>>,
    create_item: Option<Arc<CreateFn<T>>>,
    update_item: Option<Arc<UpdateFn<T>>>,
    on_selected: Option<Arc<IndexFn>>,
    on_unselected: Option<Arc<IndexFn>>,
    on_offset_changed: Option<Arc<OffsetFn>>,
}

/// Scalar state behind the property mutex.
struct Props {
    measures: MeasureModel,
    template_cross: f32,
    offset: f32,
    viewport: Size,
    selected: Vec<usize>,
    focused: usize,
    has_focus: bool,
}

/// One mounted item: its index and the shared instance handle.
struct Entry<T: ItemView> {
    index: usize,
    slot: Slot<T>,
}

impl<T: ItemView> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            slot: Arc::clone(&self.slot),
        }
    }
}

/// Layout state behind the rwlock: everything a window update rebuilds.
struct LayoutState<T: ItemView> {
    visible: Vec<Entry<T>>,
    planner: WindowPlanner,
    separators: SeparatorTrack,
}

impl<T: ItemView> LayoutState<T> {
    fn new() -> Self {
        Self {
            visible: Vec::new(),
            planner: WindowPlanner::new(),
            separators: SeparatorTrack::new(),
        }
    }
}

/// How much of the visible set a window update reconfigures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshScope {
    /// Reconfigure every visible entry (data or highlight changed).
    Full,
    /// Reconfigure only entries that just scrolled in (pure scroll).
    NewOnly,
}

/// Configures and builds a [`List`].
pub struct ListBuilder<T> {
    orientation: Orientation,
    spacing: f32,
    separator_thickness: f32,
    hide_separators: bool,
    viewport: Size,
    length: Option<Arc<LengthFn>>,
    create_item: Option<Arc<CreateFn<T>>>,
    update_item: Option<Arc<UpdateFn<T>>>,
    on_selected: Option<Arc<IndexFn>>,
    on_unselected: Option<Arc<IndexFn>>,
    on_offset_changed: Option<Arc<OffsetFn>>,
}

impl<T: ItemView> Default for ListBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ItemView> ListBuilder<T> {
    /// Start a builder with vertical orientation and default spacing.
    pub fn new() -> Self {
        Self {
            orientation: Orientation::Vertical,
            spacing: DEFAULT_SPACING,
            separator_thickness: DEFAULT_SEPARATOR_THICKNESS,
            hide_separators: false,
            viewport: Size::ZERO,
            length: None,
            create_item: None,
            update_item: None,
            on_selected: None,
            on_unselected: None,
            on_offset_changed: None,
        }
    }

    /// Scroll axis, fixed for the control's lifetime.
    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Gap between consecutive items along the scroll axis.
    #[must_use]
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing.max(0.0);
        self
    }

    /// Divider thickness along the scroll axis.
    #[must_use]
    pub fn with_separator_thickness(mut self, thickness: f32) -> Self {
        self.separator_thickness = thickness.max(0.0);
        self
    }

    /// Suppress dividers entirely.
    #[must_use]
    pub fn hide_separators(mut self, hide: bool) -> Self {
        self.hide_separators = hide;
        self
    }

    /// Initial viewport size. Can be changed later via [`List::resize`].
    #[must_use]
    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }

    /// Collection length callback. Unset means an empty collection.
    #[must_use]
    pub fn with_length(mut self, length: impl Fn() -> usize + Send + Sync + 'static) -> Self {
        self.length = Some(Arc::new(length));
        self
    }

    /// Item instance factory. Also measured once for the template extent.
    #[must_use]
    pub fn with_create_item(mut self, create: impl Fn() -> T + Send + Sync + 'static) -> Self {
        self.create_item = Some(Arc::new(create));
        self
    }

    /// Data-binding callback, invoked whenever an instance is (re)assigned
    /// an index.
    #[must_use]
    pub fn with_update_item(
        mut self,
        update: impl Fn(usize, &mut T) + Send + Sync + 'static,
    ) -> Self {
        self.update_item = Some(Arc::new(update));
        self
    }

    /// Notification that an index became the selection.
    #[must_use]
    pub fn on_selected(mut self, callback: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_selected = Some(Arc::new(callback));
        self
    }

    /// Notification that an index left the selection.
    #[must_use]
    pub fn on_unselected(mut self, callback: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_unselected = Some(Arc::new(callback));
        self
    }

    /// Notification that a programmatic scroll moved the offset, so the
    /// owning scroll container can follow.
    #[must_use]
    pub fn on_offset_changed(mut self, callback: impl Fn(f32) + Send + Sync + 'static) -> Self {
        self.on_offset_changed = Some(Arc::new(callback));
        self
    }

    /// Build the list and run an initial window update.
    pub fn build(self) -> List<T> {
        // Measure a template instance to fix the uniform extent; it then
        // seeds the pool rather than being thrown away.
        let mut template = None;
        let (default_extent, template_cross) = match &self.create_item {
            Some(create) => {
                let probe = create();
                let min = probe.min_size();
                let measured = (min.main(self.orientation), min.cross(self.orientation));
                template = Some(probe);
                measured
            }
            None => (0.0, 0.0),
        };

        let list = List {
            orientation: self.orientation,
            spacing: self.spacing,
            separator_thickness: self.separator_thickness,
            hide_separators: self.hide_separators,
            hooks: Hooks {
                length: self.length,
                create_item: self.create_item,
                update_item: self.update_item,
                on_selected: self.on_selected,
                on_unselected: self.on_unselected,
                on_offset_changed: self.on_offset_changed,
            },
            props: Mutex::new(Props {
                measures: MeasureModel::new(default_extent),
                template_cross,
                offset: 0.0,
                viewport: self.viewport,
                selected: Vec::new(),
                focused: 0,
                has_focus: false,
            }),
            layout: RwLock::new(LayoutState::new()),
            item_pool: Pool::new(),
            snapshot_pool: Pool::new(),
        };
        if let Some(probe) = template {
            list.item_pool.release(Arc::new(Mutex::new(probe)));
        }
        list.update_pass(RefreshScope::Full);
        list
    }
}

/// A windowed list over an index-addressable collection.
///
/// All methods are callable from any thread; see the module docs for the
/// locking discipline.
pub struct List<T: ItemView> {
    orientation: Orientation,
    spacing: f32,
    separator_thickness: f32,
    hide_separators: bool,
    hooks: Hooks<T>,
    props: Mutex<Props>,
    layout: RwLock<LayoutState<T>>,
    item_pool: Pool<Slot<T>>,
    snapshot_pool: Pool<Vec<Entry<T>>>,
}

impl<T: ItemView> List<T> {
    /// Start building a list.
    pub fn builder() -> ListBuilder<T> {
        ListBuilder::new()
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Make `index` the sole selection, scrolling it into view and
    /// refreshing highlights.
    ///
    /// Out-of-range indices and re-selecting the current selection are
    /// no-ops. On a change, the old selection's unselected notification
    /// fires before the new selection's selected notification.
    pub fn select(&self, index: usize) {
        let count = self.count();
        if index >= count {
            return;
        }
        let previous = {
            let mut props = self.props();
            if props.selected == [index] {
                return;
            }
            let previous = props.selected.first().copied();
            props.selected.clear();
            props.selected.push(index);
            previous
        };
        self.scroll_to(index);
        self.update_pass(RefreshScope::Full);
        if let Some(previous) = previous
            && let Some(callback) = &self.hooks.on_unselected
        {
            callback(previous);
        }
        if let Some(callback) = &self.hooks.on_selected {
            callback(index);
        }
    }

    /// Remove `index` from the selection if it is selected.
    pub fn unselect(&self, index: usize) {
        let removed = {
            let mut props = self.props();
            if props.selected.contains(&index) {
                props.selected.clear();
                true
            } else {
                false
            }
        };
        if removed {
            self.update_pass(RefreshScope::Full);
            if let Some(callback) = &self.hooks.on_unselected {
                callback(index);
            }
        }
    }

    /// Clear the selection entirely.
    pub fn unselect_all(&self) {
        let removed = std::mem::take(&mut self.props().selected);
        if removed.is_empty() {
            return;
        }
        self.update_pass(RefreshScope::Full);
        if let Some(callback) = &self.hooks.on_unselected {
            for index in removed {
                callback(index);
            }
        }
    }

    /// Currently selected indices (zero or one).
    pub fn selected(&self) -> Vec<usize> {
        self.props().selected.clone()
    }

    // ========================================================================
    // Scrolling
    // ========================================================================

    /// Scroll the minimum distance that brings `index` fully into view.
    /// Out-of-range indices are ignored.
    pub fn scroll_to(&self, index: usize) {
        let count = self.count();
        if index >= count {
            return;
        }
        let (offset, target) = {
            let props = self.props();
            let viewport_main = props.viewport.main(self.orientation);
            let leading = props.measures.leading_edge(index, self.spacing);
            let extent = props.measures.effective(index);
            let target = if leading < props.offset {
                leading
            } else if leading + extent > props.offset + viewport_main {
                leading + extent - viewport_main
            } else {
                props.offset
            };
            (props.offset, target)
        };
        if target != offset {
            self.apply_offset(target, count);
        }
    }

    /// Scroll to the top (or leading edge) of the content.
    pub fn scroll_to_start(&self) {
        self.apply_offset(0.0, self.count());
    }

    /// Scroll to the bottom (or trailing edge) of the content.
    pub fn scroll_to_end(&self) {
        let count = self.count();
        let content = self.props().measures.aggregate(count, self.spacing);
        self.apply_offset(content, count);
    }

    /// Scroll to an absolute offset, clamped to the content bounds. A no-op
    /// while the content fits the viewport.
    pub fn scroll_to_offset(&self, offset: f32) {
        let count = self.count();
        {
            let props = self.props();
            let content = props.measures.aggregate(count, self.spacing);
            if content <= props.viewport.main(self.orientation) {
                return;
            }
        }
        self.apply_offset(offset, count);
    }

    /// The current scroll offset along the main axis.
    pub fn scroll_offset(&self) -> f32 {
        self.props().offset
    }

    /// Record a new offset reported by the owning scroll container and
    /// update the window incrementally. Does not fire the offset-changed
    /// notification; the container already knows.
    pub fn set_offset(&self, offset: f32) {
        let changed = {
            let mut props = self.props();
            let offset = offset.max(0.0);
            if offset == props.offset {
                false
            } else {
                props.offset = offset;
                true
            }
        };
        if changed {
            self.update_pass(RefreshScope::NewOnly);
        }
    }

    // ========================================================================
    // Geometry and measures
    // ========================================================================

    /// Record a new viewport size and update the window incrementally.
    pub fn resize(&self, viewport: Size) {
        let changed = {
            let mut props = self.props();
            if props.viewport == viewport {
                false
            } else {
                props.viewport = viewport;
                true
            }
        };
        if changed {
            self.update_pass(RefreshScope::NewOnly);
        }
    }

    /// Override one item's extent along the scroll axis. Ignored for
    /// out-of-range indices; a no-op when the effective extent is
    /// unchanged. Positions of every later item shift, so a change runs a
    /// full window update.
    pub fn set_item_measure(&self, index: usize, extent: f32) {
        if index >= self.count() {
            return;
        }
        let changed = self.props().measures.set_override(index, extent);
        if changed {
            self.update_pass(RefreshScope::Full);
        }
    }

    /// Total content size: aggregate extent along the main axis, the
    /// template's natural extent across.
    pub fn content_size(&self) -> Size {
        let count = self.count();
        let props = self.props();
        let main = props.measures.aggregate(count, self.spacing);
        Size::from_main_cross(self.orientation, main, props.template_cross)
    }

    /// Re-measure the template (e.g. after a theme change) and rebuild and
    /// reconfigure the whole window.
    pub fn refresh(&self) {
        if let Some(create) = &self.hooks.create_item {
            let probe = create();
            let min = probe.min_size();
            {
                let mut props = self.props();
                props.measures.set_default(min.main(self.orientation));
                props.template_cross = min.cross(self.orientation);
            }
            self.item_pool.release(Arc::new(Mutex::new(probe)));
        }
        self.update_pass(RefreshScope::Full);
    }

    /// Reconfigure one item if it is currently visible.
    pub fn refresh_item(&self, index: usize) {
        let slot = {
            let layout = self.layout.read().unwrap_or_else(PoisonError::into_inner);
            search(&layout.visible, index)
                .ok()
                .map(|i| Arc::clone(&layout.visible[i].slot))
        };
        if let Some(slot) = slot {
            self.configure_item(index, &slot);
        }
    }

    // ========================================================================
    // Focus and keyboard
    // ========================================================================

    /// The control gained input focus: highlight and reveal the focused
    /// item.
    pub fn focus_gained(&self) {
        let focused = {
            let mut props = self.props();
            props.has_focus = true;
            props.focused
        };
        self.scroll_to(focused);
        self.refresh_item(focused);
    }

    /// The control lost input focus: drop the focus highlight.
    pub fn focus_lost(&self) {
        let focused = {
            let mut props = self.props();
            props.has_focus = false;
            props.focused
        };
        self.refresh_item(focused);
    }

    /// Handle a navigation key. Up and Down move the focus by one without
    /// changing the selection; Activate selects the focused item.
    pub fn handle_key(&self, key: Key) {
        match key {
            Key::Up => self.move_focus(-1),
            Key::Down => self.move_focus(1),
            Key::Activate => {
                let focused = self.props().focused;
                self.select(focused);
            }
        }
    }

    fn move_focus(&self, delta: i64) {
        let count = self.count();
        if count == 0 {
            return;
        }
        let (previous, next) = {
            let mut props = self.props();
            let previous = props.focused;
            let next = (previous as i64 + delta).clamp(0, count as i64 - 1) as usize;
            props.focused = next;
            (previous, next)
        };
        if next == previous {
            return;
        }
        self.refresh_item(previous);
        self.scroll_to(next);
        self.refresh_item(next);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// First and last visible index, or `None` when nothing is visible.
    pub fn visible_range(&self) -> Option<(usize, usize)> {
        let layout = self.layout.read().unwrap_or_else(PoisonError::into_inner);
        match (layout.visible.first(), layout.visible.last()) {
            (Some(first), Some(last)) => Some((first.index, last.index)),
            _ => None,
        }
    }

    /// Whether `index` is currently mounted.
    pub fn is_visible(&self, index: usize) -> bool {
        let layout = self.layout.read().unwrap_or_else(PoisonError::into_inner);
        search(&layout.visible, index).is_ok()
    }

    /// Visit every visible item in ascending index order. The layout lock
    /// is released before `visit` runs.
    pub fn for_each_visible(&self, mut visit: impl FnMut(usize, &Slot<T>)) {
        let entries: Vec<Entry<T>> = {
            let layout = self.layout.read().unwrap_or_else(PoisonError::into_inner);
            layout.visible.clone()
        };
        for entry in &entries {
            visit(entry.index, &entry.slot);
        }
    }

    /// The dividers of the current window, in order.
    pub fn separators(&self) -> Vec<Separator> {
        let layout = self.layout.read().unwrap_or_else(PoisonError::into_inner);
        layout.separators.placed().copied().collect()
    }

    /// Number of idle instances waiting in the pool.
    pub fn pooled_count(&self) -> usize {
        self.item_pool.len()
    }

    // ========================================================================
    // Window update
    // ========================================================================

    /// Recompute the visible window and reconcile the visible set with it.
    fn update_pass(&self, scope: RefreshScope) {
        let count = self.count();
        if self.hooks.update_item.is_none() {
            tracing::warn!("no update_item collaborator; visible items render unconfigured");
        }

        let mut layout = self.layout.write().unwrap_or_else(PoisonError::into_inner);
        let LayoutState {
            visible,
            planner,
            separators,
        } = &mut *layout;

        // Snapshot the previous window into a pooled buffer; `visible` is
        // rebuilt from scratch below.
        let mut snapshot = self.snapshot_pool.obtain().unwrap_or_default();
        std::mem::swap(visible, &mut snapshot);

        let (window, viewport_cross) = {
            let props = self.props();
            let viewport_main = props.viewport.main(self.orientation);
            let viewport_cross = props.viewport.cross(self.orientation);
            let window = planner.plan(
                props.offset,
                viewport_main,
                count,
                &props.measures,
                self.spacing,
            );
            (window, viewport_cross)
        };

        if window.is_empty() && count > 0 {
            // Nothing computable yet (degenerate viewport or an offset past
            // the content): keep the current window untouched.
            std::mem::swap(visible, &mut snapshot);
            self.snapshot_pool.release(snapshot);
            return;
        }

        separators.begin();
        let mut placements: Vec<(Slot<T>, Pos, Size)> = Vec::with_capacity(window.len());
        let mut acc = window.origin;
        let mut at_first = true;
        for (index, &extent) in window.indices().zip(window.extents.iter()) {
            if !at_first && !self.hide_separators {
                separators.place(
                    self.orientation,
                    acc,
                    self.spacing,
                    self.separator_thickness,
                    viewport_cross,
                );
            }
            at_first = false;

            let slot = match search(&snapshot, index) {
                Ok(i) => Arc::clone(&snapshot[i].slot),
                Err(_) => match self.item_pool.obtain() {
                    Some(slot) => slot,
                    None => match &self.hooks.create_item {
                        Some(create) => Arc::new(Mutex::new(create())),
                        None => {
                            tracing::warn!(index, "no create_item collaborator; skipping slot");
                            acc += extent + self.spacing;
                            continue;
                        }
                    },
                },
            };

            let pos = Pos::from_main_cross(self.orientation, acc, 0.0);
            let size = Size::from_main_cross(self.orientation, extent, viewport_cross);
            placements.push((Arc::clone(&slot), pos, size));
            visible.push(Entry { index, slot });
            acc += extent + self.spacing;
        }
        separators.finish();

        // Entries scrolling in get configured; under Full, everything does.
        let mut to_configure: Vec<Entry<T>> = Vec::with_capacity(visible.len());
        match scope {
            RefreshScope::Full => to_configure.extend(visible.iter().cloned()),
            RefreshScope::NewOnly => to_configure.extend(
                visible
                    .iter()
                    .filter(|entry| search(&snapshot, entry.index).is_err())
                    .cloned(),
            ),
        }

        // Instances that scrolled out go back to the pool.
        for entry in snapshot.drain(..) {
            if search(visible, entry.index).is_err() {
                self.item_pool.release(entry.slot);
            }
        }
        self.snapshot_pool.release(snapshot);

        tracing::debug!(
            first = window.first,
            mounted = visible.len(),
            ?scope,
            "visible window updated"
        );
        drop(layout);

        // Item mutexes are taken only after the layout lock is gone, so a
        // callback re-entering the control cannot form a lock cycle.
        for (slot, pos, size) in &placements {
            slot.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .place(*pos, *size);
        }
        for entry in &to_configure {
            self.configure_item(entry.index, &entry.slot);
        }
    }

    /// Bind data and highlight state into one instance. No control lock is
    /// held while the update callback runs; the instance's own mutex is.
    fn configure_item(&self, index: usize, slot: &Slot<T>) {
        let (selected, focused) = {
            let props = self.props();
            (
                props.selected.contains(&index),
                props.has_focus && props.focused == index,
            )
        };
        let mut item = slot.lock().unwrap_or_else(PoisonError::into_inner);
        item.set_indicators(selected, focused);
        if let Some(update) = &self.hooks.update_item {
            update(index, &mut item);
        }
    }

    /// Clamp `target` to the content bounds and, on a change, record it,
    /// notify the scroll container, and update the window incrementally.
    fn apply_offset(&self, target: f32, count: usize) {
        let changed = {
            let mut props = self.props();
            let viewport_main = props.viewport.main(self.orientation);
            let content = props.measures.aggregate(count, self.spacing);
            let clamped = target.clamp(0.0, (content - viewport_main).max(0.0));
            if clamped == props.offset {
                None
            } else {
                props.offset = clamped;
                Some(clamped)
            }
        };
        if let Some(offset) = changed {
            if let Some(callback) = &self.hooks.on_offset_changed {
                callback(offset);
            }
            self.update_pass(RefreshScope::NewOnly);
        }
    }

    fn count(&self) -> usize {
        self.hooks.length.as_ref().map_or(0, |length| length())
    }

    fn props(&self) -> std::sync::MutexGuard<'_, Props> {
        self.props.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Binary search a visible set, which is ascending and unique by index.
fn search<T: ItemView>(entries: &[Entry<T>], index: usize) -> Result<usize, usize> {
    entries.binary_search_by(|entry| entry.index.cmp(&index))
}
