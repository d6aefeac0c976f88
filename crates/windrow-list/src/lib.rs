#![forbid(unsafe_code)]

//! A windowed (virtualized) list control.
//!
//! [`List`] renders an index-addressable collection of arbitrary size by
//! keeping renderable instances only for the items that currently intersect
//! the viewport. Instances scrolled out of view return to a pool and are
//! recycled for items scrolling in, so the number of live instances stays
//! proportional to the viewport, not the collection.
//!
//! The control owns no data and draws nothing. External collaborators,
//! registered on [`ListBuilder`], supply the collection length, construct
//! item instances, and bind data into an instance when it is (re)assigned an
//! index. Rendering, input dispatch and the scroll container live outside;
//! the container reports scroll positions through [`List::set_offset`] and
//! hears about programmatic scrolls through the offset-changed callback.
//!
//! ```
//! use windrow_core::{Pos, Size};
//! use windrow_list::{ItemView, ListBuilder};
//!
//! struct Row {
//!     text: String,
//! }
//!
//! impl ItemView for Row {
//!     fn place(&mut self, _pos: Pos, _size: Size) {}
//!     fn min_size(&self) -> Size {
//!         Size::new(120.0, 20.0)
//!     }
//! }
//!
//! let list = ListBuilder::new()
//!     .with_length(|| 100_000)
//!     .with_create_item(|| Row { text: String::new() })
//!     .with_update_item(|index, row: &mut Row| row.text = format!("row {index}"))
//!     .build();
//! list.resize(Size::new(120.0, 300.0));
//! assert_eq!(list.visible_range(), Some((0, 12)));
//! ```

pub mod list;
pub mod separator;

pub use list::{List, ListBuilder, Slot};
pub use separator::{Separator, SeparatorTrack};
pub use windrow_core::{Orientation, Pos, Size};

/// A renderable item instance managed by the list.
///
/// Implementations are plain view objects; the list moves them, sizes them
/// and hands them to the update callback for data binding. One instance
/// represents many different indices over its lifetime.
pub trait ItemView: Send {
    /// Position and size the instance within the list content.
    fn place(&mut self, pos: Pos, size: Size);

    /// The instance's natural size. The template instance's answer fixes the
    /// uniform item extent and the list's cross extent.
    fn min_size(&self) -> Size;

    /// Reflect selection and focus highlight state. Default: no visuals.
    fn set_indicators(&mut self, _selected: bool, _focused: bool) {}
}

/// Navigation keys the list responds to while it has input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Move focus to the previous item.
    Up,
    /// Move focus to the next item.
    Down,
    /// Select the focused item.
    Activate,
}
