#![forbid(unsafe_code)]

//! Core primitives for windowed (virtualized) collection rendering.
//!
//! A virtualized list renders only the items that currently intersect its
//! viewport, cycling a small pool of renderable instances instead of
//! materializing one per data item. This crate holds the pure, callback-free
//! pieces of that machinery:
//!
//! - [`measure::MeasureModel`]: per-index size overrides over a uniform
//!   default extent
//! - [`window::WindowPlanner`]: visible index range computation from a
//!   scroll offset, for both uniform and variable item sizing
//! - [`prefix::PrefixSums`]: Fenwick-style prefix index used to keep window
//!   planning sub-linear once overrides accumulate
//! - [`pool::Pool`]: a thread-safe freelist of recyclable values
//! - [`geometry`]: the axis-aware scalar types shared with the control layer
//!
//! The control that wires these to external collaborators (length, factory
//! and update callbacks) lives in the `windrow-list` crate.

pub mod geometry;
pub mod measure;
pub mod pool;
pub mod prefix;
pub mod window;

pub use geometry::{Orientation, Pos, Size};
pub use measure::MeasureModel;
pub use pool::Pool;
pub use prefix::PrefixSums;
pub use window::{Window, WindowPlanner};
