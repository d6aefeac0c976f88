#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! The engine works with one scroll axis chosen at construction. `main`
//! always means "along the scroll axis" and `cross` the perpendicular one,
//! so the window and placement code never branches on orientation itself.

/// The scroll axis of a list, fixed for the lifetime of the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Items stack top to bottom; the main axis is height.
    #[default]
    Vertical,
    /// Items run left to right; the main axis is width.
    Horizontal,
}

impl Orientation {
    /// Whether the main axis is horizontal.
    #[inline]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Horizontal)
    }
}

/// A position in the scroll container's content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pos {
    /// Horizontal offset from the content origin.
    pub x: f32,
    /// Vertical offset from the content origin.
    pub y: f32,
}

impl Pos {
    /// The content origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new position.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Build a position from main/cross components for the given axis.
    #[inline]
    pub const fn from_main_cross(orientation: Orientation, main: f32, cross: f32) -> Self {
        match orientation {
            Orientation::Vertical => Self { x: cross, y: main },
            Orientation::Horizontal => Self { x: main, y: cross },
        }
    }

    /// The component along the scroll axis.
    #[inline]
    pub const fn main(self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Vertical => self.y,
            Orientation::Horizontal => self.x,
        }
    }

    /// The component across the scroll axis.
    #[inline]
    pub const fn cross(self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Vertical => self.x,
            Orientation::Horizontal => self.y,
        }
    }
}

/// A two-dimensional extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Size {
    /// The zero size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Build a size from main/cross extents for the given axis.
    #[inline]
    pub const fn from_main_cross(orientation: Orientation, main: f32, cross: f32) -> Self {
        match orientation {
            Orientation::Vertical => Self {
                width: cross,
                height: main,
            },
            Orientation::Horizontal => Self {
                width: main,
                height: cross,
            },
        }
    }

    /// The extent along the scroll axis.
    #[inline]
    pub const fn main(self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Vertical => self.height,
            Orientation::Horizontal => self.width,
        }
    }

    /// The extent across the scroll axis.
    #[inline]
    pub const fn cross(self, orientation: Orientation) -> f32 {
        match orientation {
            Orientation::Vertical => self.width,
            Orientation::Horizontal => self.height,
        }
    }

    /// Whether either extent is zero or negative.
    #[inline]
    pub fn is_degenerate(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}
