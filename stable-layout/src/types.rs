use core::cmp::Ordering;
use core::fmt;

/// The axis along which the host view scrolls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the component along `axis`.
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.y,
            Axis::Horizontal => self.x,
        }
    }

    /// Returns a copy with the component along `axis` replaced.
    pub fn with_along(self, axis: Axis, value: f64) -> Self {
        match axis {
            Axis::Vertical => Self { y: value, ..self },
            Axis::Horizontal => Self { x: value, ..self },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Vertical => self.height,
            Axis::Horizontal => self.width,
        }
    }
}

/// An item frame in content coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub origin: Point,
    pub size: Size,
}

impl Frame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Start of the frame in the scroll axis.
    pub fn leading_edge(&self, axis: Axis) -> f64 {
        self.origin.along(axis)
    }

    /// End (exclusive) of the frame in the scroll axis.
    pub fn trailing_edge(&self, axis: Axis) -> f64 {
        self.origin.along(axis) + self.size.along(axis)
    }
}

/// An `(section, item)` pair identifying one entry in a sectioned list.
///
/// Ordering is lexicographic: by section, then by item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }

    /// First index path of `section`.
    pub(crate) const fn section_start(section: usize) -> Self {
        Self { section, item: 0 }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}

/// Total order on scroll-axis edges.
pub(crate) fn cmp_edge(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}
