#[macro_use]
extern crate log;

mod error;
pub mod geometry;
mod path;
mod tracer;

pub use error::*;
pub use path::*;
pub use tracer::*;

pub use nalgebra;

use nalgebra::Vector2;

pub type Float = f64;

/// A position in the plane.
pub type Point = Vector2<Float>;

/// The default reflection budget of a [`Tracer`].
pub const DEFAULT_MAX_REFLECTIONS: usize = 100;

/// An oriented line segment, going from `start` to `end`.
///
/// Used both for mirrors and for the legs of a traced [`Path`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    #[inline]
    pub fn new(start: impl Into<Point>, end: impl Into<Point>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// The segment going from `[x1, y1]` to `[x2, y2]`.
    #[inline]
    pub fn from_coords([x1, y1, x2, y2]: [Float; 4]) -> Self {
        Self::new([x1, y1], [x2, y2])
    }

    #[inline]
    pub fn coords(&self) -> [Float; 4] {
        [self.start.x, self.start.y, self.end.x, self.end.y]
    }

    /// `end - start`
    #[inline]
    pub fn direction(&self) -> Point {
        self.end - self.start
    }

    #[inline]
    pub fn length(&self) -> Float {
        self.direction().norm()
    }

    /// The point at parameter `s`, `start` for `s == 0.0` and `end` for `s == 1.0`.
    #[inline]
    pub fn at(&self, s: Float) -> Point {
        self.start + self.direction() * s
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.coords().iter().all(|c| c.is_finite())
    }
}

/// The four walls of the axis-aligned rectangle spanned by `min` and `max`,
/// in the order: the `min.y` edge, the `max.x` edge, the `max.y` edge, the `min.x` edge.
pub fn bounding_box(min: impl Into<Point>, max: impl Into<Point>) -> [Segment; 4] {
    let min = min.into();
    let max = max.into();

    [
        Segment::new([min.x, min.y], [max.x, min.y]),
        Segment::new([max.x, min.y], [max.x, max.y]),
        Segment::new([min.x, max.y], [max.x, max.y]),
        Segment::new([min.x, min.y], [min.x, max.y]),
    ]
}
