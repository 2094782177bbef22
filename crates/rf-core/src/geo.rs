//! Planar coordinate type and distance helpers.
//!
//! SUMO networks are stored in a projected Cartesian frame (metres after
//! `netOffset` is applied), so plain Euclidean geometry is exact here; no
//! great-circle maths is needed.

/// A point in network coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn as_array(self) -> [f64; 2] {
        [self.x, self.y]
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance(self, other: Point2) -> f64 {
        self.distance_2(other).sqrt()
    }

    /// Squared Euclidean distance.
    #[inline]
    pub fn distance_2(self, other: Point2) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Squared distance from `self` to the closed segment `a`–`b`.
    ///
    /// A degenerate segment (`a == b`) is treated as a single point.
    pub fn distance_2_to_segment(self, a: Point2, b: Point2) -> f64 {
        let abx = b.x - a.x;
        let aby = b.y - a.y;
        let len_2 = abx * abx + aby * aby;
        if len_2 == 0.0 {
            return self.distance_2(a);
        }
        let t = (((self.x - a.x) * abx + (self.y - a.y) * aby) / len_2).clamp(0.0, 1.0);
        self.distance_2(Point2::new(a.x + t * abx, a.y + t * aby))
    }

    /// Distance from `self` to the closed segment `a`–`b`.
    #[inline]
    pub fn distance_to_segment(self, a: Point2, b: Point2) -> f64 {
        self.distance_2_to_segment(a, b).sqrt()
    }
}

impl std::fmt::Display for Point2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1},{:.1})", self.x, self.y)
    }
}
