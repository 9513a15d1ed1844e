use std::hash::Hash;

/// A 2D axis-aligned rectangle represented by minimum and maximum coordinates.
///
/// `BoundingBox` is both the key type of the R-tree and the bounding
/// rectangle stored in internal nodes. Coordinates are `f32` so that a
/// rectangle occupies exactly 16 bytes in the persisted format; derived
/// quantities (area, enlargement, distance) are computed in `f64`.
///
/// Degenerate rectangles (points, segments) are valid keys.
///
/// # Examples
///
/// ```rust
/// use rtree2d::BoundingBox;
///
/// let a = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
/// let b = BoundingBox::new(1.0, 1.0, 2.0, 2.0);
///
/// // Touching edges count as overlapping
/// assert!(a.intersects(&b));
/// assert_eq!(a.enlargement(&b), 3.0);
/// ```
#[derive(Clone, Copy, PartialEq, Default, Debug, serde::Deserialize, serde::Serialize)]
pub struct BoundingBox {
    /// Minimum X coordinate
    pub min_x: f32,
    /// Minimum Y coordinate
    pub min_y: f32,
    /// Maximum X coordinate
    pub max_x: f32,
    /// Maximum Y coordinate
    pub max_y: f32,
}

impl Eq for BoundingBox {}

impl Hash for BoundingBox {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.min_x.to_bits().hash(state);
        self.min_y.to_bits().hash(state);
        self.max_x.to_bits().hash(state);
        self.max_y.to_bits().hash(state);
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}] - [{}, {}]",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

impl BoundingBox {
    /// Creates a new bounding box with the specified coordinates.
    ///
    /// # Arguments
    ///
    /// * `min_x` - Minimum X coordinate
    /// * `min_y` - Minimum Y coordinate
    /// * `max_x` - Maximum X coordinate
    /// * `max_y` - Maximum Y coordinate
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> BoundingBox {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates a degenerate bounding box covering a single point.
    pub fn from_point(x: f32, y: f32) -> BoundingBox {
        BoundingBox::new(x, y, x, y)
    }

    /// The inverted rectangle (min = +inf, max = -inf).
    ///
    /// It is the identity of [`BoundingBox::union`] and the result of bounding
    /// an empty set of rectangles.
    pub fn empty() -> BoundingBox {
        BoundingBox {
            min_x: f32::INFINITY,
            min_y: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            max_y: f32::NEG_INFINITY,
        }
    }

    /// Returns true for the inverted "no rectangles" box.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Smallest rectangle enclosing every input rectangle.
    ///
    /// Returns [`BoundingBox::empty`] when the iterator yields nothing.
    pub fn bounding<'a, I>(rects: I) -> BoundingBox
    where
        I: IntoIterator<Item = &'a BoundingBox>,
    {
        let mut bbox = BoundingBox::empty();
        for rect in rects {
            bbox.expand(rect);
        }
        bbox
    }

    /// Returns the width of the bounding box.
    pub fn width(&self) -> f64 {
        self.max_x as f64 - self.min_x as f64
    }

    /// Returns the height of the bounding box.
    pub fn height(&self) -> f64 {
        self.max_y as f64 - self.min_y as f64
    }

    /// Returns the area of the bounding box. An empty box has zero area.
    pub fn area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.width() * self.height()
    }

    /// Returns the center point of the bounding box.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x as f64 + self.max_x as f64) / 2.0,
            (self.min_y as f64 + self.max_y as f64) / 2.0,
        )
    }

    /// Area that must be added to `self` so that it also covers `other`.
    ///
    /// Only used as a relative ranking while choosing an insertion path.
    pub fn enlargement(&self, other: &BoundingBox) -> f64 {
        self.union(other).area() - self.area()
    }

    /// Checks if this bounding box contains a point.
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Checks if this bounding box fully contains another bounding box.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Checks if this bounding box intersects another bounding box.
    ///
    /// Touching edges and corners count as an intersection.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Returns the union of this bounding box with another.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Grows this bounding box in place to cover `other`.
    pub fn expand(&mut self, other: &BoundingBox) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    /// Euclidean distance from a point to the nearest point on or in this box.
    ///
    /// Zero when the point lies inside. The gap on each axis is measured
    /// independently and the two gaps are combined as a Euclidean norm. The
    /// empty box is infinitely far from every point.
    pub fn min_distance(&self, x: f64, y: f64) -> f64 {
        let dx = (self.min_x as f64 - x).max(x - self.max_x as f64).max(0.0);
        let dy = (self.min_y as f64 - y).max(y - self.max_y as f64).max(0.0);
        (dx * dx + dy * dy).sqrt()
    }

    /// Checks if this bounding box is valid (min <= max on both axes).
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    /// Checks if this bounding box is a point (zero area).
    pub fn is_point(&self) -> bool {
        self.min_x == self.max_x && self.min_y == self.max_y
    }
}
