//! Geometry primitives for the R-Tree.
//!
//! This module provides the two value types every tree operation is built on:
//! - [`Point`]: an ordered tuple of `D` coordinates
//! - [`Rect`]: an axis-aligned minimum bounding rectangle given by its `low`
//!   and `high` corners
//!
//! All binary operations are dimension checked and report
//! [`SpatialError::DimensionMismatch`] instead of coercing their operands.
//! The tree itself validates caller geometry once at its public boundary and
//! then uses the crate-private `*_unchecked` variants on the hot paths.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt::{self, Display};
use std::ops::Index;

use crate::rtree::rtree_types::{SpatialError, SpatialResult};

/// Inline storage for up to four coordinates before spilling to the heap.
pub(crate) type Coords = SmallVec<[f64; 4]>;

pub(crate) fn ensure_same_dimension(expected: usize, actual: usize) -> SpatialResult<()> {
    if expected != actual {
        log::error!(
            "Dimension mismatch: expected {} coordinates, got {}",
            expected,
            actual
        );
        return Err(SpatialError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

/// A point in `D`-dimensional space.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    coords: Coords,
}

impl Point {
    /// Creates a new point from its coordinates.
    pub fn new(coords: &[f64]) -> Self {
        Self {
            coords: SmallVec::from_slice(coords),
        }
    }

    /// Number of coordinates of this point.
    pub fn dimension(&self) -> usize {
        self.coords.len()
    }

    /// The coordinates as a slice.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Euclidean distance between two points.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::DimensionMismatch`] if the points differ in
    /// dimension.
    pub fn distance(&self, other: &Point) -> SpatialResult<f64> {
        ensure_same_dimension(self.dimension(), other.dimension())?;
        let sum: f64 = self
            .coords
            .iter()
            .zip(other.coords.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
        Ok(sum.sqrt())
    }

    /// Squared distance from this point to the closest point of `rect`.
    ///
    /// Zero if and only if the point lies inside the rectangle. This is the
    /// lower bound that orders nearest neighbor traversal.
    pub fn min_dist(&self, rect: &Rect) -> SpatialResult<f64> {
        ensure_same_dimension(self.dimension(), rect.dimension())?;
        Ok(self.min_dist_unchecked(rect))
    }

    /// Squared upper bound on the distance from this point to the nearest
    /// object enclosed by the minimum bounding rectangle `rect`.
    ///
    /// Every face of an MBR touches at least one enclosed object, so the
    /// farthest point of the nearest face in any dimension `k` bounds the
    /// nearest object. The result is the minimum of that bound over all `k`.
    pub fn min_max_dist(&self, rect: &Rect) -> SpatialResult<f64> {
        ensure_same_dimension(self.dimension(), rect.dimension())?;
        Ok(self.min_max_dist_unchecked(rect))
    }

    /// A rectangle centred on this point extending `tolerance` in every
    /// direction along each axis.
    pub fn to_rect(&self, tolerance: f64) -> Rect {
        let tolerance = tolerance.abs();
        Rect {
            low: Point {
                coords: self.coords.iter().map(|c| c - tolerance).collect(),
            },
            high: Point {
                coords: self.coords.iter().map(|c| c + tolerance).collect(),
            },
        }
    }

    pub(crate) fn min_dist_unchecked(&self, rect: &Rect) -> f64 {
        self.coords
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let d = p - p.clamp(rect.low[i], rect.high[i]);
                d * d
            })
            .sum()
    }

    pub(crate) fn min_max_dist_unchecked(&self, rect: &Rect) -> f64 {
        let dim = self.dimension();
        let mut near = Coords::with_capacity(dim);
        let mut far = Coords::with_capacity(dim);
        for (i, &p) in self.coords.iter().enumerate() {
            let (low, high) = (rect.low[i], rect.high[i]);
            let mid = (low + high) / 2.0;
            let rm = if p <= mid { low } else { high };
            let r_max = if p >= mid { low } else { high };
            near.push((p - rm) * (p - rm));
            far.push((p - r_max) * (p - r_max));
        }

        let far_total: f64 = far.iter().sum();
        (0..dim)
            .map(|k| far_total - far[k] + near[k])
            .fold(f64::INFINITY, f64::min)
    }
}

impl Index<usize> for Point {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.coords[index]
    }
}

impl From<Vec<f64>> for Point {
    fn from(coords: Vec<f64>) -> Self {
        Self {
            coords: SmallVec::from_vec(coords),
        }
    }
}

impl<const N: usize> From<[f64; N]> for Point {
    fn from(coords: [f64; N]) -> Self {
        Self::new(&coords)
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POINT(")?;
        for (i, c) in self.coords.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ")")
    }
}

/// An axis-aligned rectangle given by its `low` and `high` corners.
///
/// For every dimension `i`, `low[i] <= high[i]`. Zero-width dimensions are
/// allowed and describe a degenerate rectangle (a point is the fully
/// degenerate case). Rectangles are immutable; operations that grow a
/// rectangle return a new one.
///
/// # Examples
///
/// ```rust
/// use rtree_spatial::{Point, Rect};
///
/// let rect = Rect::new(&Point::from([1.0, -2.5]), &[2.5, 8.0]).unwrap();
/// assert_eq!(rect.high(), &Point::from([3.5, 5.5]));
/// assert_eq!(rect.size(), 20.0);
///
/// assert!(Rect::new(&Point::from([1.0, -2.5]), &[2.5, -8.0]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    low: Point,
    high: Point,
}

impl Rect {
    /// Creates a rectangle from an origin (its `low` corner) and the extent
    /// along each axis.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::DimensionMismatch`] if `lengths` does not have one
    ///   entry per coordinate of `origin`
    /// - [`SpatialError::NonPositiveLength`] if any extent is negative (or
    ///   NaN); zero is permitted
    pub fn new(origin: &Point, lengths: &[f64]) -> SpatialResult<Rect> {
        ensure_same_dimension(origin.dimension(), lengths.len())?;

        let mut high = Coords::with_capacity(lengths.len());
        for (i, &length) in lengths.iter().enumerate() {
            if !(length >= 0.0) {
                log::error!("Rectangle length {} in dimension {} is negative", length, i);
                return Err(SpatialError::NonPositiveLength {
                    dimension: i,
                    length,
                });
            }
            high.push(origin[i] + length);
        }

        Ok(Rect {
            low: origin.clone(),
            high: Point { coords: high },
        })
    }

    /// Creates a rectangle from its two corners.
    ///
    /// # Errors
    ///
    /// Fails with [`SpatialError::DimensionMismatch`] if the corners differ in
    /// dimension, or [`SpatialError::NonPositiveLength`] if `low` exceeds
    /// `high` along some axis.
    pub fn from_corners(low: Point, high: Point) -> SpatialResult<Rect> {
        ensure_same_dimension(low.dimension(), high.dimension())?;
        for i in 0..low.dimension() {
            let length = high[i] - low[i];
            if !(length >= 0.0) {
                log::error!("Rectangle corner order violated in dimension {}", i);
                return Err(SpatialError::NonPositiveLength {
                    dimension: i,
                    length,
                });
            }
        }
        Ok(Rect { low, high })
    }

    /// A degenerate rectangle covering exactly one point.
    pub fn from_point(point: &Point) -> Rect {
        Rect {
            low: point.clone(),
            high: point.clone(),
        }
    }

    pub fn low(&self) -> &Point {
        &self.low
    }

    pub fn high(&self) -> &Point {
        &self.high
    }

    pub fn dimension(&self) -> usize {
        self.low.dimension()
    }

    /// Extent of the rectangle along axis `i`.
    pub fn length(&self, i: usize) -> f64 {
        self.high[i] - self.low[i]
    }

    /// The centre point of the rectangle.
    pub fn center(&self) -> Point {
        Point {
            coords: (0..self.dimension())
                .map(|i| (self.low[i] + self.high[i]) / 2.0)
                .collect(),
        }
    }

    /// Volume of the rectangle: the product of its extents.
    pub fn size(&self) -> f64 {
        (0..self.dimension()).map(|i| self.length(i)).product()
    }

    /// Generalized perimeter: `2^(D-1)` times the sum of the extents.
    pub fn margin(&self) -> f64 {
        let dim = self.dimension();
        if dim == 0 {
            return 0.0;
        }
        let sum: f64 = (0..dim).map(|i| self.length(i)).sum();
        2f64.powi(dim as i32 - 1) * sum
    }

    /// Whether `point` lies inside the rectangle, boundary included.
    pub fn contains_point(&self, point: &Point) -> SpatialResult<bool> {
        ensure_same_dimension(self.dimension(), point.dimension())?;
        Ok(self.contains_point_unchecked(point))
    }

    /// Whether `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> SpatialResult<bool> {
        ensure_same_dimension(self.dimension(), other.dimension())?;
        Ok(self.contains_rect_unchecked(other))
    }

    /// Whether the two rectangles overlap.
    ///
    /// Rectangles that only touch along a boundary with zero overlap width
    /// do not intersect. A dimension in which one operand is itself
    /// degenerate counts as overlapping when the degenerate coordinate lies
    /// within the other operand, so every rectangle intersects itself.
    ///
    /// ```rust
    /// use rtree_spatial::{Point, Rect};
    ///
    /// let a = Rect::from_corners(Point::from([0.0, 0.0]), Point::from([1.0, 1.0])).unwrap();
    /// let b = Rect::from_corners(Point::from([1.0, 1.0]), Point::from([2.0, 2.0])).unwrap();
    /// assert!(!a.intersects(&b).unwrap());
    /// ```
    pub fn intersects(&self, other: &Rect) -> SpatialResult<bool> {
        ensure_same_dimension(self.dimension(), other.dimension())?;
        Ok(self.intersects_unchecked(other))
    }

    /// The smallest rectangle containing both operands.
    pub fn bounding_box(&self, other: &Rect) -> SpatialResult<Rect> {
        ensure_same_dimension(self.dimension(), other.dimension())?;
        Ok(self.union_unchecked(other))
    }

    pub(crate) fn contains_point_unchecked(&self, point: &Point) -> bool {
        (0..self.dimension()).all(|i| self.low[i] <= point[i] && point[i] <= self.high[i])
    }

    pub(crate) fn contains_rect_unchecked(&self, other: &Rect) -> bool {
        (0..self.dimension()).all(|i| self.low[i] <= other.low[i] && other.high[i] <= self.high[i])
    }

    pub(crate) fn intersects_unchecked(&self, other: &Rect) -> bool {
        (0..self.dimension()).all(|i| {
            let lo = self.low[i].max(other.low[i]);
            let hi = self.high[i].min(other.high[i]);
            lo < hi || (lo == hi && (self.length(i) == 0.0 || other.length(i) == 0.0))
        })
    }

    /// Closed-interval overlap: touching rectangles count. Used to prune
    /// subtrees so that objects lying on a node boundary are still reached.
    pub(crate) fn touches_unchecked(&self, other: &Rect) -> bool {
        (0..self.dimension())
            .all(|i| self.low[i] <= other.high[i] && other.low[i] <= self.high[i])
    }

    pub(crate) fn union_unchecked(&self, other: &Rect) -> Rect {
        let dim = self.dimension();
        Rect {
            low: Point {
                coords: (0..dim).map(|i| self.low[i].min(other.low[i])).collect(),
            },
            high: Point {
                coords: (0..dim).map(|i| self.high[i].max(other.high[i])).collect(),
            },
        }
    }

    /// Growth in size needed for this rectangle to also cover `other`.
    pub(crate) fn enlargement_unchecked(&self, other: &Rect) -> f64 {
        self.union_unchecked(other).size() - self.size()
    }
}

impl Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RECT({}, {})", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn rect(origin: [f64; 2], lengths: [f64; 2]) -> Rect {
        Rect::new(&Point::from(origin), &lengths).unwrap()
    }

    #[test]
    fn test_distance() {
        let p = Point::from([1.0, 2.0]);
        let q = Point::from([4.0, 5.0]);
        assert_eq!(p.distance(&q).unwrap(), 18f64.sqrt());
        assert_eq!(q.distance(&p).unwrap(), p.distance(&q).unwrap());
        assert_eq!(p.distance(&p).unwrap(), 0.0);
    }

    #[test]
    fn test_distance_dimension_mismatch() {
        let p = Point::from([1.0, 2.0]);
        let q = Point::from([1.0, 2.0, 3.0]);
        assert_eq!(
            p.distance(&q),
            Err(SpatialError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_new_rect() {
        let r = rect([1.0, -2.5], [2.5, 8.0]);
        assert!(r.low().distance(&Point::from([1.0, -2.5])).unwrap() < EPS);
        assert!(r.high().distance(&Point::from([3.5, 5.5])).unwrap() < EPS);
    }

    #[test]
    fn test_new_rect_negative_length() {
        let result = Rect::new(&Point::from([1.0, -2.5]), &[2.5, -8.0]);
        assert!(matches!(
            result,
            Err(SpatialError::NonPositiveLength { dimension: 1, .. })
        ));
    }

    #[test]
    fn test_new_rect_zero_length_is_degenerate() {
        let r = rect([1.0, 1.0], [0.0, 3.0]);
        assert_eq!(r.size(), 0.0);
        assert_eq!(r.length(1), 3.0);
    }

    #[test]
    fn test_new_rect_lengths_dimension_mismatch() {
        let result = Rect::new(&Point::from([1.0, 2.0]), &[1.0]);
        assert!(matches!(result, Err(SpatialError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_from_corners_rejects_inverted() {
        let result = Rect::from_corners(Point::from([2.0, 0.0]), Point::from([1.0, 1.0]));
        assert!(matches!(
            result,
            Err(SpatialError::NonPositiveLength { dimension: 0, .. })
        ));
    }

    #[test]
    fn test_size_and_margin() {
        let r = rect([1.0, -2.5], [2.5, 8.0]);
        assert_eq!(r.size(), 2.5 * 8.0);
        assert_eq!(r.margin(), 2.0 * (2.5 + 8.0));

        let cube = Rect::new(&Point::from([0.0, 0.0, 0.0]), &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(cube.size(), 6.0);
        assert_eq!(cube.margin(), 4.0 * 6.0);
    }

    #[test]
    fn test_contains_point() {
        let r = rect([3.7, -2.4], [6.2, 1.1]);
        assert!(r.contains_point(&Point::from([4.5, -1.7])).unwrap());
        assert!(!r.contains_point(&Point::from([4.5, -2.7])).unwrap());
        assert!(!r.contains_point(&Point::from([3.6, -2.0])).unwrap());
        assert!(r.contains_point(&Point::from([3.7, -2.4])).unwrap());
    }

    #[test]
    fn test_contains_rect() {
        let r1 = rect([3.7, -2.4], [6.2, 1.1]);
        assert!(r1.contains_rect(&rect([4.1, -1.9], [3.2, 0.6])).unwrap());
        assert!(!r1.contains_rect(&rect([4.1, -1.9], [3.2, 1.4])).unwrap());
        assert!(!r1.contains_rect(&rect([1.2, -19.6], [2.2, 5.9])).unwrap());
        assert!(r1.contains_rect(&r1).unwrap());
    }

    #[test]
    fn test_no_intersection() {
        let r1 = rect([1.0, 2.0], [1.0, 1.0]);
        let r2 = rect([-1.0, -2.0], [2.5, 3.0]);
        assert!(!r1.intersects(&r2).unwrap());
    }

    #[test]
    fn test_no_intersection_just_touches() {
        let r1 = rect([1.0, 2.0], [1.0, 1.0]);
        let r2 = rect([-1.0, -2.0], [2.5, 4.0]);
        assert!(!r1.intersects(&r2).unwrap());
        assert!(!r2.intersects(&r1).unwrap());

        let a = rect([0.0, 0.0], [1.0, 1.0]);
        let b = rect([1.0, 1.0], [1.0, 1.0]);
        assert!(!a.intersects(&b).unwrap());
    }

    #[test]
    fn test_containment_and_overlap_intersection() {
        let r1 = rect([1.0, 2.0], [1.0, 1.0]);
        let r2 = rect([1.0, 2.2], [0.5, 0.5]);
        assert!(r1.intersects(&r2).unwrap());

        let r3 = rect([1.0, 2.0], [1.0, 2.5]);
        let r4 = rect([1.0, 4.0], [3.0, 2.0]);
        assert!(r3.intersects(&r4).unwrap());
    }

    #[test]
    fn test_degenerate_rect_intersects_itself() {
        let p = Rect::from_point(&Point::from([2.0, 3.0]));
        assert!(p.intersects(&p).unwrap());
        assert!(p.contains_rect(&p).unwrap());

        let segment = rect([0.0, 1.0], [4.0, 0.0]);
        assert!(segment.intersects(&rect([1.0, 0.0], [1.0, 1.0])).unwrap());
    }

    #[test]
    fn test_to_rect() {
        let r = Point::from([3.7, -2.4]).to_rect(0.05);
        assert!(r.low().distance(&Point::from([3.65, -2.45])).unwrap() < EPS);
        assert!(r.high().distance(&Point::from([3.75, -2.35])).unwrap() < EPS);
    }

    #[test]
    fn test_bounding_box() {
        let r1 = rect([3.7, -2.4], [1.0, 15.0]);
        let r2 = rect([-6.5, 4.7], [4.0, 5.0]);
        let bb = r1.bounding_box(&r2).unwrap();
        assert!(bb.low().distance(&Point::from([-6.5, -2.4])).unwrap() < EPS);
        assert!(bb.high().distance(&Point::from([4.7, 12.6])).unwrap() < EPS);
        assert_eq!(bb, r2.bounding_box(&r1).unwrap());
        assert!(bb.contains_rect(&r1).unwrap());
        assert!(bb.contains_rect(&r2).unwrap());
    }

    #[test]
    fn test_bounding_box_of_contained() {
        let r1 = rect([3.7, -2.4], [1.0, 15.0]);
        let r2 = rect([4.0, 0.0], [0.56, 6.222222]);
        assert_eq!(r1.bounding_box(&r2).unwrap(), r1);
    }

    #[test]
    fn test_min_dist() {
        let p = Point::from([1.0, 2.0]);
        assert!(p.min_dist(&p.to_rect(1.0)).unwrap() < EPS);

        let r = Rect::from_corners(Point::from([-1.0, -4.0]), Point::from([2.0, -2.0])).unwrap();
        assert!((p.min_dist(&r).unwrap() - 16.0).abs() < EPS);
    }

    #[test]
    fn test_min_max_dist() {
        let p = Point::from([-3.0, -2.0]);
        let r = Rect::from_corners(Point::from([0.0, 0.0]), Point::from([1.0, 2.0])).unwrap();

        let d1 = p.distance(&Point::from([0.0, 2.0])).unwrap();
        let d2 = p.distance(&Point::from([1.0, 0.0])).unwrap();
        let d3 = p.distance(&Point::from([1.0, 2.0])).unwrap();
        let expected = (d1 * d1).min(d2 * d2).min(d3 * d3);

        assert!((p.min_max_dist(&r).unwrap() - expected).abs() < EPS);
    }

    #[test]
    fn test_min_max_dist_bounds_min_dist() {
        let p = Point::from([5.0, -1.0, 2.0]);
        let r = Rect::new(&Point::from([0.0, 0.0, 0.0]), &[1.0, 2.0, 3.0]).unwrap();
        assert!(p.min_dist(&r).unwrap() <= p.min_max_dist(&r).unwrap());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_json() {
        let r = rect([1.0, -2.5], [2.5, 8.0]);
        let json = serde_json::to_string(&r).unwrap();
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_display() {
        assert_eq!(Point::from([10.0, 20.0]).to_string(), "POINT(10 20)");
        assert_eq!(
            Rect::from_point(&Point::from([1.0, 2.0])).to_string(),
            "RECT(POINT(1 2), POINT(1 2))"
        );
    }
}
