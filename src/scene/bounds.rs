//! Axis-aligned bounding boxes in `[xmin, xmax, ymin, ymax, zmin, zmax]` layout

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

/// A six-number axis-aligned box.
///
/// A box with `min > max` on any axis is empty. [`Bounds::EMPTY`] is the
/// canonical empty value, `[1, -1, 1, -1, 1, -1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds(pub [f64; 6]);

impl Bounds {
    /// The empty sentinel.
    pub const EMPTY: Self = Self([1.0, -1.0, 1.0, -1.0, 1.0, -1.0]);

    /// Create a box from explicit ranges.
    #[must_use]
    pub const fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64, zmin: f64, zmax: f64) -> Self {
        Self([xmin, xmax, ymin, ymax, zmin, zmax])
    }

    /// Create a box from its min and max corners.
    #[must_use]
    pub fn from_min_max(min: DVec3, max: DVec3) -> Self {
        Self([min.x, max.x, min.y, max.y, min.z, max.z])
    }

    /// Smallest box enclosing all `points`, or [`Bounds::EMPTY`] if there are none.
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        let mut min = DVec3::splat(f64::MAX);
        let mut max = DVec3::splat(-f64::MAX);
        let mut any = false;
        for p in points {
            min = min.min(p);
            max = max.max(p);
            any = true;
        }
        if any {
            Self::from_min_max(min, max)
        } else {
            Self::EMPTY
        }
    }

    /// The empty-geometry check the renderer relies on: `xmin > xmax`.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0[0] > self.0[1]
    }

    /// Check that `min <= max` holds on every axis.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.0[0] <= self.0[1] && self.0[2] <= self.0[3] && self.0[4] <= self.0[5]
    }

    /// Minimum corner.
    #[must_use]
    pub fn min(&self) -> DVec3 {
        DVec3::new(self.0[0], self.0[2], self.0[4])
    }

    /// Maximum corner.
    #[must_use]
    pub fn max(&self) -> DVec3 {
        DVec3::new(self.0[1], self.0[3], self.0[5])
    }

    /// The eight corners of the box.
    #[must_use]
    pub fn corners(&self) -> [DVec3; 8] {
        let [x0, x1, y0, y1, z0, z1] = self.0;
        [
            DVec3::new(x1, y1, z1),
            DVec3::new(x1, y0, z1),
            DVec3::new(x0, y0, z1),
            DVec3::new(x0, y1, z1),
            DVec3::new(x1, y1, z0),
            DVec3::new(x1, y0, z0),
            DVec3::new(x0, y0, z0),
            DVec3::new(x0, y1, z0),
        ]
    }

    /// Transform the box by `matrix` and return the axis-aligned box of the
    /// transformed corners.
    #[must_use]
    pub fn transformed(&self, matrix: &DMat4) -> Self {
        Self::from_points(self.corners().map(|c| matrix.transform_point3(c)))
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.min() + self.max()) * 0.5
    }

    /// Length of the box diagonal, zero when empty.
    #[must_use]
    pub fn diagonal_length(&self) -> f64 {
        if self.is_valid() {
            (self.max() - self.min()).length()
        } else {
            0.0
        }
    }

    /// `[xmin, xmax]`.
    #[must_use]
    pub fn x_range(&self) -> [f64; 2] {
        [self.0[0], self.0[1]]
    }

    /// `[ymin, ymax]`.
    #[must_use]
    pub fn y_range(&self) -> [f64; 2] {
        [self.0[2], self.0[3]]
    }

    /// `[zmin, zmax]`.
    #[must_use]
    pub fn z_range(&self) -> [f64; 2] {
        [self.0[4], self.0[5]]
    }

    /// Smallest box containing both. Empty operands are ignored.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        match (self.is_valid(), other.is_valid()) {
            (false, _) => *other,
            (_, false) => *self,
            _ => Self::from_min_max(self.min().min(other.min()), self.max().max(other.max())),
        }
    }

    /// Check whether `other` fits inside this box.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.is_valid()
            && other.is_valid()
            && self.min().cmple(other.min()).all()
            && self.max().cmpge(other.max()).all()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<[f64; 6]> for Bounds {
    fn from(values: [f64; 6]) -> Self {
        Self(values)
    }
}

// ============================================================================
// Bounds Report
// ============================================================================

/// Answer to a bounds query.
///
/// Mappers that cannot describe their extent as a box (for example an empty
/// composite dataset) report whatever sequence they have; it is passed through
/// untouched as [`BoundsReport::Unknown`].
#[derive(Debug, Clone, PartialEq)]
pub enum BoundsReport {
    /// A six-number box, possibly the empty sentinel.
    Known(Bounds),
    /// Anything that is not six numbers.
    Unknown(Vec<f64>),
}

impl BoundsReport {
    /// The box, if the bounds are known.
    #[must_use]
    pub fn known(&self) -> Option<Bounds> {
        match self {
            Self::Known(b) => Some(*b),
            Self::Unknown(_) => None,
        }
    }

    /// The raw numbers, whatever their count.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Self::Known(b) => &b.0,
            Self::Unknown(values) => values,
        }
    }
}

impl From<Bounds> for BoundsReport {
    fn from(bounds: Bounds) -> Self {
        Self::Known(bounds)
    }
}

impl From<&[f64]> for BoundsReport {
    fn from(values: &[f64]) -> Self {
        match <[f64; 6]>::try_from(values) {
            Ok(six) => Self::Known(Bounds(six)),
            Err(_) => Self::Unknown(values.to_vec()),
        }
    }
}
