//! Positionable 3D base for scene-graph nodes
//!
//! [`Prop3d`] owns origin, position, rotation and scale, and derives a 4x4
//! world matrix from them on demand. The matrix is cached and only rebuilt
//! when the prop's modification time is newer than the last rebuild.
//!
//! # Example
//!
//! ```ignore
//! let clock = Clock::new();
//! let mut prop = Prop3d::new(&clock);
//!
//! // First access computes the matrix
//! let m = prop.matrix();
//!
//! // Unchanged transform: cached matrix is returned
//! let m2 = prop.matrix();
//!
//! // Mutations bump the modification time, so the next access recomputes
//! prop.set_position(DVec3::new(1.0, 0.0, 0.0));
//! let m3 = prop.matrix();
//! ```

use glam::{DMat4, DQuat, DVec3, EulerRot};

use crate::core::{Clock, MTime, TimeStamp};

/// Transform and generic prop state shared by every positionable node.
#[derive(Debug, Clone)]
pub struct Prop3d {
    /// Rotation and scale pivot
    origin: DVec3,
    /// Position in world space
    position: DVec3,
    /// Rotation as a quaternion
    rotation: DQuat,
    /// Scale factor per axis
    scale: DVec3,
    /// Extra matrix applied after the prop's own transform
    user_matrix: Option<DMat4>,

    visibility: bool,
    pickable: bool,
    dragable: bool,
    /// Whether renderers should include this prop when computing scene bounds
    use_bounds: bool,

    mtime: MTime,

    /// Cached world matrix (valid as of `matrix_mtime`)
    matrix: DMat4,
    matrix_mtime: MTime,
}

impl Prop3d {
    /// Create a prop at the origin with identity rotation and unit scale.
    #[must_use]
    pub fn new(clock: &Clock) -> Self {
        Self {
            origin: DVec3::ZERO,
            position: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            scale: DVec3::ONE,
            user_matrix: None,
            visibility: true,
            pickable: true,
            dragable: true,
            use_bounds: true,
            mtime: MTime::modified_now(clock),
            matrix: DMat4::IDENTITY,
            matrix_mtime: MTime::new(clock),
        }
    }

    // -------------------------------------------------------------------------
    // Getters
    // -------------------------------------------------------------------------

    /// Get the origin.
    #[must_use]
    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Get the position.
    #[must_use]
    #[inline]
    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Get the rotation.
    #[must_use]
    #[inline]
    pub fn rotation(&self) -> DQuat {
        self.rotation
    }

    /// Get the scale.
    #[must_use]
    #[inline]
    pub fn scale(&self) -> DVec3 {
        self.scale
    }

    /// Get the user matrix, if any.
    #[must_use]
    pub fn user_matrix(&self) -> Option<DMat4> {
        self.user_matrix
    }

    /// Orientation as (x, y, z) angles in degrees, applied Y then X then Z.
    #[must_use]
    pub fn orientation(&self) -> DVec3 {
        let (y, x, z) = self.rotation.to_euler(EulerRot::YXZ);
        DVec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
    }

    /// Orientation as an angle in degrees about an axis.
    #[must_use]
    pub fn orientation_wxyz(&self) -> (f64, DVec3) {
        let (axis, angle) = self.rotation.to_axis_angle();
        (angle.to_degrees(), axis)
    }

    #[must_use]
    pub fn visibility(&self) -> bool {
        self.visibility
    }

    #[must_use]
    pub fn pickable(&self) -> bool {
        self.pickable
    }

    #[must_use]
    pub fn dragable(&self) -> bool {
        self.dragable
    }

    #[must_use]
    pub fn use_bounds(&self) -> bool {
        self.use_bounds
    }

    // -------------------------------------------------------------------------
    // Setters (bump mtime on change)
    // -------------------------------------------------------------------------

    /// Set the origin.
    pub fn set_origin(&mut self, origin: DVec3) {
        self.mtime.update(&mut self.origin, origin);
    }

    /// Set the position.
    pub fn set_position(&mut self, position: DVec3) {
        self.mtime.update(&mut self.position, position);
    }

    /// Set the rotation.
    pub fn set_rotation(&mut self, rotation: DQuat) {
        self.mtime.update(&mut self.rotation, rotation);
    }

    /// Set the orientation from angles in degrees, applied Y then X then Z.
    pub fn set_orientation(&mut self, degrees: DVec3) {
        let rotation = DQuat::from_euler(
            EulerRot::YXZ,
            degrees.y.to_radians(),
            degrees.x.to_radians(),
            degrees.z.to_radians(),
        );
        self.set_rotation(rotation);
    }

    /// Set the scale.
    pub fn set_scale(&mut self, scale: DVec3) {
        self.mtime.update(&mut self.scale, scale);
    }

    /// Set the same scale on every axis.
    pub fn set_scale_uniform(&mut self, scale: f64) {
        self.set_scale(DVec3::splat(scale));
    }

    /// Set or clear the user matrix.
    pub fn set_user_matrix(&mut self, matrix: Option<DMat4>) {
        self.mtime.update(&mut self.user_matrix, matrix);
    }

    pub fn set_visibility(&mut self, visibility: bool) {
        self.mtime.update(&mut self.visibility, visibility);
    }

    pub fn set_pickable(&mut self, pickable: bool) {
        self.mtime.update(&mut self.pickable, pickable);
    }

    pub fn set_dragable(&mut self, dragable: bool) {
        self.mtime.update(&mut self.dragable, dragable);
    }

    pub fn set_use_bounds(&mut self, use_bounds: bool) {
        self.mtime.update(&mut self.use_bounds, use_bounds);
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Translate by a delta.
    pub fn add_position(&mut self, delta: DVec3) {
        if delta != DVec3::ZERO {
            self.position += delta;
            self.mtime.modified();
        }
    }

    /// Rotate about the local X axis, in degrees.
    pub fn rotate_x(&mut self, degrees: f64) {
        self.rotate(DQuat::from_rotation_x(degrees.to_radians()));
    }

    /// Rotate about the local Y axis, in degrees.
    pub fn rotate_y(&mut self, degrees: f64) {
        self.rotate(DQuat::from_rotation_y(degrees.to_radians()));
    }

    /// Rotate about the local Z axis, in degrees.
    pub fn rotate_z(&mut self, degrees: f64) {
        self.rotate(DQuat::from_rotation_z(degrees.to_radians()));
    }

    /// Rotate about an arbitrary local axis, in degrees. A zero axis is ignored.
    pub fn rotate_wxyz(&mut self, degrees: f64, axis: DVec3) {
        if let Some(axis) = axis.try_normalize() {
            self.rotate(DQuat::from_axis_angle(axis, degrees.to_radians()));
        }
    }

    fn rotate(&mut self, delta: DQuat) {
        if degenerate(delta) {
            return;
        }
        self.rotation = (self.rotation * delta).normalize();
        self.mtime.modified();
    }

    // -------------------------------------------------------------------------
    // Matrix
    // -------------------------------------------------------------------------

    /// Rebuild the world matrix if the prop changed since the last rebuild.
    ///
    /// The matrix is `user * T(position + origin) * R * S * T(-origin)`.
    pub fn compute_matrix(&mut self) {
        if !self.mtime.is_newer_than(self.matrix_mtime.get()) {
            return;
        }
        let local = DMat4::from_translation(self.position + self.origin)
            * DMat4::from_quat(self.rotation)
            * DMat4::from_scale(self.scale)
            * DMat4::from_translation(-self.origin);
        self.matrix = match self.user_matrix {
            Some(user) => user * local,
            None => local,
        };
        self.matrix_mtime.modified();
    }

    /// Get the world matrix, computing it if stale.
    #[must_use]
    pub fn matrix(&mut self) -> DMat4 {
        self.compute_matrix();
        self.matrix
    }

    /// Check whether the prop applies no transformation at all.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.position == DVec3::ZERO
            && self.rotation == DQuat::IDENTITY
            && self.scale == DVec3::ONE
            && self.user_matrix.is_none_or(|m| m == DMat4::IDENTITY)
    }

    // -------------------------------------------------------------------------
    // Timestamps
    // -------------------------------------------------------------------------

    /// Last modification of the prop's own state.
    #[must_use]
    #[inline]
    pub fn mtime(&self) -> TimeStamp {
        self.mtime.get()
    }

    /// When the cached matrix was last rebuilt.
    #[must_use]
    pub fn matrix_mtime(&self) -> TimeStamp {
        self.matrix_mtime.get()
    }

    /// Mark the prop as modified without changing any field.
    pub fn modified(&mut self) {
        self.mtime.modified();
    }

    /// Store `value` into `slot` and bump this prop's mtime if it changed.
    ///
    /// Lets nodes built on top of the prop share its modification time.
    pub(crate) fn update<T: PartialEq>(&mut self, slot: &mut T, value: T) -> bool {
        self.mtime.update(slot, value)
    }

    /// The clock this prop draws timestamps from.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        self.mtime.clock()
    }
}

fn degenerate(q: DQuat) -> bool {
    q.abs_diff_eq(DQuat::IDENTITY, 0.0)
}
