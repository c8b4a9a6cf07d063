/*!
Core collision types and math aliases shared by the collision submodules.

This module contains no search algorithms. It defines the data exchanged between:
- spherical:  angular coordinate <-> world-space mapping
- arc:        the `ArcOfSphere` patch
- detector:   the tracked patch set and its casts
- world:      the rapier-backed trigger/physics world

Conventions
- `phi` is the polar angle measured from the basis z axis.
- `theta` is the azimuth measured from the basis x axis toward the y axis.
- Angles are radians. Distances are world units.
*/

use nalgebra as na;

use super::settings::BASIS_EPS;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;

/// A pair of angular coordinates in some [`Basis`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SphericalCoord {
    /// Polar angle from the z axis, conventionally in `[0, PI]`.
    pub phi: f32,
    /// Azimuthal angle from the x axis, conventionally in `[0, TAU)`.
    pub theta: f32,
}

impl SphericalCoord {
    #[inline]
    pub const fn new(phi: f32, theta: f32) -> Self {
        Self { phi, theta }
    }
}

/// Local frame of a spherical coordinate system.
///
/// The three axes are expected to be unit length and mutually perpendicular. `Basis::new`
/// trusts its inputs; call [`Basis::validate`] at ingestion time if they come from data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basis {
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub z_axis: Vec3,
}

impl Default for Basis {
    fn default() -> Self {
        Self::world()
    }
}

impl Basis {
    #[inline]
    pub fn new(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3) -> Self {
        Self {
            x_axis,
            y_axis,
            z_axis,
        }
    }

    /// The world axes (+X, +Y, +Z).
    #[inline]
    pub fn world() -> Self {
        Self::new(Vec3::x(), Vec3::y(), Vec3::z())
    }

    /// Basis whose axes are the world axes rotated by `rotation`.
    ///
    /// This is how a patch placed with a world-space pose gets its local frame:
    /// - x_axis = rotation * +X
    /// - y_axis = rotation * +Y
    /// - z_axis = rotation * +Z
    #[inline]
    pub fn from_rotation(rotation: Quat) -> Self {
        Self::new(
            rotation * Vec3::x(),
            rotation * Vec3::y(),
            rotation * Vec3::z(),
        )
    }

    /// Check that the axes are unit length, mutually orthogonal and right-handed.
    pub fn validate(&self) -> Result<(), &'static str> {
        let axes = [self.x_axis, self.y_axis, self.z_axis];
        if axes.iter().any(|a| !a.iter().all(|c| c.is_finite())) {
            return Err("Basis axis has a non-finite component");
        }
        if axes.iter().any(|a| (a.norm_squared() - 1.0).abs() > BASIS_EPS) {
            return Err("Basis axis is not unit length");
        }
        if self.x_axis.dot(&self.y_axis).abs() > BASIS_EPS
            || self.y_axis.dot(&self.z_axis).abs() > BASIS_EPS
            || self.z_axis.dot(&self.x_axis).abs() > BASIS_EPS
        {
            return Err("Basis axes are not orthogonal");
        }
        if self.x_axis.cross(&self.y_axis).dot(&self.z_axis) < 0.0 {
            return Err("Basis is left-handed");
        }
        Ok(())
    }

    /// Surface point on the unit sphere for `coord` in this basis.
    #[inline]
    pub fn position(&self, coord: SphericalCoord) -> Vec3 {
        super::spherical::position(self.x_axis, self.y_axis, self.z_axis, coord.phi, coord.theta)
    }

    /// Arc normal for `coord` in this basis (see [`super::spherical::normal`]).
    #[inline]
    pub fn normal(&self, coord: SphericalCoord) -> Vec3 {
        super::spherical::normal(self.x_axis, self.y_axis, self.z_axis, coord.phi, coord.theta)
    }
}
