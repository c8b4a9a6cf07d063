//! Spherical coordinate helpers generalized to an arbitrary orthonormal basis.
//!
//! `position` is the physics-convention mapping: `phi` is the polar angle from `z_axis`,
//! `theta` the azimuth from `x_axis` toward `y_axis`. Both functions are total on all
//! real inputs and never renormalize, so unit output requires an orthonormal basis.

use std::f32::consts::TAU;

use super::{
    settings::DIST_EPS,
    types::{Basis, SphericalCoord, Vec3},
};

/// Point on the unit sphere at `(phi, theta)` in the given basis.
#[inline]
pub fn position(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3, phi: f32, theta: f32) -> Vec3 {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    x_axis * (sin_phi * cos_theta) + y_axis * (sin_phi * sin_theta) + z_axis * cos_phi
}

/// Arc normal at `(phi, theta)` in the given basis.
///
/// This is `-d(position)/d(phi)`: the unit tangent at the surface point that points
/// toward the `z_axis` pole. It is perpendicular to [`position`] (the radial direction),
/// so for a patch bounded by a line of constant `phi` it is the normal of that boundary
/// inside the tangent plane.
#[inline]
pub fn normal(x_axis: Vec3, y_axis: Vec3, z_axis: Vec3, phi: f32, theta: f32) -> Vec3 {
    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    x_axis * (-cos_phi * cos_theta) + y_axis * (-cos_phi * sin_theta) + z_axis * sin_phi
}

/// Inverse of [`position`]: angular coordinates of `direction` in `basis`.
///
/// `direction` need not be unit length. Returns `None` when it is (nearly) zero, since
/// the angles are undefined there. `theta` is normalized into `[0, TAU)`; on the poles
/// it is 0.
pub fn to_spherical(basis: &Basis, direction: Vec3) -> Option<SphericalCoord> {
    let local = Vec3::new(
        direction.dot(&basis.x_axis),
        direction.dot(&basis.y_axis),
        direction.dot(&basis.z_axis),
    );
    let len = local.norm();
    if len <= DIST_EPS {
        return None;
    }

    let phi = (local.z / len).clamp(-1.0, 1.0).acos();
    let theta = local.y.atan2(local.x).rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    let theta = if theta >= TAU { 0.0 } else { theta };

    Some(SphericalCoord::new(phi, theta))
}
