use std::f32::consts::{FRAC_PI_2, PI, TAU};

use super::{
    patch::ArcPatch,
    settings::{CONTACT_BISECTION_ITERATIONS, MIN_PATH_LEN},
    spherical::{position, to_spherical},
    types::{Basis, SphericalCoord, Vec3},
};

/// A patch of a sphere's surface bounded by two lines of constant `phi` and two
/// meridians (lines of constant `theta`) in its own basis.
///
/// The patch covers `phi in [phi_min, phi_max]` and the azimuth interval that starts at
/// `theta_start` and sweeps `theta_span` radians toward the basis y axis. The interval may
/// wrap through `theta = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcOfSphere {
    center: Vec3,
    radius: f32,
    basis: Basis,
    phi_min: f32,
    phi_max: f32,
    theta_start: f32,
    theta_span: f32,
}

impl ArcOfSphere {
    /// Build a patch, validating the basis and the angular ranges.
    pub fn new(
        center: Vec3,
        radius: f32,
        basis: Basis,
        phi_range: (f32, f32),
        theta_start: f32,
        theta_span: f32,
    ) -> Result<Self, &'static str> {
        let (phi_min, phi_max) = phi_range;
        if !radius.is_finite() || radius <= 0.0 {
            return Err("Sphere radius must be positive and finite");
        }
        if !center.iter().all(|c| c.is_finite()) {
            return Err("Sphere center has a non-finite component");
        }
        basis.validate()?;
        if !(0.0..=PI).contains(&phi_min) || !(0.0..=PI).contains(&phi_max) || phi_min > phi_max
        {
            return Err("Phi range must satisfy 0 <= phi_min <= phi_max <= PI");
        }
        if !theta_start.is_finite() || !(0.0..=TAU).contains(&theta_span) {
            return Err("Theta span must be within [0, TAU]");
        }

        Ok(Self {
            center,
            radius,
            basis,
            phi_min,
            phi_max,
            theta_start: theta_start.rem_euclid(TAU),
            theta_span,
        })
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    /// World-space surface point at `coord` (not clamped to the patch).
    #[inline]
    pub fn point_at(&self, coord: SphericalCoord) -> Vec3 {
        self.center + self.basis.position(coord) * self.radius
    }

    /// Coordinate at the middle of the patch.
    pub fn midpoint(&self) -> SphericalCoord {
        SphericalCoord::new(
            0.5 * (self.phi_min + self.phi_max),
            (self.theta_start + 0.5 * self.theta_span).rem_euclid(TAU),
        )
    }

    /// Is `theta` inside the patch's azimuth interval?
    pub fn contains_theta(&self, theta: f32) -> bool {
        (theta - self.theta_start).rem_euclid(TAU) <= self.theta_span
    }

    /// Angular coordinate of the patch point nearest to `point`.
    pub fn closest_coord(&self, point: Vec3) -> SphericalCoord {
        let offset = point - self.center;
        let Some(coord) = to_spherical(&self.basis, offset) else {
            // Every patch point is equally near the sphere center.
            return self.midpoint();
        };

        if self.contains_theta(coord.theta) {
            return SphericalCoord::new(coord.phi.clamp(self.phi_min, self.phi_max), coord.theta);
        }

        // Outside the azimuth interval the nearest point lies on one of the two bounding
        // meridians. On the sphere, nearer means a larger dot product with the offset.
        let start = self.closest_on_meridian(offset, self.theta_start);
        let end = self.closest_on_meridian(offset, self.theta_start + self.theta_span);
        if self.basis.position(start).dot(&offset) >= self.basis.position(end).dot(&offset) {
            start
        } else {
            end
        }
    }

    /// Nearest coordinate to `offset` on the meridian at `theta`, limited to the phi range.
    fn closest_on_meridian(&self, offset: Vec3, theta: f32) -> SphericalCoord {
        let equator = position(
            self.basis.x_axis,
            self.basis.y_axis,
            self.basis.z_axis,
            FRAC_PI_2,
            theta,
        );
        let along = offset.dot(&equator);
        let up = offset.dot(&self.basis.z_axis);

        // Nearness along the meridian is `along * sin(phi) + up * cos(phi)`. With
        // `along >= 0` it peaks once on [0, PI], so clamping the peak is exact. Otherwise
        // it dips inside [0, PI] and the best point is whichever range end scores higher.
        let phi = if along >= 0.0 {
            along.atan2(up).clamp(self.phi_min, self.phi_max)
        } else {
            let score = |phi: f32| along * phi.sin() + up * phi.cos();
            if score(self.phi_min) >= score(self.phi_max) {
                self.phi_min
            } else {
                self.phi_max
            }
        };

        SphericalCoord::new(phi, theta.rem_euclid(TAU))
    }

    /// Arc normal at the patch point nearest to `point`.
    pub fn normal_at(&self, point: Vec3) -> Vec3 {
        self.basis.normal(self.closest_coord(point))
    }

    /// Outward sphere normal at the patch point nearest to `point`.
    pub fn surface_normal_at(&self, point: Vec3) -> Vec3 {
        self.basis.position(self.closest_coord(point))
    }
}

impl ArcPatch for ArcOfSphere {
    /// A negative `radius` never touches.
    fn contains(&self, point: Vec3, radius: f32) -> bool {
        radius >= 0.0 && (self.closest_point(point) - point).norm_squared() <= radius * radius
    }

    /// Bisects the segment for the touching point, assuming a single entry along it.
    fn distance(&self, desired: Vec3, current: Vec3, radius: f32) -> Option<f32> {
        let path = desired - current;
        let len = path.norm();
        if len < MIN_PATH_LEN || !self.contains(desired, radius) {
            return None;
        }
        if self.contains(current, radius) {
            return Some(0.0);
        }

        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        for _ in 0..CONTACT_BISECTION_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            if self.contains(current + path * mid, radius) {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        Some(hi * len)
    }

    fn closest_point(&self, point: Vec3) -> Vec3 {
        self.point_at(self.closest_coord(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_3, FRAC_PI_4};

    /// Northern band from 45 degrees down to the equator, first quadrant of azimuth.
    fn quadrant_band() -> ArcOfSphere {
        ArcOfSphere::new(
            Vec3::zeros(),
            10.0,
            Basis::world(),
            (FRAC_PI_4, FRAC_PI_2),
            0.0,
            FRAC_PI_2,
        )
        .unwrap()
    }

    fn unit(phi: f32, theta: f32) -> Vec3 {
        Basis::world().position(SphericalCoord::new(phi, theta))
    }

    #[test]
    fn new_rejects_invalid_inputs() {
        let b = Basis::world();
        let z = Vec3::zeros();
        assert!(ArcOfSphere::new(z, 0.0, b, (0.0, 1.0), 0.0, 1.0).is_err());
        assert!(ArcOfSphere::new(z, 1.0, b, (1.0, 0.5), 0.0, 1.0).is_err());
        assert!(ArcOfSphere::new(z, 1.0, b, (0.0, 4.0), 0.0, 1.0).is_err());
        assert!(ArcOfSphere::new(z, 1.0, b, (0.0, 1.0), 0.0, 7.0).is_err());
        let bad = Basis::new(Vec3::x(), Vec3::x(), Vec3::z());
        assert_eq!(
            ArcOfSphere::new(z, 1.0, bad, (0.0, 1.0), 0.0, 1.0),
            Err("Basis axes are not orthogonal")
        );
    }

    #[test]
    fn closest_point_projects_radially_inside_ranges() {
        let arc = quadrant_band();
        let dir = unit(FRAC_PI_3, FRAC_PI_4);
        let closest = arc.closest_point(dir * 12.0);
        assert!((closest - dir * 10.0).norm() < 1.0e-4);
        assert!(arc.contains(dir * 12.0, 2.5));
        assert!(!arc.contains(dir * 12.0, 1.5));
    }

    #[test]
    fn closest_point_clamps_phi() {
        let arc = quadrant_band();
        let closest = arc.closest_point(Vec3::new(0.0, 0.0, 5.0));
        assert!((closest - unit(FRAC_PI_4, 0.0) * 10.0).norm() < 1.0e-4);
    }

    #[test]
    fn closest_point_outside_azimuth_lands_on_nearer_meridian() {
        let arc = quadrant_band();
        let p = unit(FRAC_PI_3, -FRAC_PI_4) * 10.0;
        let closest = arc.closest_point(p);

        assert!(closest.y.abs() < 1.0e-4);
        assert!(closest.x > 0.0);
        assert!((closest.norm() - 10.0).abs() < 1.0e-3);

        let expected_phi = (FRAC_PI_3.sin() * FRAC_PI_4.cos()).atan2(FRAC_PI_3.cos());
        let coord = arc.closest_coord(p);
        assert!((coord.phi - expected_phi).abs() < 1.0e-4);
        assert!(coord.theta.abs() < 1.0e-6);
    }

    #[test]
    fn closest_point_wraps_azimuth_interval() {
        // Interval from 330 degrees through 0 to 30 degrees.
        let arc = ArcOfSphere::new(
            Vec3::zeros(),
            1.0,
            Basis::world(),
            (0.0, PI),
            -PI / 6.0,
            PI / 3.0,
        )
        .unwrap();
        assert!(arc.contains_theta(0.0));
        assert!(arc.contains_theta(TAU - 0.1));
        assert!(!arc.contains_theta(PI));

        let p = unit(FRAC_PI_2, 0.2) * 3.0;
        assert!((arc.closest_point(p) - unit(FRAC_PI_2, 0.2)).norm() < 1.0e-4);
    }

    /// Nearest point found by sampling the patch densely.
    fn sampled_nearest(arc: &ArcOfSphere, p: Vec3) -> Vec3 {
        const STEPS: usize = 200;
        let mut best = arc.point_at(arc.midpoint());
        for i in 0..=STEPS {
            let phi = arc.phi_min + (arc.phi_max - arc.phi_min) * i as f32 / STEPS as f32;
            for j in 0..=STEPS {
                let theta = arc.theta_start + arc.theta_span * j as f32 / STEPS as f32;
                let q = arc.point_at(SphericalCoord::new(phi, theta));
                if (q - p).norm_squared() < (best - p).norm_squared() {
                    best = q;
                }
            }
        }
        best
    }

    #[test]
    fn closest_point_behind_patch_picks_better_phi_end() {
        // Query on the far side of the sphere from a thin southern sliver.
        let arc = ArcOfSphere::new(Vec3::zeros(), 1.0, Basis::world(), (2.5, 3.0), 0.0, 0.1)
            .unwrap();
        let p = unit(1.5, PI);

        let closest = arc.closest_point(p);
        let sampled = sampled_nearest(&arc, p);
        let got = (closest - p).norm();
        let expected = (sampled - p).norm();
        assert!(got <= expected + 1.0e-3, "got {got}, sampled {expected}");
        assert!((closest - unit(3.0, 0.1)).norm() < 1.0e-4);
        assert!(arc.contains(p, expected + 0.01));
    }

    #[test]
    fn closest_point_matches_sampling_around_patch() {
        let arc = quadrant_band();
        for i in 0..6 {
            for j in 0..8 {
                let p = unit(0.2 + i as f32 * 0.55, j as f32 * 0.8) * (6.0 + j as f32);
                let got = (arc.closest_point(p) - p).norm();
                let expected = (sampled_nearest(&arc, p) - p).norm();
                assert!(got <= expected + 1.0e-3, "p={p:?} got {got}, sampled {expected}");
            }
        }
    }

    #[test]
    fn negative_radius_never_touches() {
        let arc = quadrant_band();
        let p = unit(FRAC_PI_3, FRAC_PI_4) * 10.0;
        assert!(arc.contains(p, 1.0e-3));
        assert!(!arc.contains(p, -1.0));
        assert_eq!(arc.distance(p, p * 0.5, -1.0), None);
    }

    #[test]
    fn sphere_center_maps_to_midpoint() {
        let arc = quadrant_band();
        let mid = arc.midpoint();
        assert!((arc.closest_point(Vec3::zeros()) - arc.point_at(mid)).norm() < 1.0e-5);
    }

    #[test]
    fn distance_finds_first_touch_along_path() {
        let arc = quadrant_band();
        let dir = unit(FRAC_PI_3, FRAC_PI_4);
        let current = dir * 5.0;
        let desired = dir * 9.5;

        // Touching begins once the body is within 1.0 of the surface at r = 10.
        let d = arc.distance(desired, current, 1.0).unwrap();
        assert!((d - 4.0).abs() < 1.0e-3, "d = {d}");
    }

    #[test]
    fn distance_is_zero_when_already_touching() {
        let arc = quadrant_band();
        let dir = unit(FRAC_PI_3, FRAC_PI_4);
        assert_eq!(arc.distance(dir * 9.8, dir * 9.5, 1.0), Some(0.0));
    }

    #[test]
    fn distance_is_absent_without_contact_or_path() {
        let arc = quadrant_band();
        let dir = unit(FRAC_PI_3, FRAC_PI_4);
        assert_eq!(arc.distance(dir * 5.0, dir * 4.0, 1.0), None);
        assert_eq!(arc.distance(dir * 9.5, dir * 9.5, 1.0), None);
    }

    #[test]
    fn normals_at_equator_edge() {
        let arc = quadrant_band();
        let p = unit(FRAC_PI_2, 0.3) * 11.0;
        assert!((arc.surface_normal_at(p) - unit(FRAC_PI_2, 0.3)).norm() < 1.0e-5);
        assert!((arc.normal_at(p) - Vec3::z()).norm() < 1.0e-5);
    }

    #[test]
    fn translated_and_rotated_patch() {
        let rotation = crate::collision::types::Quat::from_euler_angles(0.4, -0.2, 1.0);
        let basis = Basis::from_rotation(rotation);
        let center = Vec3::new(3.0, -2.0, 7.0);
        let arc = ArcOfSphere::new(center, 2.0, basis, (0.0, PI), 0.0, TAU).unwrap();

        let p = center + rotation * Vec3::new(0.0, 5.0, 0.0);
        let closest = arc.closest_point(p);
        assert!((closest - (center + rotation * Vec3::new(0.0, 2.0, 0.0))).norm() < 1.0e-4);
    }
}
