//! Capability contracts between the detector and the outside world.
//!
//! - [`ArcPatch`]: a collision region on a sphere's surface. The detector only ever calls
//!   these three methods and trusts their results.
//! - [`PatchLookup`]: resolves a stable handle to a patch, or `None` when the candidate
//!   is some other kind of collider.
//! - [`OverlapQuery`]: the broad-phase volume query used to seed the tracked set.

use super::types::Vec3;

/// A bounded region on a sphere's surface acting as a collision obstacle.
pub trait ArcPatch {
    /// Is `point` within `radius` of this patch? A negative `radius` never is.
    fn contains(&self, point: Vec3, radius: f32) -> bool;

    /// Path length from `current` toward `desired` at which a body of `radius` first
    /// touches this patch.
    ///
    /// `None` means there is no well-defined contact distance for this path, even if
    /// [`ArcPatch::contains`] reported the desired position as touching.
    fn distance(&self, desired: Vec3, current: Vec3, radius: f32) -> Option<f32>;

    /// Nearest point on the patch to `point`.
    fn closest_point(&self, point: Vec3) -> Vec3;
}

impl<P: ArcPatch + ?Sized> ArcPatch for &P {
    #[inline]
    fn contains(&self, point: Vec3, radius: f32) -> bool {
        (**self).contains(point, radius)
    }

    #[inline]
    fn distance(&self, desired: Vec3, current: Vec3, radius: f32) -> Option<f32> {
        (**self).distance(desired, current, radius)
    }

    #[inline]
    fn closest_point(&self, point: Vec3) -> Vec3 {
        (**self).closest_point(point)
    }
}

/// Resolve a handle to the patch attached to it.
pub trait PatchLookup<H> {
    type Patch: ArcPatch + ?Sized;

    /// `None` if `handle` is unknown or carries no patch.
    fn patch(&self, handle: H) -> Option<&Self::Patch>;

    #[inline]
    fn is_patch(&self, handle: H) -> bool {
        self.patch(handle).is_some()
    }
}

/// Patches stored by index; the handle is the position in the slice.
impl<P: ArcPatch> PatchLookup<usize> for [P] {
    type Patch = P;

    #[inline]
    fn patch(&self, handle: usize) -> Option<&P> {
        self.get(handle)
    }
}

impl<P: ArcPatch> PatchLookup<usize> for Vec<P> {
    type Patch = P;

    #[inline]
    fn patch(&self, handle: usize) -> Option<&P> {
        self.get(handle)
    }
}

/// Broad-phase overlap query over the world.
pub trait OverlapQuery<H> {
    /// Handles of every candidate whose volume overlaps the sphere at `center` with `radius`.
    /// Candidates need not be patches.
    fn overlapping(&self, center: Vec3, radius: f32) -> Vec<H>;
}
