use std::{fmt::Debug, hash::Hash};

use indexmap::IndexSet;
use rapier3d::prelude::ColliderHandle;

use super::{
    patch::{ArcPatch, OverlapQuery, PatchLookup},
    settings::DEFAULT_SENSOR_RADIUS,
    types::Vec3,
};

/// Bounding sphere of the detector's sensing volume.
///
/// Only used to seed the tracked set through a broad-phase query; the casts never look at it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorRegion {
    pub center: Vec3,
    pub radius: f32,
    pub enabled: bool,
}

impl SensorRegion {
    /// A disabled region; [`CollisionDetector::activate`] enables it.
    #[inline]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            enabled: false,
        }
    }
}

impl Default for SensorRegion {
    fn default() -> Self {
        Self::new(Vec3::zeros(), DEFAULT_SENSOR_RADIUS)
    }
}

/// Result of [`CollisionDetector::arc_cast_hit`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcCastHit<H> {
    pub handle: H,
    /// Path length from the current position to first contact.
    pub distance: f32,
}

/// Result of [`CollisionDetector::balloon_cast_hit`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BalloonCastHit<H> {
    pub handle: H,
    /// Nearest point on the patch to the queried position.
    pub point: Vec3,
    pub distance_sq: f32,
}

/// Tracks the patches near a character and finds the one it would collide with.
///
/// The tracked set holds handles only; patches are resolved through a [`PatchLookup`]
/// at query time, so the world keeps ownership. Membership changes only through
/// [`activate`](Self::activate), [`deactivate`](Self::deactivate),
/// [`notify_enter`](Self::notify_enter) and [`notify_exit`](Self::notify_exit).
///
/// Iteration follows insertion order, so when two patches tie in a cast the one that
/// was tracked first wins.
#[derive(Clone, Debug)]
pub struct CollisionDetector<H = ColliderHandle> {
    region: SensorRegion,
    tracked: IndexSet<H>,
}

impl<H: Copy + Eq + Hash + Debug> Default for CollisionDetector<H> {
    fn default() -> Self {
        Self::new(SensorRegion::default())
    }
}

impl<H: Copy + Eq + Hash + Debug> CollisionDetector<H> {
    pub fn new(region: SensorRegion) -> Self {
        Self {
            region,
            tracked: IndexSet::new(),
        }
    }

    #[inline]
    pub fn region(&self) -> &SensorRegion {
        &self.region
    }

    /// Move the sensing volume, e.g. to follow the character between steps.
    #[inline]
    pub fn set_region_center(&mut self, center: Vec3) {
        self.region.center = center;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.region.enabled
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    #[inline]
    pub fn is_tracking(&self, handle: H) -> bool {
        self.tracked.contains(&handle)
    }

    /// Tracked handles in insertion order.
    pub fn tracked(&self) -> impl Iterator<Item = H> + '_ {
        self.tracked.iter().copied()
    }

    /// Enable the sensing volume and add every overlapping patch found by the world.
    ///
    /// Candidates without a patch are skipped, and patches already tracked are not
    /// added twice. Returns how many patches were newly tracked.
    pub fn activate<W>(&mut self, world: &W) -> usize
    where
        W: OverlapQuery<H> + PatchLookup<H> + ?Sized,
    {
        self.region.enabled = true;

        let mut added = 0;
        for handle in world.overlapping(self.region.center, self.region.radius) {
            if world.is_patch(handle) && self.tracked.insert(handle) {
                added += 1;
            }
        }

        log::debug!(
            "activate: tracking {} patches ({} new) within {} of {:?}",
            self.tracked.len(),
            added,
            self.region.radius,
            self.region.center
        );
        added
    }

    /// Disable the sensing volume and forget every tracked patch.
    pub fn deactivate(&mut self) {
        self.region.enabled = false;
        log::debug!("deactivate: dropping {} tracked patches", self.tracked.len());
        self.tracked.clear();
    }

    /// A candidate entered the sensing volume. Returns true if it was newly tracked.
    pub fn notify_enter<L>(&mut self, handle: H, lookup: &L) -> bool
    where
        L: PatchLookup<H> + ?Sized,
    {
        if !lookup.is_patch(handle) {
            return false;
        }
        let inserted = self.tracked.insert(handle);
        if inserted {
            log::trace!("enter: {:?}", handle);
        }
        inserted
    }

    /// A candidate left the sensing volume. Unknown handles are ignored.
    /// Returns true if it was tracked.
    pub fn notify_exit(&mut self, handle: H) -> bool {
        let removed = self.tracked.shift_remove(&handle);
        if removed {
            log::trace!("exit: {:?}", handle);
        }
        removed
    }

    /// Closest patch obstructing the move from `current` to `desired` for a body of `radius`.
    ///
    /// A patch is a candidate only if it contains `desired` and reports a contact
    /// distance for the path; containment alone is not enough.
    #[inline]
    pub fn arc_cast<L>(&self, desired: Vec3, current: Vec3, radius: f32, lookup: &L) -> Option<H>
    where
        L: PatchLookup<H> + ?Sized,
    {
        self.arc_cast_hit(desired, current, radius, lookup)
            .map(|hit| hit.handle)
    }

    /// Like [`arc_cast`](Self::arc_cast), also returning the contact distance.
    pub fn arc_cast_hit<L>(
        &self,
        desired: Vec3,
        current: Vec3,
        radius: f32,
        lookup: &L,
    ) -> Option<ArcCastHit<H>>
    where
        L: PatchLookup<H> + ?Sized,
    {
        let mut best: Option<ArcCastHit<H>> = None;
        for &handle in &self.tracked {
            let Some(patch) = lookup.patch(handle) else {
                continue;
            };
            if !patch.contains(desired, radius) {
                continue;
            }
            if let Some(distance) = patch.distance(desired, current, radius) {
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(ArcCastHit { handle, distance });
                }
            }
        }
        best
    }

    /// Closest patch within `max_radius` of `desired`, ignoring movement direction.
    #[inline]
    pub fn balloon_cast<L>(&self, desired: Vec3, max_radius: f32, lookup: &L) -> Option<H>
    where
        L: PatchLookup<H> + ?Sized,
    {
        self.balloon_cast_hit(desired, max_radius, lookup)
            .map(|hit| hit.handle)
    }

    /// Like [`balloon_cast`](Self::balloon_cast), also returning the nearest point.
    pub fn balloon_cast_hit<L>(
        &self,
        desired: Vec3,
        max_radius: f32,
        lookup: &L,
    ) -> Option<BalloonCastHit<H>>
    where
        L: PatchLookup<H> + ?Sized,
    {
        let mut best: Option<BalloonCastHit<H>> = None;
        for &handle in &self.tracked {
            let Some(patch) = lookup.patch(handle) else {
                continue;
            };
            if !patch.contains(desired, max_radius) {
                continue;
            }
            let point = patch.closest_point(desired);
            let distance_sq = (point - desired).norm_squared();
            if best.map_or(true, |b| distance_sq < b.distance_sq) {
                best = Some(BalloonCastHit {
                    handle,
                    point,
                    distance_sq,
                });
            }
        }
        best
    }
}
