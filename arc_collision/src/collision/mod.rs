/*!
Collision root module.

This module re-exports submodules that implement spherical-surface collision detection
for a character controller. Collision regions are patches of a sphere described in
angular coordinates, and the detector picks the closest one along a move. The code is
split for clarity:

- types:     shared data types (Vec3, Basis, SphericalCoord)
- settings:  tolerances and tuning constants
- spherical: angular coordinate <-> world-space mapping
- patch:     capability traits (ArcPatch, PatchLookup, OverlapQuery)
- arc:       `ArcOfSphere`, a patch bounded by two latitudes and two meridians
- detector:  the tracked patch set with `arc_cast` and `balloon_cast`
*/

pub mod arc;
pub mod detector;
pub mod patch;
pub mod settings;
pub mod spherical;
pub mod types;

// Re-export commonly used types and functions.
pub use arc::ArcOfSphere;
pub use detector::{ArcCastHit, BalloonCastHit, CollisionDetector, SensorRegion};
pub use patch::{ArcPatch, OverlapQuery, PatchLookup};
pub use spherical::{normal, position, to_spherical};
pub use types::{Basis, Quat, SphericalCoord, Vec3};
