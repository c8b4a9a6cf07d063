/*!
Collision detector settings and tolerances.

These constants centralize the tuning used by basis validation, the `ArcOfSphere`
contact search and the detector's sensing region. Keeping them together makes tuning
easier and keeps results identical across platforms.

Notes
- Distances are in world units, angles in radians.
- Favor practical world-space tolerances over machine epsilon.
- For per-actor customization, keep these as defaults and override from game data.
*/

/// Allowed deviation from unit length / orthogonality when validating a basis.
/// Compared against squared norms and raw dot products.
pub const BASIS_EPS: f32 = 1.0e-4;

/// Paths shorter than this have no well-defined contact distance (world units).
pub const MIN_PATH_LEN: f32 = 1.0e-6;

/// Practical small distance for comparisons (world units).
/// Used to guard against a query point sitting on the sphere center.
pub const DIST_EPS: f32 = 1.0e-6;

/// Bisection steps when searching for the first touching point along a path.
/// 24 halvings resolve a unit-length path to well below `f32` surface noise.
pub const CONTACT_BISECTION_ITERATIONS: u32 = 24;

/// Radius of the sensing sphere used to seed the tracked set when none is configured.
pub const DEFAULT_SENSOR_RADIUS: f32 = 2.0;
