pub mod collision;
pub mod world;

pub use collision::{
    ArcCastHit, ArcOfSphere, ArcPatch, BalloonCastHit, Basis, CollisionDetector, OverlapQuery,
    PatchLookup, SensorRegion, SphericalCoord, Vec3, normal, position, to_spherical,
};
pub use world::{ColliderShapeDef, PatchWorld, WorldColliderDef};
