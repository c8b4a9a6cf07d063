//! Rapier-backed trigger/physics world for the collision detector.
//!
//! This module builds an in-memory Rapier scene from a set of collider definitions, some
//! of which carry an [`ArcPatch`]. It plays the two external roles the detector needs:
//! - broad-phase overlap queries ([`OverlapQuery`]) to seed the tracked set,
//! - handle -> patch resolution ([`PatchLookup`]), skipping colliders with no patch.
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical in-memory sets.
//! - Query-focused: no dynamics are stepped.
//! - Immutable world: colliders do not move after construction.

// Re-export Rapier so downstream crates can use Rapier types without depending on it directly.
pub use rapier3d;

use rapier3d::{
    na::{Translation3, UnitQuaternion},
    parry::utils::hashmap::HashMap,
    prelude::*,
};

use crate::collision::{
    ArcOfSphere, ArcPatch, CollisionDetector, OverlapQuery, PatchLookup, Vec3,
};

/// Definition of one collider in the world, optionally carrying a patch.
///
/// Conventions
/// - Units are world units.
/// - Rotation is a unit quaternion.
/// - Colliders with a patch are built as sensors.
#[derive(Clone, Debug)]
pub struct WorldColliderDef<P> {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u32,
    /// World-space translation.
    pub translation: Vector<f32>,
    /// World-space rotation (unit quaternion).
    pub rotation: UnitQuaternion<f32>,
    /// Collider shape parameters.
    pub shape: ColliderShapeDef,
    /// Patch attached to this collider, if any.
    pub patch: Option<P>,
}

impl<P> WorldColliderDef<P> {
    /// A plain (non-patch) collider.
    pub fn solid(id: u32, translation: Vector<f32>, shape: ColliderShapeDef) -> Self {
        Self {
            id,
            translation,
            rotation: UnitQuaternion::identity(),
            shape,
            patch: None,
        }
    }
}

impl WorldColliderDef<ArcOfSphere> {
    /// A patch collider whose volume is the patch's whole sphere.
    pub fn arc(id: u32, arc: ArcOfSphere) -> Self {
        Self {
            id,
            translation: arc.center(),
            rotation: UnitQuaternion::identity(),
            shape: ColliderShapeDef::Sphere {
                radius: arc.radius(),
            },
            patch: Some(arc),
        }
    }
}

/// Supported collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Sphere/ball.
    Sphere { radius: f32 },

    /// Oriented cuboid with given half-extents.
    Cuboid { half_extents: Vector<f32> },

    /// Y-aligned capsule.
    CapsuleY { radius: f32, half_height: f32 },
}

/// In-memory Rapier structures plus the patches attached to colliders.
pub struct PatchWorld<P> {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
    patches: HashMap<ColliderHandle, P>,
    handles: HashMap<u32, ColliderHandle>,
}

impl<P: ArcPatch> PatchWorld<P> {
    /// Build a query world from a list of collider definitions.
    ///
    /// The input is sorted by `id` before insertion. Duplicate ids keep the last handle.
    pub fn build(mut defs: Vec<WorldColliderDef<P>>) -> Self {
        // Ensure deterministic insertion order.
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let mut patches = HashMap::default();
        let mut handles = HashMap::default();

        for def in defs.into_iter() {
            let iso = Isometry::from_parts(Translation3::from(def.translation), def.rotation);

            let rb = RigidBodyBuilder::fixed().pose(iso).build();
            let rb_handle = bodies.insert(rb);

            let collider = collider_from_shape(&def.shape, def.patch.is_some());
            let co_handle = colliders.insert_with_parent(collider, rb_handle, &mut bodies);

            handles.insert(def.id, co_handle);
            if let Some(patch) = def.patch {
                patches.insert(co_handle, patch);
            }
        }

        // Run collision detection once (no dynamics) so the broad-phase BVH is populated.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        let mut collision_pipeline = CollisionPipeline::new();

        let hooks = ();
        let events = ();

        collision_pipeline.step(
            0.0,
            &mut broad_phase,
            &mut narrow_phase,
            &mut bodies,
            &mut colliders,
            &hooks,
            &events,
        );

        log::debug!(
            "built patch world: {} colliders, {} patches",
            colliders.len(),
            patches.len()
        );

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase,
            patches,
            handles,
        }
    }

    /// Create a borrowed `QueryPipeline` view for scene queries.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    /// Collider handle built for the definition with `id`.
    #[inline]
    pub fn handle_of(&self, id: u32) -> Option<ColliderHandle> {
        self.handles.get(&id).copied()
    }

    #[inline]
    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }
}

impl<P: ArcPatch> PatchLookup<ColliderHandle> for PatchWorld<P> {
    type Patch = P;

    #[inline]
    fn patch(&self, handle: ColliderHandle) -> Option<&P> {
        self.patches.get(&handle)
    }
}

impl<P: ArcPatch> OverlapQuery<ColliderHandle> for PatchWorld<P> {
    /// Colliders intersecting a ball at `center`, ordered by handle.
    fn overlapping(&self, center: Vec3, radius: f32) -> Vec<ColliderHandle> {
        let pipeline = self.query_pipeline(QueryFilter::default());
        let ball = Ball::new(radius.max(0.0));
        let pose = Isometry::translation(center.x, center.y, center.z);

        let mut hits: Vec<ColliderHandle> = pipeline
            .intersect_shape(pose, &ball)
            .map(|(handle, _)| handle)
            .collect();
        hits.sort_by_key(|h| h.into_raw_parts());
        hits
    }
}

impl CollisionDetector<ColliderHandle> {
    /// Feed a Rapier collision event involving the detector's `sensor` collider.
    ///
    /// `Started` tracks the other collider if it is a patch, `Stopped` forgets it.
    /// Events not involving `sensor` are ignored. Returns true if membership changed.
    pub fn on_collision_event<L>(
        &mut self,
        sensor: ColliderHandle,
        event: &CollisionEvent,
        lookup: &L,
    ) -> bool
    where
        L: PatchLookup<ColliderHandle> + ?Sized,
    {
        let other = if event.collider1() == sensor {
            event.collider2()
        } else if event.collider2() == sensor {
            event.collider1()
        } else {
            return false;
        };

        if event.started() {
            self.notify_enter(other, lookup)
        } else {
            self.notify_exit(other)
        }
    }
}

/// Build a Rapier collider with identity local transform; the pose lives on the parent body.
fn collider_from_shape(shape: &ColliderShapeDef, sensor: bool) -> Collider {
    let builder = match shape {
        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius),

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(*half_height, *radius),
    };
    builder.sensor(sensor).build()
}
